//! Daily-work services layer
//!
//! This crate hosts the workflow orchestration: the status transition gate that
//! requires an uploaded RFI document before non-structure work is completed, and
//! the shared upload/commit pattern that merges confirmed server state into the
//! local record store. Transport lives in `dailywork-api-client`, image and PDF
//! work in `dailywork-processing`.

pub mod daily_work;
pub mod notice;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use daily_work::DailyWorkService;
pub use dailywork_processing::{
    DocumentEncoder, DocumentPipeline, DocumentSource, ImageCodec, ImageNormalizer, PathSource,
    PdfAssembler, PromptSource,
};
pub use notice::{Notice, NoticeLevel};
