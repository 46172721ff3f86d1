//! Daily-work domain models

mod field;
#[cfg(test)]
pub(crate) mod fixtures;
mod page;
mod upload;
mod user;
mod work;

pub use field::FieldChange;
pub use page::{DailyWorksPage, Paginated};
pub use upload::{
    document_file_name, DocumentFile, UpdateResponse, UploadResult, PDF_CONTENT_TYPE,
};
pub use user::{User, UserId};
pub use work::{WorkId, WorkRecord, WorkStatus, WorkType};
