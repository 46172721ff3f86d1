//! Daily-work processing library
//!
//! The RFI document pipeline: capture images from a [`DocumentSource`], validate
//! them, normalize each to a fixed height with an [`ImageCodec`], and lay them out
//! as pages of a single PDF with a [`DocumentEncoder`].

pub mod capture;
pub mod document;
pub mod image;
pub mod pipeline;
pub mod types;
pub mod validator;

pub use crate::image::{
    scaled_width, ImageCodec, ImageNormalizer, ImageOrientation, ImageProcessor,
};
pub use capture::{DocumentSource, PathSource, PromptSource};
pub use document::{DocumentEncoder, PageSize, PdfAssembler};
pub use pipeline::DocumentPipeline;
pub use types::{AssembledDocument, NormalizedPage, RawImage};
pub use validator::{ImageValidator, ValidationError};
