//! Image processing module
//!
//! Decoding and EXIF handling (processor, orientation) and the fixed-height
//! resize that turns a captured photo into a document page (normalizer).

pub mod normalizer;
pub mod orientation;
pub mod processor;

pub use normalizer::{scaled_width, ImageCodec, ImageNormalizer};
pub use orientation::ImageOrientation;
pub use processor::ImageProcessor;
