//! Values passed between the pipeline stages.

use bytes::Bytes;
use dailywork_core::models::{DocumentFile, PDF_CONTENT_TYPE};
use image::RgbImage;

/// A file the user selected, not yet decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl RawImage {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// A decoded image resized to the target height.
#[derive(Debug, Clone)]
pub struct NormalizedPage {
    pub source_name: String,
    pub image: RgbImage,
}

impl NormalizedPage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A serialized multi-page document.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDocument {
    pub data: Bytes,
    pub page_count: usize,
    pub content_type: &'static str,
}

impl AssembledDocument {
    pub fn pdf(data: impl Into<Bytes>, page_count: usize) -> Self {
        Self {
            data: data.into(),
            page_count,
            content_type: PDF_CONTENT_TYPE,
        }
    }

    /// Wrap as `<number>_scanned_document.pdf` for upload.
    pub fn into_file(self, work_number: &str) -> DocumentFile {
        DocumentFile::for_work(work_number, self.data)
    }
}
