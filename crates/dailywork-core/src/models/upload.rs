use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const DOCUMENT_FILE_SUFFIX: &str = "_scanned_document.pdf";

/// `<number>_scanned_document.pdf`
pub fn document_file_name(number: &str) -> String {
    format!("{}{}", number.trim(), DOCUMENT_FILE_SUFFIX)
}

/// An assembled RFI document wrapped as a named file, ready for multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl DocumentFile {
    pub fn pdf(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            data: data.into(),
        }
    }

    /// Name the document after the work's reference number.
    pub fn for_work(number: &str, data: impl Into<Bytes>) -> Self {
        Self::pdf(document_file_name(number), data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Response of the RFI upload endpoint. `url` becomes the record's `file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub url: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of the field update endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub message: Option<String>,
}
