//! Daily-work endpoints.
//!
//! Field updates go out as `{ id, <key>: <value> }` JSON, RFI documents as a
//! multipart form with `taskId` and `file` parts.

use crate::ApiClient;
use async_trait::async_trait;
use dailywork_core::models::{DocumentFile, FieldChange, UpdateResponse, UploadResult, WorkId};
use dailywork_core::{DailyWorkBackend, WorkflowError};
use reqwest::multipart::{Form, Part};

impl ApiClient {
    pub fn update_path(&self) -> &str {
        &self.update_path
    }

    pub fn upload_path(&self) -> &str {
        &self.upload_path
    }
}

#[async_trait]
impl DailyWorkBackend for ApiClient {
    async fn update_field(
        &self,
        id: WorkId,
        change: &FieldChange,
    ) -> Result<UpdateResponse, WorkflowError> {
        tracing::debug!(work_id = %id, field = change.key(), "Sending field update");
        self.post_json(&self.update_path, &change.payload(id)).await
    }

    async fn upload_rfi(
        &self,
        id: WorkId,
        document: DocumentFile,
    ) -> Result<UploadResult, WorkflowError> {
        tracing::debug!(
            work_id = %id,
            file_name = %document.file_name,
            bytes = document.len(),
            "Uploading RFI document"
        );

        let file = Part::bytes(document.data.to_vec())
            .file_name(document.file_name)
            .mime_str(&document.content_type)
            .map_err(|e| WorkflowError::InvalidInput(format!("Invalid content type: {}", e)))?;

        let form = Form::new()
            .text("taskId", id.to_string())
            .part("file", file);

        self.post_multipart(&self.upload_path, form).await
    }
}
