//! Backend abstraction
//!
//! The workflow talks to the REST backend only through [`DailyWorkBackend`]:
//! one JSON field update route and one multipart RFI upload route. The HTTP
//! implementation lives in `dailywork-api-client`; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::WorkflowError;
use crate::models::{DocumentFile, FieldChange, UpdateResponse, UploadResult, WorkId};

#[async_trait]
pub trait DailyWorkBackend: Send + Sync {
    /// POST `{ id, <key>: <value> }` to the update route. Ok only on HTTP 200.
    async fn update_field(
        &self,
        id: WorkId,
        change: &FieldChange,
    ) -> Result<UpdateResponse, WorkflowError>;

    /// POST multipart `{ taskId, file }` to the upload route. Ok only on HTTP 200.
    async fn upload_rfi(
        &self,
        id: WorkId,
        document: DocumentFile,
    ) -> Result<UploadResult, WorkflowError>;
}
