use crate::notice::{Notice, UPDATED_MESSAGE, UPLOADED_MESSAGE};
use dailywork_core::models::{DocumentFile, FieldChange, WorkId, WorkRecord, WorkStatus};
use dailywork_core::{
    DailyWorkBackend, ErrorMetadata, InFlightTracker, LogLevel, SharedStore, StoreAction,
    WorkStore, WorkflowError, WorkflowResult,
};
use dailywork_processing::{DocumentPipeline, DocumentSource};
use std::sync::Arc;

/// Inline edits of the daily-works table.
///
/// Every change follows the same commit pattern: POST, then on HTTP 200 merge the
/// confirmed value into the store, otherwise leave the record untouched. Completing
/// non-structure work is gated on building and uploading an RFI document first.
#[derive(Clone)]
pub struct DailyWorkService {
    store: SharedStore,
    backend: Arc<dyn DailyWorkBackend>,
    pipeline: DocumentPipeline,
    in_flight: InFlightTracker,
}

impl DailyWorkService {
    pub fn new(
        store: SharedStore,
        backend: Arc<dyn DailyWorkBackend>,
        pipeline: DocumentPipeline,
    ) -> Self {
        Self {
            store,
            backend,
            pipeline,
            in_flight: InFlightTracker::new(),
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn in_flight(&self) -> &InFlightTracker {
        &self.in_flight
    }

    pub fn snapshot(&self) -> WorkStore {
        self.store.snapshot()
    }

    /// Change one field of a record.
    ///
    /// `source` is only asked for images when the change needs an RFI document.
    /// Fails with [`WorkflowError::Busy`] while another change to the same record
    /// is running.
    #[tracing::instrument(skip(self, change, source), fields(work_id = %id, field = change.key()))]
    pub async fn change_field(
        &self,
        id: WorkId,
        change: FieldChange,
        source: &dyn DocumentSource,
    ) -> WorkflowResult<Notice> {
        let record = self.store.get(id).ok_or(WorkflowError::NotFound(id))?;

        if let FieldChange::Status(to) = &change {
            ensure_transition(&record, *to)?;
        }

        let _guard = self
            .in_flight
            .try_acquire(id)
            .ok_or(WorkflowError::Busy(id))?;

        let result = self.run_change(&record, change, source).await;
        if let Err(err) = &result {
            log_failure(id, err);
        }
        result
    }

    /// Change the status of a record, gating `completed` on an RFI document.
    pub async fn change_status(
        &self,
        id: WorkId,
        status: WorkStatus,
        source: &dyn DocumentSource,
    ) -> WorkflowResult<Notice> {
        self.change_field(id, FieldChange::Status(status), source).await
    }

    /// Build an RFI document from `source` and attach it without changing status.
    #[tracing::instrument(skip(self, source), fields(work_id = %id))]
    pub async fn attach_document(
        &self,
        id: WorkId,
        source: &dyn DocumentSource,
    ) -> WorkflowResult<Notice> {
        let record = self.store.get(id).ok_or(WorkflowError::NotFound(id))?;
        let _guard = self
            .in_flight
            .try_acquire(id)
            .ok_or(WorkflowError::Busy(id))?;

        let result = async {
            let document = self.pipeline.build_document(source, &record.number).await?;
            self.upload_document(id, document).await
        }
        .await;

        if let Err(err) = &result {
            log_failure(id, err);
        }
        result
    }

    /// POST an assembled document and merge the returned URL into the record.
    pub async fn upload_document(
        &self,
        id: WorkId,
        document: DocumentFile,
    ) -> WorkflowResult<Notice> {
        let uploaded = self.backend.upload_rfi(id, document).await?;
        tracing::info!(work_id = %id, url = %uploaded.url, "RFI document uploaded");

        let notice = Notice::from_server(uploaded.message.as_deref(), UPLOADED_MESSAGE);
        self.store.dispatch(StoreAction::FileAttached {
            id,
            url: uploaded.url,
        });
        Ok(notice)
    }

    /// POST a single field change and merge it into the record.
    pub async fn commit_field(&self, id: WorkId, change: FieldChange) -> WorkflowResult<Notice> {
        let response = self.backend.update_field(id, &change).await?;
        tracing::info!(work_id = %id, field = change.key(), "Field update committed");

        self.store.dispatch(StoreAction::FieldCommitted { id, change });
        Ok(Notice::from_server(response.message.as_deref(), UPDATED_MESSAGE))
    }

    async fn run_change(
        &self,
        record: &WorkRecord,
        change: FieldChange,
        source: &dyn DocumentSource,
    ) -> WorkflowResult<Notice> {
        let id = record.id;

        if record.requires_document(&change) {
            tracing::debug!(work_id = %id, "Completion requires an RFI document");
            let document = self.pipeline.build_document(source, &record.number).await?;
            self.upload_document(id, document).await?;
        }

        self.commit_field(id, change).await
    }
}

fn ensure_transition(record: &WorkRecord, to: WorkStatus) -> WorkflowResult<()> {
    if !record.status.can_transition_to(to) {
        return Err(WorkflowError::InvalidTransition {
            from: record.status,
            to,
        });
    }
    Ok(())
}

fn log_failure(id: WorkId, err: &WorkflowError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(work_id = %id, error_code = code, error = %err, "Change not applied")
        }
        LogLevel::Warn => {
            tracing::warn!(work_id = %id, error_code = code, error = %err, "Change not applied")
        }
        LogLevel::Error => {
            tracing::error!(work_id = %id, error_code = code, error = %err, "Change failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use crate::test_helpers::{fake_image, work_record, BackendCall, ScriptedSource, TestHarness};
    use dailywork_core::models::UserId;
    use serde_json::json;

    fn status_update(id: i64, status: WorkStatus) -> BackendCall {
        BackendCall::Update {
            id: WorkId(id),
            change: FieldChange::Status(status),
        }
    }

    #[tokio::test]
    async fn cancelled_picker_leaves_status_and_skips_update() {
        let harness = TestHarness::new(vec![work_record(1, "pavement", WorkStatus::New)]);
        let source = ScriptedSource::cancelled();

        let err = harness
            .service
            .change_status(WorkId(1), WorkStatus::Completed, &source)
            .await
            .unwrap_err();

        assert!(err.is_cancellation());
        assert_eq!(source.picks(), 1);
        assert!(harness.backend.calls().is_empty());
        assert_eq!(harness.record(1).unwrap().status, WorkStatus::New);
        assert!(!harness.service.in_flight().is_in_flight(WorkId(1)));
    }

    #[tokio::test]
    async fn structure_completes_without_document() {
        let harness = TestHarness::new(vec![work_record(2, "structure", WorkStatus::New)]);
        let source = ScriptedSource::cancelled();

        let notice = harness
            .service
            .change_status(WorkId(2), WorkStatus::Completed, &source)
            .await
            .unwrap();

        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(source.picks(), 0);
        assert_eq!(
            harness.backend.calls(),
            vec![status_update(2, WorkStatus::Completed)]
        );
        let record = harness.record(2).unwrap();
        assert_eq!(record.status, WorkStatus::Completed);
        assert_eq!(record.file, None);
    }

    #[tokio::test]
    async fn completion_uploads_document_before_update() {
        let harness = TestHarness::new(vec![work_record(3, "embankment", WorkStatus::New)]);
        harness.backend.respond_with_url("/files/3.pdf");
        let source = ScriptedSource::new(vec![
            fake_image("first.jpg", 400, 300),
            fake_image("second.jpg", 800, 300),
        ]);

        harness
            .service
            .change_status(WorkId(3), WorkStatus::Completed, &source)
            .await
            .unwrap();

        assert_eq!(
            harness.encoder.batches(),
            vec![vec![
                ("first.jpg".to_string(), 1365, 1024),
                ("second.jpg".to_string(), 2731, 1024),
            ]]
        );

        let calls = harness.backend.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            BackendCall::Upload { id, file_name, .. } => {
                assert_eq!(*id, WorkId(3));
                assert_eq!(file_name, "DW-3_scanned_document.pdf");
            }
            other => panic!("expected the upload first, got {:?}", other),
        }
        assert_eq!(calls[1], status_update(3, WorkStatus::Completed));
        assert_eq!(
            FieldChange::Status(WorkStatus::Completed).payload(WorkId(3)),
            json!({"id": 3, "status": "completed"})
        );

        let record = harness.record(3).unwrap();
        assert_eq!(record.file.as_deref(), Some("/files/3.pdf"));
        assert_eq!(record.status, WorkStatus::Completed);
        assert!(record.satisfies_completion_invariant());
    }

    #[tokio::test]
    async fn structure_type_match_ignores_case_and_spacing() {
        let harness = TestHarness::new(vec![work_record(4, " Structure ", WorkStatus::Emergency)]);

        harness
            .service
            .change_status(
                WorkId(4),
                WorkStatus::Completed,
                &ScriptedSource::cancelled(),
            )
            .await
            .unwrap();

        assert_eq!(harness.backend.upload_count(), 0);
        assert_eq!(harness.record(4).unwrap().status, WorkStatus::Completed);
    }

    #[tokio::test]
    async fn decode_failure_uploads_nothing() {
        let harness = TestHarness::new(vec![work_record(5, "drain", WorkStatus::New)]);
        let source = ScriptedSource::new(vec![
            fake_image("ok.png", 10, 10),
            dailywork_processing::RawImage::new("bad.png", "image/png", b"corrupt".to_vec()),
        ]);

        let err = harness
            .service
            .change_status(WorkId(5), WorkStatus::Completed, &source)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Decode { .. }));
        assert!(harness.encoder.batches().is_empty());
        assert!(harness.backend.calls().is_empty());
        assert_eq!(harness.record(5).unwrap().status, WorkStatus::New);
    }

    #[tokio::test]
    async fn failed_upload_blocks_status_change() {
        let harness = TestHarness::new(vec![work_record(6, "pavement", WorkStatus::Resubmission)]);
        harness.backend.fail_next_upload(WorkflowError::Server {
            status: 413,
            message: Some("File too large".to_string()),
        });
        let source = ScriptedSource::new(vec![fake_image("scan.png", 100, 100)]);

        let err = harness
            .service
            .change_status(WorkId(6), WorkStatus::Completed, &source)
            .await
            .unwrap_err();

        assert_eq!(err.client_message(), "File too large");
        assert_eq!(harness.backend.update_count(), 0);
        let record = harness.record(6).unwrap();
        assert_eq!(record.status, WorkStatus::Resubmission);
        assert_eq!(record.file, None);
    }

    #[tokio::test]
    async fn retried_upload_keeps_only_final_url() {
        let harness = TestHarness::new(vec![work_record(7, "pavement", WorkStatus::New)]);
        let source = ScriptedSource::new(vec![fake_image("scan.png", 300, 200)]);

        harness
            .backend
            .fail_next_upload(WorkflowError::Network("reset".to_string()));
        harness.backend.fail_next_upload(WorkflowError::Timeout);
        harness.backend.respond_with_url("/files/7-final.pdf");

        for _ in 0..2 {
            assert!(harness
                .service
                .change_status(WorkId(7), WorkStatus::Completed, &source)
                .await
                .is_err());
            let record = harness.record(7).unwrap();
            assert_eq!(record.file, None);
            assert_eq!(record.status, WorkStatus::New);
        }

        harness
            .service
            .change_status(WorkId(7), WorkStatus::Completed, &source)
            .await
            .unwrap();

        let record = harness.record(7).unwrap();
        assert_eq!(record.file.as_deref(), Some("/files/7-final.pdf"));
        assert_eq!(record.status, WorkStatus::Completed);
        assert_eq!(harness.backend.upload_count(), 3);
        assert_eq!(harness.backend.update_count(), 1);
    }

    #[tokio::test]
    async fn rejected_update_keeps_uploaded_file_but_not_status() {
        let harness = TestHarness::new(vec![work_record(8, "pavement", WorkStatus::New)]);
        harness.backend.fail_next_update(WorkflowError::Server {
            status: 500,
            message: None,
        });
        let source = ScriptedSource::new(vec![fake_image("scan.png", 300, 200)]);

        let err = harness
            .service
            .change_status(WorkId(8), WorkStatus::Completed, &source)
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "SERVER_ERROR");
        let record = harness.record(8).unwrap();
        assert_eq!(record.status, WorkStatus::New);
        assert_eq!(record.file.as_deref(), Some("/files/8.pdf"));
    }

    #[tokio::test]
    async fn other_fields_pass_straight_through() {
        let harness = TestHarness::new(vec![work_record(9, "pavement", WorkStatus::New)]);
        let source = ScriptedSource::cancelled();

        harness
            .service
            .change_field(WorkId(9), FieldChange::Assigned(Some(UserId(42))), &source)
            .await
            .unwrap();
        harness
            .service
            .change_status(WorkId(9), WorkStatus::Emergency, &source)
            .await
            .unwrap();

        assert_eq!(source.picks(), 0);
        assert_eq!(harness.backend.upload_count(), 0);
        let record = harness.record(9).unwrap();
        assert_eq!(record.assigned, Some(UserId(42)));
        assert_eq!(record.status, WorkStatus::Emergency);
    }

    #[tokio::test]
    async fn same_status_is_rejected_without_request() {
        let harness = TestHarness::new(vec![work_record(10, "pavement", WorkStatus::New)]);

        let err = harness
            .service
            .change_status(WorkId(10), WorkStatus::New, &ScriptedSource::cancelled())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        assert!(harness.backend.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_record_is_not_found() {
        let harness = TestHarness::new(Vec::new());
        let err = harness
            .service
            .change_status(
                WorkId(99),
                WorkStatus::Completed,
                &ScriptedSource::cancelled(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(WorkId(99))));
    }

    #[tokio::test]
    async fn busy_record_ignores_second_change() {
        let harness = TestHarness::new(vec![
            work_record(11, "pavement", WorkStatus::New),
            work_record(12, "pavement", WorkStatus::New),
        ]);
        let source = ScriptedSource::cancelled();
        let held = harness.service.in_flight().try_acquire(WorkId(11)).unwrap();

        let err = harness
            .service
            .change_status(WorkId(11), WorkStatus::Emergency, &source)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Busy(WorkId(11))));

        // Other records are independent.
        harness
            .service
            .change_status(WorkId(12), WorkStatus::Emergency, &source)
            .await
            .unwrap();

        drop(held);
        harness
            .service
            .change_status(WorkId(11), WorkStatus::Emergency, &source)
            .await
            .unwrap();
        assert_eq!(harness.backend.update_count(), 2);
    }

    #[tokio::test]
    async fn attach_document_keeps_status() {
        let harness = TestHarness::new(vec![work_record(13, "pavement", WorkStatus::Resubmission)]);
        let source = ScriptedSource::new(vec![fake_image("scan.png", 10, 20)]);

        harness
            .service
            .attach_document(WorkId(13), &source)
            .await
            .unwrap();

        let record = harness.record(13).unwrap();
        assert_eq!(record.file.as_deref(), Some("/files/13.pdf"));
        assert_eq!(record.status, WorkStatus::Resubmission);
        assert_eq!(harness.backend.update_count(), 0);
    }
}
