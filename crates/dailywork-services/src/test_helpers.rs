//! In-memory fakes for workflow tests.
//!
//! Nothing here touches the network, a UI or a real image codec. Fake images
//! carry their size as text (`"400x300"`) and the fake codec scales that size
//! exactly like the real normalizer would.

use async_trait::async_trait;
use dailywork_core::models::{
    DocumentFile, FieldChange, UpdateResponse, UploadResult, WorkId, WorkRecord, WorkStatus,
    WorkType,
};
use dailywork_core::{DailyWorkBackend, SharedStore, WorkStore, WorkflowError, WorkflowResult};
use dailywork_processing::image::scaled_width;
use dailywork_processing::types::AssembledDocument;
use dailywork_processing::validator::content_type_for;
use dailywork_processing::{
    DocumentEncoder, DocumentPipeline, DocumentSource, ImageCodec, ImageValidator, NormalizedPage,
    RawImage,
};
use image::RgbImage;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::DailyWorkService;

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn work_record(id: i64, work_type: &str, status: WorkStatus) -> WorkRecord {
    WorkRecord {
        id: WorkId(id),
        number: format!("DW-{}", id),
        date: None,
        work_type: WorkType::new(work_type),
        status,
        location: Some("K12+300".to_string()),
        description: None,
        assigned: None,
        incharge: None,
        completion_time: None,
        rfi_submission_date: None,
        inspection_details: None,
        resubmission_count: None,
        file: None,
    }
}

/// A request the backend received.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Update { id: WorkId, change: FieldChange },
    Upload { id: WorkId, file_name: String, bytes: usize },
}

/// Backend that records every call and answers from a script.
///
/// Unscripted uploads return `/files/<id>.pdf`; unscripted updates succeed
/// without a message.
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    upload_failures: Mutex<VecDeque<WorkflowError>>,
    update_failures: Mutex<VecDeque<WorkflowError>>,
    upload_urls: Mutex<VecDeque<String>>,
}

impl RecordingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next_upload(&self, err: WorkflowError) {
        lock(&self.upload_failures).push_back(err);
    }

    pub fn fail_next_update(&self, err: WorkflowError) {
        lock(&self.update_failures).push_back(err);
    }

    pub fn respond_with_url(&self, url: impl Into<String>) {
        lock(&self.upload_urls).push_back(url.into());
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        lock(&self.calls).clone()
    }

    pub fn update_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Update { .. }))
            .count()
    }

    pub fn upload_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Upload { .. }))
            .count()
    }
}

#[async_trait]
impl DailyWorkBackend for RecordingBackend {
    async fn update_field(
        &self,
        id: WorkId,
        change: &FieldChange,
    ) -> Result<UpdateResponse, WorkflowError> {
        lock(&self.calls).push(BackendCall::Update {
            id,
            change: change.clone(),
        });
        if let Some(err) = lock(&self.update_failures).pop_front() {
            return Err(err);
        }
        Ok(UpdateResponse::default())
    }

    async fn upload_rfi(
        &self,
        id: WorkId,
        document: DocumentFile,
    ) -> Result<UploadResult, WorkflowError> {
        lock(&self.calls).push(BackendCall::Upload {
            id,
            file_name: document.file_name.clone(),
            bytes: document.len(),
        });
        if let Some(err) = lock(&self.upload_failures).pop_front() {
            return Err(err);
        }
        let url = lock(&self.upload_urls)
            .pop_front()
            .unwrap_or_else(|| format!("/files/{}.pdf", id));
        Ok(UploadResult { url, message: None })
    }
}

/// Image whose "bytes" are just its size, for [`FakeCodec`].
pub fn fake_image(name: &str, width: u32, height: u32) -> RawImage {
    let size = format!("{}x{}", width, height);
    RawImage::new(name, content_type_for(name), size.into_bytes())
}

/// Document source that hands out a fixed selection; an empty one cancels.
#[derive(Default)]
pub struct ScriptedSource {
    images: Vec<RawImage>,
    picks: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(images: Vec<RawImage>) -> Self {
        Self {
            images,
            picks: AtomicUsize::new(0),
        }
    }

    pub fn cancelled() -> Self {
        Self::default()
    }

    pub fn picks(&self) -> usize {
        self.picks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentSource for ScriptedSource {
    async fn pick_images(&self) -> WorkflowResult<Vec<RawImage>> {
        self.picks.fetch_add(1, Ordering::SeqCst);
        if self.images.is_empty() {
            return Err(WorkflowError::Cancelled);
        }
        Ok(self.images.clone())
    }
}

/// Codec reading `"<w>x<h>"` payloads instead of decoding pixels.
#[derive(Default)]
pub struct FakeCodec;

impl ImageCodec for FakeCodec {
    fn resize(&self, raw: &RawImage, target_height: u32) -> WorkflowResult<NormalizedPage> {
        let text = std::str::from_utf8(&raw.data)
            .map_err(|e| WorkflowError::decode(&raw.name, e))?;
        let (w, h) = text
            .split_once('x')
            .and_then(|(w, h)| Some((w.trim().parse().ok()?, h.trim().parse().ok()?)))
            .ok_or_else(|| WorkflowError::decode(&raw.name, "not a fake image"))?;

        let width = scaled_width(w, h, target_height)?;
        Ok(NormalizedPage {
            source_name: raw.name.clone(),
            image: RgbImage::new(width, target_height),
        })
    }
}

/// Encoder that remembers each batch of page sizes it assembled.
#[derive(Default)]
pub struct FakeEncoder {
    batches: Mutex<Vec<Vec<(String, u32, u32)>>>,
}

impl FakeEncoder {
    pub fn batches(&self) -> Vec<Vec<(String, u32, u32)>> {
        lock(&self.batches).clone()
    }
}

impl DocumentEncoder for FakeEncoder {
    fn assemble(&self, pages: &[NormalizedPage]) -> WorkflowResult<AssembledDocument> {
        if pages.is_empty() {
            return Err(WorkflowError::EmptyDocument);
        }
        lock(&self.batches).push(
            pages
                .iter()
                .map(|p| (p.source_name.clone(), p.width(), p.height()))
                .collect(),
        );
        Ok(AssembledDocument::pdf(b"%PDF-fake".to_vec(), pages.len()))
    }
}

/// A service over `records` wired to fakes, with the target height used by the table.
pub struct TestHarness {
    pub service: DailyWorkService,
    pub backend: Arc<RecordingBackend>,
    pub encoder: Arc<FakeEncoder>,
}

impl TestHarness {
    pub fn new(records: Vec<WorkRecord>) -> Self {
        let backend = RecordingBackend::new();
        let encoder = Arc::new(FakeEncoder::default());
        let pipeline = DocumentPipeline::new(
            Arc::new(FakeCodec),
            encoder.clone(),
            ImageValidator::new(1024 * 1024),
            1024,
        );
        let service = DailyWorkService::new(
            SharedStore::new(WorkStore::new(records)),
            backend.clone(),
            pipeline,
        );
        Self {
            service,
            backend,
            encoder,
        }
    }

    pub fn record(&self, id: i64) -> Option<WorkRecord> {
        self.service.store().get(WorkId(id))
    }
}
