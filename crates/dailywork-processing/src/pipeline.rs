//! RFI document pipeline
//!
//! capture -> validate -> normalize (one image at a time, in order) -> assemble

use crate::capture::DocumentSource;
use crate::document::{DocumentEncoder, PdfAssembler};
use crate::image::{ImageCodec, ImageNormalizer};
use crate::types::{NormalizedPage, RawImage};
use crate::validator::ImageValidator;
use dailywork_core::models::DocumentFile;
use dailywork_core::{WorkflowConfig, WorkflowError, WorkflowResult};
use std::sync::Arc;
use std::time::Instant;

/// Turns the user's image selection into the PDF attached to a daily work.
#[derive(Clone)]
pub struct DocumentPipeline {
    codec: Arc<dyn ImageCodec>,
    encoder: Arc<dyn DocumentEncoder>,
    validator: ImageValidator,
    target_height: u32,
}

impl DocumentPipeline {
    pub fn new(
        codec: Arc<dyn ImageCodec>,
        encoder: Arc<dyn DocumentEncoder>,
        validator: ImageValidator,
        target_height: u32,
    ) -> Self {
        Self {
            codec,
            encoder,
            validator,
            target_height,
        }
    }

    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self::new(
            Arc::new(ImageNormalizer::default()),
            Arc::new(PdfAssembler::new(config.jpeg_quality)),
            ImageValidator::new(config.max_image_size_bytes),
            config.target_height,
        )
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn DocumentEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Capture images from `source` and assemble them into
    /// `<work_number>_scanned_document.pdf`.
    ///
    /// Any failure aborts the whole document; nothing partial is returned.
    pub async fn build_document(
        &self,
        source: &dyn DocumentSource,
        work_number: &str,
    ) -> WorkflowResult<DocumentFile> {
        let images = source.pick_images().await?;
        if images.is_empty() {
            return Err(WorkflowError::Cancelled);
        }

        for raw in &images {
            self.validator
                .validate_all(&raw.name, &raw.content_type, raw.data.len())?;
        }

        let start = Instant::now();
        let pages = self.normalize_all(images).await?;

        let encoder = Arc::clone(&self.encoder);
        let document = tokio::task::spawn_blocking(move || encoder.assemble(&pages))
            .await
            .map_err(|e| task_failed("document assembly", e))??;

        tracing::info!(
            work_number = %work_number,
            pages = document.page_count,
            bytes = document.data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "RFI document built"
        );

        Ok(document.into_file(work_number))
    }

    /// Decode and resize sequentially so page order always equals selection order.
    async fn normalize_all(&self, images: Vec<RawImage>) -> WorkflowResult<Vec<NormalizedPage>> {
        let mut pages = Vec::with_capacity(images.len());
        for raw in images {
            let codec = Arc::clone(&self.codec);
            let target_height = self.target_height;
            let page = tokio::task::spawn_blocking(move || codec.resize(&raw, target_height))
                .await
                .map_err(|e| task_failed("image decode", e))??;
            pages.push(page);
        }
        Ok(pages)
    }
}

fn task_failed(task: &str, err: tokio::task::JoinError) -> WorkflowError {
    WorkflowError::Internal(format!("{} task failed: {}", task, err))
}
