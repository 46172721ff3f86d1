//! Document capture
//!
//! A [`DocumentSource`] hands back the images the user picked, in selection
//! order. Picking nothing is a cancellation, never an empty success.

use crate::types::RawImage;
use crate::validator::content_type_for;
use async_trait::async_trait;
use dailywork_core::{WorkflowError, WorkflowResult};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns at least one image, or [`WorkflowError::Cancelled`].
    async fn pick_images(&self) -> WorkflowResult<Vec<RawImage>>;
}

/// Images given up front as file paths (command line arguments, camera drops).
#[derive(Debug, Clone, Default)]
pub struct PathSource {
    paths: Vec<PathBuf>,
}

impl PathSource {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

async fn read_image(path: &Path) -> WorkflowResult<RawImage> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            WorkflowError::InvalidInput(format!("not a file path: {}", path.display()))
        })?;

    let data = tokio::fs::read(path).await.map_err(|e| {
        WorkflowError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
    })?;

    let content_type = content_type_for(&name);
    Ok(RawImage::new(name, content_type, data))
}

async fn read_all(paths: &[PathBuf]) -> WorkflowResult<Vec<RawImage>> {
    if paths.is_empty() {
        return Err(WorkflowError::Cancelled);
    }

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(read_image(path).await?);
    }
    Ok(images)
}

#[async_trait]
impl DocumentSource for PathSource {
    async fn pick_images(&self) -> WorkflowResult<Vec<RawImage>> {
        read_all(&self.paths).await
    }
}

/// Asks for comma separated image paths on an interactive stream.
///
/// A blank answer or end of input cancels. The prompt line is always
/// terminated and flushed before returning, whatever the outcome.
pub struct PromptSource<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
    prompt: String,
}

impl<R, W> PromptSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W, prompt: impl Into<String>) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
            prompt: prompt.into(),
        }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input.into_inner(), self.output.into_inner())
    }

    async fn ask(&self) -> WorkflowResult<Vec<PathBuf>> {
        let mut output = self.output.lock().await;
        output.write_all(self.prompt.as_bytes()).await?;
        output.flush().await?;

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await;

        // Close the prompt line before surfacing any read error.
        output.write_all(b"\n").await?;
        output.flush().await?;

        if read? == 0 {
            return Ok(Vec::new());
        }

        Ok(line
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

#[async_trait]
impl<R, W> DocumentSource for PromptSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn pick_images(&self) -> WorkflowResult<Vec<RawImage>> {
        let paths = self.ask().await?;
        read_all(&paths).await
    }
}
