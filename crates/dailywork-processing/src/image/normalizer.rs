//! Fixed-height page normalization

use super::orientation::ImageOrientation;
use super::processor::ImageProcessor;
use crate::types::{NormalizedPage, RawImage};
use dailywork_core::{WorkflowError, WorkflowResult};
use image::imageops::{self, FilterType};

/// Largest page width accepted after scaling.
pub const MAX_PAGE_WIDTH: u32 = u16::MAX as u32;

/// Decodes one selected file and resizes it to a fixed height.
///
/// Pure per image: implementations must not depend on other files in the batch.
pub trait ImageCodec: Send + Sync {
    fn resize(&self, raw: &RawImage, target_height: u32) -> WorkflowResult<NormalizedPage>;
}

/// Width that keeps the aspect ratio of a `width` x `height` image at `target_height`.
///
/// Rounded to the nearest pixel and never less than one.
pub fn scaled_width(width: u32, height: u32, target_height: u32) -> WorkflowResult<u32> {
    if width == 0 || height == 0 || target_height == 0 {
        return Err(WorkflowError::InvalidInput(format!(
            "cannot scale {}x{} image to height {}",
            width, height, target_height
        )));
    }

    let scaled = (u64::from(target_height) * u64::from(width) * 2 + u64::from(height))
        / (2 * u64::from(height));
    let scaled = scaled.max(1);

    if scaled > u64::from(MAX_PAGE_WIDTH) {
        return Err(WorkflowError::InvalidInput(format!(
            "scaled page width {} exceeds {}",
            scaled, MAX_PAGE_WIDTH
        )));
    }

    Ok(scaled as u32)
}

/// Resampling used when scaling to the target height.
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// [`ImageCodec`] backed by the `image` crate.
///
/// EXIF orientation is applied before measuring, so portrait phone photos keep
/// their upright aspect ratio. Alpha is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNormalizer;

impl ImageCodec for ImageNormalizer {
    fn resize(&self, raw: &RawImage, target_height: u32) -> WorkflowResult<NormalizedPage> {
        let decoded = ImageProcessor::decode(raw)?;
        let upright = ImageOrientation::apply_exif_orientation(decoded.to_rgb8(), &raw.data);
        let (width, height) = upright.dimensions();
        let target_width = scaled_width(width, height, target_height)
            .map_err(|e| WorkflowError::decode(&raw.name, e))?;

        let image = if (width, height) == (target_width, target_height) {
            upright
        } else {
            imageops::resize(&upright, target_width, target_height, RESIZE_FILTER)
        };

        tracing::debug!(
            file = %raw.name,
            original_width = width,
            original_height = height,
            width = target_width,
            height = target_height,
            "Normalized image"
        );

        Ok(NormalizedPage {
            source_name: raw.name.clone(),
            image,
        })
    }
}
