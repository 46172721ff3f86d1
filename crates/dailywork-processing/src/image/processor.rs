//! Image processor - decoding, EXIF orientation and JPEG encoding

use crate::types::RawImage;
use dailywork_core::{WorkflowError, WorkflowResult};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode a selected file, sniffing the format from its bytes rather than its name.
    pub fn decode(raw: &RawImage) -> WorkflowResult<DynamicImage> {
        let reader = ImageReader::new(Cursor::new(raw.data.as_ref()))
            .with_guessed_format()
            .map_err(|e| WorkflowError::decode(&raw.name, e))?;

        if reader.format().is_none() {
            return Err(WorkflowError::decode(&raw.name, "unrecognized image format"));
        }

        let img = reader
            .decode()
            .map_err(|e| WorkflowError::decode(&raw.name, e))?;

        if img.width() == 0 || img.height() == 0 {
            return Err(WorkflowError::decode(&raw.name, "image has no pixels"));
        }

        Ok(img)
    }

    /// Read EXIF orientation tag from image data.
    ///
    /// Returns orientation value (1–8) or 1 (normal) if absent or unreadable.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
            Ok(exif) => exif,
            Err(_) => return 1,
        };

        exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok())
            .filter(|value| (1..=8).contains(value))
            .unwrap_or(1)
    }

    /// Get rotation and flip operations needed for a given EXIF orientation
    /// Returns (rotate_angle, flip_horizontal, flip_vertical), rotation applied first
    pub fn get_orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            1 => (None, false, false),      // Normal
            2 => (None, true, false),       // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),       // Mirror vertical
            5 => (Some(90), true, false),   // Transpose
            6 => (Some(90), false, false),  // Rotate 90 CW
            7 => (Some(270), true, false),  // Transverse
            8 => (Some(270), false, false), // Rotate 270 CW
            _ => (None, false, false),      // Invalid, treat as normal
        }
    }

    /// Encode an RGB bitmap as baseline JPEG.
    pub fn encode_jpeg(img: &RgbImage, quality: u8) -> WorkflowResult<Vec<u8>> {
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .encode_image(img)
            .map_err(|e| WorkflowError::Encode(format!("JPEG encoding failed: {}", e)))?;
        Ok(buffer)
    }
}
