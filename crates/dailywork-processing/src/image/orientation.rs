use super::processor::ImageProcessor;
use image::{imageops, RgbImage};

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Apply the EXIF orientation stored in `data` to its decoded bitmap
    pub fn apply_exif_orientation(img: RgbImage, data: &[u8]) -> RgbImage {
        Self::apply(img, ImageProcessor::read_exif_orientation(data))
    }

    pub fn apply(mut img: RgbImage, orientation: u8) -> RgbImage {
        let (rotate, flip_h, flip_v) = ImageProcessor::get_orientation_transforms(orientation);

        if orientation != 1 {
            tracing::debug!(
                orientation = orientation,
                rotate = ?rotate,
                flip_horizontal = flip_h,
                flip_vertical = flip_v,
                "Applying EXIF orientation"
            );
        }

        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle);
        }

        if flip_h {
            imageops::flip_horizontal_in_place(&mut img);
        }
        if flip_v {
            imageops::flip_vertical_in_place(&mut img);
        }

        img
    }

    /// Rotate image by specified angle (90, 180, or 270 degrees clockwise)
    pub fn rotate_by_angle(img: RgbImage, angle: u16) -> RgbImage {
        match angle {
            90 => imageops::rotate90(&img),
            180 => imageops::rotate180(&img),
            270 => imageops::rotate270(&img),
            _ => img,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

    /// 2x1 strip: red on the left, blue on the right.
    fn strip() -> RgbImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 0, BLUE);
        img
    }

    #[test]
    fn test_rotation_dimension_changes() {
        let rotated = |angle| {
            let img = ImageOrientation::rotate_by_angle(RgbImage::new(4, 2), angle);
            img.dimensions()
        };
        assert_eq!(rotated(90), (2, 4));
        assert_eq!(rotated(180), (4, 2));
        assert_eq!(rotated(270), (2, 4));
        assert_eq!(rotated(45), (4, 2));
    }

    #[test]
    fn test_normal_orientation_is_identity() {
        assert_eq!(ImageOrientation::apply(strip(), 1), strip());
    }

    #[test]
    fn test_mirror_horizontal() {
        let out = ImageOrientation::apply(strip(), 2);
        assert_eq!(*out.get_pixel(0, 0), BLUE);
        assert_eq!(*out.get_pixel(1, 0), RED);
    }

    #[test]
    fn test_rotate_90() {
        let out = ImageOrientation::apply(strip(), 6);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(*out.get_pixel(0, 0), RED);
        assert_eq!(*out.get_pixel(0, 1), BLUE);
    }

    #[test]
    fn test_rotate_270() {
        let out = ImageOrientation::apply(strip(), 8);
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(*out.get_pixel(0, 0), BLUE);
        assert_eq!(*out.get_pixel(0, 1), RED);
    }

    #[test]
    fn test_transpose_and_transverse() {
        let transposed = ImageOrientation::apply(strip(), 5);
        assert_eq!(transposed.dimensions(), (1, 2));
        assert_eq!(*transposed.get_pixel(0, 0), RED);
        assert_eq!(*transposed.get_pixel(0, 1), BLUE);

        let transversed = ImageOrientation::apply(strip(), 7);
        assert_eq!(transversed.dimensions(), (1, 2));
        assert_eq!(*transversed.get_pixel(0, 0), BLUE);
        assert_eq!(*transversed.get_pixel(0, 1), RED);
    }

    #[test]
    fn test_exif_orientation_without_exif() {
        let out = ImageOrientation::apply_exif_orientation(strip(), b"");
        assert_eq!(out, strip());
    }
}
