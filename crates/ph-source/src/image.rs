use std::path::Path;

use anyhow::{Context, Result};
use image::GrayImage;
use ph_core::frame::GrayBuffer;

/// Charge une image depuis le disque et la convertit en luminance 8 bits.
///
/// Any format enabled on the `image` crate is accepted; alpha is dropped.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use ph_source::image::load_luma;
/// use std::path::Path;
/// let luma = load_luma(Path::new("photo.jpg")).unwrap();
/// ```
pub fn load_luma(path: &Path) -> Result<GrayImage> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    Ok(img.to_luma8())
}

/// Normalise une image 8 bits en luminance f32 [0, 1].
///
/// # Errors
/// Returns an error if the raw buffer does not match the image dimensions.
///
/// # Example
/// ```
/// use image::{GrayImage, Luma};
/// use ph_source::image::to_gray_buffer;
/// let img = GrayImage::from_pixel(2, 2, Luma([255]));
/// let gray = to_gray_buffer(&img).unwrap();
/// assert!(gray.data.iter().all(|&v| v == 1.0));
/// ```
pub fn to_gray_buffer(img: &GrayImage) -> Result<GrayBuffer> {
    let (width, height) = img.dimensions();
    Ok(GrayBuffer::from_luma8(width, height, img.as_raw())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn color_image_is_reduced_to_luma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(3, 2, Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();
        let luma = load_luma(&path).unwrap();
        assert_eq!(luma.dimensions(), (3, 2));
        assert!(luma.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();
        let err = load_luma(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.png"));
    }

    #[test]
    fn normalization_maps_bytes_to_unit_range() {
        let mut img = GrayImage::new(2, 1);
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(1, 0, Luma([51]));
        let gray = to_gray_buffer(&img).unwrap();
        assert_eq!(gray.data[0], 0.0);
        assert!((gray.data[1] - 0.2).abs() < 1e-6);
    }
}
