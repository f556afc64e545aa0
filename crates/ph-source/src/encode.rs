use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageFormat, RgbImage};
use ph_core::frame::RgbBuffer;

/// Convertit un buffer RGB en image `image::RgbImage`.
///
/// # Errors
/// Returns an error if the buffer length does not match its dimensions.
pub fn to_rgb_image(buffer: &RgbBuffer) -> Result<RgbImage> {
    RgbImage::from_raw(buffer.width, buffer.height, buffer.to_raw_rgb8()).with_context(|| {
        format!(
            "Buffer RGB incohérent ({}×{}, {} pixels)",
            buffer.width,
            buffer.height,
            buffer.data.len()
        )
    })
}

/// Encode le buffer en PNG à `path`, quelle que soit l'extension.
///
/// # Errors
/// Returns an error if the image cannot be encoded or written.
///
/// # Example
/// ```no_run
/// use ph_core::color::Rgb;
/// use ph_core::frame::Plane;
/// use ph_source::encode::save_png;
/// use std::path::Path;
/// let buf = Plane::from_fn(2, 2, |_, _| Rgb::new(255, 154, 16));
/// save_png(&buf, Path::new("out.png")).unwrap();
/// ```
pub fn save_png(buffer: &RgbBuffer, path: &Path) -> Result<()> {
    let img = to_rgb_image(buffer)?;
    img.save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Écriture impossible : {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_core::color::Rgb;
    use ph_core::frame::Plane;

    #[test]
    fn written_png_reads_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let buf = Plane::from_fn(3, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb::new(23, 8, 0)
            } else {
                Rgb::new(255, 154, 16)
            }
        });
        save_png(&buf, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(0, 0).0, [23, 8, 0]);
        assert_eq!(back.get_pixel(1, 0).0, [255, 154, 16]);
    }

    #[test]
    fn missing_parent_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("out.png");
        let buf = Plane::from_fn(1, 1, |_, _| Rgb::new(0, 0, 0));
        let err = save_png(&buf, &path).unwrap_err();
        assert!(format!("{err:#}").contains("out.png"));
    }
}
