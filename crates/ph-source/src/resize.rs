use anyhow::{Context, Result};
use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use image::GrayImage;

/// Dimensions après redimensionnement à `target_width`, ratio conservé.
///
/// Height is truncated, with a floor of one pixel.
///
/// # Example
/// ```
/// use ph_source::resize::target_dimensions;
/// assert_eq!(target_dimensions(1920, 1080, 330), (330, 185));
/// assert_eq!(target_dimensions(1000, 1, 10), (10, 1));
/// ```
#[must_use]
pub fn target_dimensions(width: u32, height: u32, target_width: u32) -> (u32, u32) {
    if width == 0 {
        return (target_width, height.max(1));
    }
    let h = u64::from(height) * u64::from(target_width) / u64::from(width);
    (target_width, u32::try_from(h).unwrap_or(u32::MAX).max(1))
}

/// Resizer réutilisable wrappant fast_image_resize (Lanczos3, 1 canal).
///
/// # Example
/// ```
/// use image::{GrayImage, Luma};
/// use ph_source::resize::Resizer;
/// let mut r = Resizer::new();
/// let src = GrayImage::from_pixel(100, 50, Luma([128]));
/// let dst = r.resize_luma(&src, 40, 20).unwrap();
/// assert_eq!(dst.dimensions(), (40, 20));
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
}

impl Resizer {
    /// Create a new resizer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        }
    }

    /// Resize `src` to exactly `width × height`.
    ///
    /// # Errors
    /// Returns an error if either size is empty or the resize operation fails.
    pub fn resize_luma(&mut self, src: &GrayImage, width: u32, height: u32) -> Result<GrayImage> {
        if src.dimensions() == (width, height) {
            return Ok(src.clone());
        }

        let src_image = ImageRef::new(src.width(), src.height(), src.as_raw(), PixelType::U8)
            .context("Invalid source dimensions")?;
        let mut dst_image = Image::new(width, height, PixelType::U8);

        self.inner
            .resize(&src_image, &mut dst_image, &self.options)
            .context("Resize failed")?;

        GrayImage::from_raw(width, height, dst_image.into_vec())
            .context("Invalid destination dimensions")
    }

    /// Resize to `target_width`, keeping the aspect ratio.
    ///
    /// # Errors
    /// Returns an error if the resize operation fails.
    pub fn resize_to_width(&mut self, src: &GrayImage, target_width: u32) -> Result<GrayImage> {
        let (w, h) = target_dimensions(src.width(), src.height(), target_width);
        log::debug!(
            "Redimensionnement {}×{} → {w}×{h}",
            src.width(),
            src.height()
        );
        self.resize_luma(src, w, h)
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn aspect_ratio_is_preserved() {
        assert_eq!(target_dimensions(800, 600, 400), (400, 300));
        assert_eq!(target_dimensions(200, 100, 400), (400, 200));
        assert_eq!(target_dimensions(3, 7, 2), (2, 4));
    }

    #[test]
    fn same_size_is_a_copy() {
        let mut r = Resizer::new();
        let src = GrayImage::from_fn(5, 4, |x, y| Luma([(x * 10 + y) as u8]));
        let dst = r.resize_luma(&src, 5, 4).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let mut r = Resizer::new();
        let src = GrayImage::from_pixel(64, 32, Luma([200]));
        let dst = r.resize_to_width(&src, 16).unwrap();
        assert_eq!(dst.dimensions(), (16, 8));
        assert!(dst.pixels().all(|p| p.0[0].abs_diff(200) <= 1));
    }
}
