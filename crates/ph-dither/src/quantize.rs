//! Quantification ordonnée vers une palette (2 ou N couleurs).
//!
//! L'index 0 de la palette est la couleur « éteinte » dans les deux modes :
//! fond en 2 couleurs, niveau le plus bas en N couleurs, et toujours la cible
//! des pixels d'ombre.

use ph_core::error::CoreError;
use ph_core::frame::{GrayBuffer, Plane, RgbBuffer, ShadowMask, ThresholdMap};
use ph_core::palette::Palette;
use rayon::prelude::*;

/// Borne haute appliquée avant multiplication en mode N couleurs.
const MAX_SHAPED: f32 = 0.9999;

/// Palette index for one pixel of an `n`-color palette.
///
/// # Example
/// ```
/// use ph_dither::quantize::level;
/// assert_eq!(level(0.6, 0.5, false, 2), 1);
/// assert_eq!(level(0.6, 0.5, true, 2), 0);
/// assert_eq!(level(1.0, 0.9, false, 4), 3);
/// ```
#[inline(always)]
#[must_use]
pub fn level(shaped: f32, threshold: f32, shadow: bool, n: usize) -> u8 {
    if shadow {
        return 0;
    }
    if n <= 2 {
        return u8::from(shaped >= threshold);
    }
    let v = shaped.clamp(0.0, MAX_SHAPED);
    let l = (v * n as f32 + threshold).floor();
    l.clamp(0.0, (n - 1) as f32) as u8
}

/// Per-pixel palette indices.
///
/// # Errors
/// Returns [`CoreError::DimensionMismatch`] if the three inputs differ in size.
///
/// # Example
/// ```
/// use ph_core::frame::Plane;
/// use ph_dither::quantize::quantize_levels;
/// let shaped = Plane::from_vec(2, 1, vec![0.1, 0.9]).unwrap();
/// let mask = Plane::from_vec(2, 1, vec![false, false]).unwrap();
/// let thresholds = Plane::from_vec(2, 1, vec![0.5, 0.5]).unwrap();
/// let levels = quantize_levels(&shaped, &mask, &thresholds, 2).unwrap();
/// assert_eq!(levels.data, vec![0, 1]);
/// ```
pub fn quantize_levels(
    shaped: &GrayBuffer,
    mask: &ShadowMask,
    thresholds: &ThresholdMap,
    colors: usize,
) -> Result<Plane<u8>, CoreError> {
    map_pixels(shaped, mask, thresholds, |s, t, m| level(s, t, m, colors))
}

/// Map shaped luminance to palette colors.
///
/// Every output pixel is exactly one palette entry.
///
/// # Errors
/// Returns [`CoreError::DimensionMismatch`] if the three inputs differ in size.
///
/// # Example
/// ```
/// use ph_core::frame::Plane;
/// use ph_core::palette::PaletteTable;
/// use ph_dither::quantize::quantize;
/// let table = PaletteTable::builtin();
/// let vt = table.get("VT320").unwrap();
/// let shaped = Plane::from_vec(2, 1, vec![1.0, 1.0]).unwrap();
/// let mask = Plane::from_vec(2, 1, vec![false, true]).unwrap();
/// let thresholds = Plane::from_vec(2, 1, vec![0.5, 0.5]).unwrap();
/// let rgb = quantize(&shaped, &mask, &thresholds, vt).unwrap();
/// assert_eq!(rgb.data, vec![vt.color(1), vt.color(0)]);
/// ```
pub fn quantize(
    shaped: &GrayBuffer,
    mask: &ShadowMask,
    thresholds: &ThresholdMap,
    palette: &Palette,
) -> Result<RgbBuffer, CoreError> {
    let n = palette.len();
    map_pixels(shaped, mask, thresholds, |s, t, m| {
        palette.color(usize::from(level(s, t, m, n)))
    })
}

/// Remplit la sortie ligne par ligne en parallèle.
fn map_pixels<T, F>(
    shaped: &GrayBuffer,
    mask: &ShadowMask,
    thresholds: &ThresholdMap,
    f: F,
) -> Result<Plane<T>, CoreError>
where
    T: Copy + Default + Send,
    F: Fn(f32, f32, bool) -> T + Sync,
{
    shaped.ensure_same_size(mask)?;
    shaped.ensure_same_size(thresholds)?;

    let mut out: Plane<T> = Plane::new(shaped.width, shaped.height);
    let width = shaped.width as usize;
    if width == 0 {
        return Ok(out);
    }

    out.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let start = y * width;
            let s = &shaped.data[start..start + width];
            let t = &thresholds.data[start..start + width];
            let m = &mask.data[start..start + width];
            for (x, px) in row.iter_mut().enumerate() {
                *px = f(s[x], t[x], m[x]);
            }
        });

    Ok(out)
}
