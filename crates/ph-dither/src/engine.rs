use ph_core::config::RasterConfig;
use ph_core::error::CoreError;
use ph_core::frame::{GrayBuffer, Plane, RgbBuffer};
use ph_core::palette::Palette;

use crate::bayer::threshold_matrix;
use crate::quantize::quantize;
use crate::tile::tile;
use crate::tonal::ToneCurve;

/// Ditherer orchestre courbe tonale → tuilage → quantification.
///
/// The threshold matrix is built once and reused for every image; the
/// ditherer holds no mutable state and can be shared across threads.
///
/// # Example
/// ```
/// use ph_core::frame::GrayBuffer;
/// use ph_core::palette::PaletteTable;
/// use ph_dither::engine::Ditherer;
/// use ph_dither::tonal::ToneCurve;
///
/// let table = PaletteTable::builtin();
/// let ditherer = Ditherer::new(8, ToneCurve::default()).unwrap();
/// let gray = GrayBuffer::from_luma8(4, 4, &[255; 16]).unwrap();
/// let out = ditherer.render(&gray, table.get("amber").unwrap()).unwrap();
/// assert_eq!(out.dimensions(), (4, 4));
/// ```
#[derive(Clone, Debug)]
pub struct Ditherer {
    matrix: Plane<f32>,
    curve: ToneCurve,
}

impl Ditherer {
    /// Build a ditherer for an `n × n` Bayer matrix.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidMatrixSize`] if `matrix_size` is not a power of two.
    pub fn new(matrix_size: usize, curve: ToneCurve) -> Result<Self, CoreError> {
        let matrix = threshold_matrix(matrix_size)?;
        log::debug!(
            "Matrice de Bayer {matrix_size}×{matrix_size}, gamma={}, ombre<{}",
            curve.gamma(),
            curve.shadow_cutoff()
        );
        Ok(Self { matrix, curve })
    }

    /// Build from a validated-or-not [`RasterConfig`].
    ///
    /// # Errors
    /// Returns the matrix-size, gamma or cutoff error, before any allocation
    /// proportional to image size.
    pub fn from_config(config: &RasterConfig) -> Result<Self, CoreError> {
        let curve = ToneCurve::new(config.gamma, config.shadow_cutoff)?;
        Self::new(config.matrix_size, curve)
    }

    /// Normalized threshold matrix in use.
    #[must_use]
    pub fn matrix(&self) -> &Plane<f32> {
        &self.matrix
    }

    /// Tone curve in use.
    #[must_use]
    pub fn curve(&self) -> ToneCurve {
        self.curve
    }

    /// Run the full engine on one grayscale buffer.
    ///
    /// # Errors
    /// Propagates quantizer errors (none for well-formed buffers).
    pub fn render(&self, gray: &GrayBuffer, palette: &Palette) -> Result<RgbBuffer, CoreError> {
        let (shaped, shadows) = self.curve.shape(gray);
        let thresholds = tile(&self.matrix, gray.width, gray.height);
        log::debug!(
            "{}×{} : {} pixels d'ombre, palette {} ({} couleurs)",
            gray.width,
            gray.height,
            shadows.count(),
            palette.name(),
            palette.len()
        );
        quantize(&shaped, &shadows, &thresholds, palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_core::color::Rgb;
    use ph_core::palette::PaletteTable;

    #[test]
    fn from_config_rejects_bad_values_first() {
        let bad_size = RasterConfig {
            matrix_size: 5,
            ..RasterConfig::default()
        };
        assert!(matches!(
            Ditherer::from_config(&bad_size),
            Err(CoreError::InvalidMatrixSize { size: 5 })
        ));
        let bad_cutoff = RasterConfig {
            shadow_cutoff: 1.0,
            ..RasterConfig::default()
        };
        assert!(matches!(
            Ditherer::from_config(&bad_cutoff),
            Err(CoreError::DegenerateShadowCutoff { .. })
        ));
    }

    #[test]
    fn from_config_carries_matrix_and_curve() {
        let config = RasterConfig {
            matrix_size: 4,
            gamma: 1.5,
            shadow_cutoff: 0.2,
            ..RasterConfig::default()
        };
        let ditherer = Ditherer::from_config(&config).unwrap();
        assert_eq!(ditherer.matrix().dimensions(), (4, 4));
        assert_eq!(ditherer.matrix().get(0, 0), 0.5 / 16.0);
        assert!((ditherer.curve().gamma() - 1.5).abs() < f32::EPSILON);
        assert!((ditherer.curve().shadow_cutoff() - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn mid_gray_reproduces_bayer_pattern() {
        let table = PaletteTable::builtin();
        let vt = table.get("VT320").unwrap();
        let ditherer = Ditherer::from_config(&RasterConfig::default()).unwrap();
        let gray = Plane::from_fn(16, 16, |_, _| 0.5);
        let out = ditherer.render(&gray, vt).unwrap();

        let fg = out.data.iter().filter(|&&c| c == vt.color(1)).count();
        let bg = out.data.iter().filter(|&&c| c == vt.background()).count();
        assert_eq!(fg + bg, 256);
        // shaped ≈ 0.259 → seuils (v + 0.5)/64 ≤ 0.259 : rangs 0..=16, soit 17/64.
        assert_eq!(fg, 4 * 17);

        // Chaque bloc 8×8 est identique au premier.
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(out.get(x, y), out.get(x % 8, y % 8));
            }
        }
        // Le rang 0 (coin haut-gauche) est allumé, le rang 63 ne l'est pas.
        assert_eq!(out.get(0, 0), vt.color(1));
        assert_eq!(out.get(0, 7), vt.background());
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = PaletteTable::builtin();
        let dmg = table.get("dmg").unwrap();
        let ditherer = Ditherer::new(4, ToneCurve::default()).unwrap();
        let gray = Plane::from_fn(37, 23, |x, y| ((x * 7 + y * 3) % 50) as f32 / 49.0);
        let a = ditherer.render(&gray, dmg).unwrap();
        let b = ditherer.render(&gray, dmg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn gradient_with_dmg_forms_four_bands() {
        let table = PaletteTable::builtin();
        let dmg = table.get("dmg").unwrap();
        let ditherer = Ditherer::new(8, ToneCurve::new(1.0, 0.0).unwrap()).unwrap();
        let width = 128u32;
        let gray = Plane::from_fn(width, 8, |x, _| x as f32 / (width - 1) as f32);
        let out = ditherer.render(&gray, dmg).unwrap();

        let level_of = |c: Rgb| dmg.colors().iter().position(|p| *p == c).unwrap_or(usize::MAX);

        // Là où 4·v tombe sur un entier, la colonne est d'une seule couleur.
        for band in 0..4u32 {
            let x = band * (width - 1) / 4;
            let column: Vec<usize> = (0..8).map(|y| level_of(out.get(x, y))).collect();
            assert!(column.iter().all(|&l| l == band as usize), "bande {band} : {column:?}");
        }

        // Le niveau moyen par bloc 8×8 croît avec la luminance.
        let block_sum = |bx: u32| {
            (bx * 8..bx * 8 + 8)
                .flat_map(|x| (0..8).map(move |y| (x, y)))
                .map(|(x, y)| level_of(out.get(x, y)))
                .sum::<usize>()
        };
        for bx in 1..width / 8 {
            assert!(block_sum(bx) >= block_sum(bx - 1), "bloc {bx}");
        }

        // Les frontières sont tramées : deux niveaux voisins se mélangent.
        let boundary = width / 8;
        let mut levels: Vec<usize> = (boundary - 4..boundary + 4)
            .flat_map(|x| (0..8).map(move |y| (x, y)))
            .map(|(x, y)| level_of(out.get(x, y)))
            .collect();
        levels.sort_unstable();
        levels.dedup();
        assert_eq!(levels, vec![0, 1]);
    }
}
