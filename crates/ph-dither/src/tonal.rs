use ph_core::config::{DEFAULT_GAMMA, DEFAULT_SHADOW_CUTOFF};
use ph_core::error::CoreError;
use ph_core::frame::{GrayBuffer, ShadowMask};

/// Courbe tonale : gamma puis seuil d'ombre dur.
///
/// Les pixels dont la luminance gamma-corrigée tombe sous `shadow_cutoff`
/// deviennent des ombres pleines ; les autres sont ré-étalés sur [0, 1].
///
/// # Example
/// ```
/// use ph_dither::tonal::ToneCurve;
/// let curve = ToneCurve::new(1.0, 0.5).unwrap();
/// assert_eq!(curve.shape_value(0.75), (0.5, false));
/// assert_eq!(curve.shape_value(0.25), (0.0, true));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneCurve {
    gamma: f32,
    shadow_cutoff: f32,
}

impl ToneCurve {
    /// Validate and build a curve.
    ///
    /// # Errors
    /// - [`CoreError::InvalidGamma`] if `gamma` is not a positive finite number.
    /// - [`CoreError::DegenerateShadowCutoff`] if `shadow_cutoff` is outside [0, 1).
    pub fn new(gamma: f32, shadow_cutoff: f32) -> Result<Self, CoreError> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(CoreError::InvalidGamma { gamma });
        }
        if !(0.0..1.0).contains(&shadow_cutoff) {
            return Err(CoreError::DegenerateShadowCutoff {
                cutoff: shadow_cutoff,
            });
        }
        Ok(Self {
            gamma,
            shadow_cutoff,
        })
    }

    /// Gamma exponent.
    #[must_use]
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Shadow cutoff.
    #[must_use]
    pub fn shadow_cutoff(&self) -> f32 {
        self.shadow_cutoff
    }

    /// Shape a single luminance value → `(shaped, is_shadow)`.
    #[inline(always)]
    #[must_use]
    pub fn shape_value(&self, gray: f32) -> (f32, bool) {
        let lin = gray.powf(self.gamma);
        let shadow = lin < self.shadow_cutoff;
        let scaled = ((lin - self.shadow_cutoff) / (1.0 - self.shadow_cutoff)).clamp(0.0, 1.0);
        (scaled, shadow)
    }

    /// Shape a whole buffer.
    ///
    /// # Example
    /// ```
    /// use ph_core::frame::GrayBuffer;
    /// use ph_dither::tonal::ToneCurve;
    /// let gray = GrayBuffer::from_luma8(3, 1, &[0, 128, 255]).unwrap();
    /// let (shaped, shadows) = ToneCurve::default().shape(&gray);
    /// assert_eq!(shadows.data, vec![true, false, false]);
    /// assert_eq!(shaped.data[2], 1.0);
    /// ```
    #[must_use]
    pub fn shape(&self, gray: &GrayBuffer) -> (GrayBuffer, ShadowMask) {
        let mut shaped = Vec::with_capacity(gray.data.len());
        let mut mask = Vec::with_capacity(gray.data.len());
        for &g in &gray.data {
            let (s, shadow) = self.shape_value(g);
            shaped.push(s);
            mask.push(shadow);
        }
        (
            GrayBuffer {
                data: shaped,
                width: gray.width,
                height: gray.height,
            },
            ShadowMask {
                data: mask,
                width: gray.width,
                height: gray.height,
            },
        )
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            shadow_cutoff: DEFAULT_SHADOW_CUTOFF,
        }
    }
}

/// One-shot `shape(gray, gamma, shadow_cutoff)`.
///
/// # Errors
/// Same as [`ToneCurve::new`]; nothing is computed on error.
pub fn shape(
    gray: &GrayBuffer,
    gamma: f32,
    shadow_cutoff: f32,
) -> Result<(GrayBuffer, ShadowMask), CoreError> {
    Ok(ToneCurve::new(gamma, shadow_cutoff)?.shape(gray))
}
