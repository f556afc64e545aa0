use thiserror::Error;

/// Broad classification of a [`CoreError`].
///
/// # Example
/// ```
/// use ph_core::error::{CoreError, ErrorKind};
/// let err = CoreError::InvalidMatrixSize { size: 6 };
/// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied value is out of its domain.
    InvalidArgument,
    /// Reading or writing a file failed.
    IoFailure,
    /// Configuration that would make the tonal rescale divide by zero.
    DegenerateConfig,
}

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bayer matrix size is zero, not a power of two, or above 2048.
    #[error("Taille de matrice invalide : {size} (puissance de deux ≤ 2048 attendue)")]
    InvalidMatrixSize {
        /// Requested side length.
        size: usize,
    },

    /// Palette name not present in the palette table.
    #[error("Palette inconnue '{name}'. Choix possibles : {available}")]
    UnknownPalette {
        /// Name that was looked up.
        name: String,
        /// Comma-separated list of registered names.
        available: String,
    },

    /// Palette with too few or too many colors.
    #[error("Palette '{name}' invalide : {len} couleurs (2 à 256 attendues)")]
    InvalidPalette {
        /// Palette name.
        name: String,
        /// Number of colors supplied.
        len: usize,
    },

    /// Color string that is not `#rrggbb`.
    #[error("Couleur invalide : '{value}'")]
    InvalidColor {
        /// Offending string.
        value: String,
    },

    /// Target width of zero.
    #[error("Largeur cible invalide : {width}")]
    InvalidWidth {
        /// Requested width.
        width: u32,
    },

    /// Gamma exponent that is not a positive finite number.
    #[error("Gamma invalide : {gamma}")]
    InvalidGamma {
        /// Requested gamma.
        gamma: f32,
    },

    /// Shadow cutoff outside [0, 1).
    #[error("Seuil d'ombre dégénéré : {cutoff} (intervalle [0, 1) attendu)")]
    DegenerateShadowCutoff {
        /// Requested cutoff.
        cutoff: f32,
    },

    /// Buffers that should share dimensions do not.
    #[error("Dimensions incompatibles : {expected_width}×{expected_height} vs {width}×{height}")]
    DimensionMismatch {
        /// Reference width.
        expected_width: u32,
        /// Reference height.
        expected_height: u32,
        /// Actual width.
        width: u32,
        /// Actual height.
        height: u32,
    },

    /// Raw data length does not match width × height.
    #[error("Dimensions invalides : {width}×{height} pour {len} éléments")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
        /// Length of the supplied data.
        len: usize,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Referenced file does not exist.
    #[error("Fichier introuvable : {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },
}

impl CoreError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DegenerateShadowCutoff { .. } => ErrorKind::DegenerateConfig,
            Self::Config(_) | Self::FileNotFound { .. } => ErrorKind::IoFailure,
            Self::InvalidMatrixSize { .. }
            | Self::UnknownPalette { .. }
            | Self::InvalidPalette { .. }
            | Self::InvalidColor { .. }
            | Self::InvalidWidth { .. }
            | Self::InvalidGamma { .. }
            | Self::DimensionMismatch { .. }
            | Self::InvalidDimensions { .. } => ErrorKind::InvalidArgument,
        }
    }
}
