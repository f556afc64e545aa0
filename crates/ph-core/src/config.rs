use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::palette::{DEFAULT_PALETTE, Palette, PaletteTable};

/// Gamma par défaut : léger gain de contraste.
pub const DEFAULT_GAMMA: f32 = 1.1;
/// Seuil d'ombre par défaut : tout ce qui est en dessous devient fond.
pub const DEFAULT_SHADOW_CUTOFF: f32 = 0.28;
/// Côté de la matrice de Bayer par défaut.
pub const DEFAULT_MATRIX_SIZE: usize = 8;
/// Côté maximal : au-delà, `n²` dépasse 2^22 et `(v + 0.5) / n²` n'est plus
/// exact en f32.
pub const MAX_MATRIX_SIZE: usize = 2048;

/// Configuration complète d'un run de rastérisation.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ph_core::config::RasterConfig;
/// let config = RasterConfig::default();
/// assert_eq!(config.matrix_size, 8);
/// assert_eq!(config.palette, "VT320");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RasterConfig {
    // === Tramage ===
    /// Palette name, resolved against the palette table.
    pub palette: String,
    /// Bayer matrix side, a power of two up to [`MAX_MATRIX_SIZE`].
    pub matrix_size: usize,
    /// Exposant gamma appliqué avant le seuil d'ombre.
    pub gamma: f32,
    /// Seuil d'ombre [0, 1).
    pub shadow_cutoff: f32,
    /// Target width in pixels. None = keep source size.
    pub width: Option<u32>,

    // === Lots ===
    /// Images traitées en parallèle. 1 = séquentiel.
    pub jobs: usize,
    /// Abort the batch at the first failing file.
    pub fail_fast: bool,

    // === Palettes ===
    /// Extra palettes merged over the built-in table.
    pub palettes: Vec<PaletteDef>,
}

/// A palette declared in the config file.
///
/// # Example
/// ```
/// use ph_core::config::PaletteDef;
/// let def = PaletteDef { name: "ice".into(), colors: vec!["#001020".into(), "#a0e0ff".into()] };
/// assert_eq!(def.to_palette().unwrap().len(), 2);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PaletteDef {
    /// Nom de la palette.
    pub name: String,
    /// Couleurs `#rrggbb`, index 0 en premier.
    pub colors: Vec<String>,
}

impl PaletteDef {
    /// Parse into a [`Palette`].
    ///
    /// # Errors
    /// Returns an error for malformed colors or bad cardinality.
    pub fn to_palette(&self) -> Result<Palette, CoreError> {
        Palette::from_hex_strings(&self.name, &self.colors)
    }
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_string(),
            matrix_size: DEFAULT_MATRIX_SIZE,
            gamma: DEFAULT_GAMMA,
            shadow_cutoff: DEFAULT_SHADOW_CUTOFF,
            width: None,
            jobs: 1,
            fail_fast: false,
            palettes: Vec::new(),
        }
    }
}

impl RasterConfig {
    /// Checks every value that must be valid before pixel work begins.
    ///
    /// # Errors
    /// Returns the first offending value as a [`CoreError`].
    ///
    /// # Example
    /// ```
    /// use ph_core::config::RasterConfig;
    /// let config = RasterConfig { matrix_size: 6, ..RasterConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.matrix_size.is_power_of_two() || self.matrix_size > MAX_MATRIX_SIZE {
            return Err(CoreError::InvalidMatrixSize {
                size: self.matrix_size,
            });
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(CoreError::InvalidGamma { gamma: self.gamma });
        }
        if !(0.0..1.0).contains(&self.shadow_cutoff) {
            return Err(CoreError::DegenerateShadowCutoff {
                cutoff: self.shadow_cutoff,
            });
        }
        if let Some(0) = self.width {
            return Err(CoreError::InvalidWidth { width: 0 });
        }
        if self.jobs == 0 {
            return Err(CoreError::Config("jobs doit être ≥ 1".into()));
        }
        Ok(())
    }

    /// Built-in palettes plus those declared in this config.
    ///
    /// # Errors
    /// Returns an error if a declared palette is malformed.
    ///
    /// # Example
    /// ```
    /// use ph_core::config::{PaletteDef, RasterConfig};
    /// let mut config = RasterConfig::default();
    /// config.palettes.push(PaletteDef { name: "ice".into(), colors: vec!["#001020".into(), "#a0e0ff".into()] });
    /// let table = config.palette_table().unwrap();
    /// assert!(table.get("ice").is_ok());
    /// assert!(table.get("dmg").is_ok());
    /// ```
    pub fn palette_table(&self) -> Result<PaletteTable, CoreError> {
        let mut table = PaletteTable::builtin();
        for def in &self.palettes {
            table.insert(def.to_palette()?);
        }
        Ok(table)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    dither: Option<DitherSection>,
    batch: Option<BatchSection>,
    #[serde(default)]
    palette: Vec<PaletteDef>,
}

/// Dither section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct DitherSection {
    palette: Option<String>,
    matrix_size: Option<usize>,
    gamma: Option<f32>,
    shadow_cutoff: Option<f32>,
    width: Option<u32>,
}

/// Batch section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct BatchSection {
    jobs: Option<usize>,
    fail_fast: Option<bool>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use ph_core::config::parse_config;
/// let config = parse_config("[dither]\npalette = \"dmg\"\nwidth = 330\n").unwrap();
/// assert_eq!(config.palette, "dmg");
/// assert_eq!(config.width, Some(330));
/// assert_eq!(config.matrix_size, 8);
/// ```
pub fn parse_config(content: &str) -> Result<RasterConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RasterConfig::default();

    if let Some(d) = file.dither {
        if let Some(v) = d.palette {
            config.palette = v;
        }
        if let Some(v) = d.matrix_size {
            config.matrix_size = v;
        }
        if let Some(v) = d.gamma {
            config.gamma = v;
        }
        if let Some(v) = d.shadow_cutoff {
            config.shadow_cutoff = v;
        }
        if let Some(v) = d.width {
            config.width = Some(v);
        }
    }

    if let Some(b) = file.batch {
        if let Some(v) = b.jobs {
            config.jobs = v;
        }
        if let Some(v) = b.fail_fast {
            config.fail_fast = v;
        }
    }

    config.palettes = file.palette;
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ph_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RasterConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
