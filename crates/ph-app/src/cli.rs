use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Parser;
use ph_core::config::RasterConfig;
use ph_core::error::CoreError;
use ph_core::palette::PaletteTable;

/// phosphor : rastérisation tramée Bayer vers palettes rétro.
#[derive(Parser, Debug)]
#[command(name = "phosphor", version, about, long_about = None)]
pub struct Cli {
    /// Dossier d'entrée, ou une image seule.
    #[arg(required_unless_present = "list_palettes")]
    pub input: Option<PathBuf>,

    /// Dossier de sortie (créé si absent).
    #[arg(required_unless_present = "list_palettes")]
    pub output: Option<PathBuf>,

    /// Nom de palette (insensible à la casse). Défaut : VT320.
    pub palette: Option<String>,

    /// Largeur cible en pixels, ratio conservé.
    pub width: Option<u32>,

    /// Côté de la matrice de Bayer (puissance de 2).
    #[arg(short, long)]
    pub matrix_size: Option<usize>,

    /// Exposant gamma.
    #[arg(long, allow_negative_numbers = true)]
    pub gamma: Option<f32>,

    /// Seuil d'ombre dans [0, 1).
    #[arg(long, allow_negative_numbers = true)]
    pub shadow_cutoff: Option<f32>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Images traitées en parallèle.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Arrêter le lot au premier fichier en échec.
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,

    /// Afficher les palettes disponibles et quitter.
    #[arg(long, default_value_t = false)]
    pub list_palettes: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Apply command-line values over `config`.
    pub fn apply_overrides(&self, config: &mut RasterConfig) {
        if let Some(ref palette) = self.palette {
            config.palette.clone_from(palette);
        }
        if let Some(width) = self.width {
            config.width = Some(width);
        }
        if let Some(n) = self.matrix_size {
            config.matrix_size = n;
        }
        if let Some(g) = self.gamma {
            config.gamma = g;
        }
        if let Some(c) = self.shadow_cutoff {
            config.shadow_cutoff = c;
        }
        if let Some(j) = self.jobs {
            config.jobs = j;
        }
        if self.fail_fast {
            config.fail_fast = true;
        }
    }

    /// Input and output paths of a conversion run.
    ///
    /// # Errors
    /// Returns an error if either path is missing or the input does not exist.
    pub fn paths(&self) -> anyhow::Result<(&Path, &Path)> {
        let (Some(input), Some(output)) = (self.input.as_deref(), self.output.as_deref()) else {
            anyhow::bail!("INPUT et OUTPUT sont requis pour une conversion.");
        };
        if !input.exists() {
            return Err(CoreError::FileNotFound {
                path: input.display().to_string(),
            }
            .into());
        }
        Ok((input, output))
    }
}

/// Texte de `--list-palettes` : une ligne par palette, triée par nom.
#[must_use]
pub fn palette_listing(table: &PaletteTable) -> String {
    let mut out = String::new();
    for p in table.iter() {
        let colors: Vec<String> = p.colors().iter().map(ToString::to_string).collect();
        let _ = writeln!(
            out,
            "{:<16} {:>3} couleurs  {}",
            p.name(),
            p.len(),
            colors.join(" ")
        );
    }
    out
}
