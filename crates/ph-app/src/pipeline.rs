use std::path::Path;

use anyhow::Result;
use image::GrayImage;
use ph_core::config::RasterConfig;
use ph_core::frame::RgbBuffer;
use ph_core::palette::{Palette, PaletteTable};
use ph_dither::Ditherer;
use ph_source::encode::save_png;
use ph_source::image::{load_luma, to_gray_buffer};
use ph_source::resize::Resizer;

/// Chaîne complète pour une image : chargement → luminance → resize →
/// tramage → PNG.
///
/// Holds only immutable state; one instance is shared by all batch workers.
#[derive(Clone, Debug)]
pub struct Pipeline {
    ditherer: Ditherer,
    palette: Palette,
    width: Option<u32>,
}

impl Pipeline {
    /// Validate `config` and resolve its palette against `table`.
    ///
    /// # Errors
    /// Returns the first configuration error (bad matrix size, gamma, cutoff,
    /// width, jobs, or unknown palette).
    pub fn new(config: &RasterConfig, table: &PaletteTable) -> Result<Self> {
        config.validate()?;
        let palette = table.get(&config.palette)?.clone();
        let ditherer = Ditherer::from_config(config)?;
        Ok(Self {
            ditherer,
            palette,
            width: config.width,
        })
    }

    /// Palette résolue (nom canonique).
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Resize then dither an 8-bit luminance image.
    ///
    /// # Errors
    /// Returns an error if resizing fails.
    pub fn render(&self, luma: &GrayImage) -> Result<RgbBuffer> {
        let gray = match self.width {
            Some(w) => to_gray_buffer(&Resizer::new().resize_to_width(luma, w)?)?,
            None => to_gray_buffer(luma)?,
        };
        Ok(self.ditherer.render(&gray, &self.palette)?)
    }

    /// Convert one file and return the output dimensions.
    ///
    /// # Errors
    /// Returns an error if the input cannot be decoded or the output cannot be written.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<(u32, u32)> {
        log::info!(
            "Processing {} -> {}",
            input.file_name().unwrap_or_default().to_string_lossy(),
            output.display()
        );
        let luma = load_luma(input)?;
        let rgb = self.render(&luma)?;
        save_png(&rgb, output)?;
        let (w, h) = rgb.dimensions();
        log::info!(
            "Saved {} ({w}x{h}, palette={})",
            output.display(),
            self.palette.name()
        );
        Ok((w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ph_core::error::{CoreError, ErrorKind};

    fn pipeline(config: &RasterConfig) -> Result<Pipeline> {
        Pipeline::new(config, &PaletteTable::builtin())
    }

    #[test]
    fn unknown_palette_is_an_invalid_argument() {
        let config = RasterConfig {
            palette: "sepia".into(),
            ..RasterConfig::default()
        };
        let err = pipeline(&config).unwrap_err();
        let core = err.downcast_ref::<CoreError>().unwrap();
        assert!(matches!(core, CoreError::UnknownPalette { .. }));
        assert_eq!(core.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn zero_width_is_rejected() {
        let config = RasterConfig {
            width: Some(0),
            ..RasterConfig::default()
        };
        let err = pipeline(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoreError>(),
            Some(CoreError::InvalidWidth { width: 0 })
        ));
    }

    #[test]
    fn palette_name_is_canonical() {
        let config = RasterConfig {
            palette: "Vt320".into(),
            ..RasterConfig::default()
        };
        assert_eq!(pipeline(&config).unwrap().palette().name(), "VT320");
    }

    #[test]
    fn render_resizes_to_target_width() {
        let config = RasterConfig {
            width: Some(20),
            ..RasterConfig::default()
        };
        let p = pipeline(&config).unwrap();
        let luma = GrayImage::from_fn(80, 60, |x, _| image::Luma([(x * 3) as u8]));
        let out = p.render(&luma).unwrap();
        assert_eq!(out.dimensions(), (20, 15));
    }

    #[test]
    fn process_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        GrayImage::from_pixel(12, 9, image::Luma([255]))
            .save(&input)
            .unwrap();

        let p = pipeline(&RasterConfig::default()).unwrap();
        assert_eq!(p.process_file(&input, &output).unwrap(), (12, 9));

        let back = image::open(&output).unwrap().to_rgb8();
        assert!(back.pixels().all(|px| px.0 == [255, 154, 16]));
    }
}
