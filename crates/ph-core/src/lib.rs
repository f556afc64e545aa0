//! Configuration, types, and shared structures for phosphor.
//!
//! This crate contains the buffers, palettes, configuration and error
//! types used across the phosphor workspace.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod palette;

pub use color::Rgb;
pub use config::RasterConfig;
pub use error::{CoreError, ErrorKind};
pub use frame::{GrayBuffer, Plane, RgbBuffer, ShadowMask, ThresholdMap};
pub use palette::{Palette, PaletteTable};
