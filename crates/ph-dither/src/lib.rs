//! Moteur de tramage ordonné pour phosphor.
//!
//! Bayer matrix generation, tonal shaping, threshold tiling and palette
//! quantization.

pub mod bayer;
pub mod engine;
pub mod quantize;
pub mod tile;
pub mod tonal;

pub use engine::Ditherer;
pub use tonal::ToneCurve;
