//! Image I/O for phosphor (decode, resize, folder scan, PNG encode).

pub mod encode;
pub mod folder;
pub mod image;
pub mod resize;
