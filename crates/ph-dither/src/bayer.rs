//! Matrices de Bayer (tramage ordonné) de taille arbitraire.
//!
//! Construction récursive : chaque niveau place quatre copies du niveau
//! inférieur avec les décalages 0, 2, 3, 1 (haut-gauche, haut-droite,
//! bas-gauche, bas-droite).

use ph_core::config::MAX_MATRIX_SIZE;
use ph_core::error::CoreError;
use ph_core::frame::Plane;

/// Build the n×n Bayer rank matrix. Each value of `[0, n² − 1]` appears once.
///
/// # Errors
/// Returns [`CoreError::InvalidMatrixSize`] if `n` is zero, not a power of two,
/// or above [`MAX_MATRIX_SIZE`].
///
/// # Example
/// ```
/// use ph_dither::bayer::generate;
/// let m = generate(2).unwrap();
/// assert_eq!(m.data, vec![0, 2, 3, 1]);
/// assert!(generate(3).is_err());
/// ```
pub fn generate(n: usize) -> Result<Plane<u32>, CoreError> {
    if !n.is_power_of_two() || n > MAX_MATRIX_SIZE {
        return Err(CoreError::InvalidMatrixSize { size: n });
    }
    let side = u32::try_from(n).map_err(|_| CoreError::InvalidMatrixSize { size: n })?;
    Ok(build(side))
}

fn build(n: u32) -> Plane<u32> {
    if n == 1 {
        return Plane {
            data: vec![0],
            width: 1,
            height: 1,
        };
    }

    let half = n / 2;
    let sub = build(half);
    Plane::from_fn(n, n, |x, y| {
        let offset = match (x < half, y < half) {
            (true, true) => 0,
            (false, true) => 2,
            (true, false) => 3,
            (false, false) => 1,
        };
        4 * sub.get(x % half, y % half) + offset
    })
}

/// Map ranks to thresholds in (0, 1): `(v + 0.5) / n²`.
///
/// # Example
/// ```
/// use ph_dither::bayer::{generate, normalize};
/// let t = normalize(&generate(2).unwrap());
/// assert_eq!(t.data, vec![0.125, 0.625, 0.875, 0.375]);
/// ```
#[must_use]
pub fn normalize(ranks: &Plane<u32>) -> Plane<f32> {
    let cells = ranks.width as f32 * ranks.height as f32;
    Plane {
        data: ranks
            .data
            .iter()
            .map(|&v| (v as f32 + 0.5) / cells)
            .collect(),
        width: ranks.width,
        height: ranks.height,
    }
}

/// [`generate`] followed by [`normalize`].
///
/// # Errors
/// Same as [`generate`].
pub fn threshold_matrix(n: usize) -> Result<Plane<f32>, CoreError> {
    generate(n).map(|m| normalize(&m))
}
