use ph_core::frame::{Plane, ThresholdMap};

/// Repeat `matrix` over a `width × height` canvas, origin-aligned at (0, 0).
///
/// Indexes modulo the matrix side, which equals stacking
/// `ceil(h/n)+1 × ceil(w/n)+1` copies and cropping the top-left corner.
///
/// # Example
/// ```
/// use ph_dither::bayer::threshold_matrix;
/// use ph_dither::tile::tile;
/// let m = threshold_matrix(2).unwrap();
/// let t = tile(&m, 3, 3);
/// assert_eq!(t.row(0), &[0.125, 0.625, 0.125]);
/// assert_eq!(t.row(2), &[0.125, 0.625, 0.125]);
/// ```
#[must_use]
pub fn tile(matrix: &Plane<f32>, width: u32, height: u32) -> ThresholdMap {
    if matrix.is_empty() {
        return Plane::new(width, height);
    }
    let (mw, mh) = matrix.dimensions();
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let src = matrix.row(y % mh);
        data.extend((0..width).map(|x| src[(x % mw) as usize]));
    }
    Plane {
        data,
        width,
        height,
    }
}
