use crate::color::Rgb;
use crate::error::CoreError;

/// Buffer 2D row-major, `width × height` éléments.
///
/// Base commune des buffers du pipeline : luminance, seuils, masque d'ombre
/// et sortie couleur.
///
/// # Example
/// ```
/// use ph_core::frame::Plane;
/// let p: Plane<f32> = Plane::new(4, 2);
/// assert_eq!(p.data.len(), 8);
/// assert_eq!(p.get(3, 1), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Plane<T> {
    /// Elements, row-major.
    pub data: Vec<T>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Luminance normalisée [0, 1].
pub type GrayBuffer = Plane<f32>;
/// Seuils de tramage répétés sur toute l'image.
pub type ThresholdMap = Plane<f32>;
/// `true` là où le pixel tombe sous le seuil d'ombre.
pub type ShadowMask = Plane<bool>;
/// Sortie couleur finale.
pub type RgbBuffer = Plane<Rgb>;

impl<T: Clone + Default> Plane<T> {
    /// Crée un buffer rempli de `T::default()`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![T::default(); width as usize * height as usize],
            width,
            height,
        }
    }
}

impl<T> Plane<T> {
    /// Wrap existing row-major data.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `data.len() != width * height`.
    ///
    /// # Example
    /// ```
    /// use ph_core::frame::Plane;
    /// assert!(Plane::from_vec(2, 2, vec![0u8; 4]).is_ok());
    /// assert!(Plane::from_vec(2, 2, vec![0u8; 3]).is_err());
    /// ```
    pub fn from_vec(width: u32, height: u32, data: Vec<T>) -> Result<Self, CoreError> {
        if data.len() != width as usize * height as usize {
            return Err(CoreError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Build a plane by evaluating `f(x, y)` for every pixel.
    ///
    /// # Example
    /// ```
    /// use ph_core::frame::Plane;
    /// let p = Plane::from_fn(3, 2, |x, y| x + 10 * y);
    /// assert_eq!(p.get(2, 1), 12);
    /// ```
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// `(width, height)`.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// `true` si le buffer ne contient aucun pixel.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// One row of the plane.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[T] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }

    /// Check that `other` has the same dimensions as `self`.
    ///
    /// # Errors
    /// Returns [`CoreError::DimensionMismatch`] otherwise.
    pub fn ensure_same_size<U>(&self, other: &Plane<U>) -> Result<(), CoreError> {
        if self.dimensions() == other.dimensions() {
            Ok(())
        } else {
            Err(CoreError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: other.width,
                height: other.height,
            })
        }
    }
}

impl<T: Copy> Plane<T> {
    /// Accès au pixel (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> T {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }
}

impl GrayBuffer {
    /// Normalise une luminance 8 bits vers [0, 1] (`v / 255`).
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if the slice length does not match.
    ///
    /// # Example
    /// ```
    /// use ph_core::frame::GrayBuffer;
    /// let g = GrayBuffer::from_luma8(2, 1, &[0, 255]).unwrap();
    /// assert_eq!(g.data, vec![0.0, 1.0]);
    /// ```
    pub fn from_luma8(width: u32, height: u32, luma: &[u8]) -> Result<Self, CoreError> {
        Self::from_vec(
            width,
            height,
            luma.iter().map(|&v| f32::from(v) / 255.0).collect(),
        )
    }
}

impl RgbBuffer {
    /// Flatten into `[r, g, b, r, g, b, ...]` for an RGB8 encoder.
    ///
    /// # Example
    /// ```
    /// use ph_core::color::Rgb;
    /// use ph_core::frame::RgbBuffer;
    /// let buf = RgbBuffer::from_vec(2, 1, vec![Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)]).unwrap();
    /// assert_eq!(buf.to_raw_rgb8(), vec![1, 2, 3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub fn to_raw_rgb8(&self) -> Vec<u8> {
        self.data.iter().flat_map(|c| c.to_array()).collect()
    }
}

impl ShadowMask {
    /// Nombre de pixels marqués comme ombre.
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&s| s).count()
    }
}
