use std::collections::BTreeMap;

use crate::color::Rgb;
use crate::error::CoreError;

/// Nombre maximal de couleurs : les index de niveau tiennent sur un `u8`.
pub const MAX_COLORS: usize = 256;

/// Nom de la palette par défaut.
pub const DEFAULT_PALETTE: &str = "VT320";

/// Palette nommée, ordonnée. L'index 0 est la couleur « éteinte » :
/// fond en mode 2 couleurs, cible des ombres dans tous les modes.
///
/// # Example
/// ```
/// use ph_core::color::Rgb;
/// use ph_core::palette::Palette;
/// let p = Palette::new("duo", vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
/// assert!(p.is_two_color());
/// assert_eq!(p.background(), Rgb::new(0, 0, 0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build a palette, checking its cardinality.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidPalette`] for fewer than 2 or more than
    /// [`MAX_COLORS`] colors.
    pub fn new(name: impl Into<String>, colors: Vec<Rgb>) -> Result<Self, CoreError> {
        let name = name.into();
        if !(2..=MAX_COLORS).contains(&colors.len()) {
            return Err(CoreError::InvalidPalette {
                name,
                len: colors.len(),
            });
        }
        Ok(Self { name, colors })
    }

    /// Parse a palette from `#rrggbb` strings.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidColor`] or [`CoreError::InvalidPalette`].
    ///
    /// # Example
    /// ```
    /// use ph_core::palette::Palette;
    /// let p = Palette::from_hex_strings("ink", &["#000000", "#ffffff", "#ff0000"]).unwrap();
    /// assert_eq!(p.len(), 3);
    /// ```
    pub fn from_hex_strings<S: AsRef<str>>(name: &str, colors: &[S]) -> Result<Self, CoreError> {
        let colors = colors
            .iter()
            .map(|c| Rgb::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, colors)
    }

    /// Palette name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colors, index 0 first.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of colors (always ≥ 2).
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `true` for the binary on/off path.
    #[must_use]
    pub fn is_two_color(&self) -> bool {
        self.colors.len() == 2
    }

    /// Index 0: background for 2-color palettes, shadow target for all.
    #[must_use]
    pub fn background(&self) -> Rgb {
        self.colors[0]
    }

    /// Color at `index`, saturating to the last entry.
    #[inline(always)]
    #[must_use]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index.min(self.colors.len() - 1)]
    }
}

/// Built-in palettes, index 0 first.
const BUILTIN: &[(&str, &[u32])] = &[
    ("VT320", &[0x17_08_00, 0xff_9a_10]),
    ("matrix", &[0x00_00_00, 0x8c_ff_8c]),
    ("paper", &[0xff_f4_d2, 0x00_00_00]),
    ("amber", &[0x00_00_00, 0xff_98_38]),
    ("c64", &[0x00_00_aa, 0xff_ff_55]),
    ("green_phosphor", &[0x00_00_00, 0x00_ff_80]),
    ("dmg", &[0x1b_2a_09, 0x0e_45_0b, 0x49_6b_22, 0x9a_9e_3f]),
];

/// Table immuable nom → palette. Construite une fois au démarrage puis
/// passée par référence au moteur.
///
/// Lookup is case-insensitive; names keep their registered spelling.
///
/// # Example
/// ```
/// use ph_core::palette::PaletteTable;
/// let table = PaletteTable::builtin();
/// assert_eq!(table.get("vt320").unwrap().name(), "VT320");
/// assert_eq!(table.get("dmg").unwrap().len(), 4);
/// assert!(table.get("sepia").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct PaletteTable {
    entries: BTreeMap<String, Palette>,
}

impl PaletteTable {
    /// Empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table holding the built-in palettes.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (name, hexes) in BUILTIN {
            table.insert(Palette {
                name: (*name).to_string(),
                colors: hexes.iter().map(|&h| Rgb::from_hex(h)).collect(),
            });
        }
        table
    }

    /// Add or replace a palette (same name, any case, replaces).
    pub fn insert(&mut self, palette: Palette) {
        let key = palette.name.to_lowercase();
        if let Some(old) = self.entries.insert(key, palette) {
            log::debug!("Palette '{}' remplacée", old.name);
        }
    }

    /// Resolve a palette name.
    ///
    /// # Errors
    /// Returns [`CoreError::UnknownPalette`] listing the registered names.
    pub fn get(&self, name: &str) -> Result<&Palette, CoreError> {
        self.entries
            .get(&name.to_lowercase())
            .ok_or_else(|| CoreError::UnknownPalette {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, sorted case-insensitively.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.values().map(Palette::name).collect()
    }

    /// Iterate palettes in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.entries.values()
    }

    /// Number of registered palettes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no palette is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_expected_palettes() {
        let table = PaletteTable::builtin();
        assert_eq!(table.len(), 7);
        let vt = table.get("VT320").unwrap();
        assert_eq!(vt.colors(), &[Rgb::new(23, 8, 0), Rgb::new(255, 154, 16)]);
        let paper = table.get("paper").unwrap();
        assert_eq!(paper.background(), Rgb::new(255, 244, 210));
    }

    #[test]
    fn every_builtin_is_valid() {
        for p in PaletteTable::builtin().iter() {
            assert!(Palette::new(p.name(), p.colors().to_vec()).is_ok(), "{}", p.name());
        }
    }

    #[test]
    fn dmg_is_ordered_darkest_first() {
        let table = PaletteTable::builtin();
        let dmg = table.get("DMG").unwrap();
        assert_eq!(dmg.background(), Rgb::from_hex(0x1b2a09));
        assert_eq!(dmg.color(3), Rgb::from_hex(0x9a9e3f));
    }

    #[test]
    fn insert_replaces_case_insensitively() {
        let mut table = PaletteTable::builtin();
        let custom = Palette::from_hex_strings("Matrix", &["#010101", "#fefefe"]).unwrap();
        table.insert(custom);
        assert_eq!(table.len(), 7);
        let got = table.get("matrix").unwrap();
        assert_eq!(got.name(), "Matrix");
        assert_eq!(got.background(), Rgb::new(1, 1, 1));
    }

    #[test]
    fn palette_cardinality_is_checked() {
        assert!(Palette::new("one", vec![Rgb::default()]).is_err());
        assert!(Palette::new("many", vec![Rgb::default(); MAX_COLORS + 1]).is_err());
        assert!(Palette::new("max", vec![Rgb::default(); MAX_COLORS]).is_ok());
    }

    #[test]
    fn unknown_palette_error_lists_names() {
        let table = PaletteTable::builtin();
        let err = table.get("sepia").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sepia"));
        assert!(msg.contains("VT320"));
        assert!(msg.contains("dmg"));
    }
}
