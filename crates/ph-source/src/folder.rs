use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Extensions image reconnues (comparées sans casse).
pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif"];

/// Vrai si l'extension de `path` fait partie de [`IMAGE_EXTS`].
///
/// # Example
/// ```
/// use ph_source::folder::is_supported_image;
/// use std::path::Path;
/// assert!(is_supported_image(Path::new("a/photo.JPG")));
/// assert!(!is_supported_image(Path::new("notes.txt")));
/// assert!(!is_supported_image(Path::new("png")));
/// ```
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTS.contains(&ext.to_lowercase().as_str()))
}

/// Liste les images d'un dossier, sans descendre dans les sous-dossiers.
///
/// Only regular files with a supported extension are kept, sorted by file name.
///
/// # Errors
/// Returns an error if `dir` is not a directory or cannot be read.
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Dossier d'entrée introuvable : {}", dir.display());
    }

    let mut files = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Lecture impossible : {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Lecture impossible : {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    log::debug!("{} image(s) trouvée(s) dans {}", files.len(), dir.display());
    Ok(files)
}

/// Chemin de sortie `{stem}_{palette}.png` dans `out_dir`.
///
/// # Example
/// ```
/// use ph_source::folder::output_path_for;
/// use std::path::Path;
/// let out = output_path_for(Path::new("out"), Path::new("in/cat.jpeg"), "dmg");
/// assert_eq!(out, Path::new("out/cat_dmg.png"));
/// ```
#[must_use]
pub fn output_path_for(out_dir: &Path, input: &Path, palette: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    out_dir.join(format!("{stem}_{palette}.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "c.webp", "readme.md", "noext"] {
            touch(dir.path(), name);
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        touch(&sub, "deep.png");

        let names: Vec<String> = scan_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.webp"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_images(&dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("absent"));
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_images(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn output_name_keeps_inner_dots() {
        let out = output_path_for(Path::new("o"), Path::new("x/my.photo.bmp"), "VT320");
        assert_eq!(out, Path::new("o/my.photo_VT320.png"));
    }
}
