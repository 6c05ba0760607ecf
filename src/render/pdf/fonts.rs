//! Locating and loading a TrueType font family for PDF output.
//!
//! Fonts are embedded in the PDF, so any Unicode text the family covers
//! survives. Search order:
//! 1. `render.font_dir` from the configuration
//! 2. the `SBOM_DOC_FONT_DIR` environment variable
//! 3. the platform font directories
//!
//! The first two accept any family following the `<Name>-Regular.ttf` /
//! `<Name>-Bold.ttf` convention; every directory is also searched for the
//! well-known families listed below.

use crate::render::ReportError;
use genpdf::fonts::{FontData, FontFamily};
use std::path::{Path, PathBuf};

/// Environment variable naming an extra font directory
pub const FONT_DIR_ENV: &str = "SBOM_DOC_FONT_DIR";

/// Subdirectory levels searched below each font root
const MAX_DEPTH: usize = 4;

/// File names making up one font family.
#[derive(Debug, Clone, Copy)]
struct KnownFamily {
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

/// Families with broad Unicode coverage, in order of preference.
const KNOWN_FAMILIES: &[KnownFamily] = &[
    KnownFamily {
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
    KnownFamily {
        regular: "NotoSans-Regular.ttf",
        bold: "NotoSans-Bold.ttf",
        italic: "NotoSans-Italic.ttf",
        bold_italic: "NotoSans-BoldItalic.ttf",
    },
    KnownFamily {
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    KnownFamily {
        regular: "Roboto-Regular.ttf",
        bold: "Roboto-Bold.ttf",
        italic: "Roboto-Italic.ttf",
        bold_italic: "Roboto-BoldItalic.ttf",
    },
    KnownFamily {
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
];

/// Font files found on disk. Missing italic variants fall back to the
/// upright ones; the report never uses italics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFiles {
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub italic: Option<PathBuf>,
    pub bold_italic: Option<PathBuf>,
}

impl FontFiles {
    /// Read every file into a family `genpdf` can embed
    pub fn load(&self) -> Result<FontFamily<FontData>, ReportError> {
        let regular = read_font(&self.regular)?;
        let bold = read_font(&self.bold)?;
        let italic = match &self.italic {
            Some(path) => read_font(path)?,
            None => regular.clone(),
        };
        let bold_italic = match &self.bold_italic {
            Some(path) => read_font(path)?,
            None => bold.clone(),
        };
        Ok(FontFamily {
            regular,
            bold,
            italic,
            bold_italic,
        })
    }
}

fn read_font(path: &Path) -> Result<FontData, ReportError> {
    let bytes = std::fs::read(path).map_err(|e| ReportError::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontData::new(bytes, None).map_err(|e| ReportError::Font {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Directories searched for fonts, in priority order.
#[must_use]
pub fn search_roots(configured: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = configured {
        roots.push(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(FONT_DIR_ENV) {
        roots.push(PathBuf::from(dir));
    }
    if let Some(dir) = dirs::font_dir() {
        roots.push(dir);
    }
    roots.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts/Supplemental",
            "C:\\Windows\\Fonts",
        ]
        .iter()
        .map(PathBuf::from),
    );
    roots
}

/// Find a usable family: first any `<Name>-Regular.ttf` family in the
/// configured or environment directory, then a known family under any root.
#[must_use]
pub fn find_font_files(configured: Option<&Path>) -> Option<FontFiles> {
    let env_dir = std::env::var_os(FONT_DIR_ENV).map(PathBuf::from);
    let named = configured
        .and_then(find_named_family)
        .or_else(|| env_dir.as_deref().and_then(find_named_family));
    if named.is_some() {
        return named;
    }
    let roots = search_roots(configured);
    KNOWN_FAMILIES.iter().find_map(|family| {
        roots
            .iter()
            .find_map(|root| find_known_family(root, family, MAX_DEPTH))
    })
}

/// Locate and load the font family used for a PDF report
pub fn load_font_family(configured: Option<&Path>) -> Result<FontFamily<FontData>, ReportError> {
    let files = find_font_files(configured).ok_or_else(|| {
        let searched: Vec<String> = search_roots(configured)
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        ReportError::FontNotFound(searched.join(", "))
    })?;
    tracing::debug!("Using PDF font {}", files.regular.display());
    files.load()
}

/// A `<Name>-Regular.ttf` with a matching `<Name>-Bold.ttf` directly in `dir`.
fn find_named_family(dir: &Path) -> Option<FontFiles> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    entries.iter().find_map(|path| {
        let file_name = path.file_name()?.to_str()?;
        let name = file_name.strip_suffix("-Regular.ttf")?;
        let sibling = |style: &str| {
            let candidate = dir.join(format!("{name}-{style}.ttf"));
            candidate.is_file().then_some(candidate)
        };
        Some(FontFiles {
            regular: path.clone(),
            bold: sibling("Bold")?,
            italic: sibling("Italic"),
            bold_italic: sibling("BoldItalic"),
        })
    })
}

/// Depth-limited search for `family` below `dir`. Regular and bold must
/// sit in the same directory.
fn find_known_family(dir: &Path, family: &KnownFamily, depth: usize) -> Option<FontFiles> {
    let regular = dir.join(family.regular);
    let bold = dir.join(family.bold);
    if regular.is_file() && bold.is_file() {
        let optional = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };
        return Some(FontFiles {
            regular,
            bold,
            italic: optional(family.italic),
            bold_italic: optional(family.bold_italic),
        });
    }
    if depth == 0 {
        return None;
    }

    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_known_family(sub, family, depth - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_configured_dir_accepts_any_named_family() {
        let dir = tempfile::tempdir().unwrap();
        let regular = touch(dir.path(), "NotoSansCJKjp-Regular.ttf");
        let bold = touch(dir.path(), "NotoSansCJKjp-Bold.ttf");

        let found = find_font_files(Some(dir.path())).unwrap();
        assert_eq!(found.regular, regular);
        assert_eq!(found.bold, bold);
        assert_eq!(found.italic, None);
    }

    #[test]
    fn test_named_family_needs_bold() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Lonely-Regular.ttf");
        assert_eq!(find_named_family(dir.path()), None);
    }

    #[test]
    fn test_known_family_found_in_subdirectory() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("truetype").join("dejavu");
        std::fs::create_dir_all(&nested).unwrap();
        touch(&nested, "DejaVuSans.ttf");
        touch(&nested, "DejaVuSans-Bold.ttf");
        touch(&nested, "DejaVuSans-Oblique.ttf");

        let found = find_known_family(root.path(), &KNOWN_FAMILIES[0], MAX_DEPTH).unwrap();
        assert_eq!(found.regular, nested.join("DejaVuSans.ttf"));
        assert_eq!(found.italic, Some(nested.join("DejaVuSans-Oblique.ttf")));
        assert_eq!(found.bold_italic, None);
    }

    #[test]
    fn test_search_depth_is_bounded() {
        let root = tempfile::tempdir().unwrap();
        let deep = root.path().join("a").join("b");
        std::fs::create_dir_all(&deep).unwrap();
        touch(&deep, "DejaVuSans.ttf");
        touch(&deep, "DejaVuSans-Bold.ttf");

        assert!(find_known_family(root.path(), &KNOWN_FAMILIES[0], 1).is_none());
        assert!(find_known_family(root.path(), &KNOWN_FAMILIES[0], 2).is_some());
    }

    #[test]
    fn test_configured_dir_searched_first() {
        let dir = tempfile::tempdir().unwrap();
        let roots = search_roots(Some(dir.path()));
        assert_eq!(roots[0], dir.path());
    }

    #[test]
    fn test_invalid_font_data_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let files = FontFiles {
            regular: touch(dir.path(), "Broken-Regular.ttf"),
            bold: touch(dir.path(), "Broken-Bold.ttf"),
            italic: None,
            bold_italic: None,
        };
        assert!(matches!(files.load(), Err(ReportError::Font { .. })));
    }
}
