//! Registered fonts and the built-in glyph-advance metrics provider

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use ttf_parser::{name_id, Face};
use unicode_width::UnicodeWidthChar;

use super::family::DEFAULT_GENERIC_FALLBACKS;
use super::measure::{FontCatalog, FontSpec, FontWeight, MeasureError, TextMeasurer, TextSize};

/// Advance used for narrow characters without font data, in em
const NARROW_ADVANCE_EM: f64 = 0.56;

/// Advance used for wide (CJK, emoji) characters without font data, in em
const WIDE_ADVANCE_EM: f64 = 1.0;

/// Errors that can occur while registering fonts
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font data: {reason}")]
    InvalidFace { reason: String },

    #[error("font has no family name; set one explicitly")]
    MissingFamily,

    #[error("the global font registry is already installed")]
    AlreadyInstalled,
}

/// Raw font data waiting to be registered
#[derive(Clone)]
pub struct FontData {
    /// Family name; read from the font's name table when absent
    pub family: Option<String>,
    /// Weight; read from the font's OS/2 table when absent
    pub weight: Option<u16>,
    /// Face index inside a font collection
    pub index: u32,
    pub data: Vec<u8>,
}

impl FontData {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            family: None,
            weight: None,
            index: 0,
            data,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(data))
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[derive(Clone)]
struct FaceEntry {
    weight: u16,
    index: u32,
    data: Arc<Vec<u8>>,
}

/// Font families available for precise measurement
///
/// Fonts are registered once at startup; afterwards the registry is read-only
/// and can be shared freely.
#[derive(Clone)]
pub struct FontRegistry {
    faces: IndexMap<String, Vec<FaceEntry>>,
    fallbacks: IndexMap<String, String>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("families", &self.faces.keys().collect::<Vec<_>>())
            .field("fallbacks", &self.fallbacks)
            .finish()
    }
}

impl FontRegistry {
    /// Empty registry with the default generic-family substitutes
    pub fn new() -> Self {
        Self {
            faces: IndexMap::new(),
            fallbacks: DEFAULT_GENERIC_FALLBACKS
                .iter()
                .map(|(generic, family)| (generic.to_string(), family.to_string()))
                .collect(),
        }
    }

    /// Register a font face, returning the family it was registered under
    pub fn register_font(&mut self, font: FontData) -> Result<String, FontError> {
        let face = Face::parse(&font.data, font.index).map_err(|e| FontError::InvalidFace {
            reason: e.to_string(),
        })?;

        let family = match font.family {
            Some(family) => family,
            None => family_name(&face).ok_or(FontError::MissingFamily)?,
        };
        let weight = font.weight.unwrap_or_else(|| face.weight().to_number());

        log::debug!("Registered font '{}' (weight {}).", family, weight);
        self.faces.entry(family.clone()).or_default().push(FaceEntry {
            weight,
            index: font.index,
            data: Arc::new(font.data),
        });
        Ok(family)
    }

    /// Override the substitute for a generic family
    pub fn set_fallback(&mut self, generic: &str, family: impl Into<String>) {
        self.fallbacks
            .insert(generic.to_ascii_lowercase(), family.into());
    }

    /// Registered family names in registration order
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn closest_face(&self, family: &str, weight: FontWeight) -> Option<&FaceEntry> {
        self.faces
            .get(family)?
            .iter()
            .min_by_key(|entry| (i32::from(entry.weight) - i32::from(weight.0)).abs())
    }
}

impl FontCatalog for FontRegistry {
    fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(family)
    }

    fn generic_fallback(&self, generic: &str) -> Option<&str> {
        self.fallbacks
            .get(&generic.to_ascii_lowercase())
            .map(String::as_str)
    }
}

impl TextMeasurer for FontRegistry {
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextSize, MeasureError> {
        let text = text.replace('\t', "    ");
        let lines: Vec<&str> = text.split('\n').collect();
        let height = lines.len() as f64 * font.font_size * font.line_height;

        let width = match self.closest_face(&font.font_family, font.font_weight) {
            Some(entry) => {
                let face = Face::parse(&entry.data, entry.index).map_err(|e| {
                    MeasureError::InvalidFace {
                        family: font.font_family.clone(),
                        reason: e.to_string(),
                    }
                })?;
                lines
                    .iter()
                    .map(|line| face_line_width(&face, line, font.font_size))
                    .fold(0.0, f64::max)
            }
            None => lines
                .iter()
                .map(|line| heuristic_line_width(line, font.font_size))
                .fold(0.0, f64::max),
        };

        Ok(TextSize::new(width.max(0.0), height.max(0.0)))
    }
}

fn family_name(face: &Face<'_>) -> Option<String> {
    let names = face.names();
    [name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY]
        .iter()
        .find_map(|id| {
            names
                .into_iter()
                .filter(|name| name.name_id == *id && name.is_unicode())
                .find_map(|name| name.to_string())
        })
}

fn face_line_width(face: &Face<'_>, line: &str, font_size: f64) -> f64 {
    let scale = font_size / f64::from(face.units_per_em().max(1));
    line.chars()
        .map(|ch| match face.glyph_index(ch) {
            Some(glyph) => f64::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale,
            None => heuristic_advance(ch, font_size),
        })
        .sum()
}

fn heuristic_line_width(line: &str, font_size: f64) -> f64 {
    line.chars().map(|ch| heuristic_advance(ch, font_size)).sum()
}

fn heuristic_advance(ch: char, font_size: f64) -> f64 {
    match ch.width() {
        Some(0) | None => 0.0,
        Some(1) => font_size * NARROW_ADVANCE_EM,
        Some(_) => font_size * WIDE_ADVANCE_EM,
    }
}

static GLOBAL_REGISTRY: OnceCell<FontRegistry> = OnceCell::new();
static EMPTY_REGISTRY: Lazy<FontRegistry> = Lazy::new(FontRegistry::new);

/// Install the process-wide registry; may only happen once, before rendering
pub fn install_global(registry: FontRegistry) -> Result<(), FontError> {
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| FontError::AlreadyInstalled)
}

/// The installed registry, or an empty one if nothing was installed
pub fn global_registry() -> &'static FontRegistry {
    GLOBAL_REGISTRY
        .get()
        .unwrap_or_else(|| Lazy::force(&EMPTY_REGISTRY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(family: &str, size: f64) -> FontSpec {
        FontSpec {
            font_family: family.to_string(),
            font_size: size,
            ..FontSpec::default()
        }
    }

    #[test]
    fn test_invalid_font_data_rejected() {
        let mut registry = FontRegistry::new();
        let err = registry
            .register_font(FontData::new(vec![0, 1, 2, 3]).with_family("Broken"))
            .unwrap_err();
        assert!(matches!(err, FontError::InvalidFace { .. }));
        assert!(!registry.has_family("Broken"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = FontData::from_file(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(err.to_string().contains("here.ttf"));
    }

    #[test]
    fn test_default_fallbacks() {
        let registry = FontRegistry::new();
        assert_eq!(registry.generic_fallback("serif"), Some("Source Han Serif"));
        assert_eq!(registry.generic_fallback("UI-MONOSPACE"), Some("Arial"));
        assert_eq!(registry.generic_fallback("nope"), None);
    }

    #[test]
    fn test_fallback_override() {
        let mut registry = FontRegistry::new();
        registry.set_fallback("Serif", "Noto Serif");
        assert_eq!(registry.generic_fallback("serif"), Some("Noto Serif"));
    }

    #[test]
    fn test_heuristic_measurement() {
        let registry = FontRegistry::new();
        let size = registry.measure("ab", &spec("Unregistered", 10.0)).unwrap();
        assert!((size.width - 11.2).abs() < 1e-9);
        assert!((size.height - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_wide_chars_and_lines() {
        let registry = FontRegistry::new();
        let size = registry.measure("中文\na", &spec("Unregistered", 10.0)).unwrap();
        assert!((size.width - 20.0).abs() < 1e-9);
        assert!((size.height - 28.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let registry = FontRegistry::new();
        let size = registry.measure("", &spec("Unregistered", 10.0)).unwrap();
        assert_eq!(size.width, 0.0);
        assert!((size.height - 14.0).abs() < 1e-9);
    }

    fn registry_with_weights(weights: &[u16]) -> FontRegistry {
        let mut registry = FontRegistry::new();
        let entries = weights
            .iter()
            .enumerate()
            .map(|(i, weight)| FaceEntry {
                weight: *weight,
                index: i as u32,
                data: Arc::new(Vec::new()),
            })
            .collect();
        registry.faces.insert("Family".to_string(), entries);
        registry
    }

    #[test]
    fn test_closest_face_by_weight() {
        let registry = registry_with_weights(&[300, 400, 700]);
        let pick = |w: u16| registry.closest_face("Family", FontWeight(w)).map(|e| e.weight);

        assert_eq!(pick(400), Some(400));
        assert_eq!(pick(900), Some(700));
        assert_eq!(pick(100), Some(300));
        assert_eq!(pick(600), Some(700));
        // ties go to the first registered face
        assert_eq!(pick(350), Some(300));
        assert!(registry.closest_face("Other", FontWeight(400)).is_none());
    }

    #[test]
    fn test_global_registry_defaults_to_empty() {
        // Nothing in the unit tests installs a registry.
        assert!(global_registry().families().next().is_none());
    }
}
