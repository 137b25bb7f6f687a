//! Font configuration files
//!
//! A TOML file lists the fonts to register at startup, the default text style
//! and optional overrides for the generic-family substitutes:
//!
//! ```toml
//! [metadata]
//! name = "brand fonts"
//!
//! [defaults]
//! family = "Source Han Sans"
//! size = 14
//! weight = "normal"
//! line_height = 1.4
//!
//! [[fonts]]
//! path = "fonts/SourceHanSans-Regular.otf"
//!
//! [[fonts]]
//! family = "Arial"
//! weight = 400
//! data = "AAEAAAAS..."   # base64-encoded font file
//!
//! [fallbacks]
//! monospace = "Arial"
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use thiserror::Error;

use super::measure::{FontSpec, FontWeight};
use super::registry::{FontData, FontError, FontRegistry};

/// Errors that can occur when loading font configuration
#[derive(Error, Debug)]
pub enum FontConfigError {
    #[error("Failed to read font config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse font config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("font #{index} has neither `path` nor `data`")]
    MissingSource { index: usize },
    #[error("font #{index} has invalid base64 data: {reason}")]
    InvalidData { index: usize, reason: String },
    #[error("invalid default font weight '{0}'")]
    InvalidWeight(String),
    #[error(transparent)]
    Font(#[from] FontError),
}

/// Where a font's bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum FontLocation {
    Path(PathBuf),
    Inline(Vec<u8>),
}

/// One `[[fonts]]` entry
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    pub family: Option<String>,
    pub weight: Option<u16>,
    pub index: u32,
    pub location: FontLocation,
}

/// Parsed font configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Default text style for text boxes that do not set their own
    pub defaults: FontSpec,
    pub fonts: Vec<FontSource>,
    /// Generic family -> substitute family overrides
    pub fallbacks: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlFontConfig {
    metadata: Option<TomlMetadata>,
    defaults: Option<TomlDefaults>,
    #[serde(default)]
    fonts: Vec<TomlFont>,
    #[serde(default)]
    fallbacks: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct TomlDefaults {
    family: Option<String>,
    size: Option<f64>,
    weight: Option<TomlWeight>,
    line_height: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TomlWeight {
    Number(f64),
    Keyword(String),
}

#[derive(Deserialize)]
struct TomlFont {
    path: Option<PathBuf>,
    data: Option<String>,
    family: Option<String>,
    weight: Option<u16>,
    #[serde(default)]
    index: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            defaults: FontSpec::default(),
            fonts: Vec::new(),
            fallbacks: HashMap::new(),
        }
    }
}

impl FontConfig {
    /// Load a config file; relative font paths resolve against its directory
    pub fn from_file(path: &Path) -> Result<Self, FontConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str(&content)?;
        if let Some(base) = path.parent() {
            for font in &mut config.fonts {
                if let FontLocation::Path(p) = &mut font.location {
                    if p.is_relative() {
                        *p = base.join(&*p);
                    }
                }
            }
        }
        Ok(config)
    }

    /// Parse a config from a TOML string
    pub fn from_str(content: &str) -> Result<Self, FontConfigError> {
        let parsed: TomlFontConfig = toml::from_str(content)?;

        let mut defaults = FontSpec::default();
        if let Some(d) = parsed.defaults {
            if let Some(family) = d.family {
                defaults.font_family = family;
            }
            if let Some(size) = d.size {
                defaults.font_size = size;
            }
            if let Some(line_height) = d.line_height {
                defaults.line_height = line_height;
            }
            match d.weight {
                Some(TomlWeight::Number(n)) => defaults.font_weight = FontWeight::from_number(n),
                Some(TomlWeight::Keyword(k)) => {
                    defaults.font_weight =
                        FontWeight::parse(&k).ok_or(FontConfigError::InvalidWeight(k))?;
                }
                None => {}
            }
        }

        let fonts = parsed
            .fonts
            .into_iter()
            .enumerate()
            .map(|(index, font)| {
                let location = match (font.path, font.data) {
                    (Some(path), _) => FontLocation::Path(path),
                    (None, Some(data)) => FontLocation::Inline(
                        STANDARD
                            .decode(data.trim())
                            .map_err(|e| FontConfigError::InvalidData {
                                index,
                                reason: e.to_string(),
                            })?,
                    ),
                    (None, None) => return Err(FontConfigError::MissingSource { index }),
                };
                Ok(FontSource {
                    family: font.family,
                    weight: font.weight,
                    index: font.index,
                    location,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FontConfig {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            defaults,
            fonts,
            fallbacks: parsed.fallbacks,
        })
    }

    /// Register every configured font into a fresh registry
    pub fn load_registry(&self) -> Result<FontRegistry, FontConfigError> {
        let mut registry = FontRegistry::new();
        for (generic, family) in &self.fallbacks {
            registry.set_fallback(generic, family.clone());
        }

        for source in &self.fonts {
            let mut data = match &source.location {
                FontLocation::Path(path) => FontData::from_file(path)?,
                FontLocation::Inline(bytes) => FontData::new(bytes.clone()),
            };
            data = data.with_index(source.index);
            if let Some(family) = &source.family {
                data = data.with_family(family.clone());
            }
            if let Some(weight) = source.weight {
                data = data.with_weight(weight);
            }
            registry.register_font(data)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FontCatalog;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[metadata]
name = "Brand"
description = "Brand fonts"

[defaults]
family = "Source Han Sans"
size = 16
weight = "bold"
line_height = 1.5

[[fonts]]
path = "fonts/a.ttf"
family = "A"
weight = 700

[[fonts]]
data = "AAECAw=="
index = 1

[fallbacks]
serif = "A"
"#;
        let config = FontConfig::from_str(toml_str).expect("Should parse");
        assert_eq!(config.name.as_deref(), Some("Brand"));
        assert_eq!(config.defaults.font_family, "Source Han Sans");
        assert_eq!(config.defaults.font_size, 16.0);
        assert_eq!(config.defaults.font_weight, FontWeight::BOLD);
        assert_eq!(config.defaults.line_height, 1.5);
        assert_eq!(config.fonts.len(), 2);
        assert_eq!(
            config.fonts[0].location,
            FontLocation::Path(PathBuf::from("fonts/a.ttf"))
        );
        assert_eq!(config.fonts[1].location, FontLocation::Inline(vec![0, 1, 2, 3]));
        assert_eq!(config.fonts[1].index, 1);
        assert_eq!(config.fallbacks.get("serif").map(String::as_str), Some("A"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FontConfig::from_str("").expect("Should parse");
        assert_eq!(config, FontConfig::default());
    }

    #[test]
    fn test_numeric_default_weight() {
        let config = FontConfig::from_str("[defaults]\nweight = 300\n").unwrap();
        assert_eq!(config.defaults.font_weight, FontWeight(300));
    }

    #[test]
    fn test_font_without_source() {
        let err = FontConfig::from_str("[[fonts]]\nfamily = \"X\"\n").unwrap_err();
        assert!(matches!(err, FontConfigError::MissingSource { index: 0 }));
    }

    #[test]
    fn test_invalid_base64() {
        let err = FontConfig::from_str("[[fonts]]\ndata = \"!!!\"\n").unwrap_err();
        assert!(matches!(err, FontConfigError::InvalidData { index: 0, .. }));
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(FontConfig::from_str("this is not valid toml {{{{").is_err());
    }

    #[test]
    fn test_load_registry_applies_fallbacks() {
        let config = FontConfig::from_str("[fallbacks]\nCursive = \"LXGW WenKai\"\n").unwrap();
        let registry = config.load_registry().unwrap();
        assert_eq!(registry.generic_fallback("cursive"), Some("LXGW WenKai"));
    }

    #[test]
    fn test_load_registry_rejects_bad_font() {
        let config = FontConfig::from_str("[[fonts]]\nfamily = \"X\"\ndata = \"AAECAw==\"\n").unwrap();
        let err = config.load_registry().unwrap_err();
        assert!(matches!(err, FontConfigError::Font(FontError::InvalidFace { .. })));
    }
}
