//! Text measurement: the metrics-provider seam and the sizing resolver

use thiserror::Error;

use crate::node::{AttrValue, Props};

use super::family::{default_generic_fallback, resolve_font_family};

/// Errors raised by a measurement backend
///
/// These indicate a broken font setup rather than bad input and are never
/// swallowed by the layout pass.
#[derive(Debug, Error, PartialEq)]
pub enum MeasureError {
    /// Registered font data could not be parsed at measurement time
    #[error("font face for '{family}' could not be parsed: {reason}")]
    InvalidFace { family: String, reason: String },

    /// Any other backend failure
    #[error("text measurement failed: {0}")]
    Backend(String),
}

/// Numeric font weight, 1..=1000
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    /// Parse a CSS-style weight keyword or number
    pub fn parse(value: &str) -> Option<FontWeight> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::NORMAL),
            "bold" | "bolder" => Some(Self::BOLD),
            "lighter" => Some(FontWeight(300)),
            other => other.parse::<f64>().ok().map(Self::from_number),
        }
    }

    pub fn from_number(n: f64) -> FontWeight {
        FontWeight(n.round().clamp(1.0, 1000.0) as u16)
    }

    fn from_attr(value: &AttrValue) -> Option<FontWeight> {
        match value {
            AttrValue::Num(n) => Some(Self::from_number(*n)),
            AttrValue::Str(s) => Self::parse(s),
            AttrValue::Bool(_) => None,
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Font properties used for measurement
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Comma-separated preference list, or a single resolved family
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    /// Line height as a multiple of the font size
    pub line_height: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 14.0,
            font_weight: FontWeight::NORMAL,
            line_height: 1.4,
        }
    }
}

impl FontSpec {
    /// Read `fontFamily`, `fontSize`, `fontWeight` and `lineHeight` from props
    pub fn from_props(props: &Props, defaults: &FontSpec) -> FontSpec {
        let font_family = props
            .str("fontFamily")
            .filter(|f| !f.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| defaults.font_family.clone());

        let font_size = match props.get("fontSize") {
            None => defaults.font_size,
            Some(value) => match value.as_f64() {
                Some(size) if size.is_finite() => size,
                _ => {
                    log::warn!("Ignoring non-numeric fontSize '{}'.", value);
                    defaults.font_size
                }
            },
        };

        let font_weight = props
            .get("fontWeight")
            .and_then(FontWeight::from_attr)
            .unwrap_or(defaults.font_weight);

        let line_height = props
            .number("lineHeight")
            .filter(|lh| lh.is_finite())
            .unwrap_or(defaults.line_height);

        FontSpec {
            font_family,
            font_size,
            font_weight,
            line_height,
        }
    }
}

/// Measured text extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

impl TextSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The set of font families a metrics provider can measure precisely
pub trait FontCatalog {
    fn has_family(&self, family: &str) -> bool;

    /// Substitute family for a lowercase generic family name
    fn generic_fallback(&self, generic: &str) -> Option<&str> {
        default_generic_fallback(generic)
    }
}

/// A font-metrics provider
pub trait TextMeasurer: FontCatalog {
    /// Measure `text` set in `font`, whose family is already resolved
    fn measure(&self, text: &str, font: &FontSpec) -> Result<TextSize, MeasureError>;
}

/// Resolves the size of text boxes from their content and style props
pub struct TextMetrics<'a> {
    measurer: &'a dyn TextMeasurer,
    defaults: &'a FontSpec,
    inflation: f64,
}

impl<'a> TextMetrics<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, defaults: &'a FontSpec) -> Self {
        Self {
            measurer,
            defaults,
            inflation: 1.01,
        }
    }

    /// Factor applied to raw measurements before rounding up
    pub fn with_inflation(mut self, inflation: f64) -> Self {
        self.inflation = inflation;
        self
    }

    /// Size a text box
    ///
    /// Explicit positive `width` and `height` win outright. Otherwise the font
    /// family list is resolved against the provider and the measured extent is
    /// inflated and rounded up to absorb renderer rounding.
    pub fn measure(&self, text: &str, props: &Props) -> Result<TextSize, MeasureError> {
        if let (Some(width), Some(height)) = (explicit_dimension(props, "width"), explicit_dimension(props, "height")) {
            return Ok(TextSize::new(width, height));
        }

        let mut font = FontSpec::from_props(props, self.defaults);
        let resolved = resolve_font_family(&font.font_family, self.measurer);
        if !resolved.registered {
            log::warn!(
                "No registered font for '{}', measuring with '{}' best-effort.",
                font.font_family,
                resolved.name
            );
        }
        font.font_family = resolved.name;

        let raw = self.measurer.measure(text, &font)?;
        Ok(TextSize::new(
            (raw.width * self.inflation).ceil(),
            (raw.height * self.inflation).ceil(),
        ))
    }
}

/// A dimension counts as explicit only when it is a positive number
pub fn explicit_dimension(props: &Props, name: &str) -> Option<f64> {
    props.number(name).filter(|v| *v > 0.0)
}

/// Measure with the default font settings
pub fn measure_text(
    text: &str,
    props: &Props,
    measurer: &dyn TextMeasurer,
) -> Result<TextSize, MeasureError> {
    let defaults = FontSpec::default();
    TextMetrics::new(measurer, &defaults).measure(text, props)
}
