//! Prop-to-attribute mapping

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::node::AttrValue;

/// SVG attributes whose canonical spelling is camelCase
static CAMEL_CASE_ATTRIBUTES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "allowReorder",
        "attributeName",
        "attributeType",
        "baseFrequency",
        "baseProfile",
        "calcMode",
        "clipPathUnits",
        "diffuseConstant",
        "edgeMode",
        "filterUnits",
        "glyphRef",
        "gradientTransform",
        "gradientUnits",
        "kernelMatrix",
        "kernelUnitLength",
        "keyPoints",
        "keySplines",
        "keyTimes",
        "lengthAdjust",
        "limitingConeAngle",
        "markerHeight",
        "markerUnits",
        "markerWidth",
        "maskContentUnits",
        "maskUnits",
        "numOctaves",
        "pathLength",
        "patternContentUnits",
        "patternTransform",
        "patternUnits",
        "pointsAtX",
        "pointsAtY",
        "pointsAtZ",
        "preserveAlpha",
        "preserveAspectRatio",
        "primitiveUnits",
        "refX",
        "refY",
        "repeatCount",
        "repeatDur",
        "requiredExtensions",
        "requiredFeatures",
        "specularConstant",
        "specularExponent",
        "spreadMethod",
        "startOffset",
        "stdDeviation",
        "stitchTiles",
        "surfaceScale",
        "systemLanguage",
        "tableValues",
        "targetX",
        "targetY",
        "textLength",
        "viewBox",
        "viewTarget",
        "xChannelSelector",
        "yChannelSelector",
        "zoomAndPan",
    ]
    .into_iter()
    .collect()
});

/// Props that never become attributes
const NON_ATTRIBUTE_PROPS: &[&str] = &["key", "children"];

/// The markup attribute name for a prop, or `None` if it is not emitted
pub fn svg_attribute_name(prop: &str) -> Option<String> {
    if prop.is_empty() || NON_ATTRIBUTE_PROPS.contains(&prop) {
        return None;
    }

    let name = match prop {
        "className" => "class".to_string(),
        "htmlFor" => "for".to_string(),
        "xmlnsXlink" => "xmlns:xlink".to_string(),
        _ if CAMEL_CASE_ATTRIBUTES.contains(prop) => prop.to_string(),
        _ => {
            if let Some(rest) = namespaced(prop, "xlink") {
                format!("xlink:{}", rest)
            } else if let Some(rest) = namespaced(prop, "xml") {
                format!("xml:{}", rest)
            } else {
                kebab_case(prop)
            }
        }
    };
    Some(name)
}

/// `xlinkHref` → `href` when `prefix` is `xlink`
fn namespaced(prop: &str, prefix: &str) -> Option<String> {
    let rest = prop.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(first.to_ascii_lowercase().to_string() + &kebab_case(chars.as_str()))
}

fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// The attribute value text, or `None` when the attribute is omitted
///
/// `false` omits the attribute. Non-finite numbers are dropped with a warning.
pub fn svg_attribute_value(name: &str, value: &AttrValue) -> Option<String> {
    match value {
        AttrValue::Bool(false) => None,
        AttrValue::Num(n) if !n.is_finite() => {
            log::warn!("Dropping attribute '{}' with non-finite value {}.", name, n);
            None
        }
        other => Some(other.to_string()),
    }
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_names() {
        assert_eq!(svg_attribute_name("className").as_deref(), Some("class"));
        assert_eq!(svg_attribute_name("xlinkHref").as_deref(), Some("xlink:href"));
        assert_eq!(svg_attribute_name("xmlSpace").as_deref(), Some("xml:space"));
        assert_eq!(svg_attribute_name("xmlnsXlink").as_deref(), Some("xmlns:xlink"));
    }

    #[test]
    fn test_camel_case_svg_attributes_kept() {
        assert_eq!(svg_attribute_name("viewBox").as_deref(), Some("viewBox"));
        assert_eq!(svg_attribute_name("gradientTransform").as_deref(), Some("gradientTransform"));
        assert_eq!(svg_attribute_name("stdDeviation").as_deref(), Some("stdDeviation"));
    }

    #[test]
    fn test_presentation_attributes_kebab_cased() {
        assert_eq!(svg_attribute_name("strokeWidth").as_deref(), Some("stroke-width"));
        assert_eq!(svg_attribute_name("fontFamily").as_deref(), Some("font-family"));
        assert_eq!(svg_attribute_name("stopColor").as_deref(), Some("stop-color"));
        assert_eq!(svg_attribute_name("stroke-linecap").as_deref(), Some("stroke-linecap"));
        assert_eq!(svg_attribute_name("fill").as_deref(), Some("fill"));
    }

    #[test]
    fn test_key_not_emitted() {
        assert_eq!(svg_attribute_name("key"), None);
        assert_eq!(svg_attribute_name(""), None);
    }

    #[test]
    fn test_attribute_values() {
        assert_eq!(svg_attribute_value("x", &AttrValue::Num(2.5)).as_deref(), Some("2.5"));
        assert_eq!(svg_attribute_value("x", &AttrValue::Num(3.0)).as_deref(), Some("3"));
        assert_eq!(svg_attribute_value("x", &AttrValue::Num(f64::NAN)), None);
        assert_eq!(svg_attribute_value("focusable", &AttrValue::Bool(false)), None);
        assert_eq!(svg_attribute_value("focusable", &AttrValue::Bool(true)).as_deref(), Some("true"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
    }
}
