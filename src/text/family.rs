//! Font family lists: splitting, normalization and fallback resolution

use super::measure::FontCatalog;

/// Generic family substitutes used when no concrete family is registered
pub const DEFAULT_GENERIC_FALLBACKS: &[(&str, &str)] = &[
    ("serif", "Source Han Serif"),
    ("sans-serif", "Source Han Sans"),
    ("monospace", "Arial"),
    ("system-ui", "Source Han Sans"),
    ("ui-sans-serif", "Source Han Sans"),
    ("ui-serif", "Source Han Serif"),
    ("ui-monospace", "Arial"),
    ("ui-rounded", "Source Han Sans"),
    ("cursive", "851tegakizatsu"),
    ("fantasy", "851tegakizatsu"),
    ("emoji", "Arial"),
    ("math", "Arial"),
    ("fangsong", "Source Han Serif"),
];

/// Look up the built-in substitute for a generic family (case-insensitive)
pub fn default_generic_fallback(generic: &str) -> Option<&'static str> {
    let generic = generic.to_ascii_lowercase();
    DEFAULT_GENERIC_FALLBACKS
        .iter()
        .find(|(name, _)| *name == generic)
        .map(|(_, family)| *family)
}

/// Outcome of resolving a font family list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFamily {
    pub name: String,
    /// False when resolution fell through to the best-effort first candidate
    pub registered: bool,
}

/// Split a comma-separated family list, honoring quoted names
pub fn split_font_family(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in list.char_indices() {
        match (ch, quote) {
            ('"' | '\'', None) => quote = Some(ch),
            (c, Some(q)) if c == q => quote = None,
            (',', None) => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Normalize one family candidate: decode percent-escapes and strip quotes
pub fn decode_font_family(family: &str) -> String {
    let decoded = percent_decode(family.trim());
    let trimmed = decoded.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            if let Some(byte) = hex {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}

/// Resolve a family list against the registered families of `catalog`
///
/// 1. the first candidate that is registered verbatim,
/// 2. else the first candidate whose generic substitute is registered,
/// 3. else the first candidate, unregistered.
pub fn resolve_font_family<C>(list: &str, catalog: &C) -> ResolvedFamily
where
    C: FontCatalog + ?Sized,
{
    let families: Vec<String> = split_font_family(list)
        .into_iter()
        .map(decode_font_family)
        .collect();

    if let Some(found) = families.iter().find(|f| catalog.has_family(f)) {
        return ResolvedFamily {
            name: found.clone(),
            registered: true,
        };
    }

    for family in &families {
        if let Some(fallback) = catalog.generic_fallback(&family.to_lowercase()) {
            if catalog.has_family(fallback) {
                return ResolvedFamily {
                    name: fallback.to_string(),
                    registered: true,
                };
            }
        }
    }

    let name = families
        .into_iter()
        .next()
        .unwrap_or_else(|| decode_font_family(list));
    ResolvedFamily {
        name,
        registered: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Families(HashSet<&'static str>);

    impl FontCatalog for Families {
        fn has_family(&self, family: &str) -> bool {
            self.0.contains(family)
        }
    }

    fn catalog(names: &[&'static str]) -> Families {
        Families(names.iter().copied().collect())
    }

    #[test]
    fn test_split_font_family() {
        assert_eq!(
            split_font_family("Arial, 'Source Han Sans', serif"),
            vec!["Arial", "'Source Han Sans'", "serif"]
        );
        assert_eq!(split_font_family("\"A, B\", C"), vec!["\"A, B\"", "C"]);
        assert_eq!(split_font_family(" , ,"), Vec::<&str>::new());
    }

    #[test]
    fn test_decode_font_family() {
        assert_eq!(decode_font_family("'Source Han Sans'"), "Source Han Sans");
        assert_eq!(decode_font_family("\"LXGW WenKai\""), "LXGW WenKai");
        assert_eq!(decode_font_family("Source%20Han%20Serif"), "Source Han Serif");
        assert_eq!(decode_font_family("%22Quoted%22"), "Quoted");
        assert_eq!(decode_font_family("100%"), "100%");
        assert_eq!(decode_font_family("  Arial "), "Arial");
    }

    #[test]
    fn test_resolve_registered_first() {
        let fonts = catalog(&["Arial", "Source Han Serif"]);
        let resolved = resolve_font_family("Missing, Arial, serif", &fonts);
        assert_eq!(resolved.name, "Arial");
        assert!(resolved.registered);
    }

    #[test]
    fn test_resolve_unknown_then_generic() {
        let fonts = catalog(&["Source Han Serif"]);
        let resolved = resolve_font_family("UnknownFont, serif", &fonts);
        assert_eq!(
            resolved,
            ResolvedFamily {
                name: "Source Han Serif".to_string(),
                registered: true
            }
        );
    }

    #[test]
    fn test_resolve_generic_case_insensitive() {
        let fonts = catalog(&["Arial"]);
        assert_eq!(resolve_font_family("MONOSPACE", &fonts).name, "Arial");
    }

    #[test]
    fn test_resolve_generic_target_must_be_registered() {
        let fonts = catalog(&["Arial"]);
        let resolved = resolve_font_family("UnknownFont, serif", &fonts);
        assert_eq!(resolved.name, "UnknownFont");
        assert!(!resolved.registered);
    }

    #[test]
    fn test_resolve_best_effort_decodes_first() {
        let fonts = catalog(&[]);
        assert_eq!(resolve_font_family("'My Font', fantasy", &fonts).name, "My Font");
        assert_eq!(resolve_font_family("", &fonts).name, "");
    }

    #[test]
    fn test_default_generic_table() {
        assert_eq!(default_generic_fallback("cursive"), Some("851tegakizatsu"));
        assert_eq!(default_generic_fallback("Sans-Serif"), Some("Source Han Sans"));
        assert_eq!(default_generic_fallback("fangsong"), Some("Source Han Serif"));
        assert_eq!(default_generic_fallback("Arial"), None);
    }
}
