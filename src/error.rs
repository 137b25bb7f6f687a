//! Errors raised while loading a serialized document

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("syntax error at {span:?}: {message}")]
    Syntax { span: Span, message: String },
}

impl LoadError {
    /// Convert a JSON error, locating its line/column in `source`
    pub fn from_json(err: &serde_json::Error, source: &str) -> Self {
        let offset = byte_offset(source, err.line(), err.column());
        let end = source[offset..]
            .chars()
            .next()
            .map_or(offset, |c| offset + c.len_utf8());
        LoadError::Syntax {
            span: offset..end,
            message: strip_position(&err.to_string()),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            LoadError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let written = match self {
            LoadError::Syntax { span, message } => Report::build(ReportKind::Error, filename, span.start)
                .with_message(message)
                .with_label(
                    Label::new((filename, span.clone()))
                        .with_message(message)
                        .with_color(Color::Red),
                )
                .finish()
                .write((filename, Source::from(source)), &mut buf),
        };
        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Byte offset of a 1-based line and column, clamped to the source
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let line_text = source[line_start.min(source.len())..]
        .split('\n')
        .next()
        .unwrap_or("");
    let col = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    (line_start + col).min(source.len())
}

/// serde_json appends " at line L column C"; the span already says where
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error(source: &str) -> LoadError {
        let err = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
        LoadError::from_json(&err, source)
    }

    #[test]
    fn test_span_points_at_error() {
        let source = "{\n  \"type\": \"rect\",\n  oops\n}";
        let err = json_error(source);
        let span = err.span().clone();
        assert_eq!(&source[span], "o");
    }

    #[test]
    fn test_message_has_no_position_suffix() {
        let err = json_error("[1, 2");
        let LoadError::Syntax { message, .. } = &err;
        assert!(!message.contains("at line"));
    }

    #[test]
    fn test_format_includes_filename() {
        let source = "{\"type\": }";
        let err = json_error(source);
        let formatted = err.format(source, "scene.json");
        assert!(formatted.contains("scene.json"));
    }

    #[test]
    fn test_byte_offset() {
        assert_eq!(byte_offset("ab\ncd", 2, 2), 4);
        assert_eq!(byte_offset("ab", 9, 9), 2);
        assert_eq!(byte_offset("ab", 0, 0), 0);
    }
}
