//! Double-quoted string literal encoding shared by all targets.
//!
//! Backslash, double quote, LF and CR are escaped; tab and every other
//! printable character pass through. Remaining control characters cannot be
//! carried in a generated source file and are rejected.

use crate::error::EmitError;

/// Escape `text` so it can sit between double quotes in generated source.
pub fn escape_literal(text: &str) -> Result<String, EmitError> {
    escape_line(text, 1)
}

pub(crate) fn escape_line(text: &str, line: usize) -> Result<String, EmitError> {
    let mut out = String::with_capacity(text.len() + 8);
    for (index, ch) in text.chars().enumerate() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push('\t'),
            c if c.is_ascii_control() => {
                return Err(EmitError::EncodingFailure {
                    line,
                    column: index + 1,
                    character: c,
                })
            }
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Inverse of [`escape_literal`].
pub fn unescape_literal(literal: &str) -> Result<String, EmitError> {
    let mut out = String::with_capacity(literal.len());
    let mut chars = literal.char_indices();
    while let Some((position, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, other)) => {
                return Err(EmitError::MalformedLiteral {
                    position,
                    reason: format!("unknown escape '\\{}'", other),
                })
            }
            None => {
                return Err(EmitError::MalformedLiteral {
                    position,
                    reason: "dangling backslash".to_string(),
                })
            }
        }
    }
    Ok(out)
}
