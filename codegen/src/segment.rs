//! Line-bounded segmentation of serialized text.

use crate::error::EmitError;
use serde::Serialize;

pub const DEFAULT_MAX_LINES_PER_SEGMENT: usize = 100;

/// A slice of consecutive lines, materialized later as one generated
/// procedure. Lines are stored without their `\n` terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub lines: Vec<String>,
    pub is_final: bool,
    /// Set on the final segment when the source text ended with `\n`.
    pub trailing_terminator: bool,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split `text` on `\n` into segments of at most `max_lines` lines.
///
/// A `\r` before a `\n` stays part of its line. Empty text yields a single
/// segment with no lines.
pub fn segment(text: &str, max_lines: usize) -> Result<Vec<Segment>, EmitError> {
    if max_lines == 0 {
        return Err(EmitError::InvalidArgument(
            "max_lines_per_segment must be positive".to_string(),
        ));
    }

    let trailing_terminator = text.ends_with('\n');
    let body = text.strip_suffix('\n').unwrap_or(text);

    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    if !text.is_empty() {
        for line in body.split('\n') {
            if current.len() == max_lines {
                groups.push(std::mem::take(&mut current));
            }
            current.push(line.to_string());
        }
    }
    groups.push(current);

    let last = groups.len() - 1;
    Ok(groups
        .into_iter()
        .enumerate()
        .map(|(index, lines)| Segment {
            index,
            lines,
            is_final: index == last,
            trailing_terminator: index == last && trailing_terminator,
        })
        .collect())
}

/// Rebuild the original text from its segments.
pub fn reassemble(segments: &[Segment]) -> String {
    let mut out = String::new();
    let mut first = true;
    for line in segments.iter().flat_map(|s| s.lines.iter()) {
        if !first {
            out.push('\n');
        }
        out.push_str(line);
        first = false;
    }
    if segments.last().is_some_and(|s| s.trailing_terminator) {
        out.push('\n');
    }
    out
}
