use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use strata_codegen::{ChunkedEmitter, GeneratedUnit, JsonCodec};
use strata_pipeline::Pipeline;

use super::{load_config, read_document};
use crate::config::{resolve_emitter_config, EmitterOverrides};
use crate::ui;

#[derive(Debug, Serialize)]
struct SegmentLayout {
    index: usize,
    procedure: String,
    lines: usize,
    bytes: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct LineStats {
    pub total: usize,
    pub blank: usize,
    pub longest: usize,
    pub characters: i64,
}

#[derive(Debug, Serialize)]
struct Inspection {
    max_lines_per_segment: usize,
    nodes: usize,
    stats: LineStats,
    segments: Vec<SegmentLayout>,
}

pub(crate) fn line_stats(unit: &GeneratedUnit) -> Result<LineStats> {
    let lengths: Vec<i64> = unit
        .segments
        .iter()
        .flat_map(|s| s.lines.iter())
        .map(|line| line.chars().count() as i64)
        .collect();
    let total = lengths.len();
    let lengths = Pipeline::from_vec(lengths);

    let blank = lengths.filter(|n| *n == 0)?.count()?;
    let longest = lengths
        .sorted_by(|a, b| b.cmp(a))?
        .first()?
        .unwrap_or(0);
    let characters = lengths.sum()?;

    Ok(LineStats {
        total,
        blank,
        longest: longest as usize,
        characters,
    })
}

pub fn inspect(
    config_path: &str,
    input: &Path,
    overrides: EmitterOverrides,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let document = read_document(input)?;

    let emitter_config = resolve_emitter_config(config.as_ref(), &overrides, document.name());
    let max_lines = emitter_config.max_lines_per_segment;
    let unit = ChunkedEmitter::new(emitter_config)?.emit_document(&JsonCodec::new(), &document)?;

    let segments: Vec<SegmentLayout> = unit
        .segments
        .iter()
        .zip(&unit.procedures)
        .map(|(segment, procedure)| SegmentLayout {
            index: segment.index,
            procedure: procedure.name.clone(),
            lines: segment.len(),
            bytes: segment.lines.iter().map(|l| l.len()).sum(),
        })
        .collect();

    let inspection = Inspection {
        max_lines_per_segment: max_lines,
        nodes: document.node_count(),
        stats: line_stats(&unit)?,
        segments,
    };

    if json {
        return ui::print_json(&inspection);
    }

    ui::print_section(&format!("Document {}", input.display()));
    ui::print_field("Nodes", inspection.nodes);
    ui::print_field("Lines", inspection.stats.total);
    ui::print_field("Blank lines", inspection.stats.blank);
    ui::print_field("Longest line", inspection.stats.longest);
    ui::print_field("Characters", inspection.stats.characters);

    ui::print_section(&format!(
        "Segments ({}, at most {} lines each)",
        inspection.segments.len(),
        inspection.max_lines_per_segment
    ));
    for segment in &inspection.segments {
        ui::print_bullet(&format!(
            "{} {} lines, {} bytes",
            segment.procedure, segment.lines, segment.bytes
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_codegen::emit;

    #[test]
    fn test_line_stats() {
        let unit = emit("{\n\n  \"name\": \"shop\"\n}\n", 2).unwrap();
        let stats = line_stats(&unit).unwrap();
        assert_eq!(
            stats,
            LineStats {
                total: 4,
                blank: 1,
                longest: 16,
                characters: 18,
            }
        );
    }

    #[test]
    fn test_line_stats_empty_text() {
        let unit = emit("", 10).unwrap();
        let stats = line_stats(&unit).unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.longest, 0);
    }
}
