use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use strata_codegen::{loader, reassemble, ChunkedEmitter, DocumentCodec, JsonCodec, Target};

use super::{load_config, read_document};
use crate::config::{resolve_emitter_config, EmitterOverrides};
use crate::ui;

#[derive(Debug, Serialize)]
struct Verification {
    target: Target,
    segments: usize,
    lines: usize,
    within_bound: bool,
    text_round_trip: bool,
    document_round_trip: bool,
}

impl Verification {
    fn passed(&self) -> bool {
        self.within_bound && self.text_round_trip && self.document_round_trip
    }
}

pub fn verify(
    config_path: &str,
    input: &Path,
    overrides: EmitterOverrides,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let document = read_document(input)?;

    let emitter_config = resolve_emitter_config(config.as_ref(), &overrides, document.name());
    let max_lines = emitter_config.max_lines_per_segment;
    let codec = JsonCodec::new();
    let text = codec.encode(&document)?;
    let unit = ChunkedEmitter::new(emitter_config)?.emit(&text)?;

    let verification = Verification {
        target: unit.target,
        segments: unit.segments.len(),
        lines: unit.line_count(),
        within_bound: unit.segments.iter().all(|s| s.len() <= max_lines),
        text_round_trip: reassemble(&unit.segments) == text && unit.run_driver()? == text,
        document_round_trip: loader::load(&codec, &unit)? == document,
    };

    if json {
        ui::print_json(&verification)?;
    } else if verification.passed() {
        ui::print_success(&format!(
            "{} reconstructs exactly ({} lines in {} segments)",
            input.display(),
            verification.lines,
            verification.segments
        ));
    } else {
        ui::print_error(&format!("{} failed verification", input.display()));
        ui::print_field("Segments within bound", verification.within_bound);
        ui::print_field("Text round trip", verification.text_round_trip);
        ui::print_field("Document round trip", verification.document_round_trip);
    }

    if !verification.passed() {
        anyhow::bail!("Generated unit does not reproduce {}", input.display());
    }

    Ok(())
}
