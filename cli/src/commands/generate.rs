use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use strata_codegen::{ChunkedEmitter, JsonCodec, Target};
use tracing::info;

use super::{load_config, read_document, write_atomically};
use crate::config::{get_output_path, resolve_emitter_config, EmitterOverrides};
use crate::ui;

#[derive(Debug, Serialize)]
struct GenerateSummary {
    output: PathBuf,
    target: Target,
    segments: usize,
    lines: usize,
    procedures: Vec<String>,
    driver: String,
}

pub fn generate(
    config_path: &str,
    input: &Path,
    output_override: Option<PathBuf>,
    overrides: EmitterOverrides,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;

    if !json {
        ui::print_step(&format!("Reading document from {}...", input.display()));
    }
    let document = read_document(input)?;

    let emitter_config = resolve_emitter_config(config.as_ref(), &overrides, document.name());
    let target = emitter_config.target;
    let emitter = ChunkedEmitter::new(emitter_config)?;

    let unit = emitter.emit_document(&JsonCodec::new(), &document)?;
    let output_path = get_output_path(config.as_ref(), input, target, output_override);
    write_atomically(&output_path, &unit.source)?;

    info!(
        output = %output_path.display(),
        segments = unit.segments.len(),
        "generated unit written"
    );

    let summary = GenerateSummary {
        output: output_path,
        target,
        segments: unit.segments.len(),
        lines: unit.line_count(),
        procedures: unit.procedures.iter().map(|p| p.name.clone()).collect(),
        driver: unit.driver_name.clone(),
    };

    if json {
        return ui::print_json(&summary);
    }

    ui::print_success(&format!(
        "Generated {} source at {}",
        summary.target,
        summary.output.display()
    ));
    ui::print_field("Lines", summary.lines);
    ui::print_field("Segments", summary.segments);
    ui::print_field("Driver", &summary.driver);

    Ok(())
}
