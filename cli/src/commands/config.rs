use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::config::StrataConfig;
use crate::ui;

#[derive(Debug, Serialize)]
struct ValidatedConfig<'a> {
    valid: bool,
    project: &'a str,
    output_dir: &'a str,
    codegen: &'a strata_codegen::EmitterConfig,
}

pub fn validate(config_path: &str, json: bool) -> Result<()> {
    if !json {
        ui::print_step("Validating configuration...");
    }

    let config = StrataConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    if json {
        return ui::print_json(&ValidatedConfig {
            valid: true,
            project: &config.project.name,
            output_dir: config.get_output_dir(),
            codegen: &config.codegen,
        });
    }

    let codegen = &config.codegen;
    ui::print_success("Configuration is valid!");
    println!();
    println!("  Project: {}", config.project.name.bold());
    ui::print_field("Output dir", config.get_output_dir());
    ui::print_field("Target", codegen.target);
    ui::print_field("Max lines per segment", codegen.max_lines_per_segment);
    ui::print_field(
        "Procedures",
        format!(
            "{prefix}0, {prefix}1, ... called by {}()",
            codegen.driver_name(),
            prefix = codegen.part_prefix()
        ),
    );

    Ok(())
}
