use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use strata_codegen::{EmitterConfig, Target};

/// Configuration structure for strata.toml.
/// Optional: every command works without it using defaults and flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrataConfig {
    pub project: ProjectConfig,

    #[serde(default)]
    pub codegen: EmitterConfig,

    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

fn default_output_dir() -> String {
    "./generated".to_string()
}

impl StrataConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: StrataConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load config, returning None if file doesn't exist
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        self.codegen
            .validate()
            .context("Invalid [codegen] section")?;

        if let Some(output) = &self.output {
            if output.dir.trim().is_empty() {
                anyhow::bail!("Output directory cannot be empty");
            }
        }

        Ok(())
    }

    pub fn get_output_dir(&self) -> &str {
        self.output
            .as_ref()
            .map(|o| o.dir.as_str())
            .unwrap_or("./generated")
    }
}

/// Flags that override whatever strata.toml says.
#[derive(Debug, Clone, Default)]
pub struct EmitterOverrides {
    pub target: Option<Target>,
    pub max_lines: Option<usize>,
    pub unit_name: Option<String>,
}

/// Merge config file settings and command-line flags into one emitter config.
/// `document_name` is used as the unit name when nothing else provides one.
pub fn resolve_emitter_config(
    config: Option<&StrataConfig>,
    overrides: &EmitterOverrides,
    document_name: Option<&str>,
) -> EmitterConfig {
    let mut emitter = config.map(|c| c.codegen.clone()).unwrap_or_default();

    if let Some(target) = overrides.target {
        emitter.target = target;
    }
    if let Some(max_lines) = overrides.max_lines {
        emitter.max_lines_per_segment = max_lines;
    }
    if let Some(name) = &overrides.unit_name {
        emitter.unit_name = Some(name.clone());
    }
    if emitter.unit_name.is_none() {
        emitter.unit_name = document_name
            .map(str::to_string)
            .or_else(|| config.map(|c| c.project.name.clone()));
    }

    emitter
}

/// Output path for a generated unit: the override if given, otherwise
/// `<output dir>/<input stem>_metadata.<ext>`.
pub fn get_output_path(
    config: Option<&StrataConfig>,
    input: &Path,
    target: Target,
    override_path: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = override_path {
        return path;
    }

    let dir = config
        .map(|c| c.get_output_dir())
        .unwrap_or("./generated");
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    PathBuf::from(dir).join(format!("{}_metadata.{}", stem, target.file_extension()))
}
