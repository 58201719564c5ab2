use crate::error::EmitError;
use crate::segment::DEFAULT_MAX_LINES_PER_SEGMENT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language a generated unit is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Rust,
    TypeScript,
}

impl Target {
    pub fn default_part_prefix(&self) -> &'static str {
        match self {
            Target::Rust => "init_part",
            Target::TypeScript => "initPart",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Target::Rust => "rs",
            Target::TypeScript => "ts",
        }
    }

    /// Words a configured name may not take in this target: language
    /// keywords plus the fixed names the renderer emits.
    pub fn reserved_names(&self) -> &'static [&'static str] {
        match self {
            Target::Rust => RUST_RESERVED,
            Target::TypeScript => TYPESCRIPT_RESERVED,
        }
    }
}

const RUST_RESERVED: &[&str] = &[
    "_", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
    // generated
    "metadata", "METADATA", "LINES", "line", "String", "OnceLock", "std",
];

const TYPESCRIPT_RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
    // generated
    "METADATA", "getMetadata",
];

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Rust => write!(f, "rust"),
            Target::TypeScript => write!(f, "typescript"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Target::Rust),
            "typescript" | "ts" => Ok(Target::TypeScript),
            other => Err(format!(
                "unknown target '{}' (expected 'rust' or 'typescript')",
                other
            )),
        }
    }
}

/// Settings for [`crate::ChunkedEmitter`].
///
/// Name fields left as `None` fall back to the target's conventions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub max_lines_per_segment: usize,
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accumulator: Option<String>,
    /// Name shown in the generated header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_lines_per_segment: DEFAULT_MAX_LINES_PER_SEGMENT,
            target: Target::default(),
            part_prefix: None,
            driver_name: None,
            accumulator: None,
            unit_name: None,
        }
    }
}

impl EmitterConfig {
    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_max_lines(mut self, max_lines_per_segment: usize) -> Self {
        self.max_lines_per_segment = max_lines_per_segment;
        self
    }

    pub fn with_unit_name(mut self, name: impl Into<String>) -> Self {
        self.unit_name = Some(name.into());
        self
    }

    pub fn part_prefix(&self) -> &str {
        self.part_prefix
            .as_deref()
            .unwrap_or_else(|| self.target.default_part_prefix())
    }

    pub fn driver_name(&self) -> &str {
        self.driver_name.as_deref().unwrap_or("init")
    }

    pub fn accumulator(&self) -> &str {
        self.accumulator.as_deref().unwrap_or("sb")
    }

    pub fn unit_name(&self) -> &str {
        self.unit_name.as_deref().unwrap_or("document")
    }

    pub fn part_name(&self, index: usize) -> String {
        format!("{}{}", self.part_prefix(), index)
    }

    pub fn validate(&self) -> Result<(), EmitError> {
        if self.max_lines_per_segment == 0 {
            return Err(EmitError::InvalidArgument(
                "max_lines_per_segment must be positive".to_string(),
            ));
        }

        for (field, value) in [
            ("part_prefix", self.part_prefix()),
            ("driver_name", self.driver_name()),
            ("accumulator", self.accumulator()),
        ] {
            if !is_identifier(value) {
                return Err(EmitError::InvalidArgument(format!(
                    "{} '{}' is not a valid identifier",
                    field, value
                )));
            }
        }

        for (field, value) in [
            ("driver_name", self.driver_name()),
            ("accumulator", self.accumulator()),
        ] {
            if self.target.reserved_names().contains(&value) {
                return Err(EmitError::InvalidArgument(format!(
                    "{} '{}' is reserved in {} output",
                    field, value, self.target
                )));
            }
        }

        if self.driver_name().starts_with(self.part_prefix()) {
            return Err(EmitError::InvalidArgument(format!(
                "driver_name '{}' collides with part_prefix '{}'",
                self.driver_name(),
                self.part_prefix()
            )));
        }

        // The accumulator is a local inside the driver and every part, where it
        // would shadow a function of the same name.
        if self.accumulator() == self.driver_name()
            || self.accumulator().starts_with(self.part_prefix())
        {
            return Err(EmitError::InvalidArgument(format!(
                "accumulator '{}' collides with a generated function name",
                self.accumulator()
            )));
        }

        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
