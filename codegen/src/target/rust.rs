use super::{summary, Renderer};
use crate::config::EmitterConfig;
use crate::emitter::Procedure;

pub struct RustRenderer<'a> {
    config: &'a EmitterConfig,
}

impl<'a> RustRenderer<'a> {
    pub fn new(config: &'a EmitterConfig) -> Self {
        Self { config }
    }

    fn generate_header(&self, procedures: &[Procedure]) -> String {
        format!(
            r#"//! @generated by strata-codegen. Do not edit.
//!
//! {}

use std::sync::OnceLock;

static METADATA: OnceLock<String> = OnceLock::new();

/// The reassembled serialized metadata.
pub fn metadata() -> &'static str {{
    METADATA.get_or_init({})
}}"#,
            summary(self.config, procedures),
            self.config.driver_name()
        )
    }

    fn generate_driver(&self, procedures: &[Procedure]) -> String {
        let sb = self.config.accumulator();
        let calls: String = procedures
            .iter()
            .map(|p| format!("    {}(&mut {});\n", p.name, sb))
            .collect();

        format!(
            "fn {driver}() -> String {{\n    let mut {sb} = String::new();\n{calls}    {sb}\n}}",
            driver = self.config.driver_name(),
            sb = sb,
            calls = calls
        )
    }

    fn generate_part(&self, procedure: &Procedure) -> String {
        let sb = self.config.accumulator();
        let lines: String = procedure
            .literals
            .iter()
            .map(|literal| format!("        \"{}\",\n", literal))
            .collect();
        let array = if lines.is_empty() {
            "&[]".to_string()
        } else {
            format!("&[\n{}    ]", lines)
        };

        format!(
            r#"fn {name}({sb}: &mut String) {{
    const LINES: &[&str] = {array};
    for line in LINES {{
        {sb}.push_str(line);
    }}
}}"#,
            name = procedure.name,
            sb = sb,
            array = array
        )
    }
}

impl Renderer for RustRenderer<'_> {
    fn render(&self, procedures: &[Procedure]) -> String {
        let mut sections = vec![
            self.generate_header(procedures),
            self.generate_driver(procedures),
        ];
        sections.extend(procedures.iter().map(|p| self.generate_part(p)));
        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}
