use super::{summary, Renderer};
use crate::config::EmitterConfig;
use crate::emitter::Procedure;

pub struct TypeScriptRenderer<'a> {
    config: &'a EmitterConfig,
}

impl<'a> TypeScriptRenderer<'a> {
    pub fn new(config: &'a EmitterConfig) -> Self {
        Self { config }
    }

    fn generate_part(&self, procedure: &Procedure) -> String {
        let sb = self.config.accumulator();
        if procedure.literals.is_empty() {
            return format!("function {}({}: string[]): void {{}}", procedure.name, sb);
        }

        let lines: Vec<String> = procedure
            .literals
            .iter()
            .map(|literal| format!("    \"{}\",", literal))
            .collect();

        format!(
            "function {}({sb}: string[]): void {{\n  {sb}.push(\n{}\n  );\n}}",
            procedure.name,
            lines.join("\n"),
            sb = sb
        )
    }

    fn generate_driver(&self, procedures: &[Procedure]) -> String {
        let sb = self.config.accumulator();
        let calls: String = procedures
            .iter()
            .map(|p| format!("  {}({});\n", p.name, sb))
            .collect();

        format!(
            r#"function {driver}(): string {{
  const {sb}: string[] = [];
{calls}  return {sb}.join("");
}}

export const METADATA: string = {driver}();

export function getMetadata(): string {{
  return METADATA;
}}"#,
            driver = self.config.driver_name(),
            sb = sb,
            calls = calls
        )
    }
}

impl Renderer for TypeScriptRenderer<'_> {
    fn render(&self, procedures: &[Procedure]) -> String {
        let mut sections = vec![format!(
            "// @generated by strata-codegen. Do not edit.\n// {}",
            summary(self.config, procedures)
        )];
        sections.extend(procedures.iter().map(|p| self.generate_part(p)));
        sections.push(self.generate_driver(procedures));
        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }
}
