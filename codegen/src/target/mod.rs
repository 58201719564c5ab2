//! Source rendering per [`Target`].

mod rust;
mod typescript;

use crate::config::{EmitterConfig, Target};
use crate::emitter::Procedure;

pub use rust::RustRenderer;
pub use typescript::TypeScriptRenderer;

/// Turns already-escaped procedures into a complete source file.
pub trait Renderer {
    fn render(&self, procedures: &[Procedure]) -> String;
}

pub(crate) fn render(config: &EmitterConfig, procedures: &[Procedure]) -> String {
    match config.target {
        Target::Rust => RustRenderer::new(config).render(procedures),
        Target::TypeScript => TypeScriptRenderer::new(config).render(procedures),
    }
}

/// Header comment text must stay on one line.
fn comment_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn summary(config: &EmitterConfig, procedures: &[Procedure]) -> String {
    format!(
        "Serialized metadata for `{}`, split into {} part(s) of at most {} lines.",
        comment_safe(config.unit_name()),
        procedures.len(),
        config.max_lines_per_segment
    )
}
