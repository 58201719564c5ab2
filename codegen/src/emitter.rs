use crate::codec::DocumentCodec;
use crate::config::{EmitterConfig, Target};
use crate::error::{DocumentError, EmitError};
use crate::literal::{escape_line, unescape_literal};
use crate::segment::{segment, Segment};
use crate::target;
use serde::Serialize;
use tracing::{debug, trace};

/// One generated segment procedure.
///
/// `literals` are already escaped for a double-quoted string; every literal
/// except the last line of an unterminated text ends in a `\n` escape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Procedure {
    pub index: usize,
    pub name: String,
    pub literals: Vec<String>,
}

/// Result of a successful emission. Never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    pub target: Target,
    pub driver_name: String,
    pub segments: Vec<Segment>,
    pub procedures: Vec<Procedure>,
    pub source: String,
}

impl GeneratedUnit {
    /// Evaluate the driver in-process: invoke every procedure in ascending
    /// index order against one accumulator and return its content.
    pub fn run_driver(&self) -> Result<String, EmitError> {
        let mut ordered: Vec<&Procedure> = self.procedures.iter().collect();
        ordered.sort_by_key(|p| p.index);

        let mut sb = String::new();
        for procedure in ordered {
            for literal in &procedure.literals {
                sb.push_str(&unescape_literal(literal)?);
            }
        }
        Ok(sb)
    }

    pub fn line_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

#[derive(Debug, Clone)]
pub struct ChunkedEmitter {
    config: EmitterConfig,
}

impl ChunkedEmitter {
    pub fn new(config: EmitterConfig) -> Result<Self, EmitError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn emit(&self, text: &str) -> Result<GeneratedUnit, EmitError> {
        let segments = segment(text, self.config.max_lines_per_segment)?;

        let mut procedures = Vec::with_capacity(segments.len());
        let mut line_number = 0;
        for seg in &segments {
            let mut literals = Vec::with_capacity(seg.len());
            for (offset, line) in seg.lines.iter().enumerate() {
                line_number += 1;
                let mut literal = escape_line(line, line_number)?;
                let last_line = seg.is_final && offset + 1 == seg.len();
                if !last_line || seg.trailing_terminator {
                    literal.push_str("\\n");
                }
                literals.push(literal);
            }

            trace!(index = seg.index, lines = seg.len(), "segment encoded");
            procedures.push(Procedure {
                index: seg.index,
                name: self.config.part_name(seg.index),
                literals,
            });
        }

        let source = target::render(&self.config, &procedures);

        debug!(
            language = %self.config.target,
            segments = segments.len(),
            lines = line_number,
            bytes = source.len(),
            "emitted unit"
        );

        Ok(GeneratedUnit {
            target: self.config.target,
            driver_name: self.config.driver_name().to_string(),
            segments,
            procedures,
            source,
        })
    }

    /// Encode `document` with `codec`, then [`emit`](Self::emit) the text.
    pub fn emit_document<C: DocumentCodec>(
        &self,
        codec: &C,
        document: &C::Document,
    ) -> Result<GeneratedUnit, DocumentError<C::Error>> {
        let text = codec.encode(document).map_err(DocumentError::Serialization)?;
        Ok(self.emit(&text)?)
    }
}

/// Emit `text` with default settings and the given bound.
pub fn emit(text: &str, max_lines_per_segment: usize) -> Result<GeneratedUnit, EmitError> {
    ChunkedEmitter::new(EmitterConfig::default().with_max_lines(max_lines_per_segment))?.emit(text)
}
