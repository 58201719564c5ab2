//! # strata-codegen
//!
//! Turns a serialized project document into generated source that rebuilds
//! the text at runtime, without any single generated procedure exceeding a
//! line bound.
//!
//! - **Segmenting** - pure split of text into line-bounded [`Segment`]s
//! - **Literal encoding** - double-quoted literals valid in Rust and TypeScript
//! - **Emission** - one procedure per segment plus a driver, per [`Target`]
//! - **Loading** - run the driver in-process and decode the document again
//!
//! ## Example
//!
//! ```rust
//! use strata_codegen::{loader, ChunkedEmitter, Document, EmitterConfig, JsonCodec};
//!
//! let document = Document::named("shop").with_child("schemas", Document::named("public"));
//! let codec = JsonCodec::new();
//!
//! let emitter = ChunkedEmitter::new(EmitterConfig::default().with_max_lines(4))?;
//! let unit = emitter.emit_document(&codec, &document)?;
//! assert!(unit.source.contains("fn init_part0(sb: &mut String)"));
//!
//! assert_eq!(loader::load(&codec, &unit)?, document);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod emitter;
pub mod error;
pub mod literal;
pub mod loader;
pub mod segment;
pub mod target;

pub use codec::{DocumentCodec, JsonCodec};
pub use config::{EmitterConfig, Target};
pub use document::Document;
pub use emitter::{emit, ChunkedEmitter, GeneratedUnit, Procedure};
pub use error::{DocumentError, EmitError};
pub use literal::{escape_literal, unescape_literal};
pub use segment::{reassemble, segment, Segment, DEFAULT_MAX_LINES_PER_SEGMENT};
