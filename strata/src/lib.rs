//! # Strata
//!
//! Typed action pipelines and line-bounded metadata code generation.
//!
//! ## Features
//!
//! - **`pipeline`** (default) - Append-only action pipelines fused at termination
//! - **`codegen`** (default) - Chunked emitter turning documents into generated sources
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! strata = "0.1"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let evens = Pipeline::<i32>::range(0, 10).filter(|x| x % 2 == 0)?;
//! assert_eq!(evens.collect_vec()?, vec![0, 2, 4, 6, 8]);
//!
//! let unit = emit("first\nsecond\nthird", 2)?;
//! assert_eq!(unit.procedures.len(), 2);
//! assert_eq!(unit.run_driver()?, "first\nsecond\nthird");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "pipeline")]
pub use strata_pipeline as pipeline;

#[cfg(feature = "codegen")]
pub use strata_codegen as codegen;

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(feature = "pipeline")]
    pub use strata_pipeline::{Action, ActionInfo, ActionKind, ElementType, Pipeline, PipelineError};

    #[cfg(feature = "codegen")]
    pub use strata_codegen::{
        emit, loader, ChunkedEmitter, Document, DocumentCodec, DocumentError, EmitError,
        EmitterConfig, GeneratedUnit, JsonCodec, Target,
    };
}
