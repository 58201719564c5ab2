//! # strata-pipeline
//!
//! Introspectable action pipelines over primitive element streams.
//!
//! Stream steps (filter, map, sorted, distinct, ...) are kept as tagged
//! [`Action`] values instead of being fused into closures right away. A
//! [`Pipeline`] collects them append-only and only composes them when a
//! terminal operation runs, which lets tooling walk the steps and lets the
//! [`optimize`] pass merge adjacent ones first.
//!
//! ## Example
//!
//! ```rust
//! use strata_pipeline::Pipeline;
//!
//! let evens = Pipeline::<i32>::range(0, 10)
//!     .filter(|x| x % 2 == 0)?
//!     .map(|x| x * x)?;
//!
//! assert_eq!(evens.collect_vec()?, vec![0, 4, 16, 36, 64]);
//! assert!(evens.collect_vec().is_err());
//! # Ok::<(), strata_pipeline::PipelineError>(())
//! ```

pub mod action;
pub mod element;
pub mod error;
pub mod optimize;
pub mod pipeline;

pub use action::{Action, ActionInfo, ActionKind, Transform};
pub use element::{Element, ElementType};
pub use error::PipelineError;
pub use optimize::optimize;
pub use pipeline::{Elements, Pipeline};
