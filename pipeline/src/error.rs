use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Pipeline already consumed by a terminal operation")]
    AlreadyConsumed,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
