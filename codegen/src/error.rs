use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Cannot encode {character:?} as a literal (line {line}, column {column})")]
    EncodingFailure {
        line: usize,
        column: usize,
        character: char,
    },

    #[error("Malformed literal at byte {position}: {reason}")]
    MalformedLiteral { position: usize, reason: String },
}

/// Failure of a step that goes through a [`crate::DocumentCodec`].
///
/// Codec errors are carried as-is; the emitter has no context to add to them.
#[derive(Error, Debug)]
pub enum DocumentError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Serialization(E),

    #[error(transparent)]
    Emit(#[from] EmitError),
}
