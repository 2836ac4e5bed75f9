use crate::TypeKind;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors that abort a synthesis pass. No SDL is produced when one of these is returned.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("Malformed {kind} definition for {name}: {message}")]
    MalformedDefinition {
        kind: TypeKind,
        name: String,
        message: String,
    },
}

/// Errors a [`TypeResolver`](crate::TypeResolver) may report for a single lookup.
///
/// These never escape a pass: the compilers recover from them with a placeholder
/// scalar or by dropping the type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Type not found: {0}")]
    NotFound(String),

    #[error("Failed to parse type definition: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}
