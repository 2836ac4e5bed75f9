//! Exit codes for the catalog-sdl CLI.
//!
//! This module defines distinct exit codes for different error types,
//! allowing scripts and CI systems to distinguish between different
//! failure modes.

use catalog_client::ClientError;
use catalog_config::ConfigError;
use catalog_synth::SynthError;

/// Exit codes used by the CLI.
///
/// Success exits with 0; each failure kind has its own non-zero code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Configuration error (missing or invalid config file, bad arguments)
    ConfigError = 2,
    /// Schema error (catalog fetch failed, malformed catalog or definition)
    SchemaError = 3,
    /// I/O error (file read/write failure)
    IoError = 4,
    /// Parse error (invalid GraphQL syntax or JSON input)
    ParseError = 5,
}

/// Raised when an SDL document has syntax errors.
#[derive(Debug)]
pub struct SyntaxErrors(pub usize);

impl std::fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} syntax error(s)", self.0)
    }
}

impl std::error::Error for SyntaxErrors {}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Classifies a command failure by the first recognized error in its chain.
    /// Anything unrecognized is a usage problem and maps to `ConfigError`.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        error
            .chain()
            .find_map(|cause| {
                if cause.is::<ConfigError>() {
                    Some(Self::ConfigError)
                } else if cause.is::<ClientError>() || cause.is::<SynthError>() {
                    Some(Self::SchemaError)
                } else if cause.is::<std::io::Error>() {
                    Some(Self::IoError)
                } else if cause.is::<SyntaxErrors>() || cause.is::<serde_json::Error>() {
                    Some(Self::ParseError)
                } else {
                    None
                }
            })
            .unwrap_or(Self::ConfigError)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
            Self::IoError => write!(f, "I/O error"),
            Self::ParseError => write!(f, "parse error"),
        }
    }
}
