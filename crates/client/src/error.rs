use catalog_synth::ResolveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid response: {0}")]
    Invalid(String),
}

impl From<ClientError> for ResolveError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Network(message) => Self::Network(message),
            ClientError::Http(status, body) => Self::Http(status, body),
            ClientError::Parse(message) | ClientError::Invalid(message) => Self::Parse(message),
        }
    }
}
