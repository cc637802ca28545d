use crate::provider::ProviderError;
use std::io;
use std::time::Duration;

/// Errors in vmfleet
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configure: {0}")]
    Config(String),
    #[error("Credentials: {0}")]
    Auth(String),
    #[error("Filesys I/O: {0}")]
    FilesysIO(String),
    #[error("Provider: {0}")]
    Provider(#[from] ProviderError),
    /// The provider reported the operation DONE but attached an error
    /// payload. DONE alone must never be read as success.
    #[error("Operation {name} finished with error: {detail}")]
    Operation { name: String, detail: String },
    #[error("Operation {0} not terminal after {1:?}")]
    PollTimeout(String, Duration),
    #[error("Wait for operation {0} cancelled")]
    Cancelled(String),
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
}
pub type Result<T, E = Error> = std::result::Result<T, E>;
