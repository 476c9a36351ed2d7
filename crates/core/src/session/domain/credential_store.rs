use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("credential must not be empty")]
    Empty,
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write credential to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the vision engine's API key lives.
///
/// `load` is called on every classification so that a newly selected key
/// takes effect on the very next request.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<String>;

    fn save(&self, key: &str) -> Result<(), CredentialError>;
}
