// Thu Jan 22 2026 - Alex

use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no Native AOT runtime detected.")]
    NoRuntimeDetected,
    #[error("Unknown architecture: {0}")]
    UnknownArchitecture(String),
    #[error("Invalid snapshot manifest: {0}")]
    Manifest(String),
    #[error("Memory error: {0}")]
    Memory(MemoryError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<MemoryError> for SessionError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::UnknownArchitecture(name) => Self::UnknownArchitecture(name),
            other => Self::Memory(other),
        }
    }
}

impl SessionError {
    pub fn is_latching(&self) -> bool {
        matches!(self, Self::NoRuntimeDetected | Self::UnknownArchitecture(_))
    }
}
