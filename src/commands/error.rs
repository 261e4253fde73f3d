// Tue Jan 27 2026 - Alex

use crate::engine::SessionError;
use crate::heap::HeapError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Heap walk failed: {0}")]
    Heap(#[from] HeapError),
    #[error("Output failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Heap(HeapError::Cancelled))
    }
}
