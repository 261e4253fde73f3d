// Mon Jan 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Address 0x{0:x} is not mapped in the snapshot")]
    Unmapped(u64),
    #[error("Short read at 0x{address:x}: wanted {requested} bytes, got {read}")]
    ShortRead { address: u64, requested: usize, read: usize },
    #[error("Target architecture could not be classified: {0}")]
    UnknownArchitecture(String),
    #[error("Snapshot format error: {0}")]
    Format(String),
    #[error("Read of {0} bytes exceeds the supported request size")]
    RequestTooLarge(usize),
}

impl MemoryError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unmapped(_) | Self::ShortRead { .. })
    }
}
