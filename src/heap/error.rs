// Thu Jan 22 2026 - Alex

use crate::memory::{Address, MemoryError};
use crate::symbol::SymbolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeapError {
    #[error("Memory read failed: {0}")]
    Memory(#[from] MemoryError),
    #[error("Cannot resolve type of object at {address:X}: {source}")]
    TypeResolution {
        address: Address,
        #[source]
        source: SymbolError,
    },
    #[error("Object at {address:X} has degenerate size {size}")]
    DegenerateSize { address: Address, size: u64 },
    #[error("Heap walk cancelled")]
    Cancelled,
}
