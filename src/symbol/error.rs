// Tue Jan 20 2026 - Alex

use crate::memory::MemoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolError {
    #[error("Type not found: {0}")]
    TypeNotFound(String),
    #[error("Field {field} not found on type {type_name}")]
    FieldNotFound { type_name: String, field: String },
    #[error("No metadata loaded for module at {0}")]
    NoMetadata(String),
    #[error("Type descriptor unreadable: {0}")]
    Memory(#[from] MemoryError),
}

impl SymbolError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TypeNotFound(_) | Self::FieldNotFound { .. })
    }
}
