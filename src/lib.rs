// Tue Jan 15 2026 - Alex

pub mod commands;
pub mod config;
pub mod continuation;
pub mod engine;
pub mod heap;
pub mod memory;
pub mod snapshot;
pub mod stresslog;
pub mod structure;
pub mod symbol;
pub mod ui;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use continuation::{AsyncAnalyzer, AsyncFilter, ContinuationGraph};
pub use engine::{AnalysisSession, CancellationToken, SessionError};
pub use heap::{HeapError, HeapObject, HeapStatistics, HeapWalker};
pub use memory::{Address, Architecture, MemorySource};
pub use snapshot::{Snapshot, SnapshotOptions};
pub use symbol::{TypeFieldResolver, TypeMetadataSource};
pub use validation::HeapVerifier;
