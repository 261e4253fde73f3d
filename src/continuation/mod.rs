// Sat Jan 24 2026 - Alex

pub mod analyzer;
pub mod filter;
pub mod graph;
pub mod record;
pub mod state;
pub mod unwrap;

pub use analyzer::{AsyncAnalyzer, AsyncChain, AsyncEntry, AsyncReport, CandidateSet};
pub use filter::{AsyncFilter, DEFAULT_MIN_ASYNC_OBJECT_SIZE};
pub use graph::ContinuationGraph;
pub use record::{AsyncRecord, ContinuationList};
pub use state::StateFlags;
pub use unwrap::{ContinuationUnwrapper, FieldReader};
