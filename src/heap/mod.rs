// Thu Jan 22 2026 - Alex

pub mod error;
pub mod object;
pub mod segment;
pub mod stats;
pub mod walker;

pub use error::HeapError;
pub use object::{HeapObject, ObjectLayout, ObjectRef};
pub use segment::{Heap, HeapSegment};
pub use stats::{HeapStatistics, TypeStatistics};
pub use walker::HeapWalker;
