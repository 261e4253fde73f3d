// Sun Jan 25 2026 - Alex

pub mod loader;
pub mod manifest;

pub use loader::{RuntimeThread, Snapshot, SnapshotOptions};
pub use manifest::{Manifest, StressLogRecord};
