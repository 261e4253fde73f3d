// Tue Jan 27 2026 - Alex

pub mod dumpasync;
pub mod dumpheap;
pub mod dumplog;
pub mod error;
pub mod report;
pub mod threads;
pub mod verifyheap;

pub use dumpasync::DumpAsyncOptions;
pub use dumpheap::{DumpHeap, DumpHeapOptions, DumpHeapReport, ObjectRow};
pub use error::CommandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}
