// Mon Jan 19 2026 - Alex

pub mod address;
pub mod architecture;
pub mod buffer;
pub mod cache;
pub mod error;
pub mod mmap;
pub mod range;
pub mod region;
pub mod traits;

pub use address::Address;
pub use architecture::Architecture;
pub use buffer::BufferMemory;
pub use cache::MemoryCache;
pub use error::MemoryError;
pub use mmap::MappedMemory;
pub use range::MemoryRange;
pub use region::MemoryRegion;
pub use traits::MemorySource;
