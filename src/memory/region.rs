// Mon Jan 19 2026 - Alex

use crate::memory::{Address, MemoryRange};
use std::fmt;

#[derive(Debug, Clone)]
pub struct MemoryRegion {
    range: MemoryRange,
    file_offset: u64,
}

impl MemoryRegion {
    pub fn new(range: MemoryRange, file_offset: u64) -> Self {
        Self { range, file_offset }
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    pub fn start(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }

    /// File offset backing `addr`, if the address falls in this region.
    pub fn file_offset_of(&self, addr: Address) -> Option<u64> {
        if !self.contains(addr) {
            return None;
        }
        Some(self.file_offset + (addr.as_u64() - self.start().as_u64()))
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ file+0x{:x}", self.range, self.file_offset)
    }
}
