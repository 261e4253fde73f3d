// Mon Jan 19 2026 - Alex

use crate::memory::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open address range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

impl MemoryRange {
    pub fn new(start: Address, end: Address) -> Option<Self> {
        if end.as_u64() < start.as_u64() {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn from_start_size(start: Address, size: u64) -> Option<Self> {
        start.checked_add(size).and_then(|end| Self::new(start, end))
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.is_within_range(self.start, self.end)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.as_u64() < other.end.as_u64() && self.end.as_u64() > other.start.as_u64()
    }

    pub fn is_empty(&self) -> bool {
        self.start.as_u64() >= self.end.as_u64()
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_range_rejected() {
        assert!(MemoryRange::new(Address::new(0x20), Address::new(0x10)).is_none());
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = MemoryRange::from_start_size(Address::new(0x1000), 0x100).unwrap();
        assert!(range.contains(Address::new(0x1000)));
        assert!(range.contains(Address::new(0x10ff)));
        assert!(!range.contains(Address::new(0x1100)));
    }

    #[test]
    fn test_overlap() {
        let a = MemoryRange::from_start_size(Address::new(0x1000), 0x100).unwrap();
        let b = MemoryRange::from_start_size(Address::new(0x10f0), 0x100).unwrap();
        let c = MemoryRange::from_start_size(Address::new(0x1100), 0x100).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
