// Thu Jan 22 2026 - Alex

use crate::memory::{Address, MemoryRange};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeapSegment {
    range: MemoryRange,
}

impl HeapSegment {
    pub fn new(range: MemoryRange) -> Self {
        Self { range }
    }

    pub fn start(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn contains(&self, address: Address) -> bool {
        self.range.contains(address)
    }
}

impl fmt::Display for HeapSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}", self.range)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Heap {
    index: usize,
    segments: Vec<HeapSegment>,
}

impl Heap {
    /// Segments are kept in address order.
    pub fn new(index: usize, mut segments: Vec<HeapSegment>) -> Self {
        segments.sort_by_key(|segment| segment.start());
        Self { index, segments }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn segments(&self) -> &[HeapSegment] {
        &self.segments
    }

    pub fn segment_of(&self, address: Address) -> Option<&HeapSegment> {
        self.segments.iter().find(|segment| segment.contains(address))
    }
}
