// Thu Jan 22 2026 - Alex

use crate::engine::AnalysisSession;
use crate::heap::{HeapError, HeapSegment, ObjectRef};
use crate::memory::Address;
use log::{debug, warn};

/// The first object whose size cannot be resolved ends the walk.
pub struct HeapWalker<'a> {
    session: &'a AnalysisSession,
    segment: HeapSegment,
    cursor: Address,
    finished: bool,
}

impl<'a> HeapWalker<'a> {
    pub fn new(session: &'a AnalysisSession, segment: HeapSegment) -> Self {
        debug!("Walking {}", segment);
        Self {
            session,
            segment,
            cursor: segment.start(),
            finished: false,
        }
    }

    pub fn segment(&self) -> &HeapSegment {
        &self.segment
    }

    pub fn cursor(&self) -> Address {
        self.cursor
    }

    fn step(&mut self) -> Result<ObjectRef, HeapError> {
        if self.session.is_cancelled() {
            return Err(HeapError::Cancelled);
        }

        let object = self.session.object(self.cursor);
        let size = object.size_of(self.session)?;
        if size < self.session.min_object_size() {
            return Err(HeapError::DegenerateSize {
                address: self.cursor,
                size,
            });
        }

        let aligned = Address::new(size).align_up(self.session.pointer_size()).as_u64();
        self.cursor = self
            .cursor
            .checked_add(aligned)
            .ok_or(HeapError::DegenerateSize {
                address: self.cursor,
                size,
            })?;
        Ok(object)
    }
}

impl Iterator for HeapWalker<'_> {
    type Item = Result<ObjectRef, HeapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.cursor >= self.segment.end() {
            return None;
        }
        match self.step() {
            Ok(object) => Some(Ok(object)),
            Err(e) => {
                warn!("Heap walk stopped at {:X}: {}", self.cursor, e);
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
