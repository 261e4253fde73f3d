// Fri Jan 23 2026 - Alex

use crate::engine::AnalysisSession;
use crate::heap::{Heap, HeapError, HeapSegment, ObjectRef};
use crate::memory::Address;
use crate::structure::{TypeDescriptor, TYPE_HEADER_SIZE};
use crate::utils::logging::ScopedTimer;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    UnreadableHeader,
    TypeOutsideModules(Address),
    UnreadableType(Address),
    DegenerateSize(u64),
    ExceedsSegment(u64),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableHeader => write!(f, "header unreadable"),
            Self::TypeOutsideModules(ty) => write!(f, "type pointer 0x{:X} outside loaded modules", ty),
            Self::UnreadableType(ty) => write!(f, "type descriptor at 0x{:X} unreadable", ty),
            Self::DegenerateSize(size) => write!(f, "degenerate size 0x{:X}", size),
            Self::ExceedsSegment(size) => write!(f, "size 0x{:X} exceeds segment", size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastGoodObject {
    pub address: Address,
    pub type_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationFailure {
    pub address: Address,
    pub reason: FailureReason,
    pub last_good: Option<LastGoodObject>,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object at address 0x{:X} is not a valid object", self.address)?;
        if let Some(last) = &self.last_good {
            write!(f, " Last good object address 0x{:X} type {}", last.address, last.type_name)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub heaps: usize,
    pub objects: u64,
    pub failures: Vec<VerificationFailure>,
}

impl VerifyReport {
    pub fn merge(mut self, other: VerifyReport) -> Self {
        self.heaps += other.heaps;
        self.objects += other.objects;
        self.failures.extend(other.failures);
        self
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("Found {} heap(s) with {} objects.", self.heaps, self.objects)
    }
}

/// After a bad object, scans forward one word at a time for the next valid header.
pub struct HeapVerifier<'a> {
    session: &'a AnalysisSession,
}

impl<'a> HeapVerifier<'a> {
    pub fn new(session: &'a AnalysisSession) -> Self {
        Self { session }
    }

    pub fn verify_all(&self, parallel: bool) -> Result<VerifyReport, HeapError> {
        let _timer = ScopedTimer::new("verifying heap");
        let heaps = self.session.heaps();
        if parallel {
            heaps
                .par_iter()
                .map(|heap| self.verify_heap(heap))
                .try_reduce(VerifyReport::default, |a, b| Ok(a.merge(b)))
        } else {
            heaps.iter().try_fold(VerifyReport::default(), |acc, heap| {
                Ok(acc.merge(self.verify_heap(heap)?))
            })
        }
    }

    pub fn verify_heap(&self, heap: &Heap) -> Result<VerifyReport, HeapError> {
        let mut report = VerifyReport {
            heaps: 1,
            ..Default::default()
        };
        // Tracked per heap, across segment boundaries.
        let mut last_good: Option<LastGoodObject> = None;
        for segment in heap.segments() {
            self.verify_segment(segment, &mut report, &mut last_good)?;
        }
        debug!(
            "Heap {}: {} objects, {} failures",
            heap.index(),
            report.objects,
            report.failures.len()
        );
        Ok(report)
    }

    fn verify_segment(
        &self,
        segment: &HeapSegment,
        report: &mut VerifyReport,
        last_good: &mut Option<LastGoodObject>,
    ) -> Result<(), HeapError> {
        let pointer_size = self.session.pointer_size();
        let mut cursor = segment.start();

        while cursor < segment.end() {
            if self.session.is_cancelled() {
                return Err(HeapError::Cancelled);
            }

            match self.check(cursor, segment) {
                Ok((object, size)) => {
                    report.objects += 1;
                    *last_good = object.type_of(self.session).ok().map(|ty| LastGoodObject {
                        address: cursor,
                        type_name: ty.name().to_string(),
                    });
                    cursor = cursor + Address::new(size).align_up(pointer_size).as_u64();
                }
                Err(reason) => {
                    report.objects += 1;
                    warn!("Invalid object at {:X}: {}", cursor, reason);
                    report.failures.push(VerificationFailure {
                        address: cursor,
                        reason,
                        last_good: last_good.clone(),
                    });
                    match self.resync(cursor + pointer_size, segment) {
                        Some(next) => cursor = next,
                        None => break,
                    }
                }
            }
        }
        Ok(())
    }

    /// The session only learns about the object once every check passes.
    pub fn check(&self, address: Address, segment: &HeapSegment) -> Result<(ObjectRef, u64), FailureReason> {
        let type_address = self
            .session
            .read_type_pointer(address)
            .map_err(|_| FailureReason::UnreadableHeader)?;
        if type_address.is_null() || !self.session.is_in_module(type_address) {
            return Err(FailureReason::TypeOutsideModules(type_address));
        }

        let size = self.raw_size(address, type_address)?;
        if size < self.session.min_object_size() {
            return Err(FailureReason::DegenerateSize(size));
        }
        let fits = address
            .checked_add(size)
            .map(|end| end <= segment.end())
            .unwrap_or(false);
        if !fits {
            return Err(FailureReason::ExceedsSegment(size));
        }
        Ok((self.session.object(address), size))
    }

    fn raw_size(&self, address: Address, type_address: Address) -> Result<u64, FailureReason> {
        let memory = self.session.memory();
        let header = memory
            .read_bytes(type_address, TYPE_HEADER_SIZE)
            .map_err(|_| FailureReason::UnreadableType(type_address))?;
        let descriptor = TypeDescriptor::from_header(type_address, String::new(), &header)
            .ok_or(FailureReason::UnreadableType(type_address))?;

        let element_count = if descriptor.is_array_like() {
            memory
                .read_u32(address + self.session.pointer_size())
                .map_err(|_| FailureReason::UnreadableHeader)?
        } else {
            0
        };
        descriptor
            .instance_size(element_count)
            .ok_or(FailureReason::DegenerateSize(u64::MAX))
    }

    fn resync(&self, from: Address, segment: &HeapSegment) -> Option<Address> {
        let pointer_size = self.session.pointer_size();
        let mut cursor = from.align_up(pointer_size);
        while cursor < segment.end() {
            if self.check(cursor, segment).is_ok() {
                debug!("Resynchronized at {:X}", cursor);
                return Some(cursor);
            }
            cursor = cursor + pointer_size;
        }
        None
    }
}
