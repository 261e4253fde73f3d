// Sat Jan 24 2026 - Alex

use crate::heap::ObjectRef;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// `truncated` marks a list whose backing array could not be read to the end.
#[derive(Debug, Clone, Default)]
pub struct ContinuationList {
    pub items: Vec<ObjectRef>,
    pub truncated: bool,
}

/// A `None` state means the state field exists but its memory is unreadable.
#[derive(Debug)]
pub struct AsyncRecord {
    state: OnceCell<Option<i32>>,
    continuations: OnceCell<ContinuationList>,
    is_top_level: AtomicBool,
    include_in_report: AtomicBool,
}

impl AsyncRecord {
    pub fn new(include_in_report: bool) -> Self {
        Self {
            state: OnceCell::new(),
            continuations: OnceCell::new(),
            is_top_level: AtomicBool::new(true),
            include_in_report: AtomicBool::new(include_in_report),
        }
    }

    pub fn state_or_init<F: FnOnce() -> Option<i32>>(&self, parse: F) -> Option<i32> {
        *self.state.get_or_init(parse)
    }

    pub fn continuations_or_init<F>(&self, parse: F) -> &ContinuationList
    where
        F: FnOnce() -> ContinuationList,
    {
        self.continuations.get_or_init(parse)
    }

    pub fn state_unreadable(&self) -> bool {
        matches!(self.state.get(), Some(None))
    }

    pub fn continuations_truncated(&self) -> bool {
        self.continuations.get().map_or(false, |list| list.truncated)
    }

    pub fn is_top_level(&self) -> bool {
        self.is_top_level.load(Ordering::SeqCst)
    }

    /// Returns true only for the call that flipped the flag.
    pub fn clear_top_level(&self) -> bool {
        self.is_top_level.swap(false, Ordering::SeqCst)
    }

    pub fn include_in_report(&self) -> bool {
        self.include_in_report.load(Ordering::SeqCst)
    }

    pub fn set_include_in_report(&self, include: bool) {
        self.include_in_report.store(include, Ordering::SeqCst);
    }
}
