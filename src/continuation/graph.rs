// Sat Jan 24 2026 - Alex

use crate::continuation::unwrap::{ContinuationUnwrapper, FieldReader};
use crate::continuation::{AsyncFilter, AsyncRecord, ContinuationList, StateFlags};
use crate::engine::AnalysisSession;
use crate::heap::{HeapObject, ObjectRef};
use crate::memory::{Address, MemoryError};
use crate::structure::ObjectShape;
use ahash::{AHashMap, AHashSet};
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Arc;

pub const STATE_FLAGS_FIELD: &str = "m_stateFlags";
pub const CONTINUATION_FIELD: &str = "m_continuationObject";
pub const LIST_ITEMS_FIELD: &str = "_items";

/// Continuation edges between async objects, resolved lazily and memoized per object.
pub struct ContinuationGraph<'a> {
    session: &'a AnalysisSession,
    filter: AsyncFilter,
    reader: FieldReader<'a>,
    unwrapper: ContinuationUnwrapper<'a>,
    records: RwLock<AHashMap<Address, Arc<AsyncRecord>>>,
}

impl<'a> ContinuationGraph<'a> {
    pub fn new(session: &'a AnalysisSession, filter: AsyncFilter) -> Self {
        Self {
            session,
            filter,
            reader: FieldReader::new(session),
            unwrapper: ContinuationUnwrapper::new(session),
            records: RwLock::new(AHashMap::new()),
        }
    }

    pub fn session(&self) -> &'a AnalysisSession {
        self.session
    }

    pub fn filter(&self) -> &AsyncFilter {
        &self.filter
    }

    pub fn record(&self, object: &HeapObject) -> Arc<AsyncRecord> {
        if let Some(record) = self.records.read().get(&object.address()) {
            return record.clone();
        }
        let include = self.matches(object);
        self.records
            .write()
            .entry(object.address())
            .or_insert_with(|| Arc::new(AsyncRecord::new(include)))
            .clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.read().len()
    }

    /// `None` when the object has a state field that cannot be read.
    pub fn state_of(&self, object: &HeapObject) -> Option<i32> {
        self.record(object).state_or_init(|| match self.parse_state(object) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("Cannot read state of object at {:X}: {}", object.address(), e);
                None
            }
        })
    }

    pub fn flags_of(&self, object: &HeapObject) -> Option<StateFlags> {
        self.state_of(object).map(StateFlags::decode)
    }

    pub fn is_completed(&self, object: &HeapObject) -> Option<bool> {
        self.flags_of(object).map(StateFlags::is_completed)
    }

    pub fn continuations_of(&self, object: &HeapObject) -> Vec<ObjectRef> {
        let record = self.record(object);
        record
            .continuations_or_init(|| self.parse_continuations(object))
            .items
            .clone()
    }

    pub fn truncated_count(&self) -> usize {
        self.records
            .read()
            .values()
            .filter(|record| record.continuations_truncated())
            .count()
    }

    /// Objects without a state field read as state 0.
    fn parse_state(&self, object: &HeapObject) -> Result<i32, MemoryError> {
        match self.reader.field(object, STATE_FLAGS_FIELD) {
            Some(field) => self.session.memory().read_i32(field.address_in(object.address())),
            None => Ok(0),
        }
    }

    fn parse_continuations(&self, object: &HeapObject) -> ContinuationList {
        let mut list = if self.reader.shape(object).is_list() {
            self.list_items(object)
        } else {
            ContinuationList {
                items: self
                    .reader
                    .follow_named(object, CONTINUATION_FIELD)
                    .into_iter()
                    .collect(),
                truncated: false,
            }
        };
        list.items = list
            .items
            .into_iter()
            .map(|continuation| self.unwrapper.resolve(continuation))
            .collect();
        list
    }

    /// Non-null slots of a list's backing array, up to the first unreadable one.
    fn list_items(&self, list: &HeapObject) -> ContinuationList {
        let mut result = ContinuationList::default();
        let Some(array) = self.reader.follow_named(list, LIST_ITEMS_FIELD) else {
            return result;
        };
        let length = match array.element_count_of(self.session) {
            Ok(length) => length as u64,
            Err(e) => {
                warn!("Cannot size list backing array at {:X}: {}", array.address(), e);
                result.truncated = true;
                return result;
            }
        };

        let pointer_size = self.session.pointer_size();
        let data = array.address() + pointer_size * 2;
        for i in 0..length {
            match self.session.read_pointer(data + i * pointer_size) {
                Ok(slot) if slot.is_null() => {}
                Ok(slot) => result.items.push(self.session.object(slot)),
                Err(e) => {
                    warn!("List element {} at {:X} unreadable: {}", i, array.address(), e);
                    result.truncated = true;
                    break;
                }
            }
        }
        result
    }

    /// Depth-first. Each address is reported once, so cycles terminate.
    pub fn walk_continuations<F>(&self, root: &HeapObject, mut callback: F)
    where
        F: FnMut(&ObjectRef, usize),
    {
        let mut stack: Vec<(usize, ObjectRef)> = self
            .continuations_of(root)
            .into_iter()
            .map(|continuation| (1, continuation))
            .collect();
        let mut seen: AHashSet<Address> = AHashSet::new();

        while let Some((depth, node)) = stack.pop() {
            if !seen.insert(node.address()) {
                continue;
            }
            stack.extend(
                self.continuations_of(&node)
                    .into_iter()
                    .map(|continuation| (depth + 1, continuation)),
            );
            callback(&node, depth);
        }
    }

    /// Returns the number of candidates still top-level.
    pub fn classify_top_level(&self, candidates: &[ObjectRef]) -> usize {
        let members: AHashSet<Address> = candidates.iter().map(|c| c.address()).collect();
        let mut chains = candidates.len();

        for candidate in candidates {
            self.walk_continuations(candidate, |node, _| {
                if node.address() == candidate.address() || !members.contains(&node.address()) {
                    return;
                }
                if self.record(node).clear_top_level() {
                    chains -= 1;
                }
            });
        }
        debug!("{} candidates form {} chains", candidates.len(), chains);
        chains
    }

    pub fn is_async_type(&self, object: &HeapObject) -> bool {
        match self.reader.shape(object) {
            ObjectShape::StateMachineBox => true,
            _ => self.filter.tasks && self.is_task_type(object),
        }
    }

    fn is_task_type(&self, object: &HeapObject) -> bool {
        self.reader.shape(object) == ObjectShape::Task
            || (self.filter.user_defined && self.has_task_members(object))
    }

    /// No base-class information is available, so a type carrying both task fields is taken as one.
    fn has_task_members(&self, object: &HeapObject) -> bool {
        [STATE_FLAGS_FIELD, CONTINUATION_FIELD]
            .iter()
            .all(|field| self.reader.field(object, field).is_some())
    }

    pub fn matches(&self, object: &HeapObject) -> bool {
        if let Some(address) = self.filter.address {
            return object.address() == address;
        }
        if !self.is_async_type(object) {
            return false;
        }
        match object.type_of(self.session) {
            Ok(ty) => self.filter.type_matches(ty.name()),
            Err(_) => !self.filter.has_type_filter(),
        }
    }
}
