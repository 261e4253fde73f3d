// Thu Jan 22 2026 - Alex

use crate::engine::{CancellationToken, SessionError};
use crate::heap::{Heap, HeapObject, HeapSegment, HeapWalker, ObjectRef};
use crate::memory::{Address, Architecture, MemoryError, MemoryRange, MemorySource};
use crate::structure::FieldDescriptor;
use crate::symbol::{TypeFieldResolver, TypeMetadataSource};
use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

const GC_MARK_BIT: u64 = 1;

/// Caches only ever grow while the session is alive.
pub struct AnalysisSession {
    memory: Arc<dyn MemorySource>,
    architecture: Architecture,
    modules: Vec<MemoryRange>,
    heaps: Vec<Heap>,
    resolver: TypeFieldResolver,
    objects: RwLock<AHashMap<Address, ObjectRef>>,
    cancellation: CancellationToken,
}

impl AnalysisSession {
    pub fn new(
        memory: Arc<dyn MemorySource>,
        metadata: Arc<dyn TypeMetadataSource>,
        modules: Vec<MemoryRange>,
        heaps: Vec<Heap>,
    ) -> Result<Self, SessionError> {
        let architecture = memory.architecture()?;
        debug!(
            "Session over {} heap(s), {} module(s), {}",
            heaps.len(),
            modules.len(),
            architecture
        );
        Ok(Self {
            memory,
            architecture,
            modules,
            heaps,
            resolver: TypeFieldResolver::new(metadata),
            objects: RwLock::new(AHashMap::new()),
            cancellation: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn memory(&self) -> &dyn MemorySource {
        self.memory.as_ref()
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn pointer_size(&self) -> u64 {
        self.architecture.pointer_size()
    }

    pub fn min_object_size(&self) -> u64 {
        self.pointer_size() * 3
    }

    pub fn modules(&self) -> &[MemoryRange] {
        &self.modules
    }

    pub fn heaps(&self) -> &[Heap] {
        &self.heaps
    }

    pub fn resolver(&self) -> &TypeFieldResolver {
        &self.resolver
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn is_in_module(&self, address: Address) -> bool {
        self.modules.iter().any(|range| range.contains(address))
    }

    /// The one handle for `address`; every caller sees the same resolved type and size.
    pub fn object(&self, address: Address) -> ObjectRef {
        if let Some(object) = self.objects.read().get(&address) {
            return object.clone();
        }
        self.objects
            .write()
            .entry(address)
            .or_insert_with(|| Arc::new(HeapObject::new(address)))
            .clone()
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    pub fn read_pointer(&self, address: Address) -> Result<Address, MemoryError> {
        self.memory.read_pointer_sized(address, self.pointer_size())
    }

    /// Type pointer in the object header with the GC mark bit cleared.
    pub fn read_type_pointer(&self, object: Address) -> Result<Address, MemoryError> {
        let raw = self.read_pointer(object)?;
        Ok(Address::new(raw.as_u64() & !GC_MARK_BIT))
    }

    pub fn read_object_field(
        &self,
        object: &HeapObject,
        field: &FieldDescriptor,
    ) -> Result<Option<ObjectRef>, MemoryError> {
        let target = self.read_pointer(field.address_in(object.address()))?;
        if target.is_null() {
            return Ok(None);
        }
        Ok(Some(self.object(target)))
    }

    pub fn walk(&self, segment: HeapSegment) -> HeapWalker<'_> {
        HeapWalker::new(self, segment)
    }
}
