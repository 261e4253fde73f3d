// Fri Jan 23 2026 - Alex

//! Synthetic heaps for unit tests.

use crate::engine::AnalysisSession;
use crate::heap::{Heap, HeapSegment};
use crate::memory::{Address, Architecture, BufferMemory, MemoryRange};
use crate::symbol::{ModuleMetadata, TypeId, TypeMetadataSource};
use ahash::AHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const MEMORY_BASE: u64 = 0x10_0000;
const MEMORY_SIZE: usize = 0x4_0000;
const MODULE_SIZE: u64 = 0x8000;
const TYPE_STRIDE: u64 = 0x40;
const HEAP_BASE: u64 = 0x11_0000;

/// Metadata provider that counts how often it is asked.
pub struct StaticMetadata {
    module: ModuleMetadata,
    symbol_calls: AtomicUsize,
    type_id_calls: AtomicUsize,
    field_calls: AtomicUsize,
}

impl StaticMetadata {
    pub fn new(module: ModuleMetadata) -> Self {
        Self {
            module,
            symbol_calls: AtomicUsize::new(0),
            type_id_calls: AtomicUsize::new(0),
            field_calls: AtomicUsize::new(0),
        }
    }

    pub fn symbol_calls(&self) -> usize {
        self.symbol_calls.load(Ordering::SeqCst)
    }

    pub fn type_id_calls(&self) -> usize {
        self.type_id_calls.load(Ordering::SeqCst)
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.load(Ordering::SeqCst)
    }
}

impl TypeMetadataSource for StaticMetadata {
    fn symbol_name(&self, address: Address) -> Option<(String, u64)> {
        self.symbol_calls.fetch_add(1, Ordering::SeqCst);
        self.module.symbol_name(address)
    }

    fn type_id(&self, type_name: &str) -> Option<TypeId> {
        self.type_id_calls.fetch_add(1, Ordering::SeqCst);
        self.module.type_id(type_name)
    }

    fn field_offset(&self, type_id: TypeId, type_name: &str, field_name: &str) -> Option<u32> {
        self.field_calls.fetch_add(1, Ordering::SeqCst);
        self.module.field_offset(type_id, type_name, field_name)
    }
}

/// Lays out type descriptors in a fake module and objects in one heap segment.
pub struct HeapBuilder {
    memory: BufferMemory,
    architecture: Architecture,
    module: ModuleMetadata,
    sizes: AHashMap<Address, (u32, u16)>,
    next_type: Address,
    cursor: Address,
}

impl HeapBuilder {
    pub fn new(architecture: Architecture) -> Self {
        let module_range = MemoryRange::from_start_size(Address::new(MEMORY_BASE), MODULE_SIZE)
            .expect("module range");
        Self {
            memory: BufferMemory::new(Address::new(MEMORY_BASE), MEMORY_SIZE, architecture),
            architecture,
            module: ModuleMetadata::new("test".into(), module_range),
            sizes: AHashMap::new(),
            next_type: Address::new(MEMORY_BASE + TYPE_STRIDE),
            cursor: Address::new(HEAP_BASE),
        }
    }

    fn pointer_size(&self) -> u64 {
        self.architecture.pointer_size()
    }

    pub fn add_anonymous_type(&mut self, base_size: u32, element_size: u16) -> Address {
        let address = self.next_type;
        self.next_type = self.next_type + TYPE_STRIDE;
        self.memory.write_u16(address, element_size).expect("type header");
        self.memory.write_u16(address + 2, 0).expect("type header");
        self.memory.write_u32(address + 4, base_size).expect("type header");
        self.sizes.insert(address, (base_size, element_size));
        address
    }

    pub fn add_type(
        &mut self,
        name: &str,
        base_size: u32,
        element_size: u16,
        fields: &[(&str, u32)],
    ) -> Address {
        let address = self.add_anonymous_type(base_size, element_size);
        self.module.add_symbol(name.to_string(), address);
        self.module.add_type(
            name.to_string(),
            fields.iter().map(|(field, offset)| (field.to_string(), *offset)),
        );
        address
    }

    pub fn add_object(&mut self, ty: Address) -> Address {
        self.add_array(ty, 0)
    }

    pub fn add_array(&mut self, ty: Address, count: u32) -> Address {
        let (base_size, element_size) = self.sizes.get(&ty).copied().expect("unknown type");
        let address = self.cursor;
        let ptr = self.pointer_size();
        self.memory.write_pointer(address, ty).expect("object header");
        if element_size != 0 {
            self.memory.write_u32(address + ptr, count).expect("element count");
        }
        let size = base_size as u64 + element_size as u64 * count as u64;
        self.cursor = Address::new(size).align_up(ptr) + address.as_u64();
        address
    }

    pub fn write_pointer(&mut self, address: Address, value: Address) {
        self.memory.write_pointer(address, value).expect("pointer write");
    }

    pub fn write_u32(&mut self, address: Address, value: u32) {
        self.memory.write_u32(address, value).expect("u32 write");
    }

    pub fn set_field(&mut self, object: Address, offset: u32, value: Address) {
        self.write_pointer(object + offset as u64, value);
    }

    pub fn heap_end(&self) -> Address {
        self.cursor
    }

    pub fn build(self) -> HeapFixture {
        let segment = HeapSegment::new(
            MemoryRange::new(Address::new(HEAP_BASE), self.cursor).expect("heap range"),
        );
        HeapFixture {
            memory: Arc::new(self.memory),
            module: *self.module.range(),
            metadata: Arc::new(StaticMetadata::new(self.module)),
            segment,
        }
    }
}

pub struct HeapFixture {
    pub memory: Arc<BufferMemory>,
    pub metadata: Arc<StaticMetadata>,
    pub module: MemoryRange,
    pub segment: HeapSegment,
}

impl HeapFixture {
    pub fn into_session(self) -> AnalysisSession {
        AnalysisSession::new(
            self.memory,
            self.metadata,
            vec![self.module],
            vec![Heap::new(0, vec![self.segment])],
        )
        .expect("session")
    }
}
