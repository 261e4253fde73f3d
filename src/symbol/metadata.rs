// Tue Jan 20 2026 - Alex

use crate::memory::{Address, MemoryRange};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeId(pub u64);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Implementations may be slow; the resolver caches every answer, including misses.
pub trait TypeMetadataSource: Send + Sync {
    /// Nearest symbol at or below `address`, with the displacement from it.
    fn symbol_name(&self, address: Address) -> Option<(String, u64)>;

    fn type_id(&self, type_name: &str) -> Option<TypeId>;

    fn field_offset(&self, type_id: TypeId, type_name: &str, field_name: &str) -> Option<u32>;
}

#[derive(Debug, Clone)]
struct TypeEntry {
    id: TypeId,
    fields: IndexMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct ModuleMetadata {
    name: String,
    range: MemoryRange,
    symbols: Vec<(Address, String)>,
    types: IndexMap<String, TypeEntry>,
}

impl ModuleMetadata {
    pub fn new(name: String, range: MemoryRange) -> Self {
        Self {
            name,
            range,
            symbols: Vec::new(),
            types: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn base(&self) -> Address {
        self.range.start()
    }

    pub fn add_symbol(&mut self, name: String, address: Address) {
        let idx = self.symbols.partition_point(|(addr, _)| *addr <= address);
        self.symbols.insert(idx, (address, name));
    }

    pub fn add_type<I>(&mut self, name: String, fields: I)
    where
        I: IntoIterator<Item = (String, u32)>,
    {
        let id = TypeId(self.types.len() as u64 + 1);
        let entry = self.types.entry(name).or_insert_with(|| TypeEntry {
            id,
            fields: IndexMap::new(),
        });
        entry.fields.extend(fields);
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl TypeMetadataSource for ModuleMetadata {
    fn symbol_name(&self, address: Address) -> Option<(String, u64)> {
        let idx = self.symbols.partition_point(|(addr, _)| *addr <= address);
        if idx == 0 {
            return None;
        }
        let (symbol_addr, name) = &self.symbols[idx - 1];
        Some((name.clone(), address.as_u64() - symbol_addr.as_u64()))
    }

    fn type_id(&self, type_name: &str) -> Option<TypeId> {
        self.types.get(type_name).map(|entry| entry.id)
    }

    fn field_offset(&self, type_id: TypeId, type_name: &str, field_name: &str) -> Option<u32> {
        let entry = self.types.get(type_name)?;
        if entry.id != type_id {
            return None;
        }
        entry.fields.get(field_name).copied()
    }
}
