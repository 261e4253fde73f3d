// Tue Jan 20 2026 - Alex

use crate::memory::Address;
use crate::structure::{FieldDescriptor, ObjectShape, TypeDescriptor};
use crate::symbol::TypeId;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Append-only. Misses are cached too, so an absent type or field costs one query.
pub struct ResolutionCache {
    descriptors: RwLock<AHashMap<Address, Arc<TypeDescriptor>>>,
    type_ids: RwLock<AHashMap<String, Option<TypeId>>>,
    fields: RwLock<AHashMap<(Address, String), Option<FieldDescriptor>>>,
    shapes: RwLock<AHashMap<Address, ObjectShape>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self {
            descriptors: RwLock::new(AHashMap::new()),
            type_ids: RwLock::new(AHashMap::new()),
            fields: RwLock::new(AHashMap::new()),
            shapes: RwLock::new(AHashMap::new()),
        }
    }

    pub fn descriptor(&self, address: Address) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.read().get(&address).cloned()
    }

    pub fn insert_descriptor(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let mut descriptors = self.descriptors.write();
        descriptors
            .entry(descriptor.address())
            .or_insert_with(|| Arc::new(descriptor))
            .clone()
    }

    pub fn type_id(&self, name: &str) -> Option<Option<TypeId>> {
        self.type_ids.read().get(name).copied()
    }

    pub fn insert_type_id(&self, name: &str, id: Option<TypeId>) -> Option<TypeId> {
        *self.type_ids.write().entry(name.to_string()).or_insert(id)
    }

    pub fn field(&self, owner: Address, name: &str) -> Option<Option<FieldDescriptor>> {
        self.fields.read().get(&(owner, name.to_string())).cloned()
    }

    pub fn insert_field(
        &self,
        owner: Address,
        name: &str,
        field: Option<FieldDescriptor>,
    ) -> Option<FieldDescriptor> {
        self.fields
            .write()
            .entry((owner, name.to_string()))
            .or_insert(field)
            .clone()
    }

    pub fn shape(&self, owner: Address) -> Option<ObjectShape> {
        self.shapes.read().get(&owner).copied()
    }

    pub fn insert_shape(&self, owner: Address, shape: ObjectShape) -> ObjectShape {
        *self.shapes.write().entry(owner).or_insert(shape)
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.read().len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
