// Tue Jan 20 2026 - Alex

use crate::memory::{Address, MemorySource};
use crate::structure::{FieldDescriptor, ObjectShape, Offset, TypeDescriptor, TYPE_HEADER_SIZE};
use crate::symbol::{ResolutionCache, SymbolError, TypeId, TypeMetadataSource};
use log::debug;
use std::sync::Arc;

/// Resolves type descriptors, field offsets and object shapes, memoizing every answer.
pub struct TypeFieldResolver {
    metadata: Arc<dyn TypeMetadataSource>,
    cache: ResolutionCache,
}

impl TypeFieldResolver {
    pub fn new(metadata: Arc<dyn TypeMetadataSource>) -> Self {
        Self {
            metadata,
            cache: ResolutionCache::new(),
        }
    }

    pub fn metadata(&self) -> &Arc<dyn TypeMetadataSource> {
        &self.metadata
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn describe(
        &self,
        memory: &dyn MemorySource,
        type_address: Address,
    ) -> Result<Arc<TypeDescriptor>, SymbolError> {
        if let Some(descriptor) = self.cache.descriptor(type_address) {
            return Ok(descriptor);
        }

        let header = memory.read_bytes(type_address, TYPE_HEADER_SIZE)?;
        let name = self.type_name(type_address);
        debug!("Resolved type {} at {:X}", name, type_address);

        // read_bytes returned the full header, so decoding cannot come up short.
        let descriptor = TypeDescriptor::from_header(type_address, name.clone(), &header)
            .ok_or(SymbolError::TypeNotFound(name))?;
        Ok(self.cache.insert_descriptor(descriptor))
    }

    fn type_name(&self, type_address: Address) -> String {
        match self.metadata.symbol_name(type_address) {
            Some((name, 0)) => name,
            _ => format!("Unknown_{:X}", type_address),
        }
    }

    pub fn resolve_type(&self, type_name: &str) -> Result<TypeId, SymbolError> {
        let id = match self.cache.type_id(type_name) {
            Some(id) => id,
            None => {
                let id = self.metadata.type_id(type_name);
                self.cache.insert_type_id(type_name, id)
            }
        };
        id.ok_or_else(|| SymbolError::TypeNotFound(type_name.to_string()))
    }

    pub fn resolve_field(
        &self,
        ty: &TypeDescriptor,
        field_name: &str,
    ) -> Result<FieldDescriptor, SymbolError> {
        let field = match self.cache.field(ty.address(), field_name) {
            Some(field) => field,
            None => {
                let offset = self
                    .resolve_type(ty.name())
                    .ok()
                    .and_then(|id| self.metadata.field_offset(id, ty.name(), field_name));
                if offset.is_none() {
                    debug!("Field {} absent on {}", field_name, ty.name());
                }
                let field = offset.map(|offset| {
                    FieldDescriptor::new(ty.address(), field_name.to_string(), Offset::from(offset))
                });
                self.cache.insert_field(ty.address(), field_name, field)
            }
        };

        field.ok_or_else(|| SymbolError::FieldNotFound {
            type_name: ty.name().to_string(),
            field: field_name.to_string(),
        })
    }

    /// Like [`resolve_field`](Self::resolve_field) for call sites where absence is an answer.
    pub fn find_field(&self, ty: &TypeDescriptor, field_name: &str) -> Option<FieldDescriptor> {
        self.resolve_field(ty, field_name).ok()
    }

    pub fn has_field(&self, ty: &TypeDescriptor, field_name: &str) -> bool {
        self.find_field(ty, field_name).is_some()
    }

    pub fn shape_of(&self, ty: &TypeDescriptor) -> ObjectShape {
        match self.cache.shape(ty.address()) {
            Some(shape) => shape,
            None => self
                .cache
                .insert_shape(ty.address(), ObjectShape::classify(ty.name())),
        }
    }
}
