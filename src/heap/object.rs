// Thu Jan 22 2026 - Alex

use crate::engine::AnalysisSession;
use crate::heap::HeapError;
use crate::memory::Address;
use crate::structure::TypeDescriptor;
use once_cell::sync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub type ObjectRef = Arc<HeapObject>;

#[derive(Debug, Clone)]
pub struct ObjectLayout {
    pub type_descriptor: Arc<TypeDescriptor>,
    pub element_count: u32,
    pub size: u64,
}

/// Address-keyed handle to a heap object.
pub struct HeapObject {
    address: Address,
    layout: OnceCell<ObjectLayout>,
}

impl HeapObject {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            layout: OnceCell::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn cached_layout(&self) -> Option<&ObjectLayout> {
        self.layout.get()
    }

    pub fn layout(&self, session: &AnalysisSession) -> Result<&ObjectLayout, HeapError> {
        self.layout.get_or_try_init(|| self.resolve(session))
    }

    pub fn type_of(&self, session: &AnalysisSession) -> Result<Arc<TypeDescriptor>, HeapError> {
        Ok(self.layout(session)?.type_descriptor.clone())
    }

    pub fn size_of(&self, session: &AnalysisSession) -> Result<u64, HeapError> {
        Ok(self.layout(session)?.size)
    }

    pub fn element_count_of(&self, session: &AnalysisSession) -> Result<u32, HeapError> {
        Ok(self.layout(session)?.element_count)
    }

    fn resolve(&self, session: &AnalysisSession) -> Result<ObjectLayout, HeapError> {
        let type_address = session.read_type_pointer(self.address)?;
        let type_descriptor = session
            .resolver()
            .describe(session.memory(), type_address)
            .map_err(|source| HeapError::TypeResolution {
                address: self.address,
                source,
            })?;

        let element_count = if type_descriptor.is_array_like() {
            session
                .memory()
                .read_u32(self.address + session.pointer_size())?
        } else {
            0
        };

        let size = type_descriptor
            .instance_size(element_count)
            .ok_or(HeapError::DegenerateSize {
                address: self.address,
                size: u64::MAX,
            })?;

        Ok(ObjectLayout {
            type_descriptor,
            element_count,
            size,
        })
    }
}

impl PartialEq for HeapObject {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for HeapObject {}

impl Hash for HeapObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Debug for HeapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layout.get() {
            Some(layout) => write!(
                f,
                "HeapObject({:X}, {}, {} bytes)",
                self.address,
                layout.type_descriptor.name(),
                layout.size
            ),
            None => write!(f, "HeapObject({:X})", self.address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Architecture;
    use crate::utils::testing::HeapBuilder;

    #[test]
    fn test_array_size_uses_element_count() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let array = builder.add_type("Int32[]", 24, 4, &[]);
        let obj = builder.add_array(array, 10);
        let session = builder.build().into_session();

        let handle = session.object(obj);
        assert_eq!(handle.element_count_of(&session).unwrap(), 10);
        assert_eq!(handle.size_of(&session).unwrap(), 24 + 40);
        assert_eq!(handle.type_of(&session).unwrap().name(), "Int32[]");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type("Sample", 32, 0, &[]);
        let obj = builder.add_object(ty);
        let fixture = builder.build();
        let metadata = fixture.metadata.clone();
        let session = fixture.into_session();

        let first = session.object(obj);
        let second = session.object(obj);
        assert_eq!(first.size_of(&session).unwrap(), 32);
        assert_eq!(second.size_of(&session).unwrap(), 32);
        assert!(second.cached_layout().is_some());
        assert_eq!(metadata.symbol_calls(), 1);
    }

    #[test]
    fn test_unreadable_type_fails() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type("Sample", 32, 0, &[]);
        let obj = builder.add_object(ty);
        builder.write_pointer(obj, Address::new(0xdead_0000));
        let session = builder.build().into_session();

        let err = session.object(obj).size_of(&session).unwrap_err();
        assert!(matches!(err, HeapError::TypeResolution { .. }));
    }

    #[test]
    fn test_identity_by_address() {
        assert_eq!(HeapObject::new(Address::new(0x10)), HeapObject::new(Address::new(0x10)));
        assert_ne!(HeapObject::new(Address::new(0x10)), HeapObject::new(Address::new(0x18)));
    }
}
