// Tue Jan 20 2026 - Alex

use crate::memory::Address;
use crate::structure::Offset;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    owner: Address,
    name: String,
    offset: Offset,
}

impl FieldDescriptor {
    pub fn new(owner: Address, name: String, offset: Offset) -> Self {
        Self { owner, name, offset }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Address of this field inside the object at `object`.
    pub fn address_in(&self, object: Address) -> Address {
        object + self.offset.as_u64()
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.name, self.offset)
    }
}
