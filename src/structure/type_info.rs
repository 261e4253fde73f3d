// Tue Jan 20 2026 - Alex

use crate::memory::Address;
use bytes::Buf;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Size of the fixed header read from a type descriptor in memory.
pub const TYPE_HEADER_SIZE: usize = 8;

/// Header layout: u16 element size, u16 flags, u32 base size.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    address: Address,
    name: String,
    base_size: u32,
    element_size: u16,
    flags: u16,
}

impl TypeDescriptor {
    pub fn new(address: Address, name: String, base_size: u32, element_size: u16) -> Self {
        Self {
            address,
            name,
            base_size,
            element_size,
            flags: 0,
        }
    }

    pub fn from_header(address: Address, name: String, header: &[u8]) -> Option<Self> {
        if header.len() < TYPE_HEADER_SIZE {
            return None;
        }
        let mut buf = header;
        let element_size = buf.get_u16_le();
        let flags = buf.get_u16_le();
        let base_size = buf.get_u32_le();
        Some(Self {
            address,
            name,
            base_size,
            element_size,
            flags,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_size(&self) -> u32 {
        self.base_size
    }

    pub fn element_size(&self) -> u16 {
        self.element_size
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn is_array_like(&self) -> bool {
        self.element_size != 0
    }

    /// `base + element_size * count`, `None` on overflow.
    pub fn instance_size(&self, element_count: u32) -> Option<u64> {
        (self.element_size as u64)
            .checked_mul(element_count as u64)
            .and_then(|elements| elements.checked_add(self.base_size as u64))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:X})", self.name, self.address)
    }
}
