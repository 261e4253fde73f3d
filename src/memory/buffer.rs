// Tue Jan 20 2026 - Alex

use crate::memory::{Address, Architecture, MemoryError, MemorySource};

#[derive(Debug, Clone)]
pub struct BufferMemory {
    base: Address,
    data: Vec<u8>,
    architecture: Architecture,
}

impl BufferMemory {
    pub fn new(base: Address, size: usize, architecture: Architecture) -> Self {
        Self {
            base,
            data: vec![0u8; size],
            architecture,
        }
    }

    pub fn from_bytes(base: Address, data: Vec<u8>, architecture: Architecture) -> Self {
        Self { base, data, architecture }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn end(&self) -> Address {
        self.base + self.data.len() as u64
    }

    fn offset(&self, addr: Address) -> Option<usize> {
        if addr < self.base || addr >= self.end() {
            return None;
        }
        Some((addr.as_u64() - self.base.as_u64()) as usize)
    }

    pub fn write_bytes(&mut self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let offset = self.offset(addr).ok_or(MemoryError::Unmapped(addr.as_u64()))?;
        if offset + bytes.len() > self.data.len() {
            return Err(MemoryError::ShortRead {
                address: addr.as_u64(),
                requested: bytes.len(),
                read: self.data.len() - offset,
            });
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn write_u16(&mut self, addr: Address, value: u16) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    pub fn write_u32(&mut self, addr: Address, value: u32) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    pub fn write_u64(&mut self, addr: Address, value: u64) -> Result<(), MemoryError> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    pub fn write_pointer(&mut self, addr: Address, value: Address) -> Result<(), MemoryError> {
        if self.architecture.pointer_size() == 4 {
            self.write_u32(addr, value.as_u64() as u32)
        } else {
            self.write_u64(addr, value.as_u64())
        }
    }
}

impl MemorySource for BufferMemory {
    fn read(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        let offset = self.offset(addr).ok_or(MemoryError::Unmapped(addr.as_u64()))?;
        let len = buf.len().min(self.data.len() - offset);
        buf[..len].copy_from_slice(&self.data[offset..offset + len]);
        Ok(len)
    }

    fn architecture(&self) -> Result<Architecture, MemoryError> {
        Ok(self.architecture)
    }
}
