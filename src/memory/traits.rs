// Mon Jan 19 2026 - Alex

use crate::memory::{Address, Architecture, MemoryError};
use bytes::Buf;

const MAX_READ_SIZE: usize = 64 * 1024 * 1024;

/// `read` may return fewer bytes than requested; the typed helpers require the full width.
pub trait MemorySource: Send + Sync {
    fn read(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError>;

    fn architecture(&self) -> Result<Architecture, MemoryError>;

    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        if len > MAX_READ_SIZE {
            return Err(MemoryError::RequestTooLarge(len));
        }
        let mut data = vec![0u8; len];
        let read = self.read(addr, &mut data)?;
        if read < len {
            return Err(MemoryError::ShortRead {
                address: addr.as_u64(),
                requested: len,
                read,
            });
        }
        Ok(data)
    }

    fn read_u16(&self, addr: Address) -> Result<u16, MemoryError> {
        let bytes = self.read_bytes(addr, 2)?;
        Ok((&bytes[..]).get_u16_le())
    }

    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError> {
        let bytes = self.read_bytes(addr, 4)?;
        Ok((&bytes[..]).get_u32_le())
    }

    fn read_i32(&self, addr: Address) -> Result<i32, MemoryError> {
        let bytes = self.read_bytes(addr, 4)?;
        Ok((&bytes[..]).get_i32_le())
    }

    fn read_u64(&self, addr: Address) -> Result<u64, MemoryError> {
        let bytes = self.read_bytes(addr, 8)?;
        Ok((&bytes[..]).get_u64_le())
    }

    fn read_pointer_sized(&self, addr: Address, pointer_size: u64) -> Result<Address, MemoryError> {
        let value = if pointer_size == 4 {
            self.read_u32(addr)? as u64
        } else {
            self.read_u64(addr)?
        };
        Ok(Address::new(value))
    }

    fn read_pointer(&self, addr: Address) -> Result<Address, MemoryError> {
        let pointer_size = self.architecture()?.pointer_size();
        self.read_pointer_sized(addr, pointer_size)
    }
}
