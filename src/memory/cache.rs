// Tue Jan 20 2026 - Alex

use crate::memory::{Address, Architecture, MemoryError, MemorySource};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Block cache in front of a slow memory source.
/// Blocks are only ever added, and blocks that cannot be read in full are never cached.
pub struct MemoryCache {
    cache: RwLock<AHashMap<u64, Arc<[u8]>>>,
    reader: Arc<dyn MemorySource>,
    max_blocks: usize,
    block_size: u64,
}

impl MemoryCache {
    /// `block_size` must be a power of two.
    pub fn new(reader: Arc<dyn MemorySource>, max_blocks: usize, block_size: u64) -> Self {
        debug_assert!(block_size.is_power_of_two());
        Self {
            cache: RwLock::new(AHashMap::new()),
            reader,
            max_blocks,
            block_size,
        }
    }

    pub fn size(&self) -> usize {
        self.cache.read().len()
    }

    pub fn reader(&self) -> &Arc<dyn MemorySource> {
        &self.reader
    }

    fn block(&self, block_addr: Address) -> Option<Arc<[u8]>> {
        if let Some(block) = self.cache.read().get(&block_addr.as_u64()) {
            return Some(block.clone());
        }

        let mut data = vec![0u8; self.block_size as usize];
        match self.reader.read(block_addr, &mut data) {
            Ok(read) if read == data.len() => {}
            _ => return None,
        }

        let block: Arc<[u8]> = data.into();
        let mut cache = self.cache.write();
        if cache.len() < self.max_blocks {
            // Another reader may have raced us here; both copies are identical.
            cache.entry(block_addr.as_u64()).or_insert_with(|| block.clone());
        }
        Some(block)
    }
}

impl MemorySource for MemoryCache {
    fn read(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        let mask = !(self.block_size - 1);
        let mut copied = 0usize;

        while copied < buf.len() {
            let cursor = addr + copied as u64;
            let block_addr = Address::new(cursor.as_u64() & mask);
            let block = match self.block(block_addr) {
                Some(block) => block,
                None => {
                    let rest = &mut buf[copied..];
                    return match self.reader.read(cursor, rest) {
                        Ok(read) => Ok(copied + read),
                        Err(e) if copied > 0 && e.is_recoverable() => Ok(copied),
                        Err(e) => Err(e),
                    };
                }
            };

            let start = (cursor.as_u64() - block_addr.as_u64()) as usize;
            let chunk = (block.len() - start).min(buf.len() - copied);
            buf[copied..copied + chunk].copy_from_slice(&block[start..start + chunk]);
            copied += chunk;
        }

        Ok(copied)
    }

    fn architecture(&self) -> Result<Architecture, MemoryError> {
        self.reader.architecture()
    }
}
