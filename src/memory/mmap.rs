// Mon Jan 19 2026 - Alex

use crate::memory::{Address, Architecture, MemoryError, MemoryRegion, MemorySource};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

pub struct MappedMemory {
    mmap: Option<Mmap>,
    regions: Vec<MemoryRegion>,
    architecture: Result<Architecture, String>,
}

impl MappedMemory {
    pub fn open<P: AsRef<Path>>(
        path: P,
        mut regions: Vec<MemoryRegion>,
        architecture: Result<Architecture, String>,
    ) -> Result<Self, MemoryError> {
        let file = File::open(path.as_ref())?;
        let file_len = file.metadata()?.len();
        // Mapping a zero-length file fails on some platforms.
        let mmap = if file_len == 0 {
            None
        } else {
            Some(unsafe { Mmap::map(&file) }?)
        };

        regions.sort_by_key(|r| r.start());
        for pair in regions.windows(2) {
            if pair[0].range().overlaps(pair[1].range()) {
                return Err(MemoryError::Format(format!(
                    "overlapping regions {} and {}",
                    pair[0], pair[1]
                )));
            }
        }
        for region in &regions {
            let end = region.file_offset().checked_add(region.size());
            if end.map_or(true, |end| end > file_len) {
                return Err(MemoryError::Format(format!(
                    "region {} extends past the end of the memory file ({} bytes)",
                    region, file_len
                )));
            }
        }

        log::debug!("Mapped {} bytes across {} regions", file_len, regions.len());

        Ok(Self {
            mmap,
            regions,
            architecture,
        })
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    fn data(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }

    fn region_index(&self, addr: Address) -> Option<usize> {
        let idx = self.regions.partition_point(|r| r.start() <= addr);
        if idx == 0 {
            return None;
        }
        let candidate = idx - 1;
        self.regions[candidate].contains(addr).then_some(candidate)
    }
}

impl MemorySource for MappedMemory {
    fn read(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        let mut index = match self.region_index(addr) {
            Some(index) => index,
            None => return Err(MemoryError::Unmapped(addr.as_u64())),
        };

        let data = self.data();
        let mut copied = 0usize;
        let mut cursor = addr;

        // Continue across regions only while they are address-contiguous.
        while copied < buf.len() {
            let region = &self.regions[index];
            let offset = match region.file_offset_of(cursor) {
                Some(offset) => offset as usize,
                None => break,
            };
            let available = (region.end().as_u64() - cursor.as_u64()) as usize;
            let chunk = available.min(buf.len() - copied);
            buf[copied..copied + chunk].copy_from_slice(&data[offset..offset + chunk]);
            copied += chunk;
            cursor = cursor + chunk as u64;

            index += 1;
            if index >= self.regions.len() || self.regions[index].start() != cursor {
                break;
            }
        }

        Ok(copied)
    }

    fn architecture(&self) -> Result<Architecture, MemoryError> {
        self.architecture
            .clone()
            .map_err(MemoryError::UnknownArchitecture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRange;
    use std::io::Write;

    fn region(start: u64, size: u64, file_offset: u64) -> MemoryRegion {
        MemoryRegion::new(
            MemoryRange::from_start_size(Address::new(start), size).unwrap(),
            file_offset,
        )
    }

    fn mapped(regions: Vec<MemoryRegion>) -> (tempfile::NamedTempFile, MappedMemory) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let bytes: Vec<u8> = (0..64u8).collect();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();
        let memory = MappedMemory::open(file.path(), regions, Ok(Architecture::X64)).unwrap();
        (file, memory)
    }

    #[test]
    fn test_read_within_region() {
        let (_file, memory) = mapped(vec![region(0x1000, 16, 0)]);
        let bytes = memory.read_bytes(Address::new(0x1004), 4).unwrap();
        assert_eq!(bytes, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_read_spans_contiguous_regions() {
        let (_file, memory) = mapped(vec![region(0x1010, 16, 32), region(0x1000, 16, 0)]);
        let bytes = memory.read_bytes(Address::new(0x100e), 4).unwrap();
        assert_eq!(bytes, vec![14, 15, 32, 33]);
    }

    #[test]
    fn test_short_read_at_region_gap() {
        let (_file, memory) = mapped(vec![region(0x1000, 16, 0), region(0x2000, 16, 16)]);
        let mut buf = [0u8; 8];
        let read = memory.read(Address::new(0x100c), &mut buf).unwrap();
        assert_eq!(read, 4);
        let err = memory.read_u64(Address::new(0x100c)).unwrap_err();
        assert!(matches!(err, MemoryError::ShortRead { read: 4, requested: 8, .. }));
    }

    #[test]
    fn test_unmapped_address() {
        let (_file, memory) = mapped(vec![region(0x1000, 16, 0)]);
        let err = memory.read_u32(Address::new(0x3000)).unwrap_err();
        assert!(matches!(err, MemoryError::Unmapped(0x3000)));
    }

    #[test]
    fn test_region_past_file_end_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 8]).unwrap();
        file.flush().unwrap();
        let result = MappedMemory::open(file.path(), vec![region(0x1000, 16, 0)], Ok(Architecture::X64));
        assert!(matches!(result, Err(MemoryError::Format(_))));
    }

    #[test]
    fn test_unknown_architecture_reported_on_query() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 8]).unwrap();
        file.flush().unwrap();
        let memory = MappedMemory::open(file.path(), Vec::new(), Err("sparc".to_string())).unwrap();
        assert!(matches!(memory.architecture(), Err(MemoryError::UnknownArchitecture(_))));
    }
}
