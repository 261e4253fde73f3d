// Sun Jan 25 2026 - Alex

use crate::engine::{AnalysisSession, CancellationToken, SessionError};
use crate::heap::{Heap, HeapSegment};
use crate::memory::{
    Address, Architecture, MappedMemory, MemoryCache, MemoryRange, MemoryRegion, MemorySource,
};
use crate::snapshot::manifest::{Manifest, ModuleEntry, RuntimeEntry, StressLogRecord};
use crate::symbol::ModuleMetadata;
use log::{debug, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotOptions {
    /// Zero disables the block cache.
    pub cache_blocks: usize,
    pub block_size: u64,
}

#[derive(Debug, Clone)]
pub struct RuntimeThread {
    pub id: u64,
    pub stress_log: Vec<StressLogRecord>,
}

pub struct Snapshot {
    session: AnalysisSession,
    threads: Vec<RuntimeThread>,
}

impl Snapshot {
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: SnapshotOptions,
        cancellation: CancellationToken,
    ) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let manifest: Manifest = serde_json::from_str(&text)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_manifest(manifest, base_dir, options, cancellation)
    }

    pub fn from_manifest(
        manifest: Manifest,
        base_dir: &Path,
        options: SnapshotOptions,
        cancellation: CancellationToken,
    ) -> Result<Self, SessionError> {
        let runtime = manifest.runtime.as_ref().ok_or(SessionError::NoRuntimeDetected)?;
        let runtime_module = manifest
            .modules
            .iter()
            .find(|module| module.base == runtime.module_base)
            .ok_or(SessionError::NoRuntimeDetected)?;

        let architecture = manifest
            .architecture
            .parse::<Architecture>()
            .map_err(|_| manifest.architecture.clone());
        let regions = manifest
            .regions
            .iter()
            .map(|region| {
                let range = MemoryRange::from_start_size(Address::new(region.address), region.size)
                    .ok_or_else(|| {
                        SessionError::Manifest(format!("region at 0x{:X} overflows", region.address))
                    })?;
                Ok(MemoryRegion::new(range, region.file_offset))
            })
            .collect::<Result<Vec<_>, SessionError>>()?;

        let memory_path = base_dir.join(&manifest.memory_file);
        let mapped: Arc<dyn MemorySource> =
            Arc::new(MappedMemory::open(&memory_path, regions, architecture)?);
        let memory: Arc<dyn MemorySource> = if options.cache_blocks > 0 {
            debug!(
                "Block cache enabled: {} blocks of {} bytes",
                options.cache_blocks, options.block_size
            );
            Arc::new(MemoryCache::new(mapped, options.cache_blocks, options.block_size))
        } else {
            mapped
        };

        let modules = manifest
            .modules
            .iter()
            .map(module_range)
            .collect::<Result<Vec<_>, _>>()?;
        let metadata = Arc::new(module_metadata(runtime_module)?);
        let heaps = runtime_heaps(runtime)?;

        info!(
            "Loaded snapshot: {} region(s), {} module(s), {} heap(s), runtime module {}",
            manifest.regions.len(),
            modules.len(),
            heaps.len(),
            runtime_module.name
        );

        let session = AnalysisSession::new(memory, metadata, modules, heaps)?
            .with_cancellation(cancellation);
        let threads = runtime
            .threads
            .iter()
            .map(|thread| RuntimeThread {
                id: thread.id,
                stress_log: thread.stress_log.clone(),
            })
            .collect();

        Ok(Self { session, threads })
    }

    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    pub fn threads(&self) -> &[RuntimeThread] {
        &self.threads
    }
}

fn module_range(module: &ModuleEntry) -> Result<MemoryRange, SessionError> {
    MemoryRange::from_start_size(Address::new(module.base), module.size)
        .ok_or_else(|| SessionError::Manifest(format!("module {} overflows", module.name)))
}

fn module_metadata(module: &ModuleEntry) -> Result<ModuleMetadata, SessionError> {
    let mut metadata = ModuleMetadata::new(module.name.clone(), module_range(module)?);
    for symbol in &module.symbols {
        metadata.add_symbol(symbol.name.clone(), Address::new(symbol.address));
    }
    for ty in &module.types {
        metadata.add_type(
            ty.name.clone(),
            ty.fields.iter().map(|(name, offset)| (name.clone(), *offset)),
        );
    }
    debug!(
        "Module {}: {} symbols, {} types",
        module.name,
        metadata.symbol_count(),
        metadata.type_count()
    );
    Ok(metadata)
}

fn runtime_heaps(runtime: &RuntimeEntry) -> Result<Vec<Heap>, SessionError> {
    runtime
        .heaps
        .iter()
        .enumerate()
        .map(|(index, heap)| {
            let segments = heap
                .segments
                .iter()
                .map(|segment| {
                    MemoryRange::new(Address::new(segment.start), Address::new(segment.end))
                        .map(HeapSegment::new)
                        .ok_or_else(|| {
                            SessionError::Manifest(format!(
                                "heap {} segment 0x{:X}-0x{:X} is inverted",
                                index, segment.start, segment.end
                            ))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Heap::new(index, segments))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const BOX: &str =
        "S_P_CoreLib_System_Runtime_CompilerServices_AsyncTaskMethodBuilder_1_AsyncStateMachineBox_1<Demo>";

    fn write_snapshot(dir: &TempDir, runtime: bool, architecture: &str) -> std::path::PathBuf {
        let mut memory = vec![0u8; 0x2000];
        memory[0..2].copy_from_slice(&0u16.to_le_bytes());
        memory[4..8].copy_from_slice(&24u32.to_le_bytes());
        for i in 0..2usize {
            let offset = 0x1000 + i * 24;
            memory[offset..offset + 8].copy_from_slice(&0x1000u64.to_le_bytes());
        }
        let mut file = std::fs::File::create(dir.path().join("memory.bin")).unwrap();
        file.write_all(&memory).unwrap();

        let runtime = if runtime {
            r#", "runtime": { "module_base": 4096,
                 "heaps": [ { "segments": [ { "start": 8192, "end": 8240 } ] } ],
                 "threads": [ { "id": 7, "stress_log": [ { "timestamp": 5, "format": "gc %d", "args": [2] } ] } ] }"#
        } else {
            ""
        };
        let manifest = format!(
            r#"{{ "architecture": "{}", "memory_file": "memory.bin",
                 "regions": [ {{ "address": 4096, "size": 8192, "file_offset": 0 }} ],
                 "modules": [ {{ "name": "app", "base": 4096, "size": 256,
                                "symbols": [ {{ "name": "{}", "address": 4096 }} ],
                                "types": [ {{ "name": "{}", "fields": {{ "m_stateFlags": 8 }} }} ] }} ]{} }}"#,
            architecture, BOX, BOX, runtime
        );
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, manifest).unwrap();
        path
    }

    #[test]
    fn test_open_and_walk() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, true, "x64");
        let snapshot = Snapshot::open(&path, SnapshotOptions::default(), CancellationToken::new()).unwrap();
        let session = snapshot.session();

        let segment = session.heaps()[0].segments()[0];
        let objects: Vec<_> = session.walk(segment).collect::<Result<_, _>>().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].type_of(session).unwrap().name(), BOX);
        assert_eq!(snapshot.threads()[0].id, 7);
    }

    #[test]
    fn test_block_cache_is_transparent() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, true, "amd64");
        let options = SnapshotOptions {
            cache_blocks: 4,
            block_size: 0x400,
        };
        let snapshot = Snapshot::open(&path, options, CancellationToken::new()).unwrap();
        let session = snapshot.session();
        assert_eq!(session.read_type_pointer(Address::new(0x2018)).unwrap(), Address::new(0x1000));
    }

    #[test]
    fn test_missing_runtime_latches() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, false, "x64");
        let err = Snapshot::open(&path, SnapshotOptions::default(), CancellationToken::new())
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::NoRuntimeDetected));
        assert_eq!(err.to_string(), "no Native AOT runtime detected.");
    }

    #[test]
    fn test_unknown_architecture() {
        let dir = TempDir::new().unwrap();
        let path = write_snapshot(&dir, true, "mips");
        let err = Snapshot::open(&path, SnapshotOptions::default(), CancellationToken::new())
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::UnknownArchitecture(name) if name == "mips"));
    }
}
