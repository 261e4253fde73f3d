// Tue Jan 13 2026 - Alex

use crate::continuation::DEFAULT_MIN_ASYNC_OBJECT_SIZE;
use crate::snapshot::SnapshotOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parallel_heaps: bool,
    pub threads: usize,
    /// Zero disables the block cache.
    pub memory_cache_blocks: usize,
    pub memory_block_size: u64,
    pub min_async_object_size: u64,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel_heaps: true,
            threads: num_cpus::get(),
            memory_cache_blocks: 0,
            memory_block_size: 0x1000,
            min_async_object_size: DEFAULT_MIN_ASYNC_OBJECT_SIZE,
            show_progress: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON config; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
        serde_json::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_memory_cache(mut self, blocks: usize, block_size: u64) -> Self {
        self.memory_cache_blocks = blocks;
        self.memory_block_size = block_size;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.threads == 0 {
            return Err("threads must be greater than 0".to_string());
        }
        if self.memory_cache_blocks > 0 && !self.memory_block_size.is_power_of_two() {
            return Err(format!(
                "memory_block_size must be a power of two, got {}",
                self.memory_block_size
            ));
        }
        Ok(())
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            cache_blocks: self.memory_cache_blocks,
            block_size: self.memory_block_size,
        }
    }
}
