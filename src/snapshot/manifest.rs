// Sun Jan 25 2026 - Alex

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub architecture: String,
    /// Relative paths are resolved against the manifest's directory.
    pub memory_file: PathBuf,
    #[serde(default)]
    pub regions: Vec<RegionEntry>,
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    #[serde(default)]
    pub runtime: Option<RuntimeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionEntry {
    pub address: u64,
    pub size: u64,
    pub file_offset: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    pub name: String,
    pub base: u64,
    pub size: u64,
    #[serde(default)]
    pub symbols: Vec<SymbolEntry>,
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub name: String,
    pub address: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub fields: IndexMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeEntry {
    pub module_base: u64,
    #[serde(default)]
    pub heaps: Vec<HeapEntry>,
    #[serde(default)]
    pub threads: Vec<ThreadEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeapEntry {
    #[serde(default)]
    pub segments: Vec<SegmentEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadEntry {
    pub id: u64,
    #[serde(default)]
    pub stress_log: Vec<StressLogRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressLogRecord {
    pub timestamp: u64,
    pub format: String,
    #[serde(default)]
    pub args: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest: Manifest =
            serde_json::from_str(r#"{ "architecture": "x64", "memory_file": "mem.bin" }"#).unwrap();
        assert!(manifest.regions.is_empty());
        assert!(manifest.runtime.is_none());
    }

    #[test]
    fn test_type_fields_keep_order() {
        let entry: TypeEntry = serde_json::from_str(
            r#"{ "name": "T", "fields": { "m_task": 8, "m_action": 16 } }"#,
        )
        .unwrap();
        let names: Vec<_> = entry.fields.keys().cloned().collect();
        assert_eq!(names, vec!["m_task", "m_action"]);
    }
}
