// Mon Jan 26 2026 - Alex

pub mod format;

use crate::snapshot::RuntimeThread;
use itertools::Itertools;
use serde::Serialize;
use std::io::{self, Write};

pub const DEFAULT_LOG_FILE: &str = "StressLog.txt";
pub const EMPTY_LOG_MESSAGE: &str = "StressLog does not exist, no entries will be dumped.";

const SEPARATOR: &str =
    "--------------------------------------------------------------------------------------";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StressLogEntry {
    pub thread_id: u64,
    pub timestamp: u64,
    pub message: String,
}

/// Flattens every thread's log and orders it by timestamp.
pub fn merge_entries(threads: &[RuntimeThread]) -> Vec<StressLogEntry> {
    threads
        .iter()
        .flat_map(|thread| {
            thread.stress_log.iter().map(move |record| StressLogEntry {
                thread_id: thread.id,
                timestamp: record.timestamp,
                message: format::render(&record.format, &record.args),
            })
        })
        .sorted_by_key(|entry| entry.timestamp)
        .collect()
}

pub fn write_entries<W: Write>(writer: &mut W, entries: &[StressLogEntry]) -> io::Result<()> {
    writeln!(writer, "Thread     Timestamp        Message")?;
    writeln!(writer, "{}", SEPARATOR)?;
    for entry in entries {
        writeln!(writer, "{:<10X} {:<16X} {}", entry.thread_id, entry.timestamp, entry.message)?;
    }
    writeln!(writer, "{}", SEPARATOR)?;
    Ok(())
}
