// Tue Jan 27 2026 - Alex

use crate::commands::CommandError;
use crate::heap::HeapStatistics;
use serde::Serialize;
use std::fmt::UpperHex;
use std::io::Write;

pub const SEPARATOR: &str =
    "--------------------------------------------------------------------------------------";

/// `0x` plus upper-case hex, left-aligned to the width of a 64-bit value.
pub fn hex_cell<T: UpperHex>(value: T) -> String {
    format!("0x{:<16X}", value)
}

pub fn header_cell(label: &str) -> String {
    format!("{:<18}", label)
}

pub fn write_statistics<W: Write>(writer: &mut W, stats: &HeapStatistics) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Statistics:")?;
    writeln!(
        writer,
        "{} {} {} Class Name",
        header_cell("EEType  "),
        header_cell("Count  "),
        header_cell("TotalSize  ")
    )?;
    writeln!(writer, "{}", SEPARATOR)?;
    for entry in stats.entries() {
        writeln!(
            writer,
            "{} {} {} {}",
            hex_cell(entry.type_address),
            hex_cell(entry.count),
            hex_cell(entry.total_size),
            entry.name
        )?;
    }
    writeln!(writer, "Total {} objects", stats.total_objects())?;
    Ok(())
}

pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<(), CommandError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}
