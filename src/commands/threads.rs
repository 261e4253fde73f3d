// Tue Jan 27 2026 - Alex

use crate::commands::report::write_json;
use crate::commands::{CommandError, OutputFormat};
use crate::snapshot::RuntimeThread;
use std::io::Write;

pub fn run<W: Write>(threads: &[RuntimeThread], writer: &mut W, format: OutputFormat) -> Result<(), CommandError> {
    match format {
        OutputFormat::Text => {
            for thread in threads {
                writeln!(writer, "Saw thread with id {}", thread.id)?;
            }
        }
        OutputFormat::Json => {
            let ids: Vec<u64> = threads.iter().map(|thread| thread.id).collect();
            write_json(writer, &ids)?;
        }
    }
    Ok(())
}
