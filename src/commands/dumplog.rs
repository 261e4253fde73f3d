// Tue Jan 27 2026 - Alex

use crate::commands::CommandError;
use crate::snapshot::RuntimeThread;
use crate::stresslog::{self, EMPTY_LOG_MESSAGE};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// The file is created even when no thread logged anything.
pub fn run<W: Write>(threads: &[RuntimeThread], path: &Path, console: &mut W) -> Result<usize, CommandError> {
    writeln!(console, "Dumping StressLog...")?;
    let entries = stresslog::merge_entries(threads);
    if entries.is_empty() {
        writeln!(console, "{}", EMPTY_LOG_MESSAGE)?;
    }

    let mut file = BufWriter::new(File::create(path)?);
    stresslog::write_entries(&mut file, &entries)?;
    file.flush()?;
    info!("Wrote {} stress log entries to {}", entries.len(), path.display());

    writeln!(console, "Done")?;
    Ok(entries.len())
}
