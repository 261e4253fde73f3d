// Tue Jan 27 2026 - Alex

use crate::commands::report::write_json;
use crate::commands::{CommandError, OutputFormat};
use crate::engine::AnalysisSession;
use crate::validation::{HeapVerifier, VerifyReport};
use std::io::Write;

pub fn write_report<W: Write>(writer: &mut W, report: &VerifyReport) -> std::io::Result<()> {
    for failure in &report.failures {
        writeln!(writer, "{}", failure)?;
    }
    writeln!(writer, "{}", report.summary())?;
    if !report.is_clean() {
        writeln!(writer, "{} invalid object(s) found.", report.failures.len())?;
    }
    Ok(())
}

pub fn run<W: Write>(
    session: &AnalysisSession,
    parallel: bool,
    writer: &mut W,
    format: OutputFormat,
) -> Result<VerifyReport, CommandError> {
    let report = HeapVerifier::new(session).verify_all(parallel)?;
    match format {
        OutputFormat::Text => write_report(writer, &report)?,
        OutputFormat::Json => write_json(writer, &report)?,
    }
    Ok(report)
}
