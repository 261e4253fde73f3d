// Tue Jan 27 2026 - Alex

use crate::commands::report::{header_cell, hex_cell, write_json, write_statistics, SEPARATOR};
use crate::commands::{CommandError, OutputFormat};
use crate::continuation::{AsyncAnalyzer, AsyncEntry, AsyncFilter, AsyncReport};
use crate::engine::AnalysisSession;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct DumpAsyncOptions {
    pub filter: AsyncFilter,
    pub stacks: bool,
}

fn write_entry<W: Write>(writer: &mut W, entry: &AsyncEntry) -> std::io::Result<()> {
    let type_address = match entry.type_address {
        Some(address) => hex_cell(address),
        None => header_cell("?"),
    };
    let state = match entry.state {
        Some(state) => hex_cell(state),
        None => header_cell("?"),
    };
    writeln!(
        writer,
        "{} {} {} {} {}",
        hex_cell(entry.address),
        type_address,
        state,
        entry.flags,
        entry.type_name
    )
}

pub fn write_report<W: Write>(writer: &mut W, report: &AsyncReport) -> std::io::Result<()> {
    if let Some(stats) = &report.statistics {
        write_statistics(writer, stats)?;
    }
    if let Some(chains) = report.chains {
        writeln!(writer, "In {} chains.", chains)?;
    }
    if report.unreadable > 0 {
        writeln!(
            writer,
            "Skipped {} async object(s) with unreadable state.",
            report.unreadable
        )?;
    }
    if report.truncated_lists > 0 {
        writeln!(
            writer,
            "{} continuation list(s) could not be read completely.",
            report.truncated_lists
        )?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "{} {} {} State/Type",
        header_cell("Address"),
        header_cell("EEtype"),
        header_cell("State")
    )?;
    writeln!(writer)?;
    for chain in &report.records {
        write_entry(writer, &chain.root)?;
        for link in &chain.continuations {
            write!(writer, "{}", ".".repeat(link.depth))?;
            write_entry(writer, link)?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "{}", SEPARATOR)?;
    Ok(())
}

pub fn run<W: Write>(
    session: &AnalysisSession,
    options: DumpAsyncOptions,
    writer: &mut W,
    format: OutputFormat,
) -> Result<AsyncReport, CommandError> {
    let analyzer = AsyncAnalyzer::new(session, options.filter);
    let report = analyzer.analyze(options.stacks)?;
    match format {
        OutputFormat::Text => write_report(writer, &report)?,
        OutputFormat::Json => write_json(writer, &report)?,
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Architecture;
    use crate::utils::testing::HeapBuilder;

    const BOX: &str =
        "S_P_CoreLib_System_Runtime_CompilerServices_AsyncTaskMethodBuilder_1_AsyncStateMachineBox_1<Demo>";

    fn chained_session() -> (AnalysisSession, Vec<crate::memory::Address>) {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type(
            BOX,
            40,
            0,
            &[("m_stateFlags", 8), ("m_continuationObject", 16), ("StateMachine", 24)],
        );
        let a = builder.add_object(ty);
        let b = builder.add_object(ty);
        builder.set_field(a, 16, b);
        (builder.build().into_session(), vec![a, b])
    }

    #[test]
    fn test_stack_lines_are_dotted() {
        let (session, objects) = chained_session();
        let options = DumpAsyncOptions {
            stacks: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        run(&session, options, &mut out, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Statistics:"));
        assert!(text.contains("In 1 chains."));
        assert!(text.contains("Address            EEtype             State              State/Type"));
        let root = format!("0x{:<16X}", objects[0]);
        let child = format!(".0x{:<16X}", objects[1]);
        assert!(text.lines().any(|line| line.starts_with(&root)));
        assert!(text.lines().any(|line| line.starts_with(&child)));
        assert!(text.trim_end().ends_with(SEPARATOR));
    }

    #[test]
    fn test_single_address_skips_statistics() {
        let (session, objects) = chained_session();
        let options = DumpAsyncOptions {
            filter: AsyncFilter::default().with_address(objects[1]),
            stacks: false,
        };
        let mut out = Vec::new();
        let report = run(&session, options, &mut out, OutputFormat::Text).unwrap();
        assert!(report.statistics.is_none());
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Statistics:"));
        assert!(!text.contains("chains."));
    }

    #[test]
    fn test_json_report() {
        let (session, _) = chained_session();
        let mut out = Vec::new();
        run(&session, DumpAsyncOptions::default(), &mut out, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["candidates"], 2);
        assert_eq!(value["unreadable"], 0);
        assert!(value["chains"].is_null());
    }

    #[test]
    fn test_unreadable_tally_printed() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type(BOX, 40, 0, &[("m_stateFlags", 0x7fff_0000)]);
        builder.add_object(ty);
        let session = builder.build().into_session();

        let mut out = Vec::new();
        let report = run(&session, DumpAsyncOptions::default(), &mut out, OutputFormat::Text).unwrap();
        assert_eq!(report.candidates, 0);
        assert_eq!(report.unreadable, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Skipped 1 async object(s) with unreadable state."));
        assert!(!text.contains("continuation list(s)"));
    }

    #[test]
    fn test_unknown_state_cell() {
        let entry = AsyncEntry {
            address: crate::memory::Address::new(0x1000),
            type_address: None,
            type_name: "Demo".to_string(),
            state: None,
            flags: "(unreadable)".to_string(),
            depth: 1,
        };
        let mut out = Vec::new();
        write_entry(&mut out, &entry).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line,
            format!("0x{:<16X} {} {} (unreadable) Demo\n", 0x1000, header_cell("?"), header_cell("?"))
        );
    }
}
