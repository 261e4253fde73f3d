// Tue Jan 27 2026 - Alex

use crate::commands::report::{header_cell, hex_cell, write_json, write_statistics};
use crate::commands::{CommandError, OutputFormat};
use crate::engine::AnalysisSession;
use crate::heap::{Heap, HeapError, HeapStatistics};
use crate::memory::Address;
use crate::utils::logging::ScopedTimer;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct DumpHeapOptions {
    pub type_name: Option<String>,
    pub short: bool,
    pub stat: bool,
    pub sort: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRow {
    pub address: Address,
    pub type_address: Address,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DumpHeapReport {
    pub objects: Vec<ObjectRow>,
    pub statistics: HeapStatistics,
}

impl DumpHeapReport {
    fn merge(mut self, other: DumpHeapReport) -> Self {
        self.objects.extend(other.objects);
        self.statistics.merge(other.statistics);
        self
    }
}

pub struct DumpHeap<'a> {
    session: &'a AnalysisSession,
    options: DumpHeapOptions,
    parallel: bool,
}

impl<'a> DumpHeap<'a> {
    pub fn new(session: &'a AnalysisSession, options: DumpHeapOptions) -> Self {
        Self {
            session,
            options,
            parallel: false,
        }
    }

    /// Scan heaps on the rayon pool. Row order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn collect(&self) -> Result<DumpHeapReport, HeapError> {
        let _timer = ScopedTimer::new("enumerating heap");
        let heaps = self.session.heaps();
        let per_heap: Vec<DumpHeapReport> = if self.parallel {
            heaps
                .par_iter()
                .map(|heap| self.scan_heap(heap))
                .collect::<Result<_, _>>()?
        } else {
            heaps
                .iter()
                .map(|heap| self.scan_heap(heap))
                .collect::<Result<_, _>>()?
        };

        let mut report = per_heap
            .into_iter()
            .fold(DumpHeapReport::default(), DumpHeapReport::merge);
        if self.options.sort {
            report.statistics.sort_by_size();
        }
        Ok(report)
    }

    fn scan_heap(&self, heap: &Heap) -> Result<DumpHeapReport, HeapError> {
        let mut report = DumpHeapReport::default();
        for segment in heap.segments() {
            for object in self.session.walk(*segment) {
                let object = match object {
                    Ok(object) => object,
                    Err(HeapError::Cancelled) => return Err(HeapError::Cancelled),
                    Err(e) => {
                        warn!("Skipping rest of {} in heap {}: {}", segment, heap.index(), e);
                        break;
                    }
                };
                let layout = object.layout(self.session)?;
                if !self.matches(layout.type_descriptor.name()) {
                    continue;
                }
                if !self.options.stat {
                    report.objects.push(ObjectRow {
                        address: object.address(),
                        type_address: layout.type_descriptor.address(),
                        size: layout.size,
                    });
                }
                report.statistics.add(&layout.type_descriptor, layout.size);
            }
        }
        debug!(
            "Heap {}: {} matching objects",
            heap.index(),
            report.statistics.total_objects()
        );
        Ok(report)
    }

    fn matches(&self, type_name: &str) -> bool {
        match self.options.type_name.as_deref() {
            Some(filter) if !filter.is_empty() => {
                type_name.to_lowercase().contains(&filter.to_lowercase())
            }
            _ => true,
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W, report: &DumpHeapReport) -> std::io::Result<()> {
        if !self.options.stat && !self.options.short {
            writeln!(
                writer,
                "{} {} {}",
                header_cell("Address"),
                header_cell("EEtype"),
                header_cell("Size")
            )?;
        }
        for row in &report.objects {
            if self.options.short {
                writeln!(writer, "0x{:X}", row.address)?;
            } else {
                writeln!(
                    writer,
                    "{} {} {}",
                    hex_cell(row.address),
                    hex_cell(row.type_address),
                    hex_cell(row.size)
                )?;
            }
        }
        write_statistics(writer, &report.statistics)
    }

    pub fn run<W: Write>(&self, writer: &mut W, format: OutputFormat) -> Result<(), CommandError> {
        let report = self.collect()?;
        match format {
            OutputFormat::Text => self.write(writer, &report)?,
            OutputFormat::Json => write_json(writer, &report)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Architecture;
    use crate::utils::testing::HeapBuilder;

    fn sample() -> (AnalysisSession, Vec<Address>) {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let string = builder.add_type("System_String", 24, 2, &[]);
        let node = builder.add_type("Demo_Node", 32, 0, &[]);
        let objects = vec![
            builder.add_object(node),
            builder.add_array(string, 5),
            builder.add_object(node),
        ];
        (builder.build().into_session(), objects)
    }

    #[test]
    fn test_rows_and_statistics() {
        let (session, objects) = sample();
        let report = DumpHeap::new(&session, DumpHeapOptions::default()).collect().unwrap();
        let addresses: Vec<_> = report.objects.iter().map(|r| r.address).collect();
        assert_eq!(addresses, objects);
        assert_eq!(report.objects[1].size, 34);
        assert_eq!(report.statistics.total_objects(), 3);
        assert_eq!(report.statistics.type_count(), 2);
    }

    #[test]
    fn test_type_filter_and_stat() {
        let (session, _) = sample();
        let options = DumpHeapOptions {
            type_name: Some("node".into()),
            stat: true,
            ..Default::default()
        };
        let report = DumpHeap::new(&session, options).collect().unwrap();
        assert!(report.objects.is_empty());
        assert_eq!(report.statistics.total_objects(), 2);
        assert_eq!(report.statistics.total_size(), 64);
    }

    #[test]
    fn test_sorted_statistics() {
        let (session, _) = sample();
        let options = DumpHeapOptions {
            sort: true,
            ..Default::default()
        };
        let report = DumpHeap::new(&session, options).with_parallel(true).collect().unwrap();
        let names: Vec<_> = report.statistics.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["System_String", "Demo_Node"]);
    }

    #[test]
    fn test_short_output() {
        let (session, objects) = sample();
        let options = DumpHeapOptions {
            short: true,
            ..Default::default()
        };
        let mut out = Vec::new();
        DumpHeap::new(&session, options).run(&mut out, OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some(format!("0x{:X}", objects[0]).as_str()));
        assert!(text.contains("Total 3 objects"));
    }

    #[test]
    fn test_json_output() {
        let (session, _) = sample();
        let mut out = Vec::new();
        DumpHeap::new(&session, DumpHeapOptions::default())
            .run(&mut out, OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["objects"].as_array().map(|a| a.len()), Some(3));
        assert_eq!(value["statistics"]["total_objects"], 3);
    }
}
