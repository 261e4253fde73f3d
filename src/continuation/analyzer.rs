// Sun Jan 25 2026 - Alex

use crate::continuation::{AsyncFilter, ContinuationGraph, StateFlags};
use crate::engine::AnalysisSession;
use crate::heap::{HeapError, HeapObject, HeapStatistics, ObjectRef};
use crate::memory::Address;
use crate::utils::logging::ScopedTimer;
use log::warn;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AsyncEntry {
    pub address: Address,
    pub type_address: Option<Address>,
    pub type_name: String,
    pub state: Option<i32>,
    pub flags: String,
    pub depth: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AsyncChain {
    pub root: AsyncEntry,
    pub continuations: Vec<AsyncEntry>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AsyncReport {
    pub candidates: usize,
    /// Absent when a single address was requested.
    pub statistics: Option<HeapStatistics>,
    /// Present only for stack dumps without a type filter.
    pub chains: Option<usize>,
    pub unreadable: usize,
    pub truncated_lists: usize,
    pub records: Vec<AsyncChain>,
}

#[derive(Debug, Default)]
pub struct CandidateSet {
    pub objects: Vec<ObjectRef>,
    pub unreadable: usize,
}

pub struct AsyncAnalyzer<'a> {
    graph: ContinuationGraph<'a>,
}

impl<'a> AsyncAnalyzer<'a> {
    pub fn new(session: &'a AnalysisSession, filter: AsyncFilter) -> Self {
        Self {
            graph: ContinuationGraph::new(session, filter),
        }
    }

    pub fn graph(&self) -> &ContinuationGraph<'a> {
        &self.graph
    }

    pub fn analyze(&self, stacks: bool) -> Result<AsyncReport, HeapError> {
        let CandidateSet {
            objects: candidates,
            unreadable,
        } = self.collect_candidates()?;
        let filter = self.graph.filter();

        let statistics = if filter.address.is_none() {
            let _timer = ScopedTimer::new("printing stats");
            Some(self.statistics(&candidates))
        } else {
            None
        };

        let chains = if stacks && !filter.has_type_filter() {
            let _timer = ScopedTimer::new("calculating async stacks");
            Some(self.graph.classify_top_level(&candidates))
        } else {
            None
        };

        let _timer = ScopedTimer::new("printing top level objs");
        let records = candidates
            .iter()
            .filter(|candidate| {
                let record = self.graph.record(candidate);
                record.is_top_level() && record.include_in_report()
            })
            .map(|candidate| self.chain(candidate, stacks))
            .collect();

        Ok(AsyncReport {
            candidates: candidates.len(),
            statistics,
            chains,
            unreadable,
            truncated_lists: self.graph.truncated_count(),
            records,
        })
    }

    /// Objects whose state cannot be read are counted, not kept.
    pub fn collect_candidates(&self) -> Result<CandidateSet, HeapError> {
        let _timer = ScopedTimer::new("enumerating heap");
        let session = self.graph.session();
        let filter = self.graph.filter();
        let mut candidates = CandidateSet::default();

        for heap in session.heaps() {
            for segment in heap.segments() {
                for object in session.walk(*segment) {
                    let object = match object {
                        Ok(object) => object,
                        Err(HeapError::Cancelled) => return Err(HeapError::Cancelled),
                        Err(e) => {
                            warn!("Skipping rest of {} in heap {}: {}", segment, heap.index(), e);
                            break;
                        }
                    };
                    if !self.is_candidate(&object) {
                        continue;
                    }

                    let Some(completed) = self.graph.is_completed(&object) else {
                        self.graph.record(&object).set_include_in_report(false);
                        candidates.unreadable += 1;
                        continue;
                    };
                    let include = self.graph.matches(&object) && (filter.completed || !completed);
                    self.graph.record(&object).set_include_in_report(include);
                    if filter.completed || !completed {
                        candidates.objects.push(object);
                    }
                }
            }
        }
        Ok(candidates)
    }

    fn is_candidate(&self, object: &HeapObject) -> bool {
        let session = self.graph.session();
        match object.size_of(session) {
            Ok(size) if size >= self.graph.filter().min_object_size => self.graph.is_async_type(object),
            _ => false,
        }
    }

    fn statistics(&self, candidates: &[ObjectRef]) -> HeapStatistics {
        let session = self.graph.session();
        let mut stats = HeapStatistics::new();
        for candidate in candidates {
            if let Ok(layout) = candidate.layout(session) {
                stats.add(&layout.type_descriptor, layout.size);
            }
        }
        stats.sort_by_size();
        stats
    }

    fn chain(&self, root: &ObjectRef, stacks: bool) -> AsyncChain {
        let mut continuations = Vec::new();
        if stacks {
            self.graph.walk_continuations(root, |node, depth| {
                continuations.push(self.entry(node, depth));
            });
        }
        AsyncChain {
            root: self.entry(root, 0),
            continuations,
        }
    }

    pub fn entry(&self, object: &HeapObject, depth: usize) -> AsyncEntry {
        let state = self.graph.state_of(object);
        let ty = object.type_of(self.graph.session()).ok();
        AsyncEntry {
            address: object.address(),
            type_address: ty.as_ref().map(|t| t.address()),
            type_name: ty
                .as_ref()
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| "<unresolved>".to_string()),
            state,
            flags: state
                .map(|state| StateFlags::decode(state).to_string())
                .unwrap_or_else(|| "(unreadable)".to_string()),
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Architecture;
    use crate::utils::testing::HeapBuilder;

    const BOX: &str =
        "S_P_CoreLib_System_Runtime_CompilerServices_AsyncTaskMethodBuilder_1_AsyncStateMachineBox_1<Demo>";
    const OTHER_BOX: &str =
        "S_P_CoreLib_System_Runtime_CompilerServices_AsyncTaskMethodBuilder_1_AsyncStateMachineBox_1<Other>";
    const TASK: &str = "S_P_CoreLib_System_Threading_Tasks_Task_1<Int32>";

    fn fields() -> Vec<(&'static str, u32)> {
        vec![("m_stateFlags", 8), ("m_continuationObject", 16), ("StateMachine", 24)]
    }

    #[test]
    fn test_completed_candidates_dropped_by_default() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type(BOX, 40, 0, &fields());
        let running = builder.add_object(ty);
        let done = builder.add_object(ty);
        builder.write_u32(done + 8, 0x1000000);
        let session = builder.build().into_session();

        let analyzer = AsyncAnalyzer::new(&session, AsyncFilter::default());
        let report = analyzer.analyze(false).unwrap();
        assert_eq!(report.candidates, 1);
        assert_eq!(report.unreadable, 0);
        assert_eq!(report.records[0].root.address, running);

        let analyzer = AsyncAnalyzer::new(&session, AsyncFilter::default().with_completed(true));
        assert_eq!(analyzer.analyze(false).unwrap().candidates, 2);
    }

    #[test]
    fn test_stacks_report_chains() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type(BOX, 40, 0, &fields());
        let a = builder.add_object(ty);
        let b = builder.add_object(ty);
        let c = builder.add_object(ty);
        let d = builder.add_object(ty);
        builder.set_field(a, 16, b);
        builder.set_field(b, 16, c);
        let session = builder.build().into_session();

        let report = AsyncAnalyzer::new(&session, AsyncFilter::default())
            .analyze(true)
            .unwrap();
        assert_eq!(report.chains, Some(2));
        let roots: Vec<_> = report.records.iter().map(|r| r.root.address).collect();
        assert_eq!(roots, vec![a, d]);
        let depths: Vec<_> = report.records[0]
            .continuations
            .iter()
            .map(|e| (e.address, e.depth))
            .collect();
        assert_eq!(depths, vec![(b, 1), (c, 2)]);
        assert_eq!(report.statistics.map(|s| s.total_objects()), Some(4));
    }

    #[test]
    fn test_tasks_need_flag() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let task = builder.add_type(TASK, 32, 0, &[("m_stateFlags", 8), ("m_continuationObject", 16)]);
        builder.add_object(task);
        let session = builder.build().into_session();

        let without = AsyncAnalyzer::new(&session, AsyncFilter::default());
        assert_eq!(without.analyze(false).unwrap().candidates, 0);
        let with = AsyncAnalyzer::new(&session, AsyncFilter::default().with_tasks(true));
        assert_eq!(with.analyze(false).unwrap().candidates, 1);
    }

    #[test]
    fn test_user_defined_detected_by_fields() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let custom = builder.add_type("MyTask", 32, 0, &[("m_stateFlags", 8), ("m_continuationObject", 16)]);
        builder.add_object(custom);
        let session = builder.build().into_session();

        let filter = AsyncFilter::default().with_tasks(true).with_user_defined(true);
        assert_eq!(AsyncAnalyzer::new(&session, filter).analyze(false).unwrap().candidates, 1);
    }

    #[test]
    fn test_small_objects_skipped() {
        let mut builder = HeapBuilder::new(Architecture::X86);
        let ty = builder.add_type(BOX, 16, 0, &[]);
        builder.add_object(ty);
        let session = builder.build().into_session();

        let report = AsyncAnalyzer::new(&session, AsyncFilter::default()).analyze(false).unwrap();
        assert_eq!(report.candidates, 0);
    }

    #[test]
    fn test_type_filter_hides_chain_count() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let ty = builder.add_type(BOX, 40, 0, &fields());
        builder.add_object(ty);
        let session = builder.build().into_session();

        let filter = AsyncFilter::default().with_type("demo");
        let report = AsyncAnalyzer::new(&session, filter).analyze(true).unwrap();
        assert_eq!(report.chains, None);
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn test_unreadable_state_is_counted_not_reported() {
        let mut builder = HeapBuilder::new(Architecture::X64);
        let broken = builder.add_type(BOX, 40, 0, &[("m_stateFlags", 0x7fff_0000)]);
        let ty = builder.add_type(OTHER_BOX, 40, 0, &fields());
        builder.add_object(broken);
        let fine = builder.add_object(ty);
        let session = builder.build().into_session();

        let report = AsyncAnalyzer::new(&session, AsyncFilter::default())
            .analyze(false)
            .unwrap();
        assert_eq!(report.candidates, 1);
        assert_eq!(report.unreadable, 1);
        let roots: Vec<_> = report.records.iter().map(|r| r.root.address).collect();
        assert_eq!(roots, vec![fine]);
        assert_eq!(report.records[0].root.state, Some(0));
    }
}
