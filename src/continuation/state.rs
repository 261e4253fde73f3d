// Sat Jan 24 2026 - Alex

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StateFlags: u32 {
        // creation options
        const PREFER_FAIRNESS = 0x01;
        const LONG_RUNNING = 0x02;
        const ATTACHED_TO_PARENT = 0x04;
        const DENY_CHILD_ATTACH = 0x08;
        const HIDE_SCHEDULER = 0x10;
        const RUN_CONTINUATIONS_ASYNCHRONOUSLY = 0x40;

        // internal options
        const CONTINUATION_TASK = 0x0200;
        const PROMISE_TASK = 0x0400;
        const LAZY_CANCELLATION = 0x1000;
        const QUEUED_BY_RUNTIME = 0x2000;
        const DO_NOT_DISPOSE = 0x4000;

        // lifecycle
        const STARTED = 0x10000;
        const DELEGATE_INVOKED = 0x20000;
        const DISPOSED = 0x40000;
        const EXCEPTION_OBSERVED_BY_PARENT = 0x80000;
        const CANCELLATION_ACKNOWLEDGED = 0x100000;
        const FAULTED = 0x200000;
        const CANCELED = 0x400000;
        const WAITING_ON_CHILDREN = 0x800000;
        const RAN_TO_COMPLETION = 0x1000000;
        const WAITING_FOR_ACTIVATION = 0x2000000;
        const COMPLETION_RESERVED = 0x4000000;
        const THREAD_WAS_ABORTED = 0x8000000;
        const WAIT_COMPLETION_NOTIFICATION = 0x10000000;
        const EXECUTION_CONTEXT_IS_NULL = 0x20000000;
        const TASK_SCHEDULED_WAS_FIRED = 0x40000000;

        const COMPLETED = Self::RAN_TO_COMPLETION.bits() | Self::FAULTED.bits() | Self::CANCELED.bits();
    }
}

const FLAG_NAMES: &[(StateFlags, &str)] = &[
    (StateFlags::PREFER_FAIRNESS, "PreferFairness"),
    (StateFlags::LONG_RUNNING, "LongRunning"),
    (StateFlags::ATTACHED_TO_PARENT, "AttachedToParent"),
    (StateFlags::DENY_CHILD_ATTACH, "DenyChildAttach"),
    (StateFlags::HIDE_SCHEDULER, "HideScheduler"),
    (StateFlags::RUN_CONTINUATIONS_ASYNCHRONOUSLY, "RunContinuationsAsynchronously"),
    (StateFlags::CONTINUATION_TASK, "ContinuationTask"),
    (StateFlags::PROMISE_TASK, "PromiseTask"),
    (StateFlags::LAZY_CANCELLATION, "LazyCancellation"),
    (StateFlags::QUEUED_BY_RUNTIME, "QueuedByRuntime"),
    (StateFlags::DO_NOT_DISPOSE, "DoNotDispose"),
    (StateFlags::STARTED, "STARTED"),
    (StateFlags::DELEGATE_INVOKED, "DELEGATE_INVOKED"),
    (StateFlags::DISPOSED, "DISPOSED"),
    (StateFlags::EXCEPTION_OBSERVED_BY_PARENT, "EXCEPTIONOBSERVEDBYPARENT"),
    (StateFlags::CANCELLATION_ACKNOWLEDGED, "CANCELLATIONACKNOWLEDGED"),
    (StateFlags::FAULTED, "FAULTED"),
    (StateFlags::CANCELED, "CANCELED"),
    (StateFlags::WAITING_ON_CHILDREN, "WAITING_ON_CHILDREN"),
    (StateFlags::RAN_TO_COMPLETION, "RAN_TO_COMPLETION"),
    (StateFlags::WAITING_FOR_ACTIVATION, "WAITINGFORACTIVATION"),
    (StateFlags::COMPLETION_RESERVED, "COMPLETION_RESERVED"),
    (StateFlags::THREAD_WAS_ABORTED, "THREAD_WAS_ABORTED"),
    (StateFlags::WAIT_COMPLETION_NOTIFICATION, "WAIT_COMPLETION_NOTIFICATION"),
    (StateFlags::EXECUTION_CONTEXT_IS_NULL, "EXECUTIONCONTEXT_IS_NULL"),
    (StateFlags::TASK_SCHEDULED_WAS_FIRED, "TASKSCHEDULED_WAS_FIRED"),
];

impl StateFlags {
    /// Keeps only the bits with a name; unknown bits are dropped.
    pub fn decode(state: i32) -> Self {
        Self::from_bits_truncate(state as u32)
    }

    pub fn is_completed(self) -> bool {
        self.intersects(Self::COMPLETED)
    }

    pub fn names(self) -> Vec<&'static str> {
        FLAG_NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for StateFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "( ")?;
        for name in self.names() {
            write!(f, "{} ", name)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ran_to_completion_alone() {
        let flags = StateFlags::decode(0x1000000);
        assert_eq!(flags, StateFlags::RAN_TO_COMPLETION);
        assert_eq!(flags.names(), vec!["RAN_TO_COMPLETION"]);
        assert!(flags.is_completed());
    }

    #[test]
    fn test_completed_mask() {
        let flags = StateFlags::decode(0x1600000);
        assert_eq!(flags, StateFlags::COMPLETED);
        assert_eq!(flags.names(), vec!["FAULTED", "CANCELED", "RAN_TO_COMPLETION"]);
    }

    #[test]
    fn test_running_task_not_completed() {
        let flags = StateFlags::decode(0x2010000);
        assert!(!flags.is_completed());
        assert_eq!(flags.to_string(), "( STARTED WAITINGFORACTIVATION )");
        assert_eq!(StateFlags::decode(0).to_string(), "( )");
    }

    #[test]
    fn test_unknown_bits_ignored() {
        let flags = StateFlags::decode(0x100 | 0x10000);
        assert_eq!(flags, StateFlags::STARTED);
    }
}
