// Wed Jan 21 2026 - Alex

use std::fmt;

const STATE_MACHINE_BOX_PREFIX: &str =
    "S_P_CoreLib_System_Runtime_CompilerServices_AsyncTaskMethodBuilder_1_AsyncStateMachineBox_1<";
const LIST_PREFIX: &str = "S_P_CoreLib_System_Collections_Generic_List_1";
const CONTINUATION_WRAPPER_PREFIX: &str =
    "S_P_CoreLib_System_Runtime_CompilerServices_AsyncMethodBuilderCore_ContinuationWrapper";
const TASK_TYPE_NAME: &str = "S_P_CoreLib_System_Threading_Tasks_Task";

const TASK_PREFIXES: &[&str] = &[
    "S_P_CoreLib_System_Threading_Tasks_Task_1<",
    "S_P_CoreLib_System_Threading_Tasks_Task_DelayPromiseWithCancellation",
    "S_P_CoreLib_System_Threading_Tasks_Task_WhenAllPromise",
    "S_P_CoreLib_System_Threading_Tasks_TaskFactory_CompleteOnInvokePromise",
    "S_P_CoreLib_System_Threading_Tasks_UnwrapPromise_1",
    "S_P_CoreLib_System_Threading_Tasks_ContinuationResultTaskFromTask_1",
    "S_P_CoreLib_System_Threading_Tasks_ContinuationTaskFromResultTask_1",
    "S_P_CoreLib_System_Threading_Tasks_Task_TwoTaskWhenAnyPromise_1",
    "S_P_CoreLib_System_Threading_Tasks_ContinuationResultTaskFromResultTask_2",
    "S_P_CoreLib_System_Threading_Tasks_ContinuationTaskFromTask",
];

/// Classified once per type from its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectShape {
    StateMachineBox,
    Task,
    List,
    ContinuationWrapper,
    Other,
}

impl ObjectShape {
    pub fn classify(type_name: &str) -> Self {
        if type_name.starts_with(STATE_MACHINE_BOX_PREFIX) {
            Self::StateMachineBox
        } else if type_name.starts_with(LIST_PREFIX) {
            Self::List
        } else if type_name.starts_with(CONTINUATION_WRAPPER_PREFIX) {
            Self::ContinuationWrapper
        } else if type_name == TASK_TYPE_NAME
            || TASK_PREFIXES.iter().any(|prefix| type_name.starts_with(prefix))
        {
            Self::Task
        } else {
            Self::Other
        }
    }

    pub fn is_list(self) -> bool {
        self == Self::List
    }
}

impl fmt::Display for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateMachineBox => write!(f, "state-machine-box"),
            Self::Task => write!(f, "task"),
            Self::List => write!(f, "list"),
            Self::ContinuationWrapper => write!(f, "continuation-wrapper"),
            Self::Other => write!(f, "other"),
        }
    }
}
