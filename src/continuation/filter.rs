// Sat Jan 24 2026 - Alex

use crate::memory::Address;

/// Objects smaller than this cannot hold a state machine or task.
pub const DEFAULT_MIN_ASYNC_OBJECT_SIZE: u64 = 24;

#[derive(Debug, Clone)]
pub struct AsyncFilter {
    pub type_name: Option<String>,
    pub address: Option<Address>,
    pub tasks: bool,
    /// Also accept any type carrying the task state and continuation fields. Slow.
    pub user_defined: bool,
    pub completed: bool,
    pub min_object_size: u64,
}

impl Default for AsyncFilter {
    fn default() -> Self {
        Self {
            type_name: None,
            address: None,
            tasks: false,
            user_defined: false,
            completed: false,
            min_object_size: DEFAULT_MIN_ASYNC_OBJECT_SIZE,
        }
    }
}

impl AsyncFilter {
    pub fn with_type(mut self, type_name: &str) -> Self {
        self.type_name = Some(type_name.to_string());
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn with_tasks(mut self, tasks: bool) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_user_defined(mut self, user_defined: bool) -> Self {
        self.user_defined = user_defined;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn has_type_filter(&self) -> bool {
        self.type_name.as_deref().map_or(false, |t| !t.is_empty())
    }

    pub fn type_matches(&self, type_name: &str) -> bool {
        match self.type_name.as_deref() {
            Some(filter) if !filter.is_empty() => type_name
                .to_lowercase()
                .contains(&filter.to_lowercase()),
            _ => true,
        }
    }
}
