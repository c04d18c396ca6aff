//! Board filter: search text, priority and assignee.

use revise_proto::task::{Priority, Task};

/// Narrows which tasks a board shows. The default filter shows everything.
///
/// All set criteria must hold at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardFilter {
    /// Case-insensitive substring of the title or description. Empty
    /// text matches every task; whitespace is matched literally.
    pub search: String,
    pub priority: Option<Priority>,
    /// Exact assignee label.
    pub assignee: Option<String>,
}

impl BoardFilter {
    /// A filter on search text only.
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns `true` if no criterion is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.priority.is_none() && self.assignee.is_none()
    }

    /// Returns `true` if `task` passes every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.assignee.as_deref().is_none_or(|a| task.assignee == a)
    }

    fn matches_search(&self, task: &Task) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }
}
