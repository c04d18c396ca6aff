//! Per-status task counts and completion progress.

use revise_proto::task::{Task, TaskStatus};

/// Number of tasks in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl TaskCounts {
    /// Counts `tasks` by status.
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::ToDo => counts.to_do += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::ToDo => self.to_do,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.to_do + self.in_progress + self.done
    }

    /// Share of done tasks, rounded half up to a whole percent. `0` when
    /// there are no tasks.
    #[must_use]
    pub const fn progress_percent(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation)]
        let percent = ((self.done * 200 + total) / (2 * total)) as u8;
        percent
    }
}
