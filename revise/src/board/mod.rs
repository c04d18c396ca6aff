//! Board projection: read-only views computed from a task collection.
//!
//! Nothing here touches a store. [`build_board`] groups one scope's tasks
//! into the three status columns, [`filter::BoardFilter`] narrows what is
//! shown and [`drag::resolve_move`] turns a finished drag into the store
//! mutation it stands for.

pub mod drag;
pub mod filter;
pub mod stats;

use revise_proto::project::ProjectId;
use revise_proto::task::{Task, TaskStatus};

pub use drag::{DragGesture, DropLocation, MoveTask, resolve_move};
pub use filter::BoardFilter;
pub use stats::TaskCounts;

/// Which tasks a board shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Tasks of one project.
    Project(ProjectId),
    /// Tasks without a project.
    Personal,
}

impl Scope {
    /// Returns `true` if `task` belongs to this scope.
    #[must_use]
    pub fn contains(&self, task: &Task) -> bool {
        match self {
            Self::Project(id) => task.belongs_to(id),
            Self::Personal => task.is_personal(),
        }
    }
}

/// One status column of a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column<'a> {
    pub status: TaskStatus,
    /// Display title, e.g. `"In Progress"`.
    pub title: &'static str,
    /// Visible tasks in collection order.
    pub tasks: Vec<&'a Task>,
}

/// A board ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView<'a> {
    pub scope: Scope,
    /// Always three columns: to-do, in-progress, done.
    pub columns: [Column<'a>; 3],
    /// Counts of the visible tasks.
    pub counts: TaskCounts,
    /// Scope tasks hidden by the filter.
    pub filtered_out: usize,
}

impl<'a> BoardView<'a> {
    /// The column holding `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &Column<'a> {
        match status {
            TaskStatus::ToDo => &self.columns[0],
            TaskStatus::InProgress => &self.columns[1],
            TaskStatus::Done => &self.columns[2],
        }
    }

    /// Number of tasks shown across all columns.
    #[must_use]
    pub fn visible(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

/// Groups the tasks of `scope` that pass `filter` into status columns.
///
/// Every task appears in exactly one column, the one of its status. Tasks
/// outside the scope are ignored entirely and are not counted as filtered.
#[must_use]
pub fn build_board<'a>(tasks: &'a [Task], scope: &Scope, filter: &BoardFilter) -> BoardView<'a> {
    let mut columns = TaskStatus::ALL.map(|status| Column {
        status,
        title: status.title(),
        tasks: Vec::new(),
    });
    let mut filtered_out = 0;

    for task in tasks.iter().filter(|t| scope.contains(t)) {
        if !filter.matches(task) {
            filtered_out += 1;
            continue;
        }
        if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
            column.tasks.push(task);
        }
    }

    let counts = TaskCounts::tally(columns.iter().flat_map(|c| c.tasks.iter().copied()));
    BoardView {
        scope: scope.clone(),
        columns,
        counts,
        filtered_out,
    }
}
