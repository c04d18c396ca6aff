//! Drag-and-drop completion.
//!
//! A finished drag is described by a [`DragGesture`]. [`resolve_move`]
//! decides whether it changes anything and, if so, which status the task
//! moves to. Only the column is persisted; the drop index is not.

use revise_proto::task::{TaskId, TaskStatus};

/// A position on the board: a column and an index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropLocation {
    pub column: TaskStatus,
    pub index: usize,
}

/// A completed drag of one task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    pub task_id: TaskId,
    pub source: DropLocation,
    /// `None` if the card was dropped outside any column.
    pub destination: Option<DropLocation>,
}

/// The store mutation a drag resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTask {
    pub task_id: TaskId,
    pub status: TaskStatus,
}

/// Resolves a drag into a status move.
///
/// Returns `None` if the card was dropped outside the board or back at its
/// original position. A drop elsewhere in the same column still resolves
/// to a move to that column's status.
#[must_use]
pub fn resolve_move(gesture: &DragGesture) -> Option<MoveTask> {
    let destination = gesture.destination?;
    if destination == gesture.source {
        return None;
    }
    Some(MoveTask {
        task_id: gesture.task_id.clone(),
        status: destination.column,
    })
}
