//! Signed-in session and the per-identity workspace.
//!
//! A [`Session`] holds at most one [`Workspace`]. Switching identity drops
//! the previous workspace and loads the new identity's collections in
//! full; nothing is merged across identities.

use revise_proto::identity::UserId;
use revise_proto::project::ProjectId;
use revise_proto::task::Task;

use crate::board::{self, BoardFilter, BoardView, DragGesture, MoveTask, Scope, TaskCounts};
use crate::projects::ProjectStore;
use crate::storage::{Persistence, StoreError};
use crate::tasks::TaskStore;

/// The stores of one signed-in identity.
#[derive(Debug)]
pub struct Workspace {
    projects: ProjectStore,
    tasks: TaskStore,
}

impl Workspace {
    /// Loads both collections of `identity`.
    #[must_use]
    pub fn load(identity: &UserId, persistence: &Persistence) -> Self {
        Self {
            projects: ProjectStore::load(identity.clone(), persistence.clone()),
            tasks: TaskStore::load(identity.clone(), persistence.clone()),
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &UserId {
        self.projects.identity()
    }

    #[must_use]
    pub const fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub const fn projects_mut(&mut self) -> &mut ProjectStore {
        &mut self.projects
    }

    #[must_use]
    pub const fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub const fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    /// Builds the board of `scope` from the current tasks.
    #[must_use]
    pub fn board(&self, scope: &Scope, filter: &BoardFilter) -> BoardView<'_> {
        board::build_board(self.tasks.all(), scope, filter)
    }

    /// Applies a finished drag to the task store.
    ///
    /// Returns the move that was applied, or `None` if the drag changed
    /// nothing.
    pub fn apply_drop(&mut self, gesture: &DragGesture) -> Option<MoveTask> {
        let mv = board::resolve_move(gesture)?;
        self.tasks.move_to(&mv.task_id, mv.status);
        Some(mv)
    }

    /// Project tasks whose project no longer exists.
    #[must_use]
    pub fn orphans(&self) -> Vec<&Task> {
        self.tasks
            .all()
            .iter()
            .filter(|t| {
                t.project_id
                    .as_ref()
                    .is_some_and(|id| self.projects.get(id).is_none())
            })
            .collect()
    }

    /// Status counts of one project's tasks.
    #[must_use]
    pub fn project_counts(&self, id: &ProjectId) -> TaskCounts {
        TaskCounts::tally(self.tasks.by_project(id))
    }

    /// `true` if either store holds changes that failed to save.
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.projects.has_unsaved_changes() || self.tasks.has_unsaved_changes()
    }

    /// Retries failed saves in both stores.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`]; both stores are always attempted.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let projects = self.projects.flush();
        let tasks = self.tasks.flush();
        projects.and(tasks)
    }
}

/// Current identity and its workspace.
#[derive(Debug)]
pub struct Session {
    persistence: Persistence,
    workspace: Option<Workspace>,
}

impl Session {
    /// A signed-out session over `persistence`.
    #[must_use]
    pub const fn new(persistence: Persistence) -> Self {
        Self {
            persistence,
            workspace: None,
        }
    }

    /// Signs in as `identity`, or signs out for `None`.
    ///
    /// The previous workspace is dropped before the new one is loaded.
    pub fn switch_identity(&mut self, identity: Option<UserId>) {
        let previous = self.workspace.take().map(|w| w.identity().clone());
        match identity {
            Some(user) => {
                tracing::info!(identity = %user, ?previous, "switching identity");
                self.workspace = Some(Workspace::load(&user, &self.persistence));
            }
            None => {
                tracing::info!(?previous, "signed out");
            }
        }
    }

    /// Signed-in identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&UserId> {
        self.workspace.as_ref().map(Workspace::identity)
    }

    #[must_use]
    pub const fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub const fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.workspace.as_mut()
    }

    /// Deletes the signed-in identity's stored collections and reloads,
    /// which seeds the default project again. Does nothing when signed out.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend refuses the removal; the
    /// workspace is left as it was.
    pub fn clear_storage(&mut self) -> Result<(), StoreError> {
        let Some(identity) = self.identity().cloned() else {
            return Ok(());
        };
        self.persistence.clear(&identity)?;
        self.workspace = Some(Workspace::load(&identity, &self.persistence));
        Ok(())
    }
}
