//! Task store: the single owner of one identity's task collection.
//!
//! Every mutation writes the whole collection through [`ResilientCollection`].
//! Status changes go through [`TaskStore::move_to`] or
//! [`TaskStore::update`]; any status can move to any other.

use chrono::Utc;

use revise_proto::identity::UserId;
use revise_proto::project::ProjectId;
use revise_proto::task::{NewTask, Task, TaskId, TaskPatch, TaskStatus};

use crate::board::Scope;
use crate::storage::{CollectionKind, Persistence, ResilientCollection, StoreError};

/// Owns the tasks of one signed-in user, personal and project tasks alike.
#[derive(Debug)]
pub struct TaskStore {
    tasks: ResilientCollection<Task>,
}

impl TaskStore {
    /// Loads the task collection of `identity`. Nothing is seeded.
    #[must_use]
    pub fn load(identity: UserId, persistence: Persistence) -> Self {
        let (tasks, _) = ResilientCollection::load(identity, CollectionKind::Tasks, persistence);
        Self { tasks }
    }

    #[must_use]
    pub const fn identity(&self) -> &UserId {
        self.tasks.identity()
    }

    /// Creates a task and persists it. A draft without a status starts in
    /// [`TaskStatus::ToDo`].
    pub fn create(&mut self, draft: NewTask) -> Task {
        let task = Task {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            assignee: draft.assignee,
            priority: draft.priority,
            status: draft.status.unwrap_or_default(),
            project_id: draft.project_id,
            created_by: self.identity().clone(),
            created_at: Utc::now(),
        };
        self.tasks.items_mut().push(task.clone());
        self.tasks.save();
        tracing::debug!(
            task_id = %task.id,
            status = %task.status,
            personal = task.is_personal(),
            "task created"
        );
        task
    }

    /// Merges the present fields of `patch` into the task with `id`.
    pub fn update(&mut self, id: &TaskId, patch: TaskPatch) {
        let Some(task) = self.tasks.items_mut().iter_mut().find(|t| t.id == *id) else {
            tracing::debug!(task_id = %id, "update ignored: unknown task");
            return;
        };
        task.apply(patch);
        self.tasks.save();
    }

    /// Moves the task to another board column.
    pub fn move_to(&mut self, id: &TaskId, status: TaskStatus) {
        self.update(id, TaskPatch::status(status));
    }

    pub fn delete(&mut self, id: &TaskId) {
        let tasks = self.tasks.items_mut();
        let before = tasks.len();
        tasks.retain(|t| t.id != *id);
        if tasks.len() == before {
            tracing::debug!(task_id = %id, "delete ignored: unknown task");
            return;
        }
        self.tasks.save();
        tracing::debug!(task_id = %id, "task deleted");
    }

    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.items().iter().find(|t| t.id == *id)
    }

    /// Every task in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Task] {
        self.tasks.items()
    }

    /// Tasks whose project is `project_id`, whether or not that project
    /// still exists.
    #[must_use]
    pub fn by_project(&self, project_id: &ProjectId) -> Vec<&Task> {
        self.filtered(|t| t.belongs_to(project_id))
    }

    #[must_use]
    pub fn by_project_and_status(&self, project_id: &ProjectId, status: TaskStatus) -> Vec<&Task> {
        self.filtered(|t| t.belongs_to(project_id) && t.status == status)
    }

    /// Tasks without a project.
    #[must_use]
    pub fn personal(&self) -> Vec<&Task> {
        self.filtered(Task::is_personal)
    }

    #[must_use]
    pub fn personal_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.filtered(|t| t.is_personal() && t.status == status)
    }

    /// Tasks that belong to `scope`.
    #[must_use]
    pub fn in_scope(&self, scope: &Scope) -> Vec<&Task> {
        self.filtered(|t| scope.contains(t))
    }

    /// Retries a save that failed earlier.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the retried save.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.tasks.flush()
    }

    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.tasks.has_unsaved_changes()
    }

    fn filtered(&self, keep: impl Fn(&Task) -> bool) -> Vec<&Task> {
        self.tasks.items().iter().filter(|t| keep(t)).collect()
    }
}
