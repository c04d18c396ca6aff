//! Project store: the single owner of one identity's project collection.

use chrono::Utc;

use revise_proto::identity::UserId;
use revise_proto::project::{NewProject, Project, ProjectId, ProjectPatch};

use crate::storage::{
    CollectionKind, LoadOutcome, Persistence, ResilientCollection, StoreError,
};

/// Owns the projects of one signed-in user.
///
/// Every mutation is written through to storage immediately. Operations on
/// unknown ids are silent no-ops. The store does not validate its input;
/// see [`crate::validation`] for the form-level checks.
#[derive(Debug)]
pub struct ProjectStore {
    projects: ResilientCollection<Project>,
    /// Project the user is currently looking at, if any.
    current: Option<ProjectId>,
}

impl ProjectStore {
    /// Loads the project collection of `identity`.
    ///
    /// A user seen for the first time gets one default project, saved
    /// right away. A failed load yields an empty store and seeds nothing.
    #[must_use]
    pub fn load(identity: UserId, persistence: Persistence) -> Self {
        let (projects, outcome) =
            ResilientCollection::load(identity, CollectionKind::Projects, persistence);
        let mut store = Self {
            projects,
            current: None,
        };
        if outcome == LoadOutcome::NeverSaved {
            let seeded = store.create(NewProject::first_project());
            tracing::info!(
                identity = %store.identity(),
                project_id = %seeded.id,
                "seeded default project for new user"
            );
        }
        store
    }

    /// Identity that owns this store.
    #[must_use]
    pub const fn identity(&self) -> &UserId {
        self.projects.identity()
    }

    /// Creates a project owned by the store's identity and persists it.
    ///
    /// The creator becomes the only member.
    pub fn create(&mut self, draft: NewProject) -> Project {
        let owner = self.identity().clone();
        let project = Project {
            id: ProjectId::new(),
            name: draft.name,
            description: draft.description,
            color: draft.color,
            created_by: owner.clone(),
            created_at: Utc::now(),
            members: vec![owner],
        };
        self.projects.items_mut().push(project.clone());
        self.projects.save();
        tracing::debug!(project_id = %project.id, name = %project.name, "project created");
        project
    }

    /// Merges the present fields of `patch` into the project with `id`.
    pub fn update(&mut self, id: &ProjectId, patch: ProjectPatch) {
        let Some(project) = self.find_mut(id) else {
            tracing::debug!(project_id = %id, "update ignored: unknown project");
            return;
        };
        project.apply(patch);
        self.projects.save();
    }

    /// Removes the project with `id`, clearing the selection if it was
    /// selected. Tasks that reference the project are left alone.
    pub fn delete(&mut self, id: &ProjectId) {
        let projects = self.projects.items_mut();
        let before = projects.len();
        projects.retain(|p| p.id != *id);
        if projects.len() == before {
            tracing::debug!(project_id = %id, "delete ignored: unknown project");
            return;
        }
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        self.projects.save();
        tracing::debug!(project_id = %id, "project deleted");
    }

    /// Looks up a project by id.
    #[must_use]
    pub fn get(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.items().iter().find(|p| p.id == *id)
    }

    /// Projects visible to the store's identity, in insertion order.
    #[must_use]
    pub fn list_visible(&self) -> Vec<&Project> {
        let user = self.identity();
        self.projects
            .items()
            .iter()
            .filter(|p| p.is_visible_to(user))
            .collect()
    }

    /// Every stored project, visible or not, in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Project] {
        self.projects.items()
    }

    /// Adds a member to a project.
    pub fn add_member(&mut self, id: &ProjectId, user: UserId) {
        let Some(project) = self.find_mut(id) else {
            tracing::debug!(project_id = %id, "add_member ignored: unknown project");
            return;
        };
        if project.add_member(user) {
            self.projects.save();
        }
    }

    /// Removes a member from a project. Removing the creator does nothing.
    pub fn remove_member(&mut self, id: &ProjectId, user: &UserId) {
        let Some(project) = self.find_mut(id) else {
            tracing::debug!(project_id = %id, "remove_member ignored: unknown project");
            return;
        };
        if project.remove_member(user) {
            self.projects.save();
        }
    }

    /// The currently selected project, if it still exists.
    #[must_use]
    pub fn current(&self) -> Option<&Project> {
        self.current.as_ref().and_then(|id| self.get(id))
    }

    /// Selects a project. Unknown ids leave the selection unchanged.
    ///
    /// Returns `true` if the selection now points at `id`.
    pub fn select(&mut self, id: &ProjectId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.current = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// Retries a save that failed earlier.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the retried save.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.projects.flush()
    }

    /// `true` while in-memory projects differ from what storage holds.
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.projects.has_unsaved_changes()
    }

    fn find_mut(&mut self, id: &ProjectId) -> Option<&mut Project> {
        self.projects.items_mut().iter_mut().find(|p| p.id == *id)
    }
}
