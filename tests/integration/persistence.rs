//! Integration tests for persistence and the session lifecycle.
//!
//! Covers file-backed reloads, first-run seeding, failing backends and
//! clearing stored data.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use revise::session::Session;
use revise::storage::{
    CollectionKind, FileStore, InMemoryStore, KeyValueStore, Persistence, StoreError,
};
use revise_proto::identity::UserId;
use revise_proto::project::{DEFAULT_PROJECT_NAME, NewProject, Project, ProjectPatch};
use revise_proto::task::{NewTask, Priority, Task, TaskStatus};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Backend whose reads and writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryStore,
    reads_fail: AtomicBool,
    writes_fail: AtomicBool,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.reads_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage offline".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.writes_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }
}

fn file_persistence(dir: &std::path::Path) -> Persistence {
    Persistence::new(Arc::new(FileStore::open(dir).unwrap()))
}

fn sign_in(persistence: &Persistence, user: &str) -> Session {
    let mut session = Session::new(persistence.clone());
    session.switch_identity(Some(UserId::new(user)));
    session
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

#[test]
fn file_backend_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (project, task) = {
        let mut session = sign_in(&file_persistence(dir.path()), "alice");
        let ws = session.workspace_mut().unwrap();
        let project = ws
            .projects_mut()
            .create(NewProject::new("Launch").with_description("Q3 release"));
        let task = ws.tasks_mut().create(
            NewTask::new("Fix login bug")
                .in_project(project.id.clone())
                .with_priority(Priority::High)
                .with_assignee("Jane"),
        );
        ws.tasks_mut().move_to(&task.id, TaskStatus::Done);
        (project, task)
    };

    let session = sign_in(&file_persistence(dir.path()), "alice");
    let ws = session.workspace().unwrap();
    assert_eq!(ws.projects().get(&project.id), Some(&project));
    let reloaded = ws.tasks().get(&task.id).unwrap();
    assert_eq!(reloaded.status, TaskStatus::Done);
    assert_eq!(reloaded.title, task.title);
    assert_eq!(reloaded.created_at, task.created_at);
    assert!(dir.path().join("projects_alice.json").exists());
    assert!(dir.path().join("tasks_alice.json").exists());
}

#[test]
fn stored_collections_are_json_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = file_persistence(dir.path());
    let mut session = sign_in(&persistence, "alice");
    session
        .workspace_mut()
        .unwrap()
        .tasks_mut()
        .create(NewTask::new("json"));

    let raw = std::fs::read_to_string(dir.path().join("tasks_alice.json")).unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains("\"status\":\"to-do\""));
    assert!(raw.contains("\"createdBy\":\"alice\""));
    let tasks: Vec<Task> = persistence
        .load(&UserId::new("alice"), CollectionKind::Tasks)
        .unwrap()
        .unwrap();
    assert_eq!(tasks.len(), 1);
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

#[test]
fn default_project_is_seeded_once() {
    let persistence = Persistence::in_memory();
    {
        let mut session = sign_in(&persistence, "alice");
        let ws = session.workspace_mut().unwrap();
        let seeded = ws.projects().list_visible()[0].id.clone();
        ws.projects_mut().update(
            &seeded,
            ProjectPatch {
                name: Some("Renamed".to_string()),
                ..ProjectPatch::default()
            },
        );
    }
    let session = sign_in(&persistence, "alice");
    let names: Vec<&str> = session
        .workspace()
        .unwrap()
        .projects()
        .all()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Renamed"]);
}

#[test]
fn deleting_every_project_stays_deleted() {
    let persistence = Persistence::in_memory();
    {
        let mut session = sign_in(&persistence, "alice");
        let ws = session.workspace_mut().unwrap();
        let seeded = ws.projects().list_visible()[0].id.clone();
        ws.projects_mut().delete(&seeded);
    }
    let session = sign_in(&persistence, "alice");
    assert!(session.workspace().unwrap().projects().all().is_empty());
}

#[test]
fn failed_load_does_not_seed() {
    let backend = Arc::new(FlakyStore::default());
    backend.reads_fail.store(true, Ordering::SeqCst);
    let persistence = Persistence::new(backend.clone());

    let session = sign_in(&persistence, "alice");
    let ws = session.workspace().unwrap();
    assert!(ws.projects().all().is_empty());
    assert!(ws.tasks().all().is_empty());
    assert!(backend.inner.is_empty());
}

#[test]
fn corrupt_collection_starts_empty() {
    let backend = Arc::new(InMemoryStore::new());
    backend.set("tasks_alice", "{not json").unwrap();
    let persistence = Persistence::new(backend.clone());

    let mut session = sign_in(&persistence, "alice");
    let ws = session.workspace_mut().unwrap();
    assert!(ws.tasks().all().is_empty());

    // The next mutation overwrites the corrupt value.
    ws.tasks_mut().create(NewTask::new("fresh"));
    let tasks: Vec<Task> = persistence
        .load(&UserId::new("alice"), CollectionKind::Tasks)
        .unwrap()
        .unwrap();
    assert_eq!(tasks.len(), 1);
}

// ---------------------------------------------------------------------------
// Failing writes
// ---------------------------------------------------------------------------

#[test]
fn failed_save_is_retried_on_next_mutation() {
    let backend = Arc::new(FlakyStore::default());
    let persistence = Persistence::new(backend.clone());
    let mut session = sign_in(&persistence, "alice");
    let ws = session.workspace_mut().unwrap();

    backend.writes_fail.store(true, Ordering::SeqCst);
    let first = ws.tasks_mut().create(NewTask::new("first"));
    assert!(ws.tasks().get(&first.id).is_some());
    assert!(ws.has_unsaved_changes());

    backend.writes_fail.store(false, Ordering::SeqCst);
    ws.tasks_mut().create(NewTask::new("second"));
    assert!(!ws.has_unsaved_changes());

    let stored: Vec<Task> = persistence
        .load(&UserId::new("alice"), CollectionKind::Tasks)
        .unwrap()
        .unwrap();
    assert_eq!(stored.len(), 2);
}

#[test]
fn flush_retries_without_new_mutation() {
    let backend = Arc::new(FlakyStore::default());
    let persistence = Persistence::new(backend.clone());
    let mut session = sign_in(&persistence, "alice");
    let ws = session.workspace_mut().unwrap();

    backend.writes_fail.store(true, Ordering::SeqCst);
    ws.projects_mut().create(NewProject::new("Offline"));
    assert!(ws.flush().is_err());
    assert!(ws.projects().has_unsaved_changes());

    backend.writes_fail.store(false, Ordering::SeqCst);
    ws.flush().unwrap();
    assert!(!ws.has_unsaved_changes());
    let stored: Vec<Project> = persistence
        .load(&UserId::new("alice"), CollectionKind::Projects)
        .unwrap()
        .unwrap();
    assert_eq!(stored.len(), 2);
}

// ---------------------------------------------------------------------------
// Clearing
// ---------------------------------------------------------------------------

#[test]
fn clear_storage_resets_only_current_identity() {
    let persistence = Persistence::in_memory();
    let mut bob = sign_in(&persistence, "bob");
    bob.workspace_mut()
        .unwrap()
        .tasks_mut()
        .create(NewTask::new("bob's"));

    let mut alice = sign_in(&persistence, "alice");
    alice
        .workspace_mut()
        .unwrap()
        .projects_mut()
        .create(NewProject::new("Extra"));
    alice.clear_storage().unwrap();

    let ws = alice.workspace().unwrap();
    let names: Vec<&str> = ws.projects().all().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, [DEFAULT_PROJECT_NAME]);

    let bob = sign_in(&persistence, "bob");
    assert_eq!(bob.workspace().unwrap().tasks().all().len(), 1);
}
