//! Integration tests for the board flow: projects, tasks, filters, drags.
//!
//! Drives a [`Session`] the way an interactive surface would and checks
//! what each user sees.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use revise::board::{BoardFilter, DragGesture, DropLocation, Scope, TaskCounts};
use revise::session::Session;
use revise::storage::Persistence;
use revise::validation::{self, Limits, ValidationError};
use revise_proto::identity::UserId;
use revise_proto::project::{DEFAULT_PROJECT_NAME, NewProject, ProjectColor};
use revise_proto::task::{NewTask, Priority, TaskStatus};

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn session_for(persistence: &Persistence, user: &str) -> Session {
    let mut session = Session::new(persistence.clone());
    session.switch_identity(Some(UserId::new(user)));
    session
}

fn visible_names(session: &Session) -> Vec<String> {
    session
        .workspace()
        .unwrap()
        .projects()
        .list_visible()
        .iter()
        .map(|p| p.name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Scenario: a new project and its first task
// ---------------------------------------------------------------------------

#[test]
fn launch_project_is_private_to_its_creator() {
    let persistence = Persistence::in_memory();
    let mut u1 = session_for(&persistence, "U1");
    let seed = u1.workspace().unwrap().projects().list_visible()[0].clone();

    let draft = NewProject::new("Launch").with_color(ProjectColor::Green);
    validation::validate_new_project(&draft).unwrap();
    let launch = u1.workspace_mut().unwrap().projects_mut().create(draft);

    assert_eq!(visible_names(&u1), [DEFAULT_PROJECT_NAME, "Launch"]);
    assert_eq!(u1.workspace().unwrap().projects().get(&seed.id), Some(&seed));

    let u2 = session_for(&persistence, "U2");
    assert_eq!(visible_names(&u2), [DEFAULT_PROJECT_NAME]);
    assert!(u2.workspace().unwrap().projects().get(&launch.id).is_none());
}

#[test]
fn task_moves_between_columns_without_duplication() {
    let mut session = session_for(&Persistence::in_memory(), "U1");
    let ws = session.workspace_mut().unwrap();
    let launch = ws.projects_mut().create(NewProject::new("Launch"));
    let scope = Scope::Project(launch.id.clone());

    let draft = NewTask::new("Write press release").in_project(launch.id.clone());
    validation::validate_new_task(&draft, ws.projects(), Limits::default()).unwrap();
    let task = ws.tasks_mut().create(draft);

    let board = ws.board(&scope, &BoardFilter::default());
    assert_eq!(board.column(TaskStatus::ToDo).tasks, vec![&task]);
    assert_eq!(board.counts, TaskCounts { to_do: 1, in_progress: 0, done: 0 });

    ws.tasks_mut().move_to(&task.id, TaskStatus::InProgress);
    let board = ws.board(&scope, &BoardFilter::default());
    assert!(board.column(TaskStatus::ToDo).tasks.is_empty());
    assert_eq!(board.column(TaskStatus::InProgress).tasks.len(), 1);
    assert_eq!(board.column(TaskStatus::InProgress).tasks[0].id, task.id);
    assert_eq!(board.visible(), 1);
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[test]
fn filter_criteria_combine() {
    let mut session = session_for(&Persistence::in_memory(), "U1");
    let ws = session.workspace_mut().unwrap();
    let project = ws.projects_mut().create(NewProject::new("Website"));
    let scope = Scope::Project(project.id.clone());
    ws.tasks_mut().create(
        NewTask::new("Fix login bug")
            .in_project(project.id.clone())
            .with_priority(Priority::High)
            .with_assignee("Jane"),
    );
    ws.tasks_mut()
        .create(NewTask::new("Update footer").in_project(project.id.clone()));

    let high = BoardFilter::search("login").with_priority(Priority::High);
    let view = ws.board(&scope, &high);
    assert_eq!(view.visible(), 1);
    assert_eq!(view.filtered_out, 1);

    let low = BoardFilter::search("login").with_priority(Priority::Low);
    let view = ws.board(&scope, &low);
    assert_eq!(view.visible(), 0);
    assert_eq!(view.filtered_out, 2);

    let jane = BoardFilter::default().with_assignee("Jane");
    assert_eq!(ws.board(&scope, &jane).visible(), 1);

    // Filtering leaves the store untouched.
    assert_eq!(ws.tasks().by_project(&project.id).len(), 2);
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------

#[test]
fn drags_resolve_to_moves() {
    let mut session = session_for(&Persistence::in_memory(), "U1");
    let ws = session.workspace_mut().unwrap();
    let first = ws.tasks_mut().create(NewTask::new("first"));
    let second = ws.tasks_mut().create(NewTask::new("second"));

    let to_done = DragGesture {
        task_id: first.id.clone(),
        source: DropLocation { column: TaskStatus::ToDo, index: 0 },
        destination: Some(DropLocation { column: "done".parse().unwrap(), index: 0 }),
    };
    ws.apply_drop(&to_done).unwrap();

    let outside = DragGesture {
        task_id: second.id.clone(),
        source: DropLocation { column: TaskStatus::ToDo, index: 0 },
        destination: None,
    };
    assert!(ws.apply_drop(&outside).is_none());

    let in_place = DragGesture {
        destination: Some(outside.source),
        ..outside
    };
    assert!(ws.apply_drop(&in_place).is_none());

    let board = ws.board(&Scope::Personal, &BoardFilter::default());
    assert_eq!(board.column(TaskStatus::Done).tasks[0].id, first.id);
    assert_eq!(board.column(TaskStatus::ToDo).tasks[0].id, second.id);
    assert_eq!(board.counts.progress_percent(), 50);
}

// ---------------------------------------------------------------------------
// Orphans and personal tasks
// ---------------------------------------------------------------------------

#[test]
fn deleting_a_project_keeps_its_tasks() {
    let mut session = session_for(&Persistence::in_memory(), "U1");
    let ws = session.workspace_mut().unwrap();
    let project = ws.projects_mut().create(NewProject::new("Short lived"));
    ws.projects_mut().select(&project.id);
    let task = ws
        .tasks_mut()
        .create(NewTask::new("Leftover").in_project(project.id.clone()));

    ws.projects_mut().delete(&project.id);

    assert!(ws.projects().current().is_none());
    assert_eq!(ws.tasks().by_project(&project.id), vec![&task]);
    assert_eq!(ws.orphans(), vec![&task]);
    assert!(ws.tasks().personal().is_empty());

    // A task can no longer be created against the deleted project.
    let draft = NewTask::new("Too late").in_project(project.id.clone());
    assert!(matches!(
        validation::validate_new_task(&draft, ws.projects(), Limits::default()),
        Err(ValidationError::UnknownProject(_))
    ));
}

#[test]
fn personal_board_ignores_project_tasks() {
    let mut session = session_for(&Persistence::in_memory(), "U1");
    let ws = session.workspace_mut().unwrap();
    let project_id = ws.projects().list_visible()[0].id.clone();
    ws.tasks_mut().create(NewTask::new("groceries"));
    ws.tasks_mut()
        .create(NewTask::new("roadmap").in_project(project_id.clone()));

    let personal = ws.board(&Scope::Personal, &BoardFilter::default());
    assert_eq!(personal.visible(), 1);
    assert_eq!(personal.column(TaskStatus::ToDo).tasks[0].title, "groceries");
    assert_eq!(ws.project_counts(&project_id).total(), 1);
}
