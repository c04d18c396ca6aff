//! Property-based tests for task store queries and status moves.
//!
//! Uses proptest to verify, for arbitrary task populations:
//! 1. Per-status buckets of a project partition `by_project`.
//! 2. Personal tasks never show up in any project's list.
//! 3. `move_to` then `get` reports the new status for every status pair.
//! 4. A board shows every scope task exactly once when unfiltered.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use revise::board::{BoardFilter, Scope, build_board};
use revise::storage::Persistence;
use revise::tasks::TaskStore;
use revise_proto::identity::UserId;
use revise_proto::project::ProjectId;
use revise_proto::task::{NewTask, Priority, TaskStatus};

/// Where a generated task is placed: personal, or one of three projects.
type Placement = Option<usize>;

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

fn arb_population() -> impl Strategy<Value = Vec<(Placement, TaskStatus, Priority)>> {
    prop::collection::vec(
        (prop::option::of(0usize..3), arb_status(), arb_priority()),
        0..40,
    )
}

fn populate(
    population: &[(Placement, TaskStatus, Priority)],
) -> (TaskStore, [ProjectId; 3]) {
    let projects = [ProjectId::new(), ProjectId::new(), ProjectId::new()];
    let mut store = TaskStore::load(UserId::new("prop"), Persistence::in_memory());
    for (i, (placement, status, priority)) in population.iter().enumerate() {
        let mut draft = NewTask::new(format!("task {i}"))
            .with_status(*status)
            .with_priority(*priority);
        if let Some(p) = placement {
            draft = draft.in_project(projects[*p].clone());
        }
        store.create(draft);
    }
    (store, projects)
}

proptest! {
    #[test]
    fn status_buckets_partition_project(population in arb_population()) {
        let (store, projects) = populate(&population);
        for project in &projects {
            let all = store.by_project(project);
            let mut bucketed = 0;
            for status in TaskStatus::ALL {
                let bucket = store.by_project_and_status(project, status);
                for task in &bucket {
                    prop_assert_eq!(task.status, status);
                    prop_assert!(all.iter().any(|t| t.id == task.id));
                }
                bucketed += bucket.len();
            }
            prop_assert_eq!(bucketed, all.len());
        }
    }

    #[test]
    fn personal_and_project_tasks_are_disjoint(population in arb_population()) {
        let (store, projects) = populate(&population);
        let personal = store.personal();
        for project in &projects {
            for task in store.by_project(project) {
                prop_assert!(personal.iter().all(|p| p.id != task.id));
            }
        }
        let project_total: usize = projects.iter().map(|p| store.by_project(p).len()).sum();
        prop_assert_eq!(personal.len() + project_total, store.all().len());
    }

    #[test]
    fn move_then_get_reports_new_status(from in arb_status(), to in arb_status()) {
        let mut store = TaskStore::load(UserId::new("prop"), Persistence::in_memory());
        let task = store.create(NewTask::new("mover").with_status(from));
        store.move_to(&task.id, to);
        prop_assert_eq!(store.get(&task.id).unwrap().status, to);
        prop_assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn unfiltered_board_shows_each_scope_task_once(population in arb_population()) {
        let (store, projects) = populate(&population);
        let scopes = [
            Scope::Personal,
            Scope::Project(projects[0].clone()),
            Scope::Project(projects[1].clone()),
        ];
        for scope in &scopes {
            let view = build_board(store.all(), scope, &BoardFilter::default());
            prop_assert_eq!(view.visible(), store.in_scope(scope).len());
            prop_assert_eq!(view.filtered_out, 0);
            for column in &view.columns {
                prop_assert!(column.tasks.iter().all(|t| t.status == column.status));
            }
        }
    }
}

#[test]
fn every_status_pair_moves() {
    for from in TaskStatus::ALL {
        for to in TaskStatus::ALL {
            let mut store = TaskStore::load(UserId::new("pairs"), Persistence::in_memory());
            let task = store.create(NewTask::new("mover").with_status(from));
            store.move_to(&task.id, to);
            assert_eq!(store.get(&task.id).unwrap().status, to, "{from} -> {to}");
        }
    }
}
