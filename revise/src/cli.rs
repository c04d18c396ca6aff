//! Subcommands of the `revise` binary and their plain-text output.
//!
//! Every command runs against the signed-in [`Workspace`], validates its
//! input through [`crate::validation`] and writes a short report.

use std::io::Write;

use revise_proto::project::{NewProject, Project, ProjectColor, ProjectId, ProjectPatch};
use revise_proto::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};

use crate::board::{BoardFilter, BoardView, Scope};
use crate::config::ConfigError;
use crate::projects::{ProjectSort, catalog};
use crate::session::{Session, Workspace};
use crate::storage::StoreError;
use crate::validation::{self, Limits, ValidationError};

/// Errors reported by the binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no user given; pass --user or set REVISE_USER")]
    SignedOut,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List visible projects.
    Projects {
        /// Only projects whose name or description contains this text.
        #[arg(long, default_value = "")]
        search: String,
        /// Sort order: name, newest (alias: created) or insertion.
        #[arg(long, default_value = "name")]
        sort: ProjectSort,
    },
    /// Create a project.
    ProjectAdd {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "blue")]
        color: ProjectColor,
    },
    /// Change a project's name, description or color.
    ProjectEdit {
        id: ProjectId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        color: Option<ProjectColor>,
    },
    /// Delete a project. Its tasks are kept.
    ProjectRm { id: ProjectId },
    /// List tasks of a project, or personal tasks.
    Tasks {
        #[arg(long)]
        project: Option<ProjectId>,
    },
    /// Create a task.
    TaskAdd {
        title: String,
        #[arg(long)]
        project: Option<ProjectId>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        assignee: String,
        #[arg(long, default_value = "medium")]
        priority: Priority,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Change fields of a task.
    TaskEdit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "personal")]
        project: Option<ProjectId>,
        /// Detach the task from its project.
        #[arg(long)]
        personal: bool,
    },
    /// Move a task to another column.
    TaskMove { id: TaskId, status: TaskStatus },
    /// Delete a task.
    TaskRm { id: TaskId },
    /// Show a board.
    Board {
        /// Project board to show; the personal board if omitted.
        #[arg(long)]
        project: Option<ProjectId>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Tasks whose project was deleted.
    Orphans,
    /// Delete all stored data of the user and start over.
    Reset,
}

/// Runs `command` for the signed-in user of `session`.
///
/// # Errors
///
/// Returns [`CliError`] when no user is signed in, the input is invalid,
/// an id is unknown or output cannot be written.
pub fn run(
    command: Command,
    session: &mut Session,
    limits: Limits,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if matches!(command, Command::Reset) {
        session.clear_storage()?;
        writeln!(out, "cleared all data")?;
        return Ok(());
    }
    let ws = session.workspace_mut().ok_or(CliError::SignedOut)?;
    match command {
        Command::Projects { search, sort } => {
            let visible = ws.projects().list_visible();
            for project in catalog(&visible, &search, sort) {
                write_project(out, ws, project)?;
            }
        }
        Command::ProjectAdd {
            name,
            description,
            color,
        } => {
            let mut draft = NewProject::new(name.trim()).with_color(color);
            draft.description = description;
            validation::validate_new_project(&draft)?;
            let project = ws.projects_mut().create(draft);
            writeln!(out, "created project {}", project.id)?;
        }
        Command::ProjectEdit {
            id,
            name,
            description,
            clear_description,
            color,
        } => {
            require_project(ws, &id)?;
            if let Some(name) = &name {
                validation::validate_project_name(name)?;
            }
            let description = if clear_description {
                Some(None)
            } else {
                description.map(Some)
            };
            let patch = ProjectPatch {
                name: name.map(|n| n.trim().to_string()),
                description,
                color,
            };
            ws.projects_mut().update(&id, patch);
            writeln!(out, "updated project {id}")?;
        }
        Command::ProjectRm { id } => {
            require_project(ws, &id)?;
            ws.projects_mut().delete(&id);
            writeln!(out, "deleted project {id}")?;
        }
        Command::Tasks { project } => {
            let tasks = match &project {
                Some(id) => {
                    require_project(ws, id)?;
                    ws.tasks().by_project(id)
                }
                None => ws.tasks().personal(),
            };
            for task in tasks {
                write_task(out, task)?;
            }
        }
        Command::TaskAdd {
            title,
            project,
            description,
            assignee,
            priority,
            status,
        } => {
            let draft = NewTask {
                title: title.trim().to_string(),
                description,
                assignee,
                priority,
                status,
                project_id: project,
            };
            validation::validate_new_task(&draft, ws.projects(), limits)?;
            let task = ws.tasks_mut().create(draft);
            writeln!(out, "created task {} in {}", task.id, task.status.title())?;
        }
        Command::TaskEdit {
            id,
            title,
            description,
            assignee,
            priority,
            project,
            personal,
        } => {
            require_task(ws, &id)?;
            if let Some(title) = &title {
                validation::validate_task_title(title, limits)?;
            }
            if let Some(project_id) = &project {
                let probe = NewTask::new("-").in_project(project_id.clone());
                validation::validate_new_task(&probe, ws.projects(), limits)?;
            }
            let project_id = if personal { Some(None) } else { project.map(Some) };
            let patch = TaskPatch {
                title: title.map(|t| t.trim().to_string()),
                description,
                assignee,
                priority,
                status: None,
                project_id,
            };
            ws.tasks_mut().update(&id, patch);
            writeln!(out, "updated task {id}")?;
        }
        Command::TaskMove { id, status } => {
            require_task(ws, &id)?;
            ws.tasks_mut().move_to(&id, status);
            writeln!(out, "moved task {id} to {}", status.title())?;
        }
        Command::TaskRm { id } => {
            require_task(ws, &id)?;
            ws.tasks_mut().delete(&id);
            writeln!(out, "deleted task {id}")?;
        }
        Command::Board {
            project,
            search,
            priority,
            assignee,
        } => {
            let scope = match project {
                Some(id) => {
                    require_project(ws, &id)?;
                    Scope::Project(id)
                }
                None => Scope::Personal,
            };
            let filter = BoardFilter {
                search,
                priority,
                assignee,
            };
            write_board(out, &ws.board(&scope, &filter))?;
        }
        Command::Orphans => {
            for task in ws.orphans() {
                write_task(out, task)?;
            }
        }
        Command::Reset => {}
    }

    if ws.has_unsaved_changes() {
        tracing::warn!("some changes could not be saved and will be retried");
        writeln!(out, "warning: changes are not saved yet")?;
    }
    Ok(())
}

/// A project must be visible, not merely stored, to be addressed.
fn require_project(ws: &Workspace, id: &ProjectId) -> Result<(), CliError> {
    match ws.projects().get(id) {
        Some(p) if p.is_visible_to(ws.identity()) => Ok(()),
        _ => Err(CliError::NotFound {
            kind: "project",
            id: id.to_string(),
        }),
    }
}

fn require_task(ws: &Workspace, id: &TaskId) -> Result<(), CliError> {
    if ws.tasks().get(id).is_none() {
        return Err(CliError::NotFound {
            kind: "task",
            id: id.to_string(),
        });
    }
    Ok(())
}

fn write_project(out: &mut impl Write, ws: &Workspace, project: &Project) -> std::io::Result<()> {
    let counts = ws.project_counts(&project.id);
    writeln!(
        out,
        "{}  {} [{}]  {} tasks, {}% done",
        project.id,
        project.name,
        project.color,
        counts.total(),
        counts.progress_percent()
    )?;
    if let Some(description) = &project.description {
        writeln!(out, "    {description}")?;
    }
    Ok(())
}

fn write_task(out: &mut impl Write, task: &Task) -> std::io::Result<()> {
    write!(out, "{}  [{}] {} ({})", task.id, task.priority, task.title, task.status)?;
    if !task.assignee.is_empty() {
        write!(out, " @{}", task.assignee)?;
    }
    writeln!(out)
}

fn write_board(out: &mut impl Write, view: &BoardView<'_>) -> std::io::Result<()> {
    for column in &view.columns {
        writeln!(out, "{} ({})", column.title, column.tasks.len())?;
        for task in &column.tasks {
            write!(out, "  {}  [{}] {}", task.id, task.priority, task.title)?;
            if !task.assignee.is_empty() {
                write!(out, " @{}", task.assignee)?;
            }
            writeln!(out)?;
        }
    }
    write!(
        out,
        "{} shown, {}% done",
        view.counts.total(),
        view.counts.progress_percent()
    )?;
    if view.filtered_out > 0 {
        write!(out, ", {} hidden by filter", view.filtered_out)?;
    }
    writeln!(out)
}
