//! Form-level checks run before drafts reach a store.
//!
//! The stores accept whatever they are given, so every interactive surface
//! validates here first.

use revise_proto::project::{MIN_PROJECT_NAME_LENGTH, NewProject};
use revise_proto::task::{MAX_TASK_TITLE_LENGTH, NewTask};

use crate::projects::ProjectStore;

/// Why a draft was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Project name is required")]
    ProjectNameRequired,

    #[error("Project name must be at least {min} characters")]
    ProjectNameTooShort { min: usize },

    #[error("Title is required")]
    TaskTitleRequired,

    #[error("Title must be at most {max} characters")]
    TaskTitleTooLong { max: usize },

    /// The draft points at a project the user cannot see.
    #[error("unknown project: {0}")]
    UnknownProject(String),
}

impl ValidationError {
    /// Name of the form field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::ProjectNameRequired | Self::ProjectNameTooShort { .. } => "name",
            Self::TaskTitleRequired | Self::TaskTitleTooLong { .. } => "title",
            Self::UnknownProject(_) => "project_id",
        }
    }
}

/// Tunable limits applied by [`validate_new_task`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_task_title_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_task_title_len: MAX_TASK_TITLE_LENGTH,
        }
    }
}

/// Checks a project name: non-blank and long enough once trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::ProjectNameRequired`] for a blank name and
/// [`ValidationError::ProjectNameTooShort`] below the minimum length.
pub fn validate_project_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::ProjectNameRequired);
    }
    if trimmed.chars().count() < MIN_PROJECT_NAME_LENGTH {
        return Err(ValidationError::ProjectNameTooShort {
            min: MIN_PROJECT_NAME_LENGTH,
        });
    }
    Ok(())
}

/// # Errors
///
/// See [`validate_project_name`].
pub fn validate_new_project(draft: &NewProject) -> Result<(), ValidationError> {
    validate_project_name(&draft.name)
}

/// Checks a task draft against the title rules and the user's projects.
///
/// # Errors
///
/// Returns the first failing rule: a blank title, a title longer than
/// `limits.max_task_title_len` characters, or a `project_id` that is not
/// visible in `projects`.
pub fn validate_new_task(
    draft: &NewTask,
    projects: &ProjectStore,
    limits: Limits,
) -> Result<(), ValidationError> {
    validate_task_title(&draft.title, limits)?;
    if let Some(project_id) = &draft.project_id {
        let visible = projects
            .get(project_id)
            .is_some_and(|p| p.is_visible_to(projects.identity()));
        if !visible {
            return Err(ValidationError::UnknownProject(project_id.to_string()));
        }
    }
    Ok(())
}

/// Checks a task title on its own, as used when editing.
///
/// # Errors
///
/// See [`validate_new_task`].
pub fn validate_task_title(title: &str, limits: Limits) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::TaskTitleRequired);
    }
    if trimmed.chars().count() > limits.max_task_title_len {
        return Err(ValidationError::TaskTitleTooLong {
            max: limits.max_task_title_len,
        });
    }
    Ok(())
}
