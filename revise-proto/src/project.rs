//! Project entity, its color palette and membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ParseError;
use crate::identity::UserId;

/// Minimum project name length in characters, after trimming.
pub const MIN_PROJECT_NAME_LENGTH: usize = 3;

/// Name of the project seeded for a user seen for the first time.
pub const DEFAULT_PROJECT_NAME: &str = "My First Project";

/// Description of the seeded project.
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "Welcome to your first project!";

/// Unique identifier for a project (UUID v7).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new time-ordered project identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `ProjectId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ParseError::new("project id", s))
    }
}

/// Accent color of a project, from a fixed palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
    Indigo,
}

impl ProjectColor {
    /// The whole palette in picker order.
    pub const ALL: [Self; 6] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Red,
        Self::Yellow,
        Self::Indigo,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Indigo => "indigo",
        }
    }
}

impl std::fmt::Display for ProjectColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("color", s))
    }
}

/// A project board shared by its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub color: ProjectColor,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    /// Users who can see the project. Duplicate-free, creator included.
    #[serde(default)]
    pub members: Vec<UserId>,
}

impl Project {
    /// A project is visible to its creator and to every member.
    #[must_use]
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.created_by == *user || self.members.contains(user)
    }

    /// Adds `user` to the member list unless already present.
    ///
    /// Returns `true` if the list changed.
    pub fn add_member(&mut self, user: UserId) -> bool {
        if self.members.contains(&user) {
            return false;
        }
        self.members.push(user);
        true
    }

    /// Removes `user` from the member list. The creator cannot be removed.
    ///
    /// Returns `true` if the list changed.
    pub fn remove_member(&mut self, user: &UserId) -> bool {
        if self.created_by == *user {
            return false;
        }
        let before = self.members.len();
        self.members.retain(|m| m != user);
        self.members.len() != before
    }

    /// Merges every field present in `patch` into this project.
    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

/// Caller-supplied fields for a new project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub color: ProjectColor,
}

impl NewProject {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_color(mut self, color: ProjectColor) -> Self {
        self.color = color;
        self
    }

    /// The project seeded for a user seen for the first time.
    #[must_use]
    pub fn first_project() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
            .with_description(DEFAULT_PROJECT_DESCRIPTION)
            .with_color(ProjectColor::Blue)
    }
}

/// Partial update for a project. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub color: Option<ProjectColor>,
}
