//! Searching and sorting the project list.

use std::str::FromStr;

use revise_proto::project::Project;

/// Order of the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectSort {
    /// Order in which the projects were created in this collection.
    Insertion,
    /// Alphabetical by name, ignoring case.
    #[default]
    Name,
    /// Most recently created first.
    Newest,
}

impl FromStr for ProjectSort {
    type Err = revise_proto::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insertion" => Ok(Self::Insertion),
            "name" => Ok(Self::Name),
            "newest" | "created" => Ok(Self::Newest),
            _ => Err(revise_proto::ParseError {
                kind: "sort",
                value: s.to_string(),
            }),
        }
    }
}

/// Returns the projects whose name or description contains `search`
/// (ignoring case), ordered by `sort`.
///
/// An empty search keeps every project. Ties keep their input order.
#[must_use]
pub fn catalog<'a>(projects: &[&'a Project], search: &str, sort: ProjectSort) -> Vec<&'a Project> {
    let needle = search.to_lowercase();
    let mut matched: Vec<&Project> = projects
        .iter()
        .copied()
        .filter(|p| needle.is_empty() || matches_search(p, &needle))
        .collect();

    match sort {
        ProjectSort::Insertion => {}
        ProjectSort::Name => matched.sort_by_key(|p| p.name.to_lowercase()),
        ProjectSort::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    matched
}

fn matches_search(project: &Project, needle: &str) -> bool {
    project.name.to_lowercase().contains(needle)
        || project
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}
