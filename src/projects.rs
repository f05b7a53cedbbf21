//! Recent project list with most-recently-used ordering

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of entries kept in the recent projects list
pub const DEFAULT_RECENT_PROJECTS_CAP: usize = 20;

/// A project the user has opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentProject {
    /// Display name, the last path component
    pub name: String,
    /// Absolute project path, unique key
    pub path: String,
    /// Last access, ms since epoch
    pub last_accessed: i64,
}

impl RecentProject {
    /// Build an entry for `path`, naming it after its final component
    pub fn from_path(path: &str, last_accessed: i64) -> Self {
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown Project")
            .to_string();

        Self {
            name,
            path: path.to_string(),
            last_accessed,
        }
    }
}

/// Insert or refresh `item`, keeping the list MRU-ordered and capped
///
/// # Examples
///
/// ```
/// use commander::projects::{upsert_recent_projects, RecentProject};
///
/// let list = vec![RecentProject::from_path("/a", 1)];
/// let list = upsert_recent_projects(list, RecentProject::from_path("/b", 2), 20);
/// assert_eq!(list[0].path, "/b");
/// ```
pub fn upsert_recent_projects(
    mut projects: Vec<RecentProject>,
    item: RecentProject,
    cap: usize,
) -> Vec<RecentProject> {
    projects.retain(|p| p.path != item.path);
    projects.insert(0, item);
    projects.sort_by(|a, b| b.last_accessed.cmp(&a.last_accessed));
    projects.truncate(cap);
    projects
}
