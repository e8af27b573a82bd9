use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display name used when a debt item points at a project that no longer exists
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// A named grouping of debt items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Find a project by ID
pub fn find_project<'a>(projects: &'a [Project], id: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.id == id)
}

/// Resolve a project ID to its name, or the unknown-project placeholder
pub fn project_name<'a>(projects: &'a [Project], id: &str) -> &'a str {
    find_project(projects, id)
        .map(|p| p.name.as_str())
        .unwrap_or(UNKNOWN_PROJECT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_id_resolves_to_placeholder() {
        let projects = vec![Project {
            id: "web".into(),
            name: "Main Website".into(),
            description: None,
            created_at: None,
        }];
        assert_eq!(project_name(&projects, "web"), "Main Website");
        assert_eq!(project_name(&projects, "gone"), UNKNOWN_PROJECT);
    }

    #[test]
    fn optional_fields_default_on_load() {
        let p: Project = serde_json::from_str(r#"{"id":"1","name":"Mobile App"}"#).unwrap();
        assert!(p.description.is_none());
        assert!(p.created_at.is_none());
    }
}
