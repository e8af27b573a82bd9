use chrono::{DateTime, Utc};

use crate::model::debt::{DebtItem, DebtStatus, DraftField, ValidationError};
use crate::model::project::Project;

/// Create a project and append it to `projects`.
///
/// The ID is a slug of the name (`Main Website` → `main-website`), suffixed
/// `-2`, `-3`, … until it is unused.
pub fn create_project(
    projects: &mut Vec<Project>,
    name: &str,
    description: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Project, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError {
            fields: vec![DraftField::Name],
        });
    }

    let existing: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    let project = Project {
        id: generate_project_id(name, &existing),
        name: name.to_string(),
        description: description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        created_at: Some(now),
    };
    projects.push(project.clone());
    Ok(project)
}

/// Slugify `name` into an ID not present in `existing`.
///
/// Rules:
/// 1. Lowercase; runs of non-alphanumeric characters become a single `-`
/// 2. Leading and trailing `-` are dropped; an empty slug becomes `project`
/// 3. On collision, append `-2`, `-3`, … until unique
pub fn generate_project_id(name: &str, existing: &[&str]) -> String {
    let mut slug = String::new();
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = match slug.trim_end_matches('-') {
        "" => "project".to_string(),
        s => s.to_string(),
    };

    if !existing.contains(&slug.as_str()) {
        return slug;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", slug, n);
        if !existing.contains(&candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// Remove a project by ID. Its debt items are left alone; see
/// [`remove_project_items`].
pub fn remove_project(projects: &mut Vec<Project>, id: &str) -> Option<Project> {
    let idx = projects.iter().position(|p| p.id == id)?;
    Some(projects.remove(idx))
}

/// Remove every item belonging to `project_id`, returning the removed items.
pub fn remove_project_items(items: &mut Vec<DebtItem>, project_id: &str) -> Vec<DebtItem> {
    let (removed, kept): (Vec<DebtItem>, Vec<DebtItem>) = std::mem::take(items)
        .into_iter()
        .partition(|i| i.project_id == project_id);
    *items = kept;
    removed
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Item counts for one project, by status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project_id: String,
    pub name: String,
    pub open: usize,
    pub in_progress: usize,
    pub fixed: usize,
    pub resolved: usize,
}

impl ProjectSummary {
    pub fn total(&self) -> usize {
        self.open + self.in_progress + self.fixed + self.resolved
    }

    pub fn count(&self, status: DebtStatus) -> usize {
        match status {
            DebtStatus::Open => self.open,
            DebtStatus::InProgress => self.in_progress,
            DebtStatus::Fixed => self.fixed,
            DebtStatus::Resolved => self.resolved,
        }
    }

    fn record(&mut self, status: DebtStatus) {
        match status {
            DebtStatus::Open => self.open += 1,
            DebtStatus::InProgress => self.in_progress += 1,
            DebtStatus::Fixed => self.fixed += 1,
            DebtStatus::Resolved => self.resolved += 1,
        }
    }
}

/// One summary per project, in project order. Items with a dangling
/// project ID are not counted anywhere.
pub fn project_summaries(projects: &[Project], items: &[DebtItem]) -> Vec<ProjectSummary> {
    projects
        .iter()
        .map(|project| {
            let mut summary = ProjectSummary {
                project_id: project.id.clone(),
                name: project.name.clone(),
                ..Default::default()
            };
            for item in items.iter().filter(|i| i.project_id == project.id) {
                summary.record(item.status);
            }
            summary
        })
        .collect()
}
