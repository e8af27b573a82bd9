use std::collections::BTreeSet;

use super::debt::{DebtStatus, DebtType, Severity};

/// The active filter dimensions of a list, board, or dashboard view.
///
/// Held in view state only; never persisted. The default value matches
/// every item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Restrict to these projects (empty = all projects)
    pub project_ids: BTreeSet<String>,
    pub severity: Option<Severity>,
    pub kind: Option<DebtType>,
    pub status: Option<DebtStatus>,
    /// Case-insensitive text searched across the item's free-text fields
    pub search: String,
}

impl FilterSpec {
    /// True when no dimension is active
    pub fn is_empty(&self) -> bool {
        self.project_ids.is_empty()
            && self.severity.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && self.search.trim().is_empty()
    }

    pub fn clear(&mut self) {
        *self = FilterSpec::default();
    }

    /// Short human-readable summary of the active dimensions, e.g.
    /// `severity=High type=Copy "contrast"`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if !self.project_ids.is_empty() {
            parts.push(format!(
                "project={}",
                self.project_ids.iter().cloned().collect::<Vec<_>>().join(",")
            ));
        }
        if let Some(s) = self.severity {
            parts.push(format!("severity={}", s));
        }
        if let Some(t) = self.kind {
            parts.push(format!("type={}", t));
        }
        if let Some(s) = self.status {
            parts.push(format!("status={}", s));
        }
        let search = self.search.trim();
        if !search.is_empty() {
            parts.push(format!("\"{}\"", search));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(FilterSpec::default().is_empty());
        let spec = FilterSpec {
            search: "   ".into(),
            ..Default::default()
        };
        assert!(spec.is_empty());
    }

    #[test]
    fn describe_lists_active_dimensions() {
        let mut spec = FilterSpec {
            severity: Some(Severity::High),
            status: Some(DebtStatus::InProgress),
            search: "contrast".into(),
            ..Default::default()
        };
        spec.project_ids.insert("web".into());
        assert_eq!(
            spec.describe(),
            "project=web severity=High status=In Progress \"contrast\""
        );
        spec.clear();
        assert_eq!(spec.describe(), "");
    }
}
