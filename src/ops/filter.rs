use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::debt::DebtItem;
use crate::model::filter::FilterSpec;
use crate::model::project::{Project, project_name};

/// Case-insensitive literal text matcher.
///
/// The text is escaped, so `a.b` only matches a literal `a.b`. Shared by the
/// filter engine and the TUI's match highlighting.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    re: Regex,
}

impl SearchMatcher {
    /// Build a matcher for `text`. Blank text (after trimming) matches
    /// everything, so there is no matcher for it.
    pub fn new(text: &str) -> Option<SearchMatcher> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .ok()
            .map(|re| SearchMatcher { re })
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.re.is_match(haystack)
    }

    /// Byte ranges of every non-overlapping match in `haystack`
    pub fn find_spans(&self, haystack: &str) -> Vec<Range<usize>> {
        self.re
            .find_iter(haystack)
            .map(|m| m.start()..m.end())
            .collect()
    }
}

/// Whether `item` passes every active dimension of `spec`.
pub fn matches(
    item: &DebtItem,
    projects: &[Project],
    spec: &FilterSpec,
    matcher: Option<&SearchMatcher>,
) -> bool {
    if !spec.project_ids.is_empty() && !spec.project_ids.contains(&item.project_id) {
        return false;
    }
    if spec.severity.is_some_and(|s| s != item.severity) {
        return false;
    }
    if spec.kind.is_some_and(|k| k != item.kind) {
        return false;
    }
    if spec.status.is_some_and(|s| s != item.status) {
        return false;
    }
    match matcher {
        Some(m) => searchable_fields(item, projects).any(|field| m.is_match(field)),
        None => true,
    }
}

/// The free-text fields a search runs against, owning project name last
pub fn searchable_fields<'a>(
    item: &'a DebtItem,
    projects: &'a [Project],
) -> impl Iterator<Item = &'a str> {
    [
        item.title.as_str(),
        item.screen.as_str(),
        item.description.as_str(),
        item.recommendation.as_str(),
        project_name(projects, &item.project_id),
    ]
    .into_iter()
}

/// Reduce `items` to the subset visible under `spec`, in input order.
pub fn apply<'a>(
    items: &'a [DebtItem],
    projects: &[Project],
    spec: &FilterSpec,
) -> Vec<&'a DebtItem> {
    let matcher = SearchMatcher::new(&spec.search);
    items
        .iter()
        .filter(|item| matches(item, projects, spec, matcher.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::debt::{DebtStatus, DebtType, Severity};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn item(id: &str, project: &str, severity: Severity) -> DebtItem {
        DebtItem {
            id: id.into(),
            project_id: project.into(),
            title: format!("Issue {}", id),
            screen: "Checkout".into(),
            kind: DebtType::Visual,
            severity,
            status: DebtStatus::Open,
            description: "Spacing is uneven".into(),
            recommendation: "Use the 8px grid".into(),
            logged_by: "sarah.chen@company.com".into(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 10, 10, 0, 0).unwrap(),
            updated_at: None,
            screenshot: None,
            figma_link: None,
        }
    }

    fn projects() -> Vec<Project> {
        vec![
            Project {
                id: "web".into(),
                name: "Main Website".into(),
                description: None,
                created_at: None,
            },
            Project {
                id: "app".into(),
                name: "Mobile App".into(),
                description: None,
                created_at: None,
            },
        ]
    }

    fn ids<'a>(items: &[&'a DebtItem]) -> Vec<&'a str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    fn five() -> Vec<DebtItem> {
        vec![
            item("1", "web", Severity::High),
            item("2", "app", Severity::Medium),
            item("3", "web", Severity::Low),
            item("4", "app", Severity::High),
            item("5", "web", Severity::Medium),
        ]
    }

    #[test]
    fn default_spec_is_identity() {
        let items = five();
        let out = apply(&items, &projects(), &FilterSpec::default());
        assert_eq!(ids(&out), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn severity_filter_keeps_order() {
        let items = five();
        let spec = FilterSpec {
            severity: Some(Severity::High),
            ..Default::default()
        };
        let out = apply(&items, &projects(), &spec);
        assert_eq!(ids(&out), vec!["1", "4"]);
    }

    #[test]
    fn dimensions_are_conjunctive() {
        let mut items = five();
        items[0].kind = DebtType::Accessibility;
        items[3].status = DebtStatus::Fixed;
        let projects = projects();

        let by_severity = FilterSpec {
            severity: Some(Severity::High),
            ..Default::default()
        };
        let by_project = FilterSpec {
            project_ids: ["web".to_string()].into(),
            ..Default::default()
        };
        let both = FilterSpec {
            severity: Some(Severity::High),
            project_ids: ["web".to_string()].into(),
            ..Default::default()
        };

        let a = apply(&items, &projects, &by_severity);
        let b = apply(&items, &projects, &by_project);
        let expected: Vec<&str> = ids(&a)
            .into_iter()
            .filter(|id| ids(&b).contains(id))
            .collect();
        assert_eq!(ids(&apply(&items, &projects, &both)), expected);
        assert_eq!(expected, vec!["1"]);

        let by_status = FilterSpec {
            status: Some(DebtStatus::Fixed),
            kind: Some(DebtType::Visual),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&items, &projects, &by_status)), vec!["4"]);
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let mut items = five();
        items[2].description = "Low Contrast on the primary button".into();
        let spec = FilterSpec {
            search: "contrast".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&items, &projects(), &spec)), vec!["3"]);
    }

    #[test]
    fn search_matches_project_name() {
        let items = five();
        let spec = FilterSpec {
            search: "mobile".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&items, &projects(), &spec)), vec!["2", "4"]);
    }

    #[test]
    fn search_dangling_project_matches_placeholder_name() {
        let items = vec![item("9", "deleted", Severity::Low)];
        let spec = FilterSpec {
            search: "unknown project".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&items, &projects(), &spec)), vec!["9"]);
    }

    #[test]
    fn search_text_is_literal() {
        let mut items = five();
        items[1].title = "Price shows 1.99".into();
        let spec = FilterSpec {
            search: "1.9".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&items, &projects(), &spec)), vec!["2"]);
        let spec = FilterSpec {
            search: "1x9".into(),
            ..Default::default()
        };
        assert!(apply(&items, &projects(), &spec).is_empty());
    }

    #[test]
    fn search_and_project_keep_survivor_order() {
        let mut items = five();
        for i in [0, 1, 3, 4] {
            items[i].description = "Keyboard focus is lost".into();
        }
        let spec = FilterSpec {
            search: "KEYBOARD".into(),
            project_ids: ["web".to_string()].into(),
            ..Default::default()
        };
        // 2 and 4 match the search but not the project, 3 the reverse
        assert_eq!(ids(&apply(&items, &projects(), &spec)), vec!["1", "5"]);

        items.swap(0, 4);
        assert_eq!(ids(&apply(&items, &projects(), &spec)), vec!["5", "1"]);
    }

    #[test]
    fn blank_search_has_no_matcher() {
        assert!(SearchMatcher::new("   ").is_none());
    }

    #[test]
    fn spans_for_highlighting() {
        let m = SearchMatcher::new("ab").unwrap();
        assert_eq!(m.find_spans("xAByab"), vec![1..3, 4..6]);
    }
}
