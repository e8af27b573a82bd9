use chrono::{DateTime, Utc};

use crate::model::debt::{DebtDraft, DebtItem, DebtStatus, ValidationError};

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Validate a draft and append the resulting item to `items`.
///
/// The new item starts `Open`, with `createdAt` and `updatedAt` set to `now`
/// and an ID that no item in `items` already carries.
pub fn create(
    items: &mut Vec<DebtItem>,
    draft: DebtDraft,
    prefix: &str,
    now: DateTime<Utc>,
) -> Result<DebtItem, ValidationError> {
    let (kind, severity) = draft.validate()?;

    let item = DebtItem {
        id: next_id(items, prefix),
        project_id: draft.project_id.trim().to_string(),
        title: draft.title.trim().to_string(),
        screen: draft.screen.trim().to_string(),
        kind,
        severity,
        status: DebtStatus::Open,
        description: draft.description.trim().to_string(),
        recommendation: draft.recommendation.trim().to_string(),
        logged_by: draft.logged_by.trim().to_string(),
        created_at: now,
        updated_at: Some(now),
        screenshot: non_blank(draft.screenshot),
        figma_link: non_blank(draft.figma_link),
    };
    items.push(item.clone());
    Ok(item)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The next free ID for `prefix`: one past the highest `PREFIX-NNN` in use.
/// When the highest number can't be incremented, the lowest unused one is
/// taken instead.
pub fn next_id(items: &[DebtItem], prefix: &str) -> String {
    let prefix_dash = format!("{}-", prefix);
    let used: Vec<usize> = items
        .iter()
        .filter_map(|item| item.id.strip_prefix(&prefix_dash))
        .filter_map(|num| num.parse::<usize>().ok())
        .collect();
    let max = used.iter().copied().max().unwrap_or(0);
    let n = match max.checked_add(1) {
        Some(n) => n,
        None => (1..).find(|n| !used.contains(n)).unwrap_or(max),
    };
    format!("{}-{:03}", prefix, n)
}

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

/// Move to the next status in the chain: Open → In Progress → Fixed → Resolved.
///
/// Returns false (and leaves the item untouched, `updatedAt` included) when
/// the item is already Resolved.
pub fn advance(item: &mut DebtItem, now: DateTime<Utc>) -> bool {
    match item.status.next() {
        Some(next) => {
            item.status = next;
            item.touch(now);
            true
        }
        None => false,
    }
}

/// Unconditional transition to `target`, forward, backward, or skipping.
/// Always records the mutation time, even if the status is unchanged.
pub fn set_status(item: &mut DebtItem, target: DebtStatus, now: DateTime<Utc>) {
    item.status = target;
    item.touch(now);
}

// ---------------------------------------------------------------------------
// Removal and lookup
// ---------------------------------------------------------------------------

/// Remove an item by ID. Removing an unknown ID is a no-op returning `None`.
pub fn remove(items: &mut Vec<DebtItem>, id: &str) -> Option<DebtItem> {
    let idx = items.iter().position(|i| i.id == id)?;
    Some(items.remove(idx))
}

pub fn find_item<'a>(items: &'a [DebtItem], id: &str) -> Option<&'a DebtItem> {
    items.iter().find(|i| i.id == id)
}

pub fn find_item_mut<'a>(items: &'a mut [DebtItem], id: &str) -> Option<&'a mut DebtItem> {
    items.iter_mut().find(|i| i.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::debt::{DebtType, DraftField, Severity};
    use chrono::TimeZone;

    fn t(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn draft(title: &str) -> DebtDraft {
        DebtDraft {
            project_id: "web".into(),
            title: title.into(),
            screen: "Login Page".into(),
            kind: Some(DebtType::Accessibility),
            severity: Some(Severity::High),
            description: "Primary buttons fail WCAG AA contrast".into(),
            recommendation: "Raise contrast to 4.5:1".into(),
            logged_by: "Design Team".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_starts_open() {
        let mut items = Vec::new();
        let item = create(&mut items, draft("Button contrast"), "UX", t(1)).unwrap();
        assert_eq!(item.id, "UX-001");
        assert_eq!(item.status, DebtStatus::Open);
        assert_eq!(item.created_at, t(1));
        assert_eq!(item.updated_at, Some(t(1)));
        assert_eq!(items, vec![item]);
    }

    #[test]
    fn test_create_assigns_fresh_ids() {
        let mut items = Vec::new();
        for i in 0..5 {
            create(&mut items, draft(&format!("Issue {}", i)), "UX", t(1)).unwrap();
        }
        // Drop one from the middle; the next ID must still be unused
        remove(&mut items, "UX-003");
        let item = create(&mut items, draft("Another"), "UX", t(2)).unwrap();
        assert_eq!(item.id, "UX-006");

        let mut ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn test_next_id_ignores_foreign_ids() {
        let mut items = Vec::new();
        create(&mut items, draft("a"), "UX", t(1)).unwrap();
        items[0].id = "1718013600000".into();
        assert_eq!(next_id(&items, "UX"), "UX-001");
    }

    #[test]
    fn test_next_id_at_numeric_limit_reuses_lowest_gap() {
        let mut items = Vec::new();
        create(&mut items, draft("a"), "UX", t(1)).unwrap();
        create(&mut items, draft("b"), "UX", t(2)).unwrap();
        items[1].id = format!("UX-{}", usize::MAX);
        assert_eq!(next_id(&items, "UX"), "UX-002");

        let item = create(&mut items, draft("c"), "UX", t(3)).unwrap();
        assert_eq!(item.id, "UX-002");
        assert_eq!(next_id(&items, "UX"), "UX-003");
    }

    #[test]
    fn test_create_trims_and_drops_blank_optionals() {
        let mut items = Vec::new();
        let mut d = draft("  Padded title ");
        d.screenshot = Some("   ".into());
        d.figma_link = Some(" https://figma.com/file/abc ".into());
        let item = create(&mut items, d, "UX", t(1)).unwrap();
        assert_eq!(item.title, "Padded title");
        assert!(item.screenshot.is_none());
        assert_eq!(item.figma_link.as_deref(), Some("https://figma.com/file/abc"));
    }

    #[test]
    fn test_create_invalid_draft_names_all_fields() {
        let mut items = Vec::new();
        let mut d = draft("");
        d.logged_by = String::new();
        let err = create(&mut items, d, "UX", t(1)).unwrap_err();
        assert_eq!(err.fields, vec![DraftField::Title, DraftField::LoggedBy]);
        assert!(items.is_empty());
    }

    #[test]
    fn test_advance_walks_chain_then_stops() {
        let mut items = Vec::new();
        let mut item = create(&mut items, draft("x"), "UX", t(1)).unwrap();

        let mut seen = vec![item.status];
        for day in 2..5 {
            assert!(advance(&mut item, t(day)));
            seen.push(item.status);
        }
        assert_eq!(
            seen,
            vec![
                DebtStatus::Open,
                DebtStatus::InProgress,
                DebtStatus::Fixed,
                DebtStatus::Resolved
            ]
        );
        assert_eq!(item.updated_at, Some(t(4)));

        let resolved = item.clone();
        for day in 5..8 {
            assert!(!advance(&mut item, t(day)));
        }
        assert_eq!(item, resolved);
    }

    #[test]
    fn test_set_status_any_direction() {
        let mut items = Vec::new();
        let mut item = create(&mut items, draft("x"), "UX", t(1)).unwrap();

        set_status(&mut item, DebtStatus::Resolved, t(2));
        assert_eq!(item.status, DebtStatus::Resolved);
        set_status(&mut item, DebtStatus::Open, t(3));
        assert_eq!(item.status, DebtStatus::Open);
        assert_eq!(item.updated_at, Some(t(3)));
    }

    #[test]
    fn test_set_status_idempotent() {
        let mut items = Vec::new();
        let mut item = create(&mut items, draft("x"), "UX", t(1)).unwrap();

        set_status(&mut item, DebtStatus::Fixed, t(2));
        let once = item.clone();
        set_status(&mut item, DebtStatus::Fixed, t(3));
        assert_eq!(item.updated_at, Some(t(3)));
        item.updated_at = once.updated_at;
        assert_eq!(item, once);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut items = Vec::new();
        create(&mut items, draft("x"), "UX", t(1)).unwrap();
        assert!(remove(&mut items, "UX-999").is_none());
        assert_eq!(items.len(), 1);
        assert_eq!(remove(&mut items, "UX-001").unwrap().title, "x");
        assert!(items.is_empty());
    }

    #[test]
    fn test_find_item_mut() {
        let mut items = Vec::new();
        create(&mut items, draft("x"), "UX", t(1)).unwrap();
        find_item_mut(&mut items, "UX-001").unwrap().title = "y".into();
        assert_eq!(find_item(&items, "UX-001").unwrap().title, "y");
        assert!(find_item(&items, "UX-002").is_none());
    }
}
