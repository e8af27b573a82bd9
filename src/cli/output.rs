use indexmap::IndexMap;
use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::debt::{DebtItem, DebtStatus};
use crate::model::project::{Project, project_name};
use crate::ops::analytics::Analytics;
use crate::ops::board::Board;
use crate::ops::project_ops::ProjectSummary;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

/// A debt item with its project's display name alongside
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemJson<'a> {
    #[serde(flatten)]
    pub item: &'a DebtItem,
    pub project_name: &'a str,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub status: DebtStatus,
    pub items: Vec<ItemJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountsJson {
    pub open: usize,
    pub in_progress: usize,
    pub fixed: usize,
    pub resolved: usize,
    pub total: usize,
}

#[derive(Serialize)]
pub struct ProjectJson<'a> {
    #[serde(flatten)]
    pub project: &'a Project,
    pub counts: StatusCountsJson,
}

#[derive(Serialize)]
pub struct UserJson<'a> {
    pub email: &'a str,
    pub handle: &'a str,
    pub initials: String,
}

#[derive(Serialize)]
pub struct RecoveryEntryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    pub fields: IndexMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn item_to_json<'a>(item: &'a DebtItem, projects: &'a [Project]) -> ItemJson<'a> {
    ItemJson {
        item,
        project_name: project_name(projects, &item.project_id),
    }
}

pub fn board_to_json<'a>(board: &Board<'a>, projects: &'a [Project]) -> Vec<ColumnJson<'a>> {
    board
        .columns
        .iter()
        .map(|column| ColumnJson {
            status: column.status,
            items: column
                .items
                .iter()
                .map(|item| item_to_json(*item, projects))
                .collect(),
        })
        .collect()
}

pub fn summary_to_json(summary: &ProjectSummary) -> StatusCountsJson {
    StatusCountsJson {
        open: summary.open,
        in_progress: summary.in_progress,
        fixed: summary.fixed,
        resolved: summary.resolved,
        total: summary.total(),
    }
}

pub fn recovery_entry_to_json(entry: &RecoveryEntry) -> RecoveryEntryJson {
    RecoveryEntryJson {
        timestamp: entry.timestamp.to_rfc3339(),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.iter().cloned().collect(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

const TITLE_MAX: usize = 48;
const PROJECT_MAX: usize = 24;
/// Widest severity, status, and type labels
const SEVERITY_W: usize = 8;
const STATUS_W: usize = 11;
const TYPE_W: usize = 13;

fn table_row(id_w: usize, project_w: usize, cells: [&str; 6]) -> String {
    format!(
        "{}  {}  {}  {}  {}  {}",
        pad_to_width(cells[0], id_w),
        pad_to_width(cells[1], SEVERITY_W),
        pad_to_width(cells[2], STATUS_W),
        pad_to_width(cells[3], TYPE_W),
        pad_to_width(cells[4], project_w),
        cells[5],
    )
}

/// The list view: one row per item, in the given order
pub fn format_item_table(items: &[&DebtItem], projects: &[Project]) -> Vec<String> {
    if items.is_empty() {
        return vec!["No debt items found.".to_string()];
    }

    let id_w = items
        .iter()
        .map(|i| display_width(&i.id))
        .max()
        .unwrap_or(0)
        .max(2);
    let project_w = items
        .iter()
        .map(|i| display_width(project_name(projects, &i.project_id)))
        .max()
        .unwrap_or(0)
        .clamp(7, PROJECT_MAX);

    let mut lines = vec![table_row(
        id_w,
        project_w,
        ["ID", "SEVERITY", "STATUS", "TYPE", "PROJECT", "TITLE"],
    )];
    for item in items {
        let project = truncate_to_width(project_name(projects, &item.project_id), project_w);
        let title = truncate_to_width(&item.title, TITLE_MAX);
        lines.push(table_row(
            id_w,
            project_w,
            [
                item.id.as_str(),
                item.severity.label(),
                item.status.label(),
                item.kind.label(),
                project.as_str(),
                title.as_str(),
            ],
        ));
    }
    lines
}

/// The kanban view as text: one block per status column
pub fn format_board(board: &Board, projects: &[Project]) -> Vec<String> {
    let id_w = board
        .columns
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| display_width(&i.id))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (i, column) in board.columns.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{} ({})", column.status, column.items.len()));
        if column.is_empty() {
            lines.push(format!("  {}", column.empty_message()));
            continue;
        }
        for item in &column.items {
            lines.push(format!(
                "  {}  {}  {} [{}]",
                pad_to_width(&item.id, id_w),
                pad_to_width(item.severity.label(), 6),
                truncate_to_width(&item.title, TITLE_MAX),
                project_name(projects, &item.project_id),
            ));
        }
    }
    lines
}

/// Full detail of one item
pub fn format_item_detail(item: &DebtItem, projects: &[Project]) -> Vec<String> {
    let field = |label: &str, value: &str| format!("{:<12}{}", format!("{}:", label), value);
    let mut lines = vec![format!("{} {}", item.id, item.title)];
    lines.push(field(
        "project",
        &format!(
            "{} ({})",
            project_name(projects, &item.project_id),
            item.project_id
        ),
    ));
    lines.push(field("screen", &item.screen));
    lines.push(field("type", item.kind.label()));
    lines.push(field("severity", item.severity.label()));
    lines.push(field("status", item.status.label()));
    lines.push(field("logged by", &item.logged_by));
    lines.push(field("created", &format_time(item.created_at)));
    if let Some(updated) = item.updated_at {
        lines.push(field("updated", &format_time(updated)));
    }
    if let Some(link) = &item.figma_link {
        lines.push(field("figma", link));
    }
    if let Some(shot) = &item.screenshot {
        lines.push(field("screenshot", &truncate_to_width(shot, 60)));
    }

    for (label, text) in [
        ("description", &item.description),
        ("recommendation", &item.recommendation),
    ] {
        lines.push(String::new());
        lines.push(format!("{}:", label));
        for line in text.lines() {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

pub fn format_time(t: chrono::DateTime<chrono::Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Project list with per-status counts
pub fn format_project_list(projects: &[Project], summaries: &[ProjectSummary]) -> Vec<String> {
    if summaries.is_empty() {
        return vec![
            "No projects yet.".to_string(),
            String::new(),
            "Create one with `ux project add <name>`.".to_string(),
        ];
    }

    let id_w = summaries
        .iter()
        .map(|s| display_width(&s.project_id))
        .max()
        .unwrap_or(0)
        .max(2);
    let name_w = summaries
        .iter()
        .map(|s| display_width(&s.name))
        .max()
        .unwrap_or(0)
        .max(4);

    let mut lines = vec![format!(
        "{}  {}  {:>4}  {:>11}  {:>5}  {:>8}",
        pad_to_width("ID", id_w),
        pad_to_width("NAME", name_w),
        "OPEN",
        "IN PROGRESS",
        "FIXED",
        "RESOLVED"
    )];
    for summary in summaries {
        lines.push(format!(
            "{}  {}  {:>4}  {:>11}  {:>5}  {:>8}",
            pad_to_width(&summary.project_id, id_w),
            pad_to_width(&summary.name, name_w),
            summary.open,
            summary.in_progress,
            summary.fixed,
            summary.resolved
        ));
        let description = projects
            .iter()
            .find(|p| p.id == summary.project_id)
            .and_then(|p| p.description.as_deref());
        if let Some(d) = description {
            lines.push(format!("{}  {}", " ".repeat(id_w), d));
        }
    }
    lines
}

/// A recovery log entry, body indented
pub fn format_recovery_entry(entry: &RecoveryEntry) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}: {}",
        format_time(entry.timestamp),
        entry.category,
        entry.description
    )];
    for (key, value) in &entry.fields {
        lines.push(format!("  {}: {}", key, value));
    }
    for line in entry.body.lines() {
        lines.push(format!("    {}", line));
    }
    lines
}

const BAR_MAX: usize = 20;

fn bar(count: usize, max: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    "█".repeat((count * BAR_MAX).div_ceil(max))
}

fn tally_line(label: &str, count: usize, max: usize) -> String {
    let b = bar(count, max);
    if b.is_empty() {
        format!("  {}{:>4}", pad_to_width(label, TYPE_W), count)
    } else {
        format!("  {}{:>4}  {}", pad_to_width(label, TYPE_W), count, b)
    }
}

/// The analytics dashboard as text
pub fn format_analytics(analytics: &Analytics, scope_label: &str) -> Vec<String> {
    let mut lines = vec![format!("Analytics ({})", scope_label)];
    lines.push(format!(
        "total: {}  resolved: {} ({:.1}%)  high severity: {}  accessibility: {}",
        analytics.total,
        analytics.resolved,
        analytics.resolved_percent,
        analytics.high_severity,
        analytics.accessibility,
    ));

    let sections: [(&str, Vec<(String, usize)>); 3] = [
        (
            "By type",
            analytics
                .by_type
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        ),
        (
            "By severity",
            analytics
                .by_severity
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        ),
        (
            "By status",
            analytics
                .by_status
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        ),
    ];
    for (title, rows) in sections {
        lines.push(String::new());
        lines.push(title.to_string());
        let max = rows.iter().map(|(_, v)| *v).max().unwrap_or(0);
        for (label, count) in &rows {
            lines.push(tally_line(label, *count, max));
        }
    }

    if !analytics.by_month.is_empty() {
        lines.push(String::new());
        lines.push("Created per month".to_string());
        let max = analytics.by_month.iter().map(|m| m.count).max().unwrap_or(0);
        for month in &analytics.by_month {
            lines.push(tally_line(&month.key(), month.count, max));
        }
    }
    lines
}
