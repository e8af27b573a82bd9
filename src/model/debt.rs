use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a debt item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DebtStatus {
    Open,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Fixed,
    Resolved,
}

impl DebtStatus {
    /// All statuses in lifecycle order (also the kanban column order)
    pub const ALL: [DebtStatus; 4] = [
        DebtStatus::Open,
        DebtStatus::InProgress,
        DebtStatus::Fixed,
        DebtStatus::Resolved,
    ];

    /// The deterministic successor in the lifecycle chain. `None` for Resolved.
    pub fn next(self) -> Option<DebtStatus> {
        match self {
            DebtStatus::Open => Some(DebtStatus::InProgress),
            DebtStatus::InProgress => Some(DebtStatus::Fixed),
            DebtStatus::Fixed => Some(DebtStatus::Resolved),
            DebtStatus::Resolved => None,
        }
    }

    /// The predecessor in the lifecycle chain. `None` for Open.
    pub fn prev(self) -> Option<DebtStatus> {
        match self {
            DebtStatus::Open => None,
            DebtStatus::InProgress => Some(DebtStatus::Open),
            DebtStatus::Fixed => Some(DebtStatus::InProgress),
            DebtStatus::Resolved => Some(DebtStatus::Fixed),
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn label(self) -> &'static str {
        match self {
            DebtStatus::Open => "Open",
            DebtStatus::InProgress => "In Progress",
            DebtStatus::Fixed => "Fixed",
            DebtStatus::Resolved => "Resolved",
        }
    }

    /// Position in lifecycle order (0-based)
    pub fn index(self) -> usize {
        match self {
            DebtStatus::Open => 0,
            DebtStatus::InProgress => 1,
            DebtStatus::Fixed => 2,
            DebtStatus::Resolved => 3,
        }
    }
}

/// Kind of UX issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DebtType {
    Visual,
    Accessibility,
    Copy,
    Usability,
}

impl DebtType {
    pub const ALL: [DebtType; 4] = [
        DebtType::Visual,
        DebtType::Accessibility,
        DebtType::Copy,
        DebtType::Usability,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DebtType::Visual => "Visual",
            DebtType::Accessibility => "Accessibility",
            DebtType::Copy => "Copy",
            DebtType::Usability => "Usability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DebtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for parsing a status, type, or severity from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} \"{value}\" (expected one of: {expected})")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Lowercase and drop separators so "In Progress", "in-progress" and
/// "inprogress" all compare equal.
fn normalize_choice(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_choice<T: Copy + fmt::Display>(
    kind: &'static str,
    value: &str,
    all: &[T],
) -> Result<T, ParseChoiceError> {
    let wanted = normalize_choice(value);
    all.iter()
        .copied()
        .find(|v| normalize_choice(&v.to_string()) == wanted)
        .ok_or_else(|| ParseChoiceError {
            kind,
            value: value.to_string(),
            expected: all
                .iter()
                .map(|v| v.to_string().to_lowercase())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

impl FromStr for DebtStatus {
    type Err = ParseChoiceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("status", s, &DebtStatus::ALL)
    }
}

impl FromStr for DebtType {
    type Err = ParseChoiceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("type", s, &DebtType::ALL)
    }
}

impl FromStr for Severity {
    type Err = ParseChoiceError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice("severity", s, &Severity::ALL)
    }
}

/// A logged UX issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtItem {
    pub id: String,
    /// Owning project. Not checked against the project collection.
    pub project_id: String,
    pub title: String,
    /// Screen or component the issue was found on
    pub screen: String,
    #[serde(rename = "type")]
    pub kind: DebtType,
    pub severity: Severity,
    pub status: DebtStatus,
    pub description: String,
    pub recommendation: String,
    pub logged_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Data URI, path, or link. Opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub figma_link: Option<String>,
}

impl DebtItem {
    /// Record a mutation time
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    /// Last mutation time, falling back to creation time for records that
    /// predate `updatedAt`.
    pub fn last_changed(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}

/// A field of the new-entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Project,
    Title,
    Screen,
    Type,
    Severity,
    Description,
    Recommendation,
    LoggedBy,
    /// Project name (create-project form)
    Name,
}

impl DraftField {
    /// The field's name as it appears in the stored record
    pub fn key(self) -> &'static str {
        match self {
            DraftField::Project => "projectId",
            DraftField::Title => "title",
            DraftField::Screen => "screen",
            DraftField::Type => "type",
            DraftField::Severity => "severity",
            DraftField::Description => "description",
            DraftField::Recommendation => "recommendation",
            DraftField::LoggedBy => "loggedBy",
            DraftField::Name => "name",
        }
    }

    /// Per-field message for form display
    pub fn message(self) -> &'static str {
        match self {
            DraftField::Project => "Project is required",
            DraftField::Title => "Title is required",
            DraftField::Screen => "Screen/Component name is required",
            DraftField::Type => "Type is required",
            DraftField::Severity => "Severity is required",
            DraftField::Description => "Description is required",
            DraftField::Recommendation => "Recommendation is required",
            DraftField::LoggedBy => "Logged by is required",
            DraftField::Name => "Project name is required",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required fields: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<DraftField>,
}

fn join_fields(fields: &[DraftField]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn contains(&self, field: DraftField) -> bool {
        self.fields.contains(&field)
    }
}

/// Pending new-entry form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebtDraft {
    pub project_id: String,
    pub title: String,
    pub screen: String,
    pub kind: Option<DebtType>,
    pub severity: Option<Severity>,
    pub description: String,
    pub recommendation: String,
    pub logged_by: String,
    pub screenshot: Option<String>,
    pub figma_link: Option<String>,
}

impl DebtDraft {
    /// Check every required field, collecting all failures. On success
    /// returns the chosen type and severity.
    pub fn validate(&self) -> Result<(DebtType, Severity), ValidationError> {
        let mut fields = Vec::new();
        let text = [
            (DraftField::Project, &self.project_id),
            (DraftField::Title, &self.title),
            (DraftField::Screen, &self.screen),
        ];
        for (field, value) in text {
            if value.trim().is_empty() {
                fields.push(field);
            }
        }
        if self.kind.is_none() {
            fields.push(DraftField::Type);
        }
        if self.severity.is_none() {
            fields.push(DraftField::Severity);
        }
        let text = [
            (DraftField::Description, &self.description),
            (DraftField::Recommendation, &self.recommendation),
            (DraftField::LoggedBy, &self.logged_by),
        ];
        for (field, value) in text {
            if value.trim().is_empty() {
                fields.push(field);
            }
        }

        match (self.kind, self.severity) {
            (Some(kind), Some(severity)) if fields.is_empty() => Ok((kind, severity)),
            _ => Err(ValidationError { fields }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_chain_is_linear() {
        assert_eq!(DebtStatus::Open.next(), Some(DebtStatus::InProgress));
        assert_eq!(DebtStatus::InProgress.next(), Some(DebtStatus::Fixed));
        assert_eq!(DebtStatus::Fixed.next(), Some(DebtStatus::Resolved));
        assert_eq!(DebtStatus::Resolved.next(), None);
        assert!(DebtStatus::Resolved.is_terminal());
        for s in DebtStatus::ALL {
            if let Some(n) = s.next() {
                assert_eq!(n.prev(), Some(s));
            }
        }
    }

    #[test]
    fn status_serializes_with_display_label() {
        let json = serde_json::to_string(&DebtStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: DebtStatus = serde_json::from_str("\"InProgress\"").unwrap();
        assert_eq!(parsed, DebtStatus::InProgress);
        let parsed: DebtStatus = serde_json::from_str("\"Fixed\"").unwrap();
        assert_eq!(parsed, DebtStatus::Fixed);
    }

    #[test]
    fn parse_choices_from_user_input() {
        assert_eq!("in progress".parse::<DebtStatus>(), Ok(DebtStatus::InProgress));
        assert_eq!("in-progress".parse::<DebtStatus>(), Ok(DebtStatus::InProgress));
        assert_eq!("RESOLVED".parse::<DebtStatus>(), Ok(DebtStatus::Resolved));
        assert_eq!("a11y".parse::<DebtType>().unwrap_err().kind, "type");
        assert_eq!("accessibility".parse::<DebtType>(), Ok(DebtType::Accessibility));
        assert_eq!("low".parse::<Severity>(), Ok(Severity::Low));

        let err = "urgent".parse::<Severity>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid severity \"urgent\" (expected one of: high, medium, low)"
        );
    }

    #[test]
    fn item_uses_camel_case_wire_names() {
        let json = r#"{
            "id": "UX-001",
            "projectId": "main-website",
            "title": "Button contrast too low",
            "screen": "Login Page",
            "type": "Accessibility",
            "severity": "High",
            "status": "In Progress",
            "description": "Primary buttons fail WCAG AA",
            "recommendation": "Raise contrast to 4.5:1",
            "loggedBy": "Design Team",
            "createdAt": "2024-06-10T10:00:00Z"
        }"#;
        let item: DebtItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, DebtType::Accessibility);
        assert_eq!(item.status, DebtStatus::InProgress);
        assert!(item.updated_at.is_none());
        assert_eq!(item.last_changed(), item.created_at);

        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["projectId"], "main-website");
        assert_eq!(out["loggedBy"], "Design Team");
        assert!(out.get("screenshot").is_none());
    }

    #[test]
    fn validate_reports_every_missing_field() {
        let draft = DebtDraft {
            project_id: "p".into(),
            title: "".into(),
            screen: "Checkout".into(),
            kind: Some(DebtType::Copy),
            severity: Some(Severity::Low),
            description: "d".into(),
            recommendation: "r".into(),
            logged_by: "   ".into(),
            ..Default::default()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.fields, vec![DraftField::Title, DraftField::LoggedBy]);
        assert_eq!(err.to_string(), "missing required fields: title, loggedBy");
    }

    #[test]
    fn validate_empty_draft_lists_all_fields() {
        let err = DebtDraft::default().validate().unwrap_err();
        assert_eq!(err.fields.len(), 8);
        assert!(err.contains(DraftField::Type));
        assert!(err.contains(DraftField::Severity));
    }
}
