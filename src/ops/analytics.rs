use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::debt::{DebtItem, DebtStatus, DebtType, ParseChoiceError, Severity};

/// Longest creation trend, in months
pub const MAX_WINDOW_MONTHS: u32 = 120;

/// How far back the dashboard looks, by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    #[default]
    All,
    Last30Days,
    Last90Days,
    LastYear,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::All,
        TimeRange::Last30Days,
        TimeRange::Last90Days,
        TimeRange::LastYear,
    ];

    /// Short form used on the command line
    pub fn key(self) -> &'static str {
        match self {
            TimeRange::All => "all",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
            TimeRange::LastYear => "1y",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::All => "All Time",
            TimeRange::Last30Days => "Last 30 Days",
            TimeRange::Last90Days => "Last 90 Days",
            TimeRange::LastYear => "Last Year",
        }
    }

    /// Earliest creation time still in range, if bounded
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::All => None,
            TimeRange::Last30Days => Some(now - Duration::days(30)),
            TimeRange::Last90Days => Some(now - Duration::days(90)),
            TimeRange::LastYear => Some(now - Duration::days(365)),
        }
    }

    /// The following choice, wrapping around
    pub fn cycle(self) -> TimeRange {
        let idx = TimeRange::ALL.iter().position(|r| *r == self).unwrap_or(0);
        TimeRange::ALL[(idx + 1) % TimeRange::ALL.len()]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TimeRange::ALL
            .into_iter()
            .find(|r| r.key() == wanted)
            .ok_or_else(|| ParseChoiceError {
                kind: "time range",
                value: s.to_string(),
                expected: TimeRange::ALL.map(TimeRange::key).join(", "),
            })
    }
}

/// Which items the dashboard covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsScope {
    pub range: TimeRange,
    /// Restrict to one project (`None` = all projects)
    pub project_id: Option<String>,
}

impl AnalyticsScope {
    pub fn includes(&self, item: &DebtItem, now: DateTime<Utc>) -> bool {
        if let Some(project) = &self.project_id
            && item.project_id != *project
        {
            return false;
        }
        match self.range.cutoff(now) {
            Some(cutoff) => item.created_at >= cutoff,
            None => true,
        }
    }
}

/// Items created in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

impl MonthCount {
    /// `YYYY-MM`
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Abbreviated month name (`Jun`)
    pub fn short_label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b").to_string())
            .unwrap_or_else(|| self.key())
    }
}

/// Dashboard tallies over the scoped items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total: usize,
    pub resolved: usize,
    /// Share of items Resolved, as a percentage rounded to one decimal
    pub resolved_percent: f64,
    pub high_severity: usize,
    pub accessibility: usize,
    pub by_type: IndexMap<DebtType, usize>,
    pub by_severity: IndexMap<Severity, usize>,
    pub by_status: IndexMap<DebtStatus, usize>,
    /// Oldest first, ending with the current month; months without
    /// items are present with a zero count
    pub by_month: Vec<MonthCount>,
}

/// Compute the dashboard for `items` under `scope`.
///
/// The monthly trend covers `window_months` calendar months ending with the
/// month of `now`, capped at [`MAX_WINDOW_MONTHS`]. Every enum variant
/// appears in the tallies, in declaration order, even at zero.
pub fn compute(
    items: &[DebtItem],
    scope: &AnalyticsScope,
    window_months: u32,
    now: DateTime<Utc>,
) -> Analytics {
    let mut by_type: IndexMap<DebtType, usize> = DebtType::ALL.iter().map(|t| (*t, 0)).collect();
    let mut by_severity: IndexMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_status: IndexMap<DebtStatus, usize> =
        DebtStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut by_month = month_window(now, window_months);

    let mut total = 0;
    for item in items.iter().filter(|i| scope.includes(i, now)) {
        total += 1;
        *by_type.entry(item.kind).or_insert(0) += 1;
        *by_severity.entry(item.severity).or_insert(0) += 1;
        *by_status.entry(item.status).or_insert(0) += 1;

        let (year, month) = (item.created_at.year(), item.created_at.month());
        if let Some(bucket) = by_month
            .iter_mut()
            .find(|m| m.year == year && m.month == month)
        {
            bucket.count += 1;
        }
    }

    let resolved = by_status[&DebtStatus::Resolved];
    Analytics {
        total,
        resolved,
        resolved_percent: percent(resolved, total),
        high_severity: by_severity[&Severity::High],
        accessibility: by_type[&DebtType::Accessibility],
        by_type,
        by_severity,
        by_status,
        by_month,
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / whole as f64).round() / 10.0
}

/// Zeroed buckets for the `len` months ending with `now`'s month
fn month_window(now: DateTime<Utc>, len: u32) -> Vec<MonthCount> {
    let len = i32::try_from(len.min(MAX_WINDOW_MONTHS)).unwrap_or(0);
    let current = now.year() * 12 + now.month0() as i32;
    (0..len)
        .rev()
        .map(|back| {
            let n = current - back;
            MonthCount {
                year: n.div_euclid(12),
                month: n.rem_euclid(12) as u32 + 1,
                count: 0,
            }
        })
        .collect()
}
