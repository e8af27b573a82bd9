use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};

use crate::cli::commands::InitArgs;
use crate::io::config_io::config_path;
use crate::io::data_dir::{DATA_DIR_NAME, discover_data_dir};
use crate::io::store::{self, DEBTS_KEY, FileStore, PROJECTS_KEY};
use crate::model::debt::{DebtItem, DebtStatus, DebtType, Severity};
use crate::model::project::Project;

const CONFIG_TOML_TEMPLATE: &str = r##"# uxdebt settings. Edit by hand or with: ux config set <section.key> <value>

[ids]
# Debt item IDs look like UX-001, UX-002, ...
prefix = "UX"

[analytics]
# Calendar months shown in the "created per month" trend
window_months = 6

# --- UI Customization ---
# Uncomment and edit to override defaults.

[ui]
# default_view = "table"          # "table", "kanban", or "analytics"
# show_key_hints = false
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
# red = "#EF4444"
# yellow = "#F59E0B"
# green = "#10B981"
# blue = "#3B82F6"
# cyan = "#44DDFF"
"##;

pub fn cmd_init(args: InitArgs, base: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match base {
        Some(dir) => fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };
    let data_dir = root.join(DATA_DIR_NAME);

    if data_dir.is_dir() && !args.force {
        return Err(format!(
            "{}/ already exists in {} (use --force to reinitialize)",
            DATA_DIR_NAME,
            root.display()
        )
        .into());
    }

    // Warn when an enclosing directory already has data
    if let Some(parent) = root.parent()
        && let Ok(outer) = discover_data_dir(parent)
    {
        eprintln!("Note: existing data found at {}", outer.display());
        eprintln!("Creating new data directory in ./{}/", DATA_DIR_NAME);
    }

    fs::create_dir_all(&data_dir)?;
    fs::write(config_path(&data_dir), CONFIG_TOML_TEMPLATE)?;
    println!("Initialized uxdebt in {}", data_dir.display());

    if args.demo {
        let (projects, items) = seed_demo(&data_dir, Utc::now())?;
        println!(
            "  seeded {} projects and {} debt items",
            projects, items
        );
    }
    println!("Next: ux login <email>");
    Ok(())
}

/// Write the sample collections, replacing any existing ones.
fn seed_demo(data_dir: &Path, now: DateTime<Utc>) -> Result<(usize, usize), store::StoreError> {
    let store = FileStore::new(data_dir);
    let projects = demo_projects(now);
    let items = demo_items(now);
    store::save(&store, PROJECTS_KEY, &projects)?;
    store::save(&store, DEBTS_KEY, &items)?;
    Ok((projects.len(), items.len()))
}

fn demo_projects(now: DateTime<Utc>) -> Vec<Project> {
    [
        ("website", "Main Website", "Company website redesign"),
        ("mobile", "Mobile App", "iOS and Android application"),
        ("admin", "Admin Dashboard", "Internal admin panel"),
        ("portal", "Customer Portal", "Client-facing portal"),
    ]
    .into_iter()
    .map(|(id, name, description)| Project {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        created_at: Some(now - Duration::days(180)),
    })
    .collect()
}

struct DemoItem {
    project: &'static str,
    title: &'static str,
    screen: &'static str,
    kind: DebtType,
    severity: Severity,
    status: DebtStatus,
    description: &'static str,
    recommendation: &'static str,
    logged_by: &'static str,
    /// Age at creation, and age of the last update
    created_days_ago: i64,
    updated_days_ago: i64,
}

const DEMO_ITEMS: &[DemoItem] = &[
    DemoItem {
        project: "website",
        title: "Navigation links missing ARIA labels",
        screen: "Navigation Header",
        kind: DebtType::Accessibility,
        severity: Severity::High,
        status: DebtStatus::Open,
        description: "Navigation links lack proper ARIA labels and keyboard focus indicators",
        recommendation: "Add aria-label attributes and visible focus states for all interactive elements",
        logged_by: "sarah.chen@company.com",
        created_days_ago: 4,
        updated_days_ago: 4,
    },
    DemoItem {
        project: "mobile",
        title: "Unclear password error messages",
        screen: "Login Form",
        kind: DebtType::Usability,
        severity: Severity::Medium,
        status: DebtStatus::InProgress,
        description: "Password field shows unclear error messages when validation fails",
        recommendation: "Show a specific message for each unmet password requirement",
        logged_by: "alex.rodriguez@company.com",
        created_days_ago: 5,
        updated_days_ago: 3,
    },
    DemoItem {
        project: "admin",
        title: "Table headers misaligned",
        screen: "Data Table",
        kind: DebtType::Visual,
        severity: Severity::Low,
        status: DebtStatus::Resolved,
        description: "Table headers are not properly aligned with data columns",
        recommendation: "Adjust the table layout so headers share the column grid",
        logged_by: "maria.santos@company.com",
        created_days_ago: 36,
        updated_days_ago: 2,
    },
    DemoItem {
        project: "portal",
        title: "Confusing upload instructions",
        screen: "File Upload",
        kind: DebtType::Copy,
        severity: Severity::Medium,
        status: DebtStatus::Open,
        description: "Upload instructions are unclear and cause user confusion",
        recommendation: "Rewrite the instructions as clear steps listing accepted file formats",
        logged_by: "david.kim@company.com",
        created_days_ago: 67,
        updated_days_ago: 67,
    },
    DemoItem {
        project: "website",
        title: "Form errors not announced",
        screen: "Contact Form",
        kind: DebtType::Accessibility,
        severity: Severity::High,
        status: DebtStatus::Fixed,
        description: "Form validation errors are not announced to screen readers",
        recommendation: "Use ARIA live regions for validation feedback",
        logged_by: "sarah.chen@company.com",
        created_days_ago: 95,
        updated_days_ago: 10,
    },
    DemoItem {
        project: "mobile",
        title: "Low contrast on primary buttons",
        screen: "Checkout",
        kind: DebtType::Accessibility,
        severity: Severity::High,
        status: DebtStatus::Open,
        description: "Primary button text fails WCAG AA contrast on the brand color",
        recommendation: "Darken the button background to reach a 4.5:1 contrast ratio",
        logged_by: "alex.rodriguez@company.com",
        created_days_ago: 128,
        updated_days_ago: 128,
    },
    DemoItem {
        project: "portal",
        title: "Inconsistent date formats",
        screen: "Invoices",
        kind: DebtType::Copy,
        severity: Severity::Low,
        status: DebtStatus::Resolved,
        description: "Invoice dates mix US and ISO formats on the same page",
        recommendation: "Format every date with the user's locale",
        logged_by: "david.kim@company.com",
        created_days_ago: 150,
        updated_days_ago: 90,
    },
];

fn demo_items(now: DateTime<Utc>) -> Vec<DebtItem> {
    DEMO_ITEMS
        .iter()
        .enumerate()
        .map(|(i, d)| DebtItem {
            id: format!("UX-{:03}", i + 1),
            project_id: d.project.to_string(),
            title: d.title.to_string(),
            screen: d.screen.to_string(),
            kind: d.kind,
            severity: d.severity,
            status: d.status,
            description: d.description.to_string(),
            recommendation: d.recommendation.to_string(),
            logged_by: d.logged_by.to_string(),
            created_at: now - Duration::days(d.created_days_ago),
            updated_at: Some(now - Duration::days(d.updated_days_ago)),
            screenshot: None,
            figma_link: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::AppConfig;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_template_is_default_config() {
        let config: AppConfig = toml::from_str(CONFIG_TOML_TEMPLATE).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_demo_items_are_consistent() {
        let projects = demo_projects(now());
        let items = demo_items(now());
        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        for item in &items {
            assert!(
                projects.iter().any(|p| p.id == item.project_id),
                "{} has unknown project {}",
                item.id,
                item.project_id
            );
            assert!(item.last_changed() >= item.created_at);
        }
        // Every status appears so the board has no empty column
        for status in DebtStatus::ALL {
            assert!(items.iter().any(|i| i.status == status));
        }
    }

    #[test]
    fn test_seed_demo_writes_collections() {
        let tmp = TempDir::new().unwrap();
        let (p, i) = seed_demo(tmp.path(), now()).unwrap();
        assert_eq!(p, 4);
        assert_eq!(i, DEMO_ITEMS.len());
        let store = FileStore::new(tmp.path());
        let (items, warning) = store::load::<DebtItem>(&store, DEBTS_KEY);
        assert!(warning.is_none());
        assert_eq!(items, demo_items(now()));
    }
}
