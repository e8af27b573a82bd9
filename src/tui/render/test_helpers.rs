use std::rc::Rc;

use chrono::{DateTime, TimeZone, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::{self, CollectionStore, DEBTS_KEY, MemoryStore, PROJECTS_KEY, StoreError};
use crate::model::{
    AppConfig, DebtItem, DebtStatus, DebtType, Project, Severity, UserIdentity,
};
use crate::service::Tracker;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn sample_projects() -> Vec<Project> {
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

/// Three items: Open/High, In Progress/Medium, Resolved/Low
pub fn sample_items() -> Vec<DebtItem> {
    let base = DebtItem {
        id: "UX-001".into(),
        project_id: "web".into(),
        title: "Navigation links missing ARIA labels".into(),
        screen: "Navigation Header".into(),
        kind: DebtType::Accessibility,
        severity: Severity::High,
        status: DebtStatus::Open,
        description: "Links lack focus indicators".into(),
        recommendation: "Add aria-label attributes".into(),
        logged_by: "sarah.chen@company.com".into(),
        created_at: Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap(),
        updated_at: None,
        screenshot: None,
        figma_link: None,
    };
    vec![
        base.clone(),
        DebtItem {
            id: "UX-002".into(),
            project_id: "app".into(),
            title: "Unclear password error messages".into(),
            screen: "Login Form".into(),
            kind: DebtType::Usability,
            severity: Severity::Medium,
            status: DebtStatus::InProgress,
            description: "Validation failures show a generic message".into(),
            recommendation: "Name each unmet requirement".into(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap(),
            ..base.clone()
        },
        DebtItem {
            id: "UX-003".into(),
            title: "Table headers misaligned".into(),
            screen: "Data Table".into(),
            kind: DebtType::Visual,
            severity: Severity::Low,
            status: DebtStatus::Resolved,
            description: "Headers drift from their columns".into(),
            recommendation: "Share one column grid".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            ..base
        },
    ]
}

/// Memory store shared with the test so it can flip write failures
pub struct SharedStore(pub Rc<MemoryStore>);

impl CollectionStore for SharedStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.0.read(key)
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        self.0.write(key, payload)
    }
}

/// An app over the sample projects and `items`, with a handle on its store
pub fn app_with_store(items: Vec<DebtItem>) -> (App, Rc<MemoryStore>) {
    let memory = Rc::new(MemoryStore::new());
    store::save(memory.as_ref(), PROJECTS_KEY, &sample_projects()).unwrap();
    store::save(memory.as_ref(), DEBTS_KEY, &items).unwrap();

    let boxed: Box<dyn CollectionStore> = Box::new(SharedStore(Rc::clone(&memory)));
    let tracker = Tracker::open(boxed, "UX").with_clock(fixed_now);
    let user = UserIdentity {
        email: "sarah.chen@company.com".into(),
    };
    (App::new(tracker, user, &AppConfig::default()), memory)
}

pub fn app_with_items(items: Vec<DebtItem>) -> App {
    app_with_store(items).0
}
