use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::data_dir::resolve_data_dir;
use crate::io::session;
use crate::io::store::{CollectionStore, FileStore};
use crate::io::watcher::DataWatcher;
use crate::model::{AppConfig, DebtItem, DebtStatus, DefaultView, FilterSpec, UserIdentity};
use crate::ops::analytics::{AnalyticsScope, TimeRange};
use crate::ops::board::{Board, group_by_status};
use crate::ops::filter::SearchMatcher;
use crate::service::{Tracker, TrackerError};

use super::input;
use super::render;
use super::theme::Theme;

/// Tracker over whichever store the app was opened with
pub type AppTracker = Tracker<Box<dyn CollectionStore>>;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Table,
    Kanban,
    Analytics,
}

impl View {
    pub const ALL: [View; 3] = [View::Table, View::Kanban, View::Analytics];

    pub fn label(self) -> &'static str {
        match self {
            View::Table => "Table",
            View::Kanban => "Kanban",
            View::Analytics => "Analytics",
        }
    }

    pub fn next(self) -> View {
        match self {
            View::Table => View::Kanban,
            View::Kanban => View::Analytics,
            View::Analytics => View::Table,
        }
    }

    pub fn prev(self) -> View {
        match self {
            View::Table => View::Analytics,
            View::Kanban => View::Table,
            View::Analytics => View::Kanban,
        }
    }
}

impl From<DefaultView> for View {
    fn from(v: DefaultView) -> Self {
        match v {
            DefaultView::Table => View::Table,
            DefaultView::Kanban => View::Kanban,
            DefaultView::Analytics => View::Analytics,
        }
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Search,
    Confirm,
}

/// An action waiting for y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteItem { id: String },
}

/// Main application state
pub struct App {
    pub tracker: AppTracker,
    pub user: UserIdentity,
    pub theme: Theme,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    /// Set after a quit was refused because of unsaved changes
    pub quit_armed: bool,
    pub show_help: bool,
    pub show_key_hints: bool,
    /// Filter shared by the table and kanban views
    pub filter: FilterSpec,
    /// Search text being typed (Search mode)
    pub search_input: String,
    /// Byte offset of the cursor in `search_input`
    pub search_cursor: usize,
    /// Search text before Search mode was entered, restored on Esc
    pub search_before: String,
    pub table_cursor: usize,
    pub table_scroll: usize,
    /// Focused kanban column, by status index
    pub kanban_column: usize,
    /// Cursor within each kanban column
    pub kanban_cursors: [usize; 4],
    pub analytics_range: TimeRange,
    pub window_months: u32,
    pub confirm: Option<ConfirmAction>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
}

impl App {
    pub fn new(tracker: AppTracker, user: UserIdentity, config: &AppConfig) -> Self {
        App {
            tracker,
            user,
            theme: Theme::from_config(&config.ui),
            view: config.ui.default_view.into(),
            mode: Mode::Navigate,
            should_quit: false,
            quit_armed: false,
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            filter: FilterSpec::default(),
            search_input: String::new(),
            search_cursor: 0,
            search_before: String::new(),
            table_cursor: 0,
            table_scroll: 0,
            kanban_column: 0,
            kanban_cursors: [0; 4],
            analytics_range: TimeRange::All,
            window_months: config.analytics.window_months,
            confirm: None,
            status_message: None,
            status_is_error: false,
        }
    }

    // -----------------------------------------------------------------------
    // Derived view data
    // -----------------------------------------------------------------------

    /// Items passing the current filter, in collection order
    pub fn visible(&self) -> Vec<&DebtItem> {
        self.tracker.visible(&self.filter)
    }

    pub fn board(&self) -> Board<'_> {
        group_by_status(&self.visible())
    }

    /// Matcher for highlighting: the live input while searching, else the
    /// committed search text.
    pub fn search_matcher(&self) -> Option<SearchMatcher> {
        match self.mode {
            Mode::Search => SearchMatcher::new(&self.search_input),
            _ => SearchMatcher::new(&self.filter.search),
        }
    }

    /// The project the analytics view is narrowed to, when exactly one
    /// project is selected in the filter
    pub fn analytics_scope(&self) -> AnalyticsScope {
        let project_id = if self.filter.project_ids.len() == 1 {
            self.filter.project_ids.iter().next().cloned()
        } else {
            None
        };
        AnalyticsScope {
            range: self.analytics_range,
            project_id,
        }
    }

    /// ID of the item under the cursor in the current view
    pub fn selected_id(&self) -> Option<String> {
        match self.view {
            View::Table => self
                .visible()
                .get(self.table_cursor)
                .map(|item| item.id.clone()),
            View::Kanban => {
                let board = self.board();
                let column = &board.columns[self.kanban_column];
                column
                    .items
                    .get(self.kanban_cursors[self.kanban_column])
                    .map(|item| item.id.clone())
            }
            View::Analytics => None,
        }
    }

    // -----------------------------------------------------------------------
    // Cursor handling
    // -----------------------------------------------------------------------

    /// Keep every cursor inside its list after the visible set changed
    pub fn clamp_cursors(&mut self) {
        let table_len = self.visible().len();
        self.table_cursor = self.table_cursor.min(table_len.saturating_sub(1));
        let lens: Vec<usize> = self.board().columns.iter().map(|c| c.items.len()).collect();
        for (cursor, len) in self.kanban_cursors.iter_mut().zip(lens) {
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        match self.view {
            View::Table => {
                let len = self.visible().len();
                self.table_cursor = step(self.table_cursor, delta, len);
            }
            View::Kanban => {
                let col = self.kanban_column;
                let len = self.board().columns[col].items.len();
                self.kanban_cursors[col] = step(self.kanban_cursors[col], delta, len);
            }
            View::Analytics => {}
        }
    }

    pub fn jump_cursor(&mut self, to_end: bool) {
        match self.view {
            View::Table => {
                let len = self.visible().len();
                self.table_cursor = if to_end { len.saturating_sub(1) } else { 0 };
            }
            View::Kanban => {
                let col = self.kanban_column;
                let len = self.board().columns[col].items.len();
                self.kanban_cursors[col] = if to_end { len.saturating_sub(1) } else { 0 };
            }
            View::Analytics => {}
        }
    }

    pub fn move_column(&mut self, delta: isize) {
        self.kanban_column = step(self.kanban_column, delta, DebtStatus::ALL.len());
    }

    /// Put the cursor on `id` in the current view, if it is visible
    pub fn select_item(&mut self, id: &str) {
        match self.view {
            View::Table => {
                if let Some(pos) = self.visible().iter().position(|i| i.id == id) {
                    self.table_cursor = pos;
                }
            }
            View::Kanban => {
                let found = self.board().columns.iter().enumerate().find_map(|(c, column)| {
                    column
                        .items
                        .iter()
                        .position(|i| i.id == id)
                        .map(|pos| (c, pos))
                });
                if let Some((column, pos)) = found {
                    self.kanban_column = column;
                    self.kanban_cursors[column] = pos;
                }
            }
            View::Analytics => {}
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub fn advance_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        let before = self.tracker.item(&id).map(|i| i.status).ok();
        let result = self.tracker.advance(&id);
        match (&result, before) {
            (Ok(item), Some(before)) if item.status == before => {
                self.set_message(format!("{} is already {}", id, before));
            }
            (Ok(item), Some(before)) => {
                self.set_message(format!("{}: {} → {}", id, before, item.status));
            }
            _ => {}
        }
        self.after_mutation(&id, result.map(|_| ()));
    }

    /// Set the selected item's status (number keys and kanban moves)
    pub fn set_selected_status(&mut self, target: DebtStatus) {
        let Some(id) = self.selected_id() else { return };
        let before = self.tracker.item(&id).map(|i| i.status).ok();
        let result = self.tracker.set_status(&id, target);
        if let (Ok(_), Some(before)) = (&result, before) {
            self.set_message(format!("{}: {} → {}", id, before, target));
        }
        self.after_mutation(&id, result.map(|_| ()));
    }

    /// Move the selected kanban card one column left or right
    pub fn move_selected_card(&mut self, forward: bool) {
        let Some(id) = self.selected_id() else { return };
        let Ok(status) = self.tracker.item(&id).map(|i| i.status) else {
            return;
        };
        let target = if forward { status.next() } else { status.prev() };
        if let Some(target) = target {
            self.set_selected_status(target);
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(id) = self.selected_id() {
            self.confirm = Some(ConfirmAction::DeleteItem { id });
            self.mode = Mode::Confirm;
        }
    }

    pub fn confirm_action(&mut self) {
        self.mode = Mode::Navigate;
        let Some(action) = self.confirm.take() else { return };
        match action {
            ConfirmAction::DeleteItem { id } => match self.tracker.remove(&id) {
                Ok(Some(item)) => {
                    self.set_message(format!("deleted {}: {}", item.id, item.title));
                    self.clamp_cursors();
                }
                Ok(None) => self.set_error(format!("item not found: {}", id)),
                Err(e) => {
                    self.set_error(e.to_string());
                    self.clamp_cursors();
                }
            },
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = None;
        self.mode = Mode::Navigate;
    }

    fn after_mutation(&mut self, id: &str, result: Result<(), TrackerError>) {
        if let Err(e) = result {
            self.set_error(e.to_string());
        }
        self.clamp_cursors();
        self.select_item(id);
    }

    /// Retry any unsaved write, then reload from disk
    pub fn reload(&mut self) {
        if self.tracker.has_unsaved()
            && let Err(e) = self.tracker.flush()
        {
            self.set_error(e.to_string());
            return;
        }
        match self.tracker.reload() {
            Ok(()) => {
                let warnings = self.tracker.take_warnings();
                match warnings.first() {
                    Some(w) => self.set_error(format!("warning: {}", w)),
                    None => self.set_message("reloaded"),
                }
            }
            Err(e) => self.set_error(e.to_string()),
        }
        self.clamp_cursors();
    }

    /// Pick up changes another process wrote. Skipped while an unsaved
    /// change is pending so it is not dropped.
    pub fn external_change(&mut self) {
        if self.tracker.has_unsaved() || self.tracker.reload().is_err() {
            return;
        }
        if let Some(w) = self.tracker.take_warnings().first() {
            self.set_error(format!("warning: {}", w));
        }
        self.clamp_cursors();
    }

    /// Quit, unless a change could not be saved; then a second request quits.
    pub fn request_quit(&mut self) {
        if self.tracker.has_unsaved() && self.tracker.flush().is_err() && !self.quit_armed {
            self.quit_armed = true;
            self.set_error("unsaved changes (see recovery log); press q again to quit");
            return;
        }
        self.should_quit = true;
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    pub fn cycle_severity(&mut self) {
        self.filter.severity = cycle(self.filter.severity, &crate::model::Severity::ALL);
        self.filter_changed();
    }

    pub fn cycle_type(&mut self) {
        self.filter.kind = cycle(self.filter.kind, &crate::model::DebtType::ALL);
        self.filter_changed();
    }

    pub fn cycle_status(&mut self) {
        self.filter.status = cycle(self.filter.status, &DebtStatus::ALL);
        self.filter_changed();
    }

    /// Step through no project, then each project in turn
    pub fn cycle_project(&mut self) {
        let ids: Vec<&str> = self.tracker.projects().iter().map(|p| p.id.as_str()).collect();
        let current = if self.filter.project_ids.len() == 1 {
            self.filter.project_ids.iter().next().map(String::as_str)
        } else {
            None
        };
        let next = cycle(current, &ids).map(str::to_string);
        self.filter.project_ids = next.into_iter().collect();
        self.filter_changed();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.filter_changed();
    }

    pub fn cycle_range(&mut self) {
        self.analytics_range = self.analytics_range.cycle();
    }

    pub fn filter_changed(&mut self) {
        self.table_cursor = 0;
        self.table_scroll = 0;
        self.kanban_cursors = [0; 4];
    }

    // -----------------------------------------------------------------------
    // Status row
    // -----------------------------------------------------------------------

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_is_error = true;
    }
}

/// Move `current` by `delta`, staying within `0..len`
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}

/// None → first → … → last → None
fn cycle<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(c) => {
            let pos = all.iter().position(|x| *x == c)?;
            all.get(pos + 1).copied()
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(data_dir)?;
    let user = session::require_identity(&data_dir)?;
    let config = config_io::read_config(&data_dir)?;

    let store: Box<dyn CollectionStore> = Box::new(FileStore::new(&data_dir));
    let mut tracker = Tracker::open(store, config.ids.prefix.clone());
    let warnings = tracker.take_warnings();
    let mut app = App::new(tracker, user, &config);
    if let Some(w) = warnings.first() {
        app.set_error(format!("warning: {}", w));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &data_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    data_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let watcher = match DataWatcher::start(data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            app.set_error(format!("not watching for changes: {}", e));
            None
        }
    };

    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if let Some(w) = &watcher
            && !w.poll().is_empty()
        {
            app.external_change();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
