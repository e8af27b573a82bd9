use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::io::store::{self, CollectionStore, DEBTS_KEY, PROJECTS_KEY, StoreError};
use crate::model::debt::{DebtDraft, DebtItem, DebtStatus, ValidationError};
use crate::model::filter::FilterSpec;
use crate::model::project::{self, Project};
use crate::ops::analytics::{self, Analytics, AnalyticsScope};
use crate::ops::project_ops::{self, ProjectSummary};
use crate::ops::{filter, lifecycle};

/// Source of "now" for timestamps
pub type Clock = fn() -> DateTime<Utc>;

/// Error type for tracker operations
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("change kept in memory but not saved: {0}")]
    Persistence(#[from] StoreError),
    #[error("there are unsaved changes; save them before reloading")]
    UnsavedChanges,
}

/// A persisted collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Collection {
    Projects,
    Debts,
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Collection::Projects => PROJECTS_KEY,
            Collection::Debts => DEBTS_KEY,
        }
    }
}

/// In-memory projects and debt items backed by a [`CollectionStore`].
///
/// Collections are loaded once on open. Every mutation is applied in memory
/// first and then written back. A failed write keeps the in-memory change,
/// marks the collection unsaved, and copies the payload into the recovery
/// log; the write is retried on the next mutation or [`Tracker::flush`].
pub struct Tracker<S: CollectionStore> {
    store: S,
    projects: Vec<Project>,
    items: Vec<DebtItem>,
    id_prefix: String,
    unsaved: BTreeSet<Collection>,
    warnings: Vec<String>,
    clock: Clock,
}

impl<S: CollectionStore> Tracker<S> {
    /// Load both collections from `store`. Load problems never fail the
    /// open; they surface through [`Tracker::take_warnings`].
    pub fn open(store: S, id_prefix: impl Into<String>) -> Self {
        let mut tracker = Tracker {
            store,
            projects: Vec::new(),
            items: Vec::new(),
            id_prefix: id_prefix.into(),
            unsaved: BTreeSet::new(),
            warnings: Vec::new(),
            clock: Utc::now,
        };
        tracker.load_all();
        tracker
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn load_all(&mut self) {
        let (projects, warning) = store::load(&self.store, PROJECTS_KEY);
        self.projects = projects;
        self.note_load_warning(warning);
        let (items, warning) = store::load(&self.store, DEBTS_KEY);
        self.items = items;
        self.note_load_warning(warning);
    }

    fn note_load_warning(&mut self, warning: Option<String>) {
        let Some(warning) = warning else { return };
        if let Some(dir) = self.store.recovery_dir() {
            log_recovery(
                dir,
                RecoveryEntry {
                    timestamp: self.now(),
                    category: RecoveryCategory::Parser,
                    description: "collection ignored on load".to_string(),
                    fields: vec![("reason".to_string(), warning.clone())],
                    body: String::new(),
                },
            );
        }
        self.warnings.push(warning);
    }

    /// Re-read both collections from the store. Refused while a change is
    /// still unsaved, since the reload would drop it.
    pub fn reload(&mut self) -> Result<(), TrackerError> {
        if self.has_unsaved() {
            return Err(TrackerError::UnsavedChanges);
        }
        self.load_all();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn items(&self) -> &[DebtItem] {
        &self.items
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    pub fn item(&self, id: &str) -> Result<&DebtItem, TrackerError> {
        lifecycle::find_item(&self.items, id).ok_or_else(|| not_found("item", id))
    }

    pub fn project(&self, id: &str) -> Result<&Project, TrackerError> {
        project::find_project(&self.projects, id).ok_or_else(|| not_found("project", id))
    }

    /// Name of the project `id`, or the unknown-project placeholder
    pub fn project_name(&self, id: &str) -> &str {
        project::project_name(&self.projects, id)
    }

    /// Items passing `spec`, in collection order
    pub fn visible(&self, spec: &FilterSpec) -> Vec<&DebtItem> {
        filter::apply(&self.items, &self.projects, spec)
    }

    pub fn analytics(&self, scope: &AnalyticsScope, window_months: u32) -> Analytics {
        analytics::compute(&self.items, scope, window_months, self.now())
    }

    pub fn project_summaries(&self) -> Vec<ProjectSummary> {
        project_ops::project_summaries(&self.projects, &self.items)
    }

    // -----------------------------------------------------------------------
    // Debt item mutations
    // -----------------------------------------------------------------------

    /// Validate `draft` and add it as a new Open item.
    pub fn create(&mut self, draft: DebtDraft) -> Result<DebtItem, TrackerError> {
        let now = self.now();
        let item = lifecycle::create(&mut self.items, draft, &self.id_prefix, now)?;
        self.persist(&[Collection::Debts])?;
        Ok(item)
    }

    /// Move an item one step along the lifecycle. A Resolved item is
    /// returned unchanged and nothing is written.
    pub fn advance(&mut self, id: &str) -> Result<DebtItem, TrackerError> {
        let now = self.now();
        let item = lifecycle::find_item_mut(&mut self.items, id)
            .ok_or_else(|| not_found("item", id))?;
        if !lifecycle::advance(item, now) {
            return Ok(item.clone());
        }
        let updated = item.clone();
        self.persist(&[Collection::Debts])?;
        Ok(updated)
    }

    /// Set an item's status directly, in any direction.
    pub fn set_status(&mut self, id: &str, target: DebtStatus) -> Result<DebtItem, TrackerError> {
        let now = self.now();
        let item = lifecycle::find_item_mut(&mut self.items, id)
            .ok_or_else(|| not_found("item", id))?;
        lifecycle::set_status(item, target, now);
        let updated = item.clone();
        self.persist(&[Collection::Debts])?;
        Ok(updated)
    }

    /// Remove an item. An unknown ID is a no-op returning `None`.
    pub fn remove(&mut self, id: &str) -> Result<Option<DebtItem>, TrackerError> {
        let Some(removed) = lifecycle::remove(&mut self.items, id) else {
            return Ok(None);
        };
        self.log_deleted(&format!("removed {}", removed.id), &[&removed]);
        self.persist(&[Collection::Debts])?;
        Ok(Some(removed))
    }

    // -----------------------------------------------------------------------
    // Project mutations
    // -----------------------------------------------------------------------

    pub fn create_project(
        &mut self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, TrackerError> {
        let now = self.now();
        let project = project_ops::create_project(&mut self.projects, name, description, now)?;
        self.persist(&[Collection::Projects])?;
        Ok(project)
    }

    /// Remove a project. Its items stay (and then show under the unknown
    /// project) unless `with_items` is set.
    pub fn remove_project(
        &mut self,
        id: &str,
        with_items: bool,
    ) -> Result<(Project, Vec<DebtItem>), TrackerError> {
        let project = project_ops::remove_project(&mut self.projects, id)
            .ok_or_else(|| not_found("project", id))?;
        let removed = if with_items {
            project_ops::remove_project_items(&mut self.items, id)
        } else {
            Vec::new()
        };

        if removed.is_empty() {
            self.persist(&[Collection::Projects])?;
        } else {
            let refs: Vec<&DebtItem> = removed.iter().collect();
            self.log_deleted(&format!("removed items of project {}", id), &refs);
            self.persist(&[Collection::Projects, Collection::Debts])?;
        }
        Ok((project, removed))
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn has_unsaved(&self) -> bool {
        !self.unsaved.is_empty()
    }

    /// Warnings collected while loading, cleared on read
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    fn persist(&mut self, changed: &[Collection]) -> Result<(), TrackerError> {
        self.unsaved.extend(changed.iter().copied());
        self.flush()
    }

    /// Write every unsaved collection. Stops at the first failure, which
    /// leaves that collection (and any after it) marked unsaved.
    pub fn flush(&mut self) -> Result<(), TrackerError> {
        let pending: Vec<Collection> = self.unsaved.iter().copied().collect();
        for collection in pending {
            let key = collection.key();
            let payload = match collection {
                Collection::Projects => store::to_payload(key, &self.projects)?,
                Collection::Debts => store::to_payload(key, &self.items)?,
            };
            if let Err(e) = self.store.write(key, &payload) {
                self.log_unsaved(key, &payload, &e);
                return Err(e.into());
            }
            self.unsaved.remove(&collection);
        }
        Ok(())
    }

    fn log_unsaved(&self, key: &str, payload: &str, err: &StoreError) {
        let Some(dir) = self.store.recovery_dir() else {
            return;
        };
        log_recovery(
            dir,
            RecoveryEntry {
                timestamp: self.now(),
                category: RecoveryCategory::Write,
                description: format!("{} not saved", key),
                fields: vec![("error".to_string(), err.to_string())],
                body: payload.to_string(),
            },
        );
    }

    fn log_deleted(&self, description: &str, items: &[&DebtItem]) {
        let Some(dir) = self.store.recovery_dir() else {
            return;
        };
        let body = serde_json::to_string_pretty(items).unwrap_or_default();
        log_recovery(
            dir,
            RecoveryEntry {
                timestamp: self.now(),
                category: RecoveryCategory::Delete,
                description: description.to_string(),
                fields: vec![("count".to_string(), items.len().to_string())],
                body,
            },
        );
    }
}

fn not_found(kind: &'static str, id: &str) -> TrackerError {
    TrackerError::NotFound {
        kind,
        id: id.to_string(),
    }
}
