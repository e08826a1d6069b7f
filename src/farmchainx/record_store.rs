//! # Record Store
//!
//! [`RecordStore`] is the engine behind every dashboard. It owns one role's
//! collection (newest first), a bounded [`UpdateLog`], and an optional single
//! selection, and mirrors the collection and log to a [`KeyValueStore`] after
//! every mutation.
//!
//! ## Lifecycle
//!
//! Opening a store reads the collection and the log once. A missing or unreadable
//! value falls back to the record type's seed data, independently for each key.
//! From then on the in-memory state is authoritative: each successful mutation
//! writes the full collection, the log and the id counter back. A failed write
//! is logged, counted, and otherwise ignored; it never rolls the mutation back.
//!
//! ## Ids
//!
//! Ids are `<prefix><number>`. The counter starts at the largest of
//! `id_base + collection size`, the largest number already in use, and the
//! counter persisted by an earlier session, so ids only ever grow and a deleted
//! id is never handed out again.
//!
//! ## Errors
//!
//! Validation, lookup and selection errors are returned before anything is
//! touched, so a failed call leaves the store exactly as it was.

use crate::csv;
use crate::error::{FarmError, Result};
use crate::model::{Record, StoreConfig, Thresholds};
use crate::store::KeyValueStore;
use crate::update_log::{stamp, UpdateLog};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Id numbers above this, stored or embedded in ids, are treated as corrupt.
const MAX_ID_NUMBER: u64 = u32::MAX as u64;

pub struct RecordStore<R: Record, S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    thresholds: Thresholds,
    records: Vec<R>,
    log: UpdateLog,
    selection: Option<String>,
    last_seq: u64,
    persist_failures: usize,
}

impl<R: Record, S: KeyValueStore> RecordStore<R, S> {
    /// Opens the store with the record type's default configuration.
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, R::config())
    }

    pub fn open_with(storage: S, config: StoreConfig) -> Self {
        Self::open_at(storage, config, Utc::now())
    }

    /// Opens the store, stamping any seed data with `now`.
    pub fn open_at(storage: S, config: StoreConfig, now: DateTime<Utc>) -> Self {
        let records = load_json::<Vec<R>, _>(&storage, &config.records_key())
            .filter(|records| {
                let unique = has_unique_ids(records);
                if !unique {
                    warn!(
                        namespace = %config.namespace,
                        "Stored collection has duplicate ids, using seed data"
                    );
                }
                unique
            })
            .unwrap_or_else(|| R::seed(now));

        let entries = load_json::<Vec<String>, _>(&storage, &config.log_key())
            .unwrap_or_else(|| R::seed_log(now));
        let log = UpdateLog::from_entries(config.log_capacity, entries);

        let stored_seq = load_json::<u64, _>(&storage, &config.seq_key())
            .filter(|&seq| {
                if seq > MAX_ID_NUMBER {
                    warn!(
                        namespace = %config.namespace,
                        seq,
                        "Stored id counter is out of range, ignoring it"
                    );
                }
                seq <= MAX_ID_NUMBER
            })
            .unwrap_or(0);
        let last_seq = stored_seq
            .max(config.id_base.saturating_add(records.len() as u64))
            .max(largest_suffix(&records, config.id_prefix));

        debug!(
            namespace = %config.namespace,
            records = records.len(),
            last_seq,
            "Opened record store"
        );

        Self {
            storage,
            config,
            thresholds: Thresholds::default(),
            records,
            log,
            selection: None,
            last_seq,
            persist_failures: 0,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The live collection, newest first.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn log(&self) -> &UpdateLog {
        &self.log
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected_record(&self) -> Option<&R> {
        self.selection.as_deref().and_then(|id| self.get(id))
    }

    /// Write-backs that failed since the store was opened.
    pub fn persist_failures(&self) -> usize {
        self.persist_failures
    }

    pub fn create(&mut self, draft: R::Draft) -> Result<R> {
        self.create_at(draft, Utc::now())
    }

    pub fn create_at(&mut self, draft: R::Draft, now: DateTime<Utc>) -> Result<R> {
        R::validate_draft(&draft)?;

        let seq = self.last_seq.checked_add(1).ok_or_else(|| {
            FarmError::PersistenceFailed(format!("{} id counter exhausted", self.config.namespace))
        })?;
        let id = format!("{}{}", self.config.id_prefix, seq);
        let mut record = R::from_draft(id, draft, now);
        record.set_status(R::Status::default());
        check_required(&record)?;

        self.last_seq = seq;
        self.records.insert(0, record.clone());
        if let Some(cap) = self.config.record_capacity {
            self.records.truncate(cap);
            self.drop_stale_selection();
        }

        info!(namespace = %self.config.namespace, id = record.id(), "Record created");
        self.push_log(record.created_entry(), now);
        self.persist();
        Ok(record)
    }

    pub fn update(&mut self, id: &str, patch: R::Patch) -> Result<R> {
        self.update_at(id, patch, Utc::now())
    }

    pub fn update_at(&mut self, id: &str, patch: R::Patch, now: DateTime<Utc>) -> Result<R> {
        let pos = self.position(id)?;
        R::validate_patch(&patch)?;

        let mut candidate = self.records[pos].clone();
        candidate.apply(patch);
        check_required(&candidate)?;
        self.records[pos] = candidate.clone();

        info!(namespace = %self.config.namespace, id, "Record updated");
        self.push_log(candidate.updated_entry(), now);
        self.persist();
        Ok(candidate)
    }

    /// Removes a record. Asking the user for confirmation is the caller's job.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.delete_at(id, Utc::now())
    }

    pub fn delete_at(&mut self, id: &str, now: DateTime<Utc>) -> Result<()> {
        let pos = self.position(id)?;
        let removed = self.records.remove(pos);
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }

        info!(namespace = %self.config.namespace, id, "Record deleted");
        self.push_log(removed.deleted_entry(), now);
        self.persist();
        Ok(())
    }

    /// Sets the status of `id`, or of the selected record when `id` is `None`.
    pub fn set_status(&mut self, id: Option<&str>, status: R::Status) -> Result<R> {
        self.set_status_at(id, status, Utc::now())
    }

    pub fn set_status_at(
        &mut self,
        id: Option<&str>,
        status: R::Status,
        now: DateTime<Utc>,
    ) -> Result<R> {
        let target = match id {
            Some(id) => id.to_string(),
            None => self.selection.clone().ok_or(FarmError::NoSelection)?,
        };
        let pos = self.position(&target)?;

        let record = &mut self.records[pos];
        record.set_status(status);
        let record = record.clone();

        info!(
            namespace = %self.config.namespace,
            id = %target,
            status = %status,
            "Record status changed"
        );
        self.push_log(record.status_entry(), now);
        self.persist();
        Ok(record)
    }

    /// Toggles the single selection: selecting the selected id clears it.
    pub fn select(&mut self, id: &str) -> Result<()> {
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
            return Ok(());
        }
        self.position(id)?;
        self.selection = Some(id.to_string());
        Ok(())
    }

    /// Case-insensitive substring search over the record type's searchable fields.
    ///
    /// An empty or blank query matches everything. The iterator borrows the
    /// store, so calling `query` again restarts from the newest record.
    pub fn query<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a R> + 'a {
        let needle = text.trim().to_lowercase();
        self.records
            .iter()
            .filter(move |record| matches_query(*record, &needle))
    }

    pub fn aggregate(&self) -> R::Stats {
        self.aggregate_at(Utc::now())
    }

    pub fn aggregate_at(&self, now: DateTime<Utc>) -> R::Stats {
        R::aggregate(&self.records, now, &self.thresholds)
    }

    pub fn export_csv(&self, rows: &[R]) -> Result<Vec<u8>> {
        csv::render(rows)
    }

    /// Exports the selected record if there is one, otherwise the whole collection.
    pub fn export_default(&self) -> Result<Vec<u8>> {
        match self.selected_record() {
            Some(record) => csv::render(std::slice::from_ref(record)),
            None => csv::render(&self.records),
        }
    }

    /// Empties the update log, leaving `note` as its only entry.
    pub fn clear_log(&mut self, note: &str) {
        self.clear_log_at(note, Utc::now());
    }

    pub fn clear_log_at(&mut self, note: &str, now: DateTime<Utc>) {
        self.log.clear();
        self.push_log(note.to_string(), now);
        self.persist();
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| FarmError::NotFound(id.to_string()))
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = &self.selection {
            if !self.records.iter().any(|r| r.id() == id) {
                self.selection = None;
            }
        }
    }

    fn push_log(&mut self, entry: String, now: DateTime<Utc>) {
        if self.config.timestamp_log {
            self.log.push(stamp(now, &entry));
        } else {
            self.log.push(entry);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_back() {
            self.persist_failures += 1;
            warn!(
                namespace = %self.config.namespace,
                error = %e,
                "Failed to persist store, keeping in-memory state"
            );
        }
    }

    fn write_back(&self) -> Result<()> {
        let records = serde_json::to_string(&self.records)?;
        self.storage.set(&self.config.records_key(), &records)?;

        let log = serde_json::to_string(self.log.entries())?;
        self.storage.set(&self.config.log_key(), &log)?;

        self.storage
            .set(&self.config.seq_key(), &self.last_seq.to_string())?;
        Ok(())
    }
}

fn load_json<T: DeserializeOwned, S: KeyValueStore>(storage: &S, key: &str) -> Option<T> {
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Stored value is unreadable, falling back");
                None
            }
        },
        Ok(None) => {
            debug!(key, "No stored value, falling back");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value, falling back");
            None
        }
    }
}

fn has_unique_ids<R: Record>(records: &[R]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().all(|r| seen.insert(r.id()))
}

fn largest_suffix<R: Record>(records: &[R], prefix: &str) -> u64 {
    records
        .iter()
        .filter_map(|r| r.id().strip_prefix(prefix))
        .filter_map(|n| n.parse::<u64>().ok())
        .filter(|&n| n <= MAX_ID_NUMBER)
        .max()
        .unwrap_or(0)
}

fn check_required<R: Record>(record: &R) -> Result<()> {
    match record
        .required_fields()
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
    {
        Some((field, _)) => Err(FarmError::ValidationFailed(field.to_string())),
        None => Ok(()),
    }
}

fn matches_query<R: Record>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let status = record.status().to_string();
    record
        .searchable_fields()
        .into_iter()
        .chain(std::iter::once(status.as_str()))
        .any(|field| field.to_lowercase().contains(needle))
}
