use std::cell::RefCell;
use std::collections::HashSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{PatternId, PatternRecord, PatternUpdate, default_patterns};

mod kv;

pub use self::kv::{FileKv, KeyValueStore, MemoryKv, write_atomic};

/// Key under which the serialized pattern list lives.
pub const STORAGE_KEY: &str = "gh-pr-regex-patterns";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("read patterns from {key:?}: {source:#}")]
    Read {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("write patterns to {key:?}: {source:#}")]
    Write {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

/// On-disk shape; older entries may lack `id` or use `checked`.
#[derive(Debug, Deserialize)]
struct StoredPattern {
    label: String,

    #[serde(default, alias = "checked")]
    selected: bool,

    #[serde(default)]
    id: Option<PatternId>,
}

#[derive(Serialize)]
struct StoredPatternRef<'a> {
    label: &'a str,
    selected: bool,
    id: &'a PatternId,
}

/// Ordered, persisted list of patterns backed by a key-value store.
///
/// Every mutation re-reads the persisted list, applies the change and writes
/// the whole list back. Storage failures never surface to the caller: reads
/// fall back to the default set and failed writes leave persisted state stale.
pub struct PatternStore<S> {
    kv: S,
    key: String,
    last_error: RefCell<Option<String>>,
}

impl<S: KeyValueStore> PatternStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            last_error: RefCell::new(None),
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Storage error absorbed by the latest read or write, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Current patterns in insertion order, or the default set when nothing
    /// usable is persisted.
    ///
    /// Records missing an id, or repeating one already seen, are given a
    /// fresh id and the list is written back straight away so later calls
    /// see the same ids.
    pub fn list(&self) -> Vec<PatternRecord> {
        self.clear_error();
        match self.try_list() {
            Ok(Some(patterns)) => patterns,
            Ok(None) => default_patterns(),
            Err(err) => {
                warn!(error = %err, "pattern storage unreadable, using defaults");
                self.record_error(&err);
                default_patterns()
            }
        }
    }

    /// Like [`PatternStore::list`] but reports absence as `None` and
    /// unreadable state as an error instead of substituting defaults.
    pub fn try_list(&self) -> Result<Option<Vec<PatternRecord>>, StoreError> {
        let read_err = |source: anyhow::Error| StoreError::Read {
            key: self.key.clone(),
            source,
        };

        let Some(raw) = self.kv.get(&self.key).map_err(read_err)? else {
            return Ok(None);
        };
        let stored: Vec<StoredPattern> = serde_json::from_str(&raw)
            .context("parse stored patterns")
            .map_err(read_err)?;

        let mut seen = HashSet::new();
        let mut backfilled = 0usize;
        let patterns: Vec<PatternRecord> = stored
            .into_iter()
            .map(|p| {
                let id = match p.id {
                    Some(id) if !id.is_empty() && !seen.contains(&id) => id,
                    _ => {
                        backfilled += 1;
                        PatternId::generate()
                    }
                };
                seen.insert(id.clone());
                PatternRecord {
                    label: p.label,
                    selected: p.selected,
                    id,
                }
            })
            .collect();

        if backfilled > 0 {
            debug!(count = backfilled, "assigned ids to stored patterns");
            self.persist(&patterns);
        }

        Ok(Some(patterns))
    }

    /// Appends an unselected pattern and returns it.
    pub fn add(&self, label: &str) -> PatternRecord {
        let mut patterns = self.list();
        let record = PatternRecord::new(label);
        patterns.push(record.clone());
        self.persist(&patterns);
        debug!(id = %record.id, label = %record.label, "added pattern");
        record
    }

    /// Drops the pattern with `id`; unknown ids leave the list as it was.
    pub fn remove(&self, id: &PatternId) -> Vec<PatternRecord> {
        let mut patterns = self.list();
        patterns.retain(|p| &p.id != id);
        self.persist(&patterns);
        patterns
    }

    /// Merges `update` into the pattern with `id`. Nothing is written when
    /// no pattern matches.
    pub fn update(&self, id: &PatternId, update: &PatternUpdate) -> Vec<PatternRecord> {
        let mut patterns = self.list();
        match patterns.iter_mut().find(|p| &p.id == id) {
            Some(record) => {
                record.apply(update);
                self.persist(&patterns);
            }
            None => debug!(id = %id, "update for unknown pattern ignored"),
        }
        patterns
    }

    fn persist(&self, patterns: &[PatternRecord]) {
        match self.try_persist(patterns) {
            Ok(()) => self.clear_error(),
            Err(err) => {
                warn!(error = %err, "failed to save patterns");
                self.record_error(&err);
            }
        }
    }

    fn try_persist(&self, patterns: &[PatternRecord]) -> Result<(), StoreError> {
        let write_err = |source: anyhow::Error| StoreError::Write {
            key: self.key.clone(),
            source,
        };

        let stored: Vec<StoredPatternRef<'_>> = patterns
            .iter()
            .map(|p| StoredPatternRef {
                label: &p.label,
                selected: p.selected,
                id: &p.id,
            })
            .collect();
        let raw = serde_json::to_string(&stored)
            .context("serialize patterns")
            .map_err(write_err)?;
        self.kv.set(&self.key, &raw).map_err(write_err)
    }

    fn record_error(&self, err: &StoreError) {
        *self.last_error.borrow_mut() = Some(err.to_string());
    }

    fn clear_error(&self) {
        self.last_error.borrow_mut().take();
    }
}

#[cfg(test)]
#[path = "tests/store/pattern_store_tests.rs"]
mod tests;
