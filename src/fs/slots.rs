//! Numbered save slots on top of a [`KeyValueStore`].

use chrono::{Local, TimeZone, Utc};
use std::fmt::Display;
use tracing::warn;

use super::store::KeyValueStore;
use crate::error::{PlanError, Result};
use crate::share::Snapshot;
use crate::skills::CatalogIndex;

pub const DEFAULT_SLOT_PREFIX: &str = "umamusume_slot_";
pub const DEFAULT_SLOT_COUNT: usize = 10;

/// Rows named in a slot preview.
const PREVIEW_ROWS: usize = 3;

/// A filled slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    pub index: usize,
    pub snapshot: Snapshot,
}

impl SlotRecord {
    /// Saved title; empty when none was given.
    pub fn title(&self) -> &str {
        self.snapshot.title.as_deref().unwrap_or("")
    }

    /// Save time as `YYYY/MM/DD HH:MM:SS` in local time.
    pub fn saved_at(&self) -> Option<String> {
        self.snapshot
            .timestamp
            .and_then(|ms| format_timestamp(ms, &Local))
    }
}

/// What a slot holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    /// Something is stored but it is not a readable plan
    Corrupted(String),
    Filled(SlotRecord),
}

/// One entry of a slot listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSummary {
    pub index: usize,
    pub state: SlotState,
}

impl SlotSummary {
    /// Short description of the content: `"N rows: a / b / c"` for filled
    /// slots.
    pub fn preview(&self, catalog: Option<&CatalogIndex>) -> String {
        match &self.state {
            SlotState::Empty => "not saved".to_string(),
            SlotState::Corrupted(_) => "corrupted data".to_string(),
            SlotState::Filled(record) => {
                let rows = record.snapshot.rows.len();
                let names = record.snapshot.sample_names(PREVIEW_ROWS, catalog);
                format!("{rows} rows: {}", names.join(" / "))
            }
        }
    }
}

/// Fixed set of numbered slots, keyed `prefix + index`.
pub struct SlotStore<S: KeyValueStore> {
    store: S,
    prefix: String,
    count: usize,
}

impl<S: KeyValueStore> SlotStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_layout(store, DEFAULT_SLOT_PREFIX, DEFAULT_SLOT_COUNT)
    }

    pub fn with_layout(store: S, prefix: impl Into<String>, count: usize) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            count,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn key(&self, index: usize) -> Result<String> {
        if index >= self.count {
            return Err(PlanError::SlotOutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(format!("{}{index}", self.prefix))
    }

    /// Save `snapshot` to slot `index`, stamping the title and save time.
    pub fn save(&mut self, index: usize, snapshot: &Snapshot, title: &str) -> Result<SlotRecord> {
        let key = self.key(index)?;

        let mut snapshot = snapshot.clone();
        snapshot.title = Some(title.to_string());
        snapshot.timestamp = Some(Utc::now().timestamp_millis());

        self.store.set(&key, &snapshot.to_json()?)?;
        Ok(SlotRecord { index, snapshot })
    }

    /// Read slot `index`.
    ///
    /// # Errors
    /// [`PlanError::SlotOutOfRange`] for a bad index and storage errors.
    /// Unreadable content is reported as [`SlotState::Corrupted`].
    pub fn load(&self, index: usize) -> Result<SlotState> {
        let key = self.key(index)?;
        let raw = match self.store.get(&key)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(SlotState::Empty),
        };

        match Snapshot::from_json(&raw) {
            Ok(snapshot) => Ok(SlotState::Filled(SlotRecord { index, snapshot })),
            Err(e) => {
                warn!(slot = index, "Slot holds unreadable data: {e}");
                Ok(SlotState::Corrupted(e.to_string()))
            }
        }
    }

    /// State of every slot. Never fails; read errors show up as corrupted
    /// slots.
    pub fn list(&self) -> Vec<SlotSummary> {
        (0..self.count)
            .map(|index| {
                let state = self.load(index).unwrap_or_else(|e| {
                    warn!(slot = index, "Failed to read slot: {e}");
                    SlotState::Corrupted(e.to_string())
                });
                SlotSummary { index, state }
            })
            .collect()
    }

    pub fn clear(&mut self, index: usize) -> Result<()> {
        let key = self.key(index)?;
        self.store.remove(&key)
    }
}

fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y/%m/%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::store::{FileStore, MemoryStore};
    use crate::share::SnapshotRow;
    use tempfile::TempDir;

    fn snapshot(names: &[&str]) -> Snapshot {
        Snapshot {
            rows: names
                .iter()
                .map(|n| SnapshotRow {
                    skill_name: n.to_string(),
                    ..Default::default()
                })
                .collect(),
            special_flag: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_then_load() {
        let mut slots = SlotStore::new(MemoryStore::new());
        let saved = slots.save(3, &snapshot(&["A", "B"]), "mile").unwrap();
        assert_eq!(saved.title(), "mile");
        assert!(saved.snapshot.timestamp.is_some());

        match slots.load(3).unwrap() {
            SlotState::Filled(record) => assert_eq!(record, saved),
            other => panic!("expected filled slot, got {other:?}"),
        }
        assert!(slots.store().get("umamusume_slot_3").unwrap().is_some());
    }

    #[test]
    fn test_empty_and_corrupt_slots() {
        let mut store = MemoryStore::new();
        store.set("umamusume_slot_1", "{not json").unwrap();
        store.set("umamusume_slot_2", "null").unwrap();
        store.set("umamusume_slot_4", "").unwrap();
        let slots = SlotStore::new(store);

        assert_eq!(slots.load(0).unwrap(), SlotState::Empty);
        assert!(matches!(slots.load(1).unwrap(), SlotState::Corrupted(_)));
        assert!(matches!(slots.load(2).unwrap(), SlotState::Corrupted(_)));
        assert_eq!(slots.load(4).unwrap(), SlotState::Empty);
    }

    #[test]
    fn test_out_of_range() {
        let mut slots = SlotStore::new(MemoryStore::new());
        assert!(matches!(
            slots.load(10),
            Err(PlanError::SlotOutOfRange { index: 10, count: 10 })
        ));
        assert!(slots.save(10, &snapshot(&[]), "").is_err());
        assert!(slots.clear(42).is_err());
    }

    #[test]
    fn test_list_survives_corruption() {
        let temp = TempDir::new().unwrap();
        let mut slots = SlotStore::with_layout(FileStore::new(temp.path()), "plan_", 4);
        slots.save(0, &snapshot(&["A", "B", "C", "D"]), "first").unwrap();
        std::fs::write(temp.path().join("plan_2.json"), "]]]").unwrap();

        assert_eq!(slots.count(), 4);
        assert_eq!(slots.store().dir(), temp.path());

        let listing = slots.list();
        assert_eq!(listing.len(), 4);
        assert!(matches!(listing[0].state, SlotState::Filled(_)));
        assert_eq!(listing[1].state, SlotState::Empty);
        assert!(matches!(listing[2].state, SlotState::Corrupted(_)));

        assert_eq!(listing[0].preview(None), "4 rows: A / B / C");
        assert_eq!(listing[1].preview(None), "not saved");
        assert_eq!(listing[2].preview(None), "corrupted data");
    }

    #[test]
    fn test_clear_empties_slot() {
        let mut slots = SlotStore::new(MemoryStore::new());
        slots.save(0, &snapshot(&["A"]), "").unwrap();
        slots.clear(0).unwrap();
        assert_eq!(slots.load(0).unwrap(), SlotState::Empty);
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(
            format_timestamp(1_700_000_000_000, &Utc).as_deref(),
            Some("2023/11/14 22:13:20")
        );

        let record = SlotRecord {
            index: 0,
            snapshot: Snapshot::default(),
        };
        assert_eq!(record.saved_at(), None);
        assert_eq!(record.title(), "");
    }
}
