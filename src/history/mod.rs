//! History store - last-trained timestamps per muscle and the superset log

pub mod snapshot;

pub use snapshot::{ImportError, Snapshot, export_snapshot, export_snapshot_pretty, import_snapshot};

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::{Database, HISTORY_SLOT, SUPERSET_SLOT};
use crate::muscles::Muscle;

type LastTrained = BTreeMap<Muscle, Option<DateTime<Utc>>>;

/// Last time each muscle group was trained.
///
/// Every muscle is always present; `None` means never trained. Decoding
/// fills muscles missing from the input with `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LastTrained", into = "LastTrained")]
pub struct MuscleHistory {
    last_trained: LastTrained,
}

impl MuscleHistory {
    /// History where nothing has been trained yet
    pub fn new() -> Self {
        Self {
            last_trained: Muscle::ALL.iter().map(|m| (*m, None)).collect(),
        }
    }

    pub fn last_trained(&self, muscle: Muscle) -> Option<DateTime<Utc>> {
        self.last_trained.get(&muscle).copied().flatten()
    }

    pub fn mark_trained(&mut self, muscle: Muscle, at: DateTime<Utc>) {
        self.last_trained.insert(muscle, Some(at));
    }

    /// Entries in canonical muscle order
    pub fn iter(&self) -> impl Iterator<Item = (Muscle, Option<DateTime<Utc>>)> + '_ {
        self.last_trained.iter().map(|(m, at)| (*m, *at))
    }
}

impl Default for MuscleHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl From<LastTrained> for MuscleHistory {
    fn from(decoded: LastTrained) -> Self {
        let mut history = Self::new();
        for (muscle, at) in decoded {
            history.last_trained.insert(muscle, at);
        }
        history
    }
}

impl From<MuscleHistory> for LastTrained {
    fn from(history: MuscleHistory) -> Self {
        history.last_trained
    }
}

/// One superset session. Records are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupersetRecord {
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "main")]
    pub main_muscle: Muscle,
    /// Selection order, no duplicates
    #[serde(rename = "supersets")]
    pub superset_muscles: Vec<Muscle>,
}

/// Superset sessions in the order they were logged
pub type SupersetLog = Vec<SupersetRecord>;

/// Read history and superset log from the database.
///
/// A slot that is missing or does not decode falls back to its default;
/// corrupt persisted state is treated the same as a first run.
pub fn load(db: &Database) -> Result<(MuscleHistory, SupersetLog)> {
    let history = decode_slot(db, HISTORY_SLOT)?;
    let log = decode_slot(db, SUPERSET_SLOT)?;
    Ok((history, log))
}

fn decode_slot<T>(db: &Database, slot: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let Some(raw) = db.get_slot(slot)? else {
        debug!("Slot {} is empty, using defaults", slot);
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("Ignoring unreadable slot {}: {}", slot, e);
            Ok(T::default())
        }
    }
}

/// Write history and superset log together
pub fn save(db: &mut Database, history: &MuscleHistory, log: &SupersetLog) -> Result<()> {
    let history_json = serde_json::to_string(history)?;
    let log_json = serde_json::to_string(log)?;
    db.put_slots(&[(HISTORY_SLOT, &history_json), (SUPERSET_SLOT, &log_json)])?;
    debug!("Saved history ({} superset records)", log.len());
    Ok(())
}
