//! Tracker - the history pair bound to its database

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::db::Database;
use crate::history::{self, MuscleHistory, SupersetLog, SupersetRecord};
use crate::muscles::Muscle;
use crate::rotation::{self, MuscleStatus, Recommendation};
use crate::session::{self, SupersetSelection};

/// Workout history backed by a database. Every change is saved immediately.
pub struct Tracker {
    db: Database,
    history: MuscleHistory,
    supersets: SupersetLog,
}

impl Tracker {
    /// Load whatever the database holds
    pub fn open(db: Database) -> Result<Self> {
        let (history, supersets) = history::load(&db)?;
        Ok(Self { db, history, supersets })
    }

    pub fn history(&self) -> &MuscleHistory {
        &self.history
    }

    pub fn supersets(&self) -> &SupersetLog {
        &self.supersets
    }

    pub fn recommendation(&self) -> Recommendation {
        rotation::recommend(&self.history, Utc::now())
    }

    pub fn report(&self) -> Vec<MuscleStatus> {
        rotation::muscle_report(&self.history, Utc::now())
    }

    /// Log a workout now and persist it.
    ///
    /// In-memory state only changes once the save went through.
    pub fn log_workout(&mut self, main: Muscle, selection: &SupersetSelection) -> Result<Option<SupersetRecord>> {
        let mut history = self.history.clone();
        let mut supersets = self.supersets.clone();
        let record = session::log_workout(&mut history, &mut supersets, main, selection, Utc::now());

        history::save(&mut self.db, &history, &supersets)?;
        self.history = history;
        self.supersets = supersets;

        match &record {
            Some(r) => info!("Logged {} with supersets {:?}", main, r.superset_muscles),
            None => info!("Logged {} without supersets", main),
        }
        Ok(record)
    }

    /// Backup code for the current state
    pub fn export(&self) -> Result<String> {
        Ok(history::export_snapshot(&self.history, &self.supersets)?)
    }

    pub fn export_pretty(&self) -> Result<String> {
        Ok(history::export_snapshot_pretty(&self.history, &self.supersets)?)
    }

    /// Replace everything with a backup code.
    ///
    /// A rejected code surfaces as an [`ImportError`](crate::history::ImportError) and leaves the
    /// tracker untouched.
    pub fn import(&mut self, raw: &str) -> Result<()> {
        let snapshot = history::import_snapshot(raw)?;

        history::save(&mut self.db, &snapshot.history, &snapshot.supersets)?;
        self.history = snapshot.history;
        self.supersets = snapshot.supersets;
        info!("Imported backup ({} superset records)", self.supersets.len());
        Ok(())
    }
}
