//! Backup codes: export and import of the full history as JSON

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MuscleHistory, SupersetLog, SupersetRecord};

const HISTORY_FIELD: &str = "workoutHistory";
const SUPERSET_FIELD: &str = "supersetHistory";

/// Everything a backup code carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "workoutHistory")]
    pub history: MuscleHistory,
    #[serde(rename = "supersetHistory")]
    pub supersets: SupersetLog,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    #[serde(rename = "workoutHistory")]
    history: &'a MuscleHistory,
    #[serde(rename = "supersetHistory")]
    supersets: &'a SupersetLog,
}

/// Why a backup code was rejected
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Text is not JSON at all
    #[error("Invalid JSON format: {0}")]
    MalformedEncoding(#[source] serde_json::Error),

    /// JSON, but not a backup code
    #[error("Invalid data format: {0}")]
    InvalidShape(String),
}

/// Encode history and log as a compact backup code
pub fn export_snapshot(history: &MuscleHistory, supersets: &SupersetLog) -> serde_json::Result<String> {
    serde_json::to_string(&SnapshotRef { history, supersets })
}

/// Same document as [`export_snapshot`], indented for files
pub fn export_snapshot_pretty(history: &MuscleHistory, supersets: &SupersetLog) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SnapshotRef { history, supersets })
}

/// Decode a backup code.
///
/// Both top-level fields must be present with the right container kind,
/// and their contents must decode, otherwise nothing is returned.
pub fn import_snapshot(raw: &str) -> Result<Snapshot, ImportError> {
    let value: Value = serde_json::from_str(raw).map_err(ImportError::MalformedEncoding)?;

    let Some(fields) = value.as_object() else {
        return Err(ImportError::InvalidShape("expected a JSON object".to_string()));
    };

    match fields.get(HISTORY_FIELD) {
        Some(Value::Object(_)) => {}
        None | Some(Value::Null) => return Err(missing(HISTORY_FIELD)),
        Some(_) => return Err(wrong_kind(HISTORY_FIELD, "an object")),
    }

    match fields.get(SUPERSET_FIELD) {
        Some(Value::Array(_)) => {}
        None | Some(Value::Null) => return Err(missing(SUPERSET_FIELD)),
        Some(_) => return Err(wrong_kind(SUPERSET_FIELD, "an array")),
    }

    let snapshot: Snapshot =
        serde_json::from_value(value).map_err(|e| ImportError::InvalidShape(e.to_string()))?;

    for (i, record) in snapshot.supersets.iter().enumerate() {
        check_record(record).map_err(|reason| ImportError::InvalidShape(format!("superset record {}: {}", i, reason)))?;
    }

    Ok(snapshot)
}

/// Records must look like something the session logger could have written
fn check_record(record: &SupersetRecord) -> Result<(), String> {
    let main = record.main_muscle;
    if !main.is_main() {
        return Err(format!("{} is not a main muscle group", main));
    }
    if record.superset_muscles.is_empty() {
        return Err("no superset muscles".to_string());
    }
    if record.superset_muscles.contains(&main) {
        return Err(format!("{} is both main and superset", main));
    }
    for (i, muscle) in record.superset_muscles.iter().enumerate() {
        if record.superset_muscles[..i].contains(muscle) {
            return Err(format!("{} listed twice", muscle));
        }
    }
    Ok(())
}

fn missing(field: &str) -> ImportError {
    ImportError::InvalidShape(format!("missing field `{}`", field))
}

fn wrong_kind(field: &str, expected: &str) -> ImportError {
    ImportError::InvalidShape(format!("`{}` must be {}", field, expected))
}
