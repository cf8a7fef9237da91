//! Rotation module - recency math and recommendations
//!
//! Features:
//! - Whole-day recency per muscle, with "never trained" above any count
//! - Main muscle recommendation (longest rested main group)
//! - Superset partner recommendation (two longest rested compatible groups)

pub mod recommender;

pub use recommender::{MuscleStatus, Recommendation, muscle_report, recommend, recommend_main, recommend_supersets};

use std::fmt;

use chrono::{DateTime, Utc};

const NANOS_PER_DAY: i128 = 24 * 60 * 60 * 1_000_000_000;

/// Whole days since a muscle was last trained.
///
/// `Never` orders above every `Days` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DaysSince {
    Days(i64),
    Never,
}

impl fmt::Display for DaysSince {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaysSince::Days(1) => write!(f, "1 day ago"),
            DaysSince::Days(n) => write!(f, "{} days ago", n),
            DaysSince::Never => write!(f, "never"),
        }
    }
}

/// Ceiling of whole days between `last` and `now`.
///
/// Uses the absolute difference, so a timestamp in the future still
/// yields a positive count.
pub fn days_since(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DaysSince {
    let Some(last) = last else {
        return DaysSince::Never;
    };

    let elapsed = now - last;
    let nanos = (i128::from(elapsed.num_seconds()) * 1_000_000_000 + i128::from(elapsed.subsec_nanos())).abs();
    let days = (nanos + NANOS_PER_DAY - 1) / NANOS_PER_DAY;
    DaysSince::Days(days as i64)
}
