//! Display helpers shared by the CLI, dashboard and bot

use chrono::{DateTime, Local, Utc};

use crate::rotation::DaysSince;

/// Local calendar date, or "Never"
pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => "Never".to_string(),
    }
}

/// Date plus day count, as shown in history lists
pub fn format_last_trained(at: Option<DateTime<Utc>>, days: DaysSince) -> String {
    match days {
        DaysSince::Never => format_date(at),
        days => format!("{} ({})", format_date(at), days),
    }
}
