use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No Title";

/// One synced event. Times are epoch milliseconds, exactly as the phone sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: i64,
    pub title: Option<String>,
    pub begin: i64,
    pub end: i64,
    pub all_day: bool,
    pub location: Option<String>,
}

impl CalendarEvent {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(NO_TITLE)
    }

    /// Start time in the given zone, `None` when `begin` is outside chrono's range.
    pub fn begin_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.begin).single()
    }
}
