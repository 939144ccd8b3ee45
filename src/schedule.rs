//! Pure derivations over a stored snapshot: which events to show, how to
//! bucket them by day, and how far away they are.

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::calendar::{CalendarEvent, PersistedState};

pub const DEFAULT_DATE_LABEL_FORMAT: &str = "%a, %-d %b";
const UNKNOWN_DATE: &str = "Unknown date";

const MINUTE_MS: i64 = 60 * 1000;
const MINUTES_PER_DAY: u32 = 24 * 60;

/// Stored events in stored order, optionally without all-day ones.
///
/// Past events are not filtered out: everything in the snapshot counts as
/// upcoming until the next sync replaces it.
pub fn upcoming_events(state: &PersistedState, include_all_day: bool) -> Vec<CalendarEvent> {
    state
        .events
        .iter()
        .filter(|e| include_all_day || !e.all_day)
        .cloned()
        .collect()
}

/// Events sharing one date label, in the order they were stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateGroup {
    pub label: String,
    pub events: Vec<CalendarEvent>,
}

/// Group by the local calendar date of `begin`, using the default label format.
pub fn group_by_date(events: &[CalendarEvent]) -> Vec<DateGroup> {
    group_by_date_in(events, &Local, DEFAULT_DATE_LABEL_FORMAT)
}

/// Groups keep first-seen order; so do the events inside each group.
pub fn group_by_date_in<Tz>(events: &[CalendarEvent], tz: &Tz, format: &str) -> Vec<DateGroup>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut groups: Vec<DateGroup> = Vec::new();

    for event in events {
        let label = date_label(event, tz, format);
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.events.push(event.clone()),
            None => groups.push(DateGroup {
                label,
                events: vec![event.clone()],
            }),
        }
    }

    groups
}

fn date_label<Tz>(event: &CalendarEvent, tz: &Tz, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    event
        .begin_in(tz)
        .map(|begin| begin.format(format).to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// "now" once `begin` has arrived, otherwise the largest whole unit left:
/// "in 2d", "in 5h", "in 12m". Units truncate, so 90 minutes is "in 1h".
pub fn countdown(begin: i64, now: i64) -> String {
    let diff = begin.saturating_sub(now);
    if diff <= 0 {
        return "now".to_string();
    }

    let minutes = diff / MINUTE_MS;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("in {days}d")
    } else if hours > 0 {
        format!("in {hours}h")
    } else {
        format!("in {minutes}m")
    }
}

/// Fraction of the day already gone at `now`, by wall-clock minutes.
pub fn day_progress<Tz: TimeZone>(now: &DateTime<Tz>) -> f32 {
    let minutes = now.hour() * 60 + now.minute();
    minutes as f32 / MINUTES_PER_DAY as f32
}
