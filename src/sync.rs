//! Ingestion of calendar payloads pushed from the paired phone.
//!
//! The transport hands over a batch of data items. Changed items at
//! [`SYNC_PATH`] carry the full event list and optional theme colors; each
//! one replaces the stored events wholesale and merges its colors over the
//! stored ones, then the tile and complication are told to refresh.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::calendar::{CalendarEvent, EventStore, PersistedState};
use crate::error::{WearcalError, WearcalResult};
use crate::theme::{Argb, ThemeColors};

pub const SYNC_PATH: &str = "/calendar_events";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Tile,
    Complication,
}

/// Receiver of "please re-query the store" signals. Fire-and-forget.
pub trait RefreshNotifier: Send + Sync {
    fn request_refresh(&self, surface: Surface);
}

/// Fans refresh signals out to every subscriber of a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Surface>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Surface> {
        self.tx.subscribe()
    }
}

impl RefreshNotifier for BroadcastNotifier {
    fn request_refresh(&self, surface: Surface) {
        // No subscribers just means nothing is on screen.
        if self.tx.send(surface).is_err() {
            debug!(?surface, "refresh dropped, no subscribers");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEventKind {
    Changed,
    Deleted,
}

/// One item of a delivery batch.
#[derive(Debug, Clone)]
pub struct DataEvent {
    pub kind: DataEventKind,
    pub path: String,
    pub payload: Value,
}

impl DataEvent {
    pub fn changed(path: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: DataEventKind::Changed,
            path: path.into(),
            payload,
        }
    }
}

/// A payload after type coercion: ready to become a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPayload {
    pub events: Vec<CalendarEvent>,
    pub colors: ThemeColors,
}

impl SyncPayload {
    /// Only the shape is checked: the root must be an object holding an
    /// `events` list of records. Individual fields that are missing, null or
    /// of the wrong type fall back to their defaults, and such colors stay unset.
    pub fn parse(value: &Value) -> WearcalResult<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| malformed("payload is not an object"))?;
        let records = root
            .get("events")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("events is missing or not a list"))?;

        let events = records
            .iter()
            .map(|record| {
                record
                    .as_object()
                    .map(event_from_record)
                    .ok_or_else(|| malformed("event record is not an object"))
            })
            .collect::<WearcalResult<Vec<_>>>()?;

        Ok(Self {
            events,
            colors: ThemeColors {
                primary: color_field(root, "theme_primary_color"),
                secondary: color_field(root, "theme_secondary_color"),
                tertiary: color_field(root, "theme_tertiary_color"),
            },
        })
    }
}

fn malformed(reason: &str) -> WearcalError {
    WearcalError::MalformedPayload(reason.to_string())
}

fn event_from_record(record: &Map<String, Value>) -> CalendarEvent {
    let long = |key: &str| record.get(key).and_then(Value::as_i64).unwrap_or_default();
    let string = |key: &str| record.get(key).and_then(Value::as_str).map(String::from);

    CalendarEvent {
        id: long("id"),
        title: string("title"),
        begin: long("begin"),
        end: long("end"),
        all_day: record
            .get("allDay")
            .or_else(|| record.get("all_day"))
            .and_then(Value::as_bool)
            .unwrap_or_default(),
        location: string("location"),
    }
}

fn color_field(root: &Map<String, Value>, key: &str) -> Option<Argb> {
    let value = root.get(key).filter(|v| !v.is_null())?;
    let color = value.as_i64().and_then(Argb::from_i64);
    if color.is_none() {
        debug!(key, %value, "ignoring unusable color");
    }
    color
}

/// The single writer of the event store.
pub struct SyncService {
    store: Arc<dyn EventStore>,
    notifiers: Vec<Arc<dyn RefreshNotifier>>,
    writer: Mutex<()>,
}

impl SyncService {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            notifiers: Vec::new(),
            writer: Mutex::new(()),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn RefreshNotifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    /// Delivery callback. Never fails: bad items are logged and skipped.
    /// Returns how many items were ingested.
    pub fn on_data_changed(&self, batch: &[DataEvent]) -> usize {
        debug!(count = batch.len(), "data changed");
        let mut ingested = 0;

        for item in batch {
            if item.kind != DataEventKind::Changed || item.path != SYNC_PATH {
                debug!(path = %item.path, kind = ?item.kind, "ignoring data item");
                continue;
            }
            match self.ingest(&item.payload) {
                Ok(()) => ingested += 1,
                Err(e) => warn!("sync payload dropped: {e}"),
            }
        }

        ingested
    }

    /// Replace the stored snapshot with `payload` and signal both surfaces.
    /// On error nothing is written and nobody is notified.
    pub fn ingest(&self, payload: &Value) -> WearcalResult<()> {
        let payload = SyncPayload::parse(payload)?;

        {
            let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            let previous = self.store.get();
            let snapshot = PersistedState {
                events: payload.events,
                theme_colors: previous.theme_colors.merged_with(payload.colors),
            };
            self.store.put(&snapshot)?;

            info!(
                events = snapshot.events.len(),
                primary = ?payload.colors.primary,
                secondary = ?payload.colors.secondary,
                tertiary = ?payload.colors.tertiary,
                "saved synced events"
            );
        }

        for notifier in &self.notifiers {
            notifier.request_refresh(Surface::Tile);
            notifier.request_refresh(Surface::Complication);
        }
        Ok(())
    }
}
