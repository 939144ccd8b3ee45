//! Watch-side half of the calendar sync.
//!
//! The phone pushes its upcoming events and theme colors; [`sync`] stores
//! them as a single snapshot, and [`components`] derives what the tile, the
//! complication and the app screen show from that snapshot.

pub mod app;
pub mod calendar;
pub mod components;
pub mod config;
pub mod error;
pub mod schedule;
pub mod sync;
pub mod theme;

pub use app::App;
pub use calendar::{CalendarEvent, EventStore, FileStore, MemoryStore, PersistedState};
pub use error::{WearcalError, WearcalResult};
pub use sync::{BroadcastNotifier, DataEvent, RefreshNotifier, Surface, SyncService, SYNC_PATH};
pub use theme::{Argb, ColorVariant, ThemeColors};
