use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::event::CalendarEvent;
use crate::error::{WearcalError, WearcalResult};
use crate::theme::{Argb, ThemeColors};

pub const PREFS_FILE: &str = "schedule_prefs.json";

/// Everything one sync delivered: the event list plus the merged theme colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub events: Vec<CalendarEvent>,
    pub theme_colors: ThemeColors,
}

/// Durable snapshot storage.
///
/// `put` replaces the whole snapshot; readers see either the old or the new
/// one, never a mix. There is no partial update.
pub trait EventStore: Send + Sync {
    /// The last written snapshot, or the empty one. Unreadable data reads as empty.
    fn get(&self) -> PersistedState;

    fn put(&self, snapshot: &PersistedState) -> WearcalResult<()>;

    fn synced_events(&self) -> Vec<CalendarEvent> {
        self.get().events
    }

    fn theme_color(&self) -> Option<Argb> {
        self.get().theme_colors.primary
    }
}

/// In-process store; the snapshot is swapped under a write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<PersistedState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryStore {
    fn get(&self) -> PersistedState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn put(&self, snapshot: &PersistedState) -> WearcalResult<()> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = snapshot.clone();
        Ok(())
    }
}

/// On-disk layout of the preference file. The event list is kept as its own
/// JSON-encoded string so a corrupt list does not take the colors with it.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    synced_calendar_events: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme_primary_color: Option<Argb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme_secondary_color: Option<Argb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme_tertiary_color: Option<Argb>,
}

impl Prefs {
    fn encode(snapshot: &PersistedState) -> WearcalResult<Self> {
        Ok(Self {
            synced_calendar_events: Some(serde_json::to_string(&snapshot.events)?),
            theme_primary_color: snapshot.theme_colors.primary,
            theme_secondary_color: snapshot.theme_colors.secondary,
            theme_tertiary_color: snapshot.theme_colors.tertiary,
        })
    }

    fn decode(self) -> PersistedState {
        let events = match self.synced_calendar_events.as_deref() {
            None => Vec::new(),
            Some(json) => decode_events(json).unwrap_or_else(|e| {
                warn!("ignoring stored events: {e}");
                Vec::new()
            }),
        };

        PersistedState {
            events,
            theme_colors: ThemeColors {
                primary: self.theme_primary_color,
                secondary: self.theme_secondary_color,
                tertiary: self.theme_tertiary_color,
            },
        }
    }
}

fn decode_events(json: &str) -> WearcalResult<Vec<CalendarEvent>> {
    serde_json::from_str(json).map_err(|e| WearcalError::CorruptPersistedData(e.to_string()))
}

/// Snapshot kept in a single JSON preference file, replaced via temp file + rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/schedule_prefs.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PREFS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_prefs(&self) -> WearcalResult<Option<Prefs>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| WearcalError::CorruptPersistedData(e.to_string()))
    }
}

impl EventStore for FileStore {
    fn get(&self) -> PersistedState {
        match self.read_prefs() {
            Ok(Some(prefs)) => prefs.decode(),
            Ok(None) => PersistedState::default(),
            Err(e) => {
                warn!(path = %self.path.display(), "reading store as empty: {e}");
                PersistedState::default()
            }
        }
    }

    fn put(&self, snapshot: &PersistedState) -> WearcalResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&Prefs::encode(snapshot)?)?;
        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, content)?;
        fs::rename(&temp, &self.path)?;

        debug!(
            path = %self.path.display(),
            events = snapshot.events.len(),
            "snapshot written"
        );
        Ok(())
    }
}
