use std::sync::Arc;

use chrono::{Datelike, Local, Utc};

use crate::calendar::{EventStore, FileStore};
use crate::components::{AgendaView, ComplicationData, ComplicationKind, TileView};
use crate::config::Config;
use crate::schedule::day_progress;
use crate::sync::{RefreshNotifier, SyncService};

/// Read side of the watch app: each surface re-queries the store whenever it
/// is asked to draw, so a refresh signal needs no payload.
pub struct App {
    pub config: Config,
    store: Arc<dyn EventStore>,
}

impl App {
    pub fn new(config: Config, store: Arc<dyn EventStore>) -> Self {
        Self { config, store }
    }

    /// App backed by the preference file in the configured data directory.
    pub fn open(config: Config) -> Self {
        let store = Arc::new(FileStore::in_dir(&config.data_dir));
        Self::new(config, store)
    }

    pub fn store(&self) -> Arc<dyn EventStore> {
        Arc::clone(&self.store)
    }

    /// Writer for this app's store, signalling `notifier` after each sync.
    pub fn sync_service(&self, notifier: Arc<dyn RefreshNotifier>) -> SyncService {
        SyncService::new(self.store()).with_notifier(notifier)
    }

    pub fn tile(&self) -> TileView {
        let now = Local::now();
        TileView::build(
            &self.store.get(),
            now.timestamp_millis(),
            day_progress(&now),
            self.config.tile_event_limit,
            &self.config.fallbacks,
        )
    }

    pub fn complication(&self, kind: ComplicationKind) -> ComplicationData {
        ComplicationData::build(
            &self.store.get(),
            kind,
            Local::now().weekday(),
            &self.config.fallbacks,
        )
    }

    pub fn agenda(&self) -> AgendaView {
        AgendaView::build(
            &self.store.get(),
            Utc::now().timestamp_millis(),
            &Local,
            &self.config.date_label_format,
            &self.config.fallbacks,
        )
    }
}
