pub mod event;
pub mod store;

pub use event::CalendarEvent;
pub use store::{EventStore, FileStore, MemoryStore, PersistedState};
