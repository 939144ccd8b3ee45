pub mod agenda;
pub mod complication;
pub mod tile;

pub use agenda::AgendaView;
pub use complication::{ComplicationData, ComplicationKind};
pub use tile::TileView;
