use std::fmt;

use crate::calendar::PersistedState;
use crate::schedule::{countdown, upcoming_events};
use crate::theme::{Argb, Fallbacks};

pub const HEADER: &str = "Upcoming";
pub const NO_EVENTS: &str = "No upcoming events";

/// Translucent white behind the day-progress arc.
const PROGRESS_TRACK: Argb = Argb(0x33FF_FFFF);
const COUNTDOWN_COLOR: Argb = Argb::WHITE;

#[derive(Debug, Clone, PartialEq)]
pub struct TileCard {
    pub title: String,
    pub countdown: String,
    pub title_color: Argb,
    pub countdown_color: Argb,
    pub background: Argb,
}

/// Everything the tile layout needs: a header, up to `limit` timed events as
/// cards, and an edge arc showing how much of the day has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView {
    pub header: String,
    pub header_color: Argb,
    pub cards: Vec<TileCard>,
    pub progress: f32,
    pub progress_color: Argb,
    pub progress_track: Argb,
}

impl TileView {
    pub fn build(
        state: &PersistedState,
        now: i64,
        progress: f32,
        limit: usize,
        fallbacks: &Fallbacks,
    ) -> Self {
        let theme = state.theme_colors.primary;
        let accent = theme.map(Argb::light_accent);
        let toned = theme.map(Argb::toned);

        let cards = upcoming_events(state, false)
            .into_iter()
            .take(limit)
            .map(|event| TileCard {
                title: event.display_title().to_string(),
                countdown: countdown(event.begin, now),
                title_color: accent.unwrap_or(fallbacks.title),
                countdown_color: COUNTDOWN_COLOR,
                background: toned.unwrap_or(fallbacks.card),
            })
            .collect();

        Self {
            header: HEADER.to_string(),
            header_color: accent.unwrap_or(fallbacks.accent),
            cards,
            progress: progress.clamp(0.0, 1.0),
            progress_color: accent.unwrap_or(fallbacks.accent),
            progress_track: PROGRESS_TRACK,
        }
    }
}

impl fmt::Display for TileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} [{}]  day {:.0}% [{}]",
            self.header,
            self.header_color,
            self.progress * 100.0,
            self.progress_color
        )?;
        if self.cards.is_empty() {
            return writeln!(f, "  {NO_EVENTS}");
        }
        for card in &self.cards {
            writeln!(
                f,
                "  {} [{}] {} (card {})",
                card.title, card.title_color, card.countdown, card.background
            )?;
        }
        Ok(())
    }
}
