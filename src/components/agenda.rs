use std::fmt;

use chrono::TimeZone;

use crate::calendar::{CalendarEvent, PersistedState};
use crate::schedule::{countdown, group_by_date_in, upcoming_events};
use crate::theme::{Argb, Fallbacks};

pub const TITLE: &str = "Upcoming Agenda";
pub const NO_EVENTS: &str = "No upcoming events";
pub const ALL_DAY: &str = "All day";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChipStyle {
    /// Timed events: solid background.
    Filled(Argb),
    /// All-day events: transparent with a colored border.
    Outlined(Argb),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub id: i64,
    pub label: String,
    pub secondary_label: String,
    pub style: ChipStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub date: String,
    pub chips: Vec<Chip>,
}

/// The full app screen: every stored event, bucketed by day.
#[derive(Debug, Clone, PartialEq)]
pub struct AgendaView {
    pub title: String,
    pub sections: Vec<Section>,
    pub greeting_color: Argb,
}

impl AgendaView {
    pub fn build<Tz>(
        state: &PersistedState,
        now: i64,
        tz: &Tz,
        date_format: &str,
        fallbacks: &Fallbacks,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let theme = state.theme_colors.primary;
        let chip_color = theme.map(Argb::toned).unwrap_or(fallbacks.chip);
        let events = upcoming_events(state, true);

        let sections = group_by_date_in(&events, tz, date_format)
            .into_iter()
            .map(|group| Section {
                date: group.label,
                chips: group
                    .events
                    .iter()
                    .map(|event| chip(event, now, chip_color))
                    .collect(),
            })
            .collect();

        Self {
            title: TITLE.to_string(),
            sections,
            greeting_color: theme.unwrap_or(fallbacks.greeting),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn chip(event: &CalendarEvent, now: i64, color: Argb) -> Chip {
    let (secondary_label, style) = if event.all_day {
        (ALL_DAY.to_string(), ChipStyle::Outlined(color))
    } else {
        (countdown(event.begin, now), ChipStyle::Filled(color))
    };
    Chip {
        id: event.id,
        label: event.display_title().to_string(),
        secondary_label,
        style,
    }
}

impl fmt::Display for AgendaView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "{NO_EVENTS} [{}]", self.greeting_color);
        }
        writeln!(f, "{}", self.title)?;
        for section in &self.sections {
            writeln!(f, "\n{}", section.date)?;
            for chip in &section.chips {
                let style = match chip.style {
                    ChipStyle::Filled(c) => format!("fill {c}"),
                    ChipStyle::Outlined(c) => format!("border {c}"),
                };
                writeln!(f, "  {} - {} ({style})", chip.label, chip.secondary_label)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::DEFAULT_DATE_LABEL_FORMAT;
    use crate::theme::ThemeColors;
    use chrono::Utc;

    const NOW: i64 = 1_709_251_200_000;
    const HOUR_MS: i64 = 3_600_000;

    fn event(id: i64, begin: i64, all_day: bool) -> CalendarEvent {
        CalendarEvent {
            id,
            title: (id != 3).then(|| format!("event {id}")),
            begin,
            end: begin + HOUR_MS,
            all_day,
            location: None,
        }
    }

    fn build(primary: Option<Argb>) -> AgendaView {
        let state = PersistedState {
            events: vec![
                event(1, NOW + 3 * HOUR_MS, false),
                event(2, NOW + 26 * HOUR_MS, true),
                event(3, NOW + 5 * HOUR_MS, false),
            ],
            theme_colors: ThemeColors {
                primary,
                ..ThemeColors::default()
            },
        };
        AgendaView::build(&state, NOW, &Utc, DEFAULT_DATE_LABEL_FORMAT, &Fallbacks::default())
    }

    #[test]
    fn sections_follow_first_seen_dates() {
        let agenda = build(None);
        let dates: Vec<_> = agenda.sections.iter().map(|s| s.date.as_str()).collect();
        assert_eq!(dates, vec!["Fri, 1 Mar", "Sat, 2 Mar"]);

        let first: Vec<_> = agenda.sections[0].chips.iter().map(|c| c.id).collect();
        assert_eq!(first, vec![1, 3]);
    }

    #[test]
    fn all_day_chips_are_outlined() {
        let agenda = build(None);
        let all_day = &agenda.sections[1].chips[0];
        assert_eq!(all_day.secondary_label, "All day");
        assert_eq!(all_day.style, ChipStyle::Outlined(Argb::DARK_GRAY));

        let timed = &agenda.sections[0].chips[1];
        assert_eq!(timed.label, "No Title");
        assert_eq!(timed.secondary_label, "in 5h");
        assert_eq!(timed.style, ChipStyle::Filled(Argb::DARK_GRAY));
    }

    #[test]
    fn theme_color_tones_chips_and_greeting() {
        let primary = Argb(0xFF00_00FF);
        let agenda = build(Some(primary));
        assert_eq!(agenda.greeting_color, primary);
        assert_eq!(
            agenda.sections[0].chips[0].style,
            ChipStyle::Filled(primary.toned())
        );
    }

    #[test]
    fn empty_agenda_shows_message() {
        let agenda = AgendaView::build(
            &PersistedState::default(),
            NOW,
            &Utc,
            DEFAULT_DATE_LABEL_FORMAT,
            &Fallbacks::default(),
        );
        assert!(agenda.is_empty());
        assert_eq!(agenda.greeting_color, Fallbacks::default().greeting);
        assert!(agenda.to_string().starts_with(NO_EVENTS));
    }
}
