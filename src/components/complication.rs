use chrono::Weekday;

use crate::calendar::PersistedState;
use crate::theme::{Argb, Fallbacks};

pub const CONTENT_DESCRIPTION: &str = "Theme Color";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplicationKind {
    ShortText,
    RangedValue,
    /// Any slot type the provider does not support.
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComplicationData {
    ShortText {
        text: String,
        content_description: String,
    },
    RangedValue {
        value: f32,
        min: f32,
        max: f32,
        content_description: String,
    },
}

impl ComplicationData {
    /// What the watch face shows for the given slot type.
    ///
    /// Short text is the theme color as `#AARRGGBB`; ranged values carry the
    /// color as a number. Unsupported slot types get a weekday label.
    pub fn build(
        state: &PersistedState,
        kind: ComplicationKind,
        weekday: Weekday,
        fallbacks: &Fallbacks,
    ) -> Self {
        let color = state.theme_colors.primary.unwrap_or(fallbacks.complication);
        match kind {
            ComplicationKind::ShortText => short_text(color.to_string(), CONTENT_DESCRIPTION),
            ComplicationKind::RangedValue => ranged_value(color),
            ComplicationKind::Other => match weekday {
                Weekday::Sun => short_text("Sun".into(), "Sunday"),
                Weekday::Mon => short_text("Mon".into(), "Monday"),
                _ => short_text("Today".into(), "Today"),
            },
        }
    }

    /// Placeholder shown in the watch-face editor.
    pub fn preview(kind: ComplicationKind) -> Option<Self> {
        match kind {
            ComplicationKind::ShortText => {
                Some(short_text(Argb::WHITE.to_string(), CONTENT_DESCRIPTION))
            }
            ComplicationKind::RangedValue => Some(ranged_value(Argb::WHITE)),
            ComplicationKind::Other => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::ShortText { text, .. } => text.clone(),
            Self::RangedValue { value, max, .. } => format!("{value:.0} / {max:.0}"),
        }
    }
}

fn short_text(text: String, description: &str) -> ComplicationData {
    ComplicationData::ShortText {
        text,
        content_description: description.to_string(),
    }
}

fn ranged_value(color: Argb) -> ComplicationData {
    ComplicationData::RangedValue {
        value: color.0 as f32,
        min: 0.0,
        max: u32::MAX as f32,
        content_description: CONTENT_DESCRIPTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeColors;

    fn themed(primary: Option<Argb>) -> PersistedState {
        PersistedState {
            events: vec![],
            theme_colors: ThemeColors {
                primary,
                ..ThemeColors::default()
            },
        }
    }

    #[test]
    fn short_text_is_hex_theme_color() {
        let data = ComplicationData::build(
            &themed(Some(Argb(0xFF6750A4))),
            ComplicationKind::ShortText,
            Weekday::Wed,
            &Fallbacks::default(),
        );
        assert_eq!(data.text(), "#FF6750A4");
    }

    #[test]
    fn short_text_falls_back_to_white() {
        let data = ComplicationData::build(
            &themed(None),
            ComplicationKind::ShortText,
            Weekday::Wed,
            &Fallbacks::default(),
        );
        assert_eq!(data, ComplicationData::preview(ComplicationKind::ShortText).unwrap());
        assert_eq!(data.text(), "#FFFFFFFF");
    }

    #[test]
    fn ranged_value_spans_full_color_range() {
        let data = ComplicationData::build(
            &themed(Some(Argb(0x8000_0000))),
            ComplicationKind::RangedValue,
            Weekday::Wed,
            &Fallbacks::default(),
        );
        let ComplicationData::RangedValue { value, min, max, .. } = data else {
            panic!("expected ranged value");
        };
        assert_eq!(min, 0.0);
        assert_eq!(max, u32::MAX as f32);
        assert_eq!(value, 2_147_483_648.0);
    }

    #[test]
    fn unsupported_kind_shows_weekday() {
        let fallbacks = Fallbacks::default();
        let text = |day| {
            ComplicationData::build(&themed(None), ComplicationKind::Other, day, &fallbacks).text()
        };
        assert_eq!(text(Weekday::Sun), "Sun");
        assert_eq!(text(Weekday::Mon), "Mon");
        assert_eq!(text(Weekday::Fri), "Today");
        assert_eq!(ComplicationData::preview(ComplicationKind::Other), None);
    }
}
