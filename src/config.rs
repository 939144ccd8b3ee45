use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{WearcalError, WearcalResult};
use crate::schedule::DEFAULT_DATE_LABEL_FORMAT;
use crate::theme::{parse_color, Fallbacks};

const DEFAULT_TILE_EVENT_LIMIT: usize = 2;

/// Settings from `~/.config/wearcal/config.toml`. A missing or unreadable
/// file means defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub tile_event_limit: usize,
    pub date_label_format: String,
    pub fallbacks: Fallbacks,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tile_event_limit: DEFAULT_TILE_EVENT_LIMIT,
            date_label_format: DEFAULT_DATE_LABEL_FORMAT.to_string(),
            fallbacks: Fallbacks::default(),
        }
    }
}

impl Config {
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(&path).ok()?;
        match Self::from_toml(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring config: {e}");
                None
            }
        }
    }

    pub fn from_toml(content: &str) -> WearcalResult<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| WearcalError::Config(e.to_string()))?;
        file.into_config()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wearcal").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wearcal")
}

// ── TOML config types ──

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    tile_event_limit: Option<usize>,
    date_label_format: Option<String>,
    #[serde(default)]
    fallback: FallbackConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct FallbackConfig {
    accent: Option<String>,
    card: Option<String>,
    chip: Option<String>,
    greeting: Option<String>,
    title: Option<String>,
    complication: Option<String>,
}

impl ConfigFile {
    fn into_config(self) -> WearcalResult<Config> {
        let mut config = Config::default();

        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(limit) = self.tile_event_limit {
            config.tile_event_limit = limit;
        }
        if let Some(format) = self.date_label_format {
            config.date_label_format = format;
        }

        let fb = &mut config.fallbacks;
        let overrides = [
            ("accent", self.fallback.accent, &mut fb.accent),
            ("card", self.fallback.card, &mut fb.card),
            ("chip", self.fallback.chip, &mut fb.chip),
            ("greeting", self.fallback.greeting, &mut fb.greeting),
            ("title", self.fallback.title, &mut fb.title),
            ("complication", self.fallback.complication, &mut fb.complication),
        ];
        for (name, value, slot) in overrides {
            if let Some(raw) = value {
                *slot = parse_color(&raw).ok_or_else(|| {
                    WearcalError::Config(format!("fallback.{name}: invalid color {raw:?}"))
                })?;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Argb;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn overrides_apply() {
        let config = Config::from_toml(
            r##"
            data_dir = "/tmp/wearcal"
            tile_event_limit = 3
            date_label_format = "%d/%m"

            [fallback]
            card = "#202020"
            complication = "darkgray"
            "##,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/wearcal"));
        assert_eq!(config.tile_event_limit, 3);
        assert_eq!(config.date_label_format, "%d/%m");
        assert_eq!(config.fallbacks.card, Argb(0xFF20_2020));
        assert_eq!(config.fallbacks.complication, Argb::DARK_GRAY);
        assert_eq!(config.fallbacks.accent, Fallbacks::default().accent);
    }

    #[test]
    fn bad_color_is_a_config_error() {
        let err = Config::from_toml("[fallback]\naccent = \"#12\"").unwrap_err();
        assert!(matches!(err, WearcalError::Config(msg) if msg.contains("fallback.accent")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("tile_limit = 1").is_err());
    }
}
