//! Game settings and preferences
//!
//! Read once from the page URL (`?difficulty=hard&volume=0.5&mute=1`).
//! Nothing is written back; a reload with a different query is the only
//! way to change them outside the in-game difficulty buttons.

use serde::{Deserialize, Serialize};

use crate::sim::Difficulty;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Preset selected on page load
    pub difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,

    // === Debug ===
    /// Start in demo mode (layers drop themselves)
    pub autoplay: bool,
    /// Seed override for a reproducible color scheme
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            // Debug
            autoplay: false,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse a URL query string; unknown keys and bad values are skipped
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();

        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            settings.apply(key, value);
        }

        settings
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key.to_lowercase().as_str() {
            "difficulty" | "level" => match Difficulty::from_str(value) {
                Some(d) => self.difficulty = d,
                None => log::warn!("Unknown difficulty '{}'", value),
            },
            "volume" => {
                if let Some(v) = parse_volume(value) {
                    self.master_volume = v;
                }
            }
            "sfx" => {
                if let Some(v) = parse_volume(value) {
                    self.sfx_volume = v;
                }
            }
            "mute" | "muted" => self.muted = parse_flag(value),
            "autoplay" | "demo" => self.autoplay = parse_flag(value),
            "seed" => self.seed = value.parse().ok(),
            other => log::debug!("Ignoring unknown setting '{}'", other),
        }
    }

    /// Load settings from the page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();

        let settings = Self::from_query(&search);
        if let Ok(json) = serde_json::to_string(&settings) {
            log::info!("Settings: {}", json);
        }
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

fn parse_volume(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().map(|v| v.clamp(0.0, 1.0))
}

/// Bare keys (`?mute`) count as on
fn parse_flag(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "0" | "false" | "off" | "no")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_is_default() {
        assert_eq!(Settings::from_query(""), Settings::default());
        assert_eq!(Settings::from_query("?"), Settings::default());
    }

    #[test]
    fn test_query_parsing() {
        let s = Settings::from_query("?difficulty=hard&volume=0.5&sfx=2&mute&seed=42");
        assert_eq!(s.difficulty, Difficulty::Hard);
        assert_eq!(s.master_volume, 0.5);
        assert_eq!(s.sfx_volume, 1.0);
        assert!(s.muted);
        assert!(!s.autoplay);
        assert_eq!(s.seed, Some(42));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let s = Settings::from_query("difficulty=nightmare&volume=loud&demo=off&seed=x");
        assert_eq!(s.difficulty, Difficulty::Easy);
        assert_eq!(s.master_volume, 0.8);
        assert!(!s.autoplay);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_bare_and_explicit_flags() {
        assert!(Settings::from_query("demo").autoplay);
        assert!(Settings::from_query("demo=1").autoplay);
        assert!(!Settings::from_query("mute=false").muted);
        assert!(Settings::from_query("MUTE=yes").muted);
    }
}
