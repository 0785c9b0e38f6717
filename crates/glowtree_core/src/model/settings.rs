//! Persisted viewer preferences.

use serde::{Deserialize, Serialize};

/// Weather effect applied to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    /// No particle effect.
    #[default]
    Clear,
    /// Falling rain streaks.
    Rain,
    /// Drifting snowflakes.
    Snow,
    /// Distance fog over the scene.
    Fog,
}

impl Weather {
    pub const ALL: [Weather; 4] = [Weather::Clear, Weather::Rain, Weather::Snow, Weather::Fog];

    /// Next weather in cycle order, wrapping back to `Clear`.
    pub fn next(self) -> Weather {
        let index = Self::ALL
            .iter()
            .position(|weather| *weather == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Viewer settings stored under their own key, apart from messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub weather: Weather,
    pub auto_cycle: bool,
}
