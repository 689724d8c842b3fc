//! Session configuration: `{ initialTime, spawnInterval }`.
//!
//! Values are trusted numbers from the page. Anything missing, non-finite or
//! non-positive quietly falls back to the default instead of failing.

#[cfg(feature = "serde")]
use serde::Deserialize;

pub const DEFAULT_INITIAL_TIME: f64 = 60.0; // seconds
pub const DEFAULT_SPAWN_INTERVAL: f64 = 2000.0; // milliseconds

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct GameConfig {
    pub initial_time: f64,
    pub spawn_interval: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { initial_time: DEFAULT_INITIAL_TIME, spawn_interval: DEFAULT_SPAWN_INTERVAL }
    }
}

impl GameConfig {
    pub fn new(initial_time: Option<f64>, spawn_interval: Option<f64>) -> Self {
        Self {
            initial_time: usable(initial_time).unwrap_or(DEFAULT_INITIAL_TIME),
            spawn_interval: usable(spawn_interval).unwrap_or(DEFAULT_SPAWN_INTERVAL),
        }
    }

    /// Replace unusable values with defaults.
    pub fn sanitized(self) -> Self {
        Self::new(Some(self.initial_time), Some(self.spawn_interval))
    }

    /// Parse `{"initialTime": 45, "spawnInterval": 1500}`; absent keys take defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let cfg: GameConfig = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }
}

fn usable(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.initial_time, 60.0);
        assert_eq!(cfg.spawn_interval, 2000.0);
        assert_eq!(GameConfig::new(None, None), cfg);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let cfg = GameConfig::new(Some(0.0), Some(f64::NAN));
        assert_eq!(cfg, GameConfig::default());
        let cfg = GameConfig::new(Some(-5.0), Some(f64::INFINITY));
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn test_explicit_values_kept() {
        let cfg = GameConfig::new(Some(30.0), Some(1800.0));
        assert_eq!(cfg.initial_time, 30.0);
        assert_eq!(cfg.spawn_interval, 1800.0);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_from_json() {
        let cfg = GameConfig::from_json(r#"{"initialTime": 45, "spawnInterval": 1500}"#).unwrap();
        assert_eq!(cfg, GameConfig::new(Some(45.0), Some(1500.0)));

        let cfg = GameConfig::from_json(r#"{"spawnInterval": -1}"#).unwrap();
        assert_eq!(cfg, GameConfig::default());

        assert!(GameConfig::from_json("not json").is_err());
    }
}
