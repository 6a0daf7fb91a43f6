//! Game configuration
//!
//! JSON document with defaults for every field. On the web it lives in
//! LocalStorage next to the leaderboard; natively it is read from a file.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::BoardConfig;

/// Where high scores are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Key-value storage under a single key
    Local { key: String },
    /// Remote web service (see `score_store::remote` for the protocol)
    Remote { url: String },
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::Local {
            key: STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub cols: i32,
    pub rows: i32,
    /// Preferred cell edge in pixels before fitting to the viewport
    pub base_cell_size: u32,
    pub tick_ms: u32,
    pub min_swipe_distance: f32,
    /// Horizontal space kept free around the board
    pub viewport_margin: f64,
    /// Upper bound for sprite size in cells
    pub image_scale: f64,
    pub guest_name: String,
    /// Image URLs for the head and target sprites
    pub head_sprite: String,
    pub target_sprite: String,
    pub storage: StorageBackend,
    /// Fixed seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: BOARD_COLS,
            rows: BOARD_ROWS,
            base_cell_size: BASE_CELL_SIZE,
            tick_ms: TICK_MS,
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            viewport_margin: VIEWPORT_MARGIN,
            image_scale: IMAGE_SCALE,
            guest_name: DEFAULT_GUEST_NAME.to_string(),
            head_sprite: HEAD_SPRITE.to_string(),
            target_sprite: TARGET_SPRITE.to_string(),
            storage: StorageBackend::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "grid_snake_config";

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 2 || self.rows < 2 {
            return Err(ConfigError::Invalid(format!(
                "board must be at least 2x2, got {}x{}",
                self.cols, self.rows
            )));
        }
        if self.cols > MAX_BOARD_DIM || self.rows > MAX_BOARD_DIM {
            return Err(ConfigError::Invalid(format!(
                "board must be at most {}x{}, got {}x{}",
                MAX_BOARD_DIM, MAX_BOARD_DIM, self.cols, self.rows
            )));
        }
        if self.base_cell_size == 0 || self.base_cell_size > MAX_CELL_SIZE {
            return Err(ConfigError::Invalid(format!(
                "base_cell_size must be between 1 and {}",
                MAX_CELL_SIZE
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".to_string()));
        }
        if self.min_swipe_distance.is_nan() || self.min_swipe_distance < 0.0 {
            return Err(ConfigError::Invalid(
                "min_swipe_distance must be non-negative".to_string(),
            ));
        }
        match &self.storage {
            StorageBackend::Local { key } if key.is_empty() => {
                Err(ConfigError::Invalid("local storage key is empty".to_string()))
            }
            StorageBackend::Remote { url } if url.trim().is_empty() => {
                Err(ConfigError::Invalid("remote score url is empty".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Board for a session, sized once from the viewport width
    pub fn board_for_viewport(&self, viewport_width: Option<f64>) -> BoardConfig {
        let available = viewport_width.map(|w| w - self.viewport_margin);
        BoardConfig::fit_width(self.cols, self.rows, self.base_cell_size, available)
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: Option<&std::path::Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default config");
            return Self::default();
        };
        match std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!((config.cols, config.rows), (16, 16));
        assert_eq!(config.tick_ms, 180);
        assert_eq!(config.storage, StorageBackend::Local { key: "snakeHighScores".to_string() });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(
            r#"{"tick_ms": 120, "storage": {"type": "remote", "url": "https://s.example/exec"}}"#,
        )
        .unwrap();
        assert_eq!(config.tick_ms, 120);
        assert_eq!(config.cols, 16);
        assert_eq!(
            config.storage,
            StorageBackend::Remote { url: "https://s.example/exec".to_string() }
        );
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"cols": 1}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"storage": {"type": "remote", "url": " "}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(GameConfig::from_json("nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_oversized_board_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"cols": 200000000}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"rows": 257}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{"base_cell_size": 100000}"#),
            Err(ConfigError::Invalid(_))
        ));
        let largest = GameConfig::from_json(r#"{"cols": 256, "rows": 256, "base_cell_size": 256}"#).unwrap();
        assert_eq!(largest.board_for_viewport(None).pixel_size(), (65536, 65536));
    }

    #[test]
    fn test_board_for_viewport_keeps_margin() {
        let config = GameConfig::default();
        // 340 - 40 = 300 px available, 300 / 16 = 18
        assert_eq!(config.board_for_viewport(Some(340.0)).cell_size, 18);
        assert_eq!(config.board_for_viewport(None).cell_size, 24);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load_from(Some(std::path::Path::new("/nonexistent/grid-snake.json")));
        assert_eq!(config, GameConfig::default());
    }
}
