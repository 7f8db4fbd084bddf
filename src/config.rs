//! Persisted front-end settings and the best score.
//!
//! Gameplay constants are fixed in `lane_dodger::constants`; this file only
//! holds what the terminal front-end is free to change.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_NAME: &str = "lane_dodger";

const MAX_FPS: u32 = 240;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config storage failed: {0}")]
    Storage(#[from] confy::ConfyError),
    #[error("fps must be between 1 and 240, got {0}")]
    InvalidFps(u32),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub version: u32,
    /// Frames simulated (and drawn) per second. Score grows by one per frame.
    pub fps: u32,
    pub best_score: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            fps: 60,
            best_score: 0,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ConfigError::InvalidFps(self.fps));
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }

    /// Record a finished run. Returns true if it set a new best score.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }
}

/// The config the game starts with, and whether it may be written back.
#[derive(Debug)]
pub struct StartupConfig {
    pub config: AppConfig,
    /// False when the stored file could not be read; saving would overwrite it.
    pub persist: bool,
    pub warning: Option<ConfigError>,
}

/// Turn whatever was read from storage into a usable config.
///
/// An invalid `fps` is reset to the default while everything else, the best
/// score included, is kept. With nothing readable (`None`) the defaults are
/// used and persistence is turned off.
pub fn resolve(stored: Option<AppConfig>) -> StartupConfig {
    let Some(mut config) = stored else {
        return StartupConfig {
            config: AppConfig::default(),
            persist: false,
            warning: None,
        };
    };
    let warning = config.validate().err();
    if warning.is_some() {
        config.fps = AppConfig::default().fps;
    }
    StartupConfig {
        config,
        persist: true,
        warning,
    }
}

/// Read the stored config without validating it; see [`resolve`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    Ok(confy::load(CONFIG_NAME, None)?)
}

pub fn save_config(cfg: &AppConfig) -> Result<(), ConfigError> {
    confy::store(CONFIG_NAME, None, cfg)?;
    Ok(())
}
