//! Board layout and tuning
//!
//! Every dimension and speed the simulation uses comes through here, so a
//! JSON file can reshape the whole game without touching the code. Missing
//! fields fall back to the defaults in [`crate::consts`].

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub frame_size: f64,
    pub ball_count: u32,
    pub ball_radius: f64,
    pub ball_speed: f64,
    pub block_width: f64,
    pub block_height: f64,
    pub block_rows: u32,
    pub blocks_in_top_row: u32,
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub paddle_speed: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: consts::SCREEN_WIDTH,
            screen_height: consts::SCREEN_HEIGHT,
            frame_size: consts::FRAME_SIZE,
            ball_count: consts::BALL_COUNT,
            ball_radius: consts::BALL_RADIUS,
            ball_speed: consts::BALL_SPEED,
            block_width: consts::BLOCK_WIDTH,
            block_height: consts::BLOCK_HEIGHT,
            block_rows: consts::BLOCK_ROWS,
            blocks_in_top_row: consts::BLOCKS_IN_TOP_ROW,
            paddle_width: consts::PADDLE_WIDTH,
            paddle_height: consts::PADDLE_HEIGHT,
            paddle_speed: consts::PADDLE_SPEED,
        }
    }
}

impl GameConfig {
    /// Load and validate a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        config.validate()?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject configs the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&str, f64); 9] = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("frame_size", self.frame_size),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::Invalid(name, "must be positive and finite"));
            }
        }
        if !(self.paddle_speed >= 0.0) || !self.paddle_speed.is_finite() {
            return Err(ConfigError::Invalid(
                "paddle_speed",
                "must be non-negative and finite",
            ));
        }
        if self.ball_count == 0 {
            return Err(ConfigError::Invalid("ball_count", "must be at least 1"));
        }
        if self.block_rows == 0 || self.blocks_in_top_row == 0 {
            return Err(ConfigError::Invalid(
                "block_rows",
                "the grid needs at least one block",
            ));
        }
        if self.paddle_width + 2.0 * self.frame_size > self.screen_width {
            return Err(ConfigError::Invalid(
                "paddle_width",
                "paddle does not fit between the walls",
            ));
        }
        let grid_width = self.blocks_in_top_row as f64 * self.block_width;
        if grid_width + self.frame_size > self.screen_width {
            return Err(ConfigError::Invalid(
                "blocks_in_top_row",
                "top row does not fit inside the field",
            ));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str, &'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {e}"),
            Self::Parse(e) => write!(f, "cannot parse config: {e}"),
            Self::Invalid(field, why) => write!(f, "invalid config: {field} {why}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(..) => None,
        }
    }
}
