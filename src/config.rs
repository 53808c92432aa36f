//! Game configuration.
//!
//! Every tunable lives in one immutable [`GameConfig`] that components read at
//! construction. Values are layered: built-in defaults, then an optional
//! `flappy.toml` in the working directory, then `FLAPPY_` environment
//! variables (`FLAPPY_OBSTACLES__GAP=170`).

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Logical screen and frame pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Longest frame delta fed to the simulation, in milliseconds.
    pub max_frame_ms: u64,
    /// Nearest-neighbor scale applied to atlas sprites.
    pub sprite_scale: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 380,
            height: 560,
            fps: 60,
            max_frame_ms: 100,
            sprite_scale: 2,
        }
    }
}

/// Avatar physics. Lengths are logical pixels, times are seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Center of the sprite at round start.
    pub start_x: f64,
    pub start_y: f64,
    /// Downward velocity at round start.
    pub initial_velocity: f64,
    pub acceleration: f64,
    /// Magnitude of the upward jump impulse.
    pub jump_velocity: f64,
    /// Degrees per second.
    pub rotation_speed: f64,
    /// Tilt set by a jump, in degrees.
    pub jump_rotation: f64,
    /// Animation frames advanced per update call.
    pub frame_step: f64,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            start_y: 560.0 / 3.0,
            initial_velocity: 100.0,
            acceleration: 1200.0,
            jump_velocity: 350.0,
            rotation_speed: 60.0,
            jump_rotation: 18.0,
            frame_step: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub height: u32,
    pub scroll_speed: f64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            height: 80,
            scroll_speed: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub speed: f64,
    /// Vertical opening between the two pipes of a pair.
    pub gap: f64,
    /// Inclusive range of the gap center offset from mid-screen.
    pub offset_min: i32,
    pub offset_max: i32,
    pub spawn_interval_ms: u64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            gap: 150.0,
            offset_min: -150,
            offset_max: 100,
            spawn_interval_ms: 2000,
        }
    }
}

impl ObstacleConfig {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// The background swaps between day and night every this many points.
    pub background_toggle_every: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            background_toggle_every: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub music: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            music: true,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// PNG sprite atlas. When unset the built-in atlas is generated.
    pub atlas: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: std::env::temp_dir().join("flappy-pixel.log"),
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen: ScreenConfig,
    pub avatar: AvatarConfig,
    pub ground: GroundConfig,
    pub obstacles: ObstacleConfig,
    pub scoring: ScoringConfig,
    pub audio: AudioConfig,
    pub assets: AssetConfig,
    pub log: LogConfig,
    /// Outline collision rectangles when rendering.
    pub debug: bool,
}

impl GameConfig {
    /// Loads `flappy.toml` (if present) and `FLAPPY_*` overrides on top of the
    /// defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("flappy").required(false))
            .add_source(
                Environment::with_prefix("FLAPPY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: GameConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.screen.width == 0 || self.screen.height == 0 {
            return invalid("screen size must be non-zero");
        }
        if self.screen.fps == 0 {
            return invalid("screen.fps must be non-zero");
        }
        if self.screen.sprite_scale == 0 {
            return invalid("screen.sprite_scale must be non-zero");
        }
        if self.obstacles.spawn_interval_ms == 0 {
            return invalid("obstacles.spawn_interval_ms must be non-zero");
        }
        if self.obstacles.offset_min > self.obstacles.offset_max {
            return invalid("obstacles.offset_min must not exceed obstacles.offset_max");
        }
        if self.obstacles.gap <= 0.0 {
            return invalid("obstacles.gap must be positive");
        }
        if self.ground.height == 0 || self.ground.height >= self.screen.height {
            return invalid("ground.height must fit inside the screen");
        }
        if self.scoring.background_toggle_every == 0 {
            return invalid("scoring.background_toggle_every must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return invalid("audio.volume must be within 0..=1");
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.screen.fps as f64)
    }

    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.screen.max_frame_ms.max(1))
    }

    pub fn width(&self) -> f64 {
        self.screen.width as f64
    }

    pub fn height(&self) -> f64 {
        self.screen.height as f64
    }
}
