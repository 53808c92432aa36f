//! Error types for the fallible edges of the game: configuration, assets,
//! logging setup and the audio device. The simulation itself has no error
//! paths.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load sprite atlas {}: {source}", path.display())]
    AtlasLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("sprite {sprite} region {x},{y} {w}x{h} lies outside the {atlas_w}x{atlas_h} atlas")]
    RegionOutOfBounds {
        sprite: &'static str,
        x: u32,
        y: u32,
        w: u32,
        h: u32,
        atlas_w: u32,
        atlas_h: u32,
    },
    #[error("sprite {0} has no opaque pixels")]
    EmptySprite(&'static str),
    #[error("built-in art for {sprite} is malformed: row {row} is {len} wide, expected {expected}")]
    MalformedArt {
        sprite: &'static str,
        row: usize,
        len: usize,
        expected: usize,
    },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open audio output: {0}")]
    Output(String),
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}
