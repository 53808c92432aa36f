//! A sprite-based Flappy Bird clone drawn as pixel graphics in the terminal.
//!
//! The simulation (`game`, `entities`, `spawner`) is deterministic given a
//! seeded RNG and a sequence of frame durations, and runs headless. `render`,
//! `input`, `audio` and `app` attach it to a terminal and a sound device.

pub mod app;
pub mod audio;
pub mod bitmap;
pub mod config;
pub mod entities;
pub mod error;
pub mod font;
pub mod game;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod mask;
pub mod render;
pub mod spawner;
pub mod sprites;

pub use config::GameConfig;
pub use game::{Game, Input, Mode, Sfx};
