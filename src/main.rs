use std::io::stdout;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use flappy_pixel::app::{self, TerminalGuard};
use flappy_pixel::audio::Audio;
use flappy_pixel::sprites::{Atlas, SpriteBank};
use flappy_pixel::{Game, GameConfig, logging};

fn main() -> Result<()> {
    let config = GameConfig::load().context("failed to load configuration")?;
    logging::init(&config.log).context("failed to set up logging")?;
    info!(
        width = config.screen.width,
        height = config.screen.height,
        fps = config.screen.fps,
        debug = config.debug,
        "starting"
    );

    let atlas = Atlas::load(config.assets.atlas.as_deref()).context("failed to load sprites")?;
    let sprites = SpriteBank::new(&atlas, &config).context("failed to prepare sprites")?;
    let audio = Audio::open(&config.audio);
    let mut game = Game::new(config, sprites, StdRng::from_os_rng());

    let mut out = stdout();
    let guard = TerminalGuard::enter(&mut out).context("failed to set up the terminal")?;
    let result = app::run(&mut game, &audio, &mut out);
    drop(guard);
    result.context("game loop failed")?;

    info!(rounds = game.round(), score = game.score(), "exiting");
    Ok(())
}
