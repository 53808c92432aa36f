//! Round orchestration: the start screen, play and game-over modes, the
//! per-frame collision pass, spawning and scoring.
//!
//! A frame is `handle` for every pending input, then one `step`. `step` first
//! drains the spawner (timer effects land with the inputs, never mid-update),
//! then resolves collisions, then advances the entities.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{Avatar, Ground, Obstacle, PipeVariant};
use crate::geometry::{Rect, Vec2};
use crate::spawner::Spawner;
use crate::sprites::SpriteBank;

/// Vertical centers of the start screen's title, resting avatar and play
/// button.
pub const TITLE_Y: f64 = 150.0;
pub const START_AVATAR_Y: f64 = 250.0;
pub const PLAY_BUTTON_Y: f64 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    StartScreen,
    Playing,
    GameOver,
}

/// One-shot sound cues raised by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    Hit,
    Point,
    Wing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Day,
    Night,
}

impl Background {
    pub fn toggled(self) -> Self {
        match self {
            Background::Day => Background::Night,
            Background::Night => Background::Day,
        }
    }
}

/// Player intent, already translated into world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Jump,
    /// Start from the start screen, or begin a fresh round.
    Restart,
    Quit,
    PointerMoved { x: f64, y: f64 },
    PointerPressed { x: f64, y: f64 },
    PointerReleased,
}

#[derive(Debug, Clone)]
pub struct PlayButton {
    pub rect: Rect,
    pub hovered: bool,
    /// Set by a start-screen press that did not start a round, until the
    /// button is released or a round starts.
    latched: bool,
}

pub struct Game {
    config: GameConfig,
    sprites: SpriteBank,
    rng: StdRng,
    mode: Mode,
    running: bool,
    round: u32,
    avatar: Avatar,
    ground: Ground,
    obstacles: Vec<Obstacle>,
    score: u32,
    hit_ground: bool,
    hit_obstacle: bool,
    spawner: Spawner,
    background: Background,
    play_button: PlayButton,
    sfx: Vec<Sfx>,
}

impl Game {
    pub fn new(config: GameConfig, sprites: SpriteBank, rng: StdRng) -> Self {
        let center = Vec2::new(config.width() / 2.0, START_AVATAR_Y);
        let button = &sprites.play_button;
        let play_button = PlayButton {
            rect: Rect::centered(
                Vec2::new(config.width() / 2.0, PLAY_BUTTON_Y),
                button.width() as i32,
                button.height() as i32,
            ),
            hovered: false,
            latched: false,
        };
        Self {
            avatar: Avatar::resting_at(&config.avatar, sprites.bird_size(), center),
            ground: Ground::new(&config.ground, config.width(), config.height()),
            spawner: Spawner::new(config.obstacles.spawn_interval()),
            mode: Mode::StartScreen,
            running: true,
            round: 0,
            obstacles: Vec::new(),
            score: 0,
            hit_ground: false,
            hit_obstacle: false,
            background: Background::Day,
            play_button,
            sfx: Vec::new(),
            config,
            sprites,
            rng,
        }
    }

    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Quit => self.running = false,
            Input::Restart => self.start_round(),
            Input::Jump => {
                if self.mode == Mode::Playing && self.avatar.jump() {
                    self.sfx.push(Sfx::Wing);
                }
            }
            Input::PointerMoved { x, y } => {
                self.play_button.hovered = self.play_button.rect.contains(x, y);
            }
            Input::PointerPressed { x, y } => {
                let inside = self.play_button.rect.contains(x, y);
                self.play_button.hovered = inside;
                if self.mode != Mode::StartScreen {
                    return;
                }
                if inside && !self.play_button.latched {
                    self.start_round();
                } else {
                    self.play_button.latched = true;
                }
            }
            Input::PointerReleased => self.play_button.latched = false,
        }
    }

    /// Advances the simulation by `dt`.
    pub fn step(&mut self, dt: Duration) {
        let secs = dt.as_secs_f64();
        match self.mode {
            Mode::StartScreen => self.ground.update(secs),
            Mode::Playing => {
                for _ in 0..self.spawner.advance(dt) {
                    if self.is_alive() {
                        self.spawn_pair();
                    }
                }

                self.resolve_collisions();
                if self.hit_ground {
                    self.mode = Mode::GameOver;
                    info!(round = self.round, score = self.score, "game over");
                    return;
                }

                self.avatar.update(secs);
                self.ground.update(secs);
                for obstacle in &mut self.obstacles {
                    obstacle.update(secs);
                }
                self.obstacles.retain(|o| !o.removed);
            }
            Mode::GameOver => {}
        }
    }

    fn start_round(&mut self) {
        self.round += 1;
        self.mode = Mode::Playing;
        self.play_button.latched = false;
        self.avatar = Avatar::new(&self.config.avatar, self.sprites.bird_size());
        self.ground = Ground::new(&self.config.ground, self.config.width(), self.config.height());
        self.obstacles.clear();
        self.score = 0;
        self.hit_ground = false;
        self.hit_obstacle = false;
        self.spawner.reset();
        self.background = Background::Day;
        info!(round = self.round, "round started");
    }

    fn spawn_pair(&mut self) {
        let tuning = &self.config.obstacles;
        let offset = self.rng.random_range(tuning.offset_min..=tuning.offset_max);
        let gap_center = self.config.height() / 2.0 + offset as f64;
        self.place_obstacle_pair(self.config.width(), gap_center);

        let previous = self.score;
        self.score += 1;
        debug_assert!(self.score > previous);
        self.sfx.push(Sfx::Point);
        debug!(offset, gap_center, score = self.score, "obstacle pair spawned");

        if self.score % self.config.scoring.background_toggle_every == 0 {
            self.background = self.background.toggled();
            debug!(background = ?self.background, "background toggled");
        }
    }

    /// Adds a pair whose left edges sit at `x` around `gap_center`.
    pub fn place_obstacle_pair(&mut self, x: f64, gap_center: f64) {
        let size = (self.sprites.pipe_top.width(), self.sprites.pipe_top.height());
        self.obstacles
            .extend(Obstacle::pair(&self.config.obstacles, x, gap_center, size));
    }

    /// Ground by rectangle first, then obstacles by silhouette. Each fires at
    /// most once per round, and only the first of the two plays the hit sound.
    fn resolve_collisions(&mut self) {
        let sprite = self.sprites.avatar(self.avatar.pose());
        let rect = self.avatar_rect();

        if !self.hit_ground && rect.overlaps(&self.ground.rect()) {
            self.avatar.on_ground_hit();
            self.hit_ground = true;
            debug!(y = self.avatar.pos.y, "avatar hit the ground");
            if !self.hit_obstacle {
                self.sfx.push(Sfx::Hit);
            }
        }

        if !self.hit_obstacle {
            let hit = self.obstacles.iter().any(|o| {
                let other = o.rect();
                let mask = match o.variant {
                    PipeVariant::Top => &self.sprites.pipe_top.mask,
                    PipeVariant::Bottom => &self.sprites.pipe_bottom.mask,
                };
                rect.overlaps(&other) && sprite.mask.overlaps(mask, other.x - rect.x, other.y - rect.y)
            });
            if hit {
                self.avatar.on_obstacle_hit();
                self.hit_obstacle = true;
                debug!(score = self.score, "avatar hit an obstacle");
                if !self.hit_ground {
                    self.sfx.push(Sfx::Hit);
                }
            }
        }
    }

    /// Bounds of the avatar's current (rotated) sprite.
    pub fn avatar_rect(&self) -> Rect {
        let sprite = self.sprites.avatar(self.avatar.pose());
        Rect::centered(self.avatar.center(), sprite.width() as i32, sprite.height() as i32)
    }

    /// Neither the ground nor an obstacle has been hit this round.
    pub fn is_alive(&self) -> bool {
        !self.hit_ground && !self.hit_obstacle
    }

    /// Sound cues raised since the last call.
    pub fn take_sfx(&mut self) -> Vec<Sfx> {
        std::mem::take(&mut self.sfx)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hit_ground(&self) -> bool {
        self.hit_ground
    }

    pub fn hit_obstacle(&self) -> bool {
        self.hit_obstacle
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn avatar_mut(&mut self) -> &mut Avatar {
        &mut self.avatar
    }

    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn play_button(&self) -> &PlayButton {
        &self.play_button
    }

    pub fn sprites(&self) -> &SpriteBank {
        &self.sprites
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::Atlas;
    use rand::SeedableRng;

    const FRAME: Duration = Duration::from_millis(16);

    fn new_game() -> Game {
        let config = GameConfig::default();
        let sprites = SpriteBank::new(&Atlas::procedural().unwrap(), &config).unwrap();
        Game::new(config, sprites, StdRng::seed_from_u64(7))
    }

    fn playing() -> Game {
        let mut game = new_game();
        game.handle(Input::Restart);
        game.take_sfx();
        game
    }

    fn count(sfx: &[Sfx], which: Sfx) -> usize {
        sfx.iter().filter(|&&s| s == which).count()
    }

    #[test]
    fn starts_on_the_start_screen_with_a_resting_avatar() {
        let mut game = new_game();
        assert_eq!(game.mode(), Mode::StartScreen);
        let before = game.avatar().pos;
        game.step(Duration::from_millis(500));
        assert_eq!(game.avatar().pos, before);
        assert!(game.ground().offset < 0.0);
        assert!(game.obstacles().is_empty());
    }

    #[test]
    fn jump_is_ignored_on_the_start_screen() {
        let mut game = new_game();
        game.handle(Input::Jump);
        assert!(game.take_sfx().is_empty());
        assert_eq!(game.mode(), Mode::StartScreen);
    }

    #[test]
    fn restart_key_starts_play() {
        let mut game = new_game();
        game.handle(Input::Restart);
        assert_eq!(game.mode(), Mode::Playing);
        assert_eq!(game.round(), 1);
    }

    #[test]
    fn clicking_the_play_button_starts_play() {
        let mut game = new_game();
        let r = game.play_button().rect;
        game.handle(Input::PointerPressed {
            x: r.x as f64 + 1.0,
            y: r.y as f64 + 1.0,
        });
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn click_outside_the_button_does_nothing() {
        let mut game = new_game();
        game.handle(Input::PointerPressed { x: 1.0, y: 1.0 });
        assert_eq!(game.mode(), Mode::StartScreen);
    }

    #[test]
    fn held_pointer_does_not_trigger_until_released() {
        let mut game = new_game();
        let r = game.play_button().rect;
        let (x, y) = (r.x as f64 + 5.0, r.y as f64 + 5.0);
        game.handle(Input::PointerPressed { x: 1.0, y: 1.0 });
        game.handle(Input::PointerMoved { x, y });
        assert!(game.play_button().hovered);
        game.handle(Input::PointerPressed { x, y });
        assert_eq!(game.mode(), Mode::StartScreen);
        game.handle(Input::PointerReleased);
        game.handle(Input::PointerPressed { x, y });
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn presses_outside_the_start_screen_never_latch() {
        let mut game = playing();
        // No release follows, as when the button comes up outside the window.
        game.handle(Input::PointerPressed { x: 1.0, y: 1.0 });
        assert!(!game.play_button().latched);
    }

    #[test]
    fn starting_a_round_clears_the_latch() {
        let mut game = new_game();
        assert!(!game.play_button().latched);
        game.handle(Input::PointerPressed { x: 1.0, y: 1.0 });
        assert!(game.play_button().latched);
        game.handle(Input::Restart);
        assert!(!game.play_button().latched);
    }

    #[test]
    fn quit_stops_the_game_from_any_mode() {
        for setup in [new_game as fn() -> Game, playing] {
            let mut game = setup();
            game.handle(Input::Quit);
            assert!(!game.is_running());
        }
    }

    #[test]
    fn jump_plays_wing_while_control_remains() {
        let mut game = playing();
        game.handle(Input::Jump);
        assert_eq!(game.take_sfx(), vec![Sfx::Wing]);
        assert_eq!(game.avatar().velocity, -350.0);
    }

    #[test]
    fn ground_collision_freezes_fall_but_not_jump_and_ends_round() {
        let mut game = playing();
        game.avatar_mut().pos.y = 470.0;
        game.step(FRAME);

        let a = game.avatar();
        assert!(game.hit_ground());
        assert!(!game.hit_obstacle());
        assert!(!a.is_gravity && !a.is_animate && !a.is_rotate);
        assert!(a.is_jump);
        assert_eq!(game.mode(), Mode::GameOver);
        assert_eq!(game.take_sfx(), vec![Sfx::Hit]);
    }

    #[test]
    fn obstacle_collision_freezes_control_but_keeps_gravity() {
        let mut game = playing();
        // Top pipe spans y 5..325 and x 80..132; the avatar is inside it.
        game.place_obstacle_pair(80.0, 400.0);
        game.step(FRAME);

        let a = game.avatar();
        assert!(game.hit_obstacle());
        assert!(!game.hit_ground());
        assert!(!a.is_jump && !a.is_animate && !a.is_rotate);
        assert!(a.is_gravity);
        assert_eq!(game.mode(), Mode::Playing);
        assert_eq!(game.take_sfx(), vec![Sfx::Hit]);

        let y = game.avatar().pos.y;
        game.step(FRAME);
        assert!(game.avatar().pos.y > y);
    }

    #[test]
    fn obstacle_then_ground_plays_hit_once() {
        let mut game = playing();
        game.place_obstacle_pair(80.0, 400.0);
        let mut sfx = Vec::new();
        for _ in 0..600 {
            game.step(FRAME);
            sfx.extend(game.take_sfx());
            if game.mode() == Mode::GameOver {
                break;
            }
        }
        assert_eq!(game.mode(), Mode::GameOver);
        assert!(game.hit_ground() && game.hit_obstacle());
        assert_eq!(count(&sfx, Sfx::Hit), 1);
    }

    #[test]
    fn simultaneous_collisions_play_hit_once() {
        let mut game = playing();
        // Bottom pipe spans y 275..595 at x 80..132, reaching into the ground.
        game.place_obstacle_pair(80.0, 200.0);
        game.avatar_mut().pos.y = 470.0;
        game.step(FRAME);
        assert!(game.hit_ground() && game.hit_obstacle());
        assert_eq!(count(&game.take_sfx(), Sfx::Hit), 1);
        assert!(game.avatar().is_frozen());
    }

    #[test]
    fn bounding_box_overlap_alone_is_not_a_hit() {
        let mut game = playing();
        // The avatar's rect reaches 2px into the pipe's column, but the pipe
        // body starts 2px in from its edge.
        let rect = game.avatar_rect();
        game.place_obstacle_pair(rect.right() as f64 - 2.0, 400.0);
        game.step(Duration::ZERO);
        assert!(!game.hit_obstacle());
    }

    #[test]
    fn each_spawner_tick_scores_and_spawns_a_pair() {
        let mut game = playing();
        game.avatar_mut().is_gravity = false;
        game.step(Duration::from_millis(1999));
        assert!(game.obstacles().is_empty());
        game.step(Duration::from_millis(1));
        assert_eq!(game.score(), 1);
        assert_eq!(game.obstacles().len(), 2);
        assert_eq!(game.take_sfx(), vec![Sfx::Point]);

        let top = &game.obstacles()[0];
        let bottom = &game.obstacles()[1];
        assert_eq!(top.gap_center, bottom.gap_center);
        let offset = top.gap_center - 280.0;
        assert!((-150.0..=100.0).contains(&offset));
        assert_eq!(bottom.rect().y - top.rect().bottom(), 150);
    }

    #[test]
    fn background_toggles_every_ten_points() {
        let mut game = playing();
        game.avatar_mut().is_gravity = false;
        let mut toggles = Vec::new();
        let mut last = game.background();
        for _ in 0..20 {
            // Two-second steps carry each pair past the avatar between checks.
            game.step(Duration::from_secs(2));
            assert!(game.is_alive());
            if game.background() != last {
                toggles.push(game.score());
                last = game.background();
            }
        }
        assert_eq!(game.score(), 20);
        assert_eq!(toggles, vec![10, 20]);
        assert_eq!(game.background(), Background::Day);
    }

    #[test]
    fn no_spawning_or_scoring_after_a_collision() {
        let mut game = playing();
        game.place_obstacle_pair(80.0, 400.0);
        game.step(FRAME);
        assert!(game.hit_obstacle());
        game.avatar_mut().is_gravity = false;
        game.step(Duration::from_secs(2));
        assert_eq!(game.score(), 0);
        // The first pair scrolled off and nothing replaced it.
        assert!(game.obstacles().is_empty());
    }

    #[test]
    fn world_keeps_moving_after_obstacle_hit() {
        let mut game = playing();
        game.place_obstacle_pair(80.0, 400.0);
        game.step(FRAME);
        let x = game.obstacles()[0].pos.x;
        game.step(FRAME);
        assert!(game.obstacles()[0].pos.x < x);
    }

    #[test]
    fn game_over_freezes_everything() {
        let mut game = playing();
        game.place_obstacle_pair(200.0, 280.0);
        game.avatar_mut().pos.y = 470.0;
        game.step(FRAME);
        assert_eq!(game.mode(), Mode::GameOver);
        let (x, ground) = (game.obstacles()[0].pos.x, game.ground().offset);
        game.handle(Input::Jump);
        game.step(Duration::from_secs(3));
        assert_eq!(game.obstacles()[0].pos.x, x);
        assert_eq!(game.ground().offset, ground);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn restart_resets_the_round() {
        let mut game = playing();
        game.avatar_mut().is_gravity = false;
        for _ in 0..10 {
            game.step(Duration::from_secs(2));
        }
        assert_eq!(game.background(), Background::Night);
        game.avatar_mut().pos.y = 470.0;
        game.step(FRAME);
        assert_eq!(game.mode(), Mode::GameOver);

        game.handle(Input::Restart);
        assert_eq!(game.mode(), Mode::Playing);
        assert_eq!(game.round(), 2);
        assert_eq!(game.score(), 0);
        assert!(game.obstacles().is_empty());
        assert!(game.is_alive());
        assert!(game.avatar().is_jump && game.avatar().is_gravity);
        assert_eq!(game.background(), Background::Day);
        // The spawner starts a full interval over.
        game.step(Duration::from_millis(1999));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn restart_is_honored_mid_round() {
        let mut game = playing();
        game.avatar_mut().is_gravity = false;
        game.step(Duration::from_secs(2));
        assert_eq!(game.score(), 1);
        game.handle(Input::Restart);
        assert_eq!(game.score(), 0);
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn offscreen_obstacles_are_dropped() {
        let mut game = playing();
        game.avatar_mut().is_gravity = false;
        game.place_obstacle_pair(-40.0, 280.0);
        game.step(Duration::from_millis(200));
        assert!(game.obstacles().is_empty());
    }
}
