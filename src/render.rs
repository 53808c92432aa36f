//! Terminal presentation.
//!
//! Each frame the world is drawn at its logical resolution into a canvas, then
//! sampled into a buffer of terminal pixels: one cell holds two vertically
//! stacked pixels drawn as `▀` with separate foreground and background colors.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::bitmap::{Bitmap, Rgb};
use crate::entities::PipeVariant;
use crate::font;
use crate::game::{Background, Game, Mode, TITLE_Y};
use crate::geometry::{Rect, Vec2};

const WHITE: Rgb = Rgb(255, 255, 255);
const LETTERBOX: Rgb = Rgb(12, 12, 16);
const DEBUG_AVATAR: Rgb = Rgb(255, 0, 0);
const DEBUG_OBSTACLE: Rgb = Rgb(0, 0, 255);

const SCORE_Y: i32 = 50;
const SCORE_SCALE: i32 = 6;
const GAME_OVER_TEXT_Y: i32 = 250;
const GAME_OVER_TEXT_SCALE: i32 = 3;

// ── Viewport ────────────────────────────────────────────────────────────────

/// Where the world lands inside the terminal pixel grid: uniformly scaled to
/// fit and centered, with bars on the slack axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    pub fn fit(world_w: f64, world_h: f64, px_w: usize, px_h: usize) -> Self {
        let scale = (px_w as f64 / world_w).min(px_h as f64 / world_h);
        Self {
            scale,
            offset_x: ((px_w as f64 - world_w * scale) / 2.0).floor(),
            offset_y: ((px_h as f64 - world_h * scale) / 2.0).floor(),
        }
    }

    /// World coordinates under the center of terminal pixel (`px`, `py`).
    /// Points in the bars map outside the world.
    pub fn to_world(&self, px: f64, py: f64) -> (f64, f64) {
        (
            (px + 0.5 - self.offset_x) / self.scale,
            (py + 0.5 - self.offset_y) / self.scale,
        )
    }
}

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(cols: u16, rows: u16) -> Self {
        let (w, h) = (cols as usize, rows as usize * 2);
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.w = cols as usize;
        self.h = rows as usize * 2;
        self.px.clear();
        self.px.resize(self.w * self.h, LETTERBOX);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Nearest-neighbor sample of `canvas` through `viewport`.
    pub fn sample(&mut self, canvas: &Bitmap, viewport: &Viewport) {
        for y in 0..self.h {
            for x in 0..self.w {
                let (wx, wy) = viewport.to_world(x as f64, y as f64);
                let inside = wx >= 0.0
                    && wy >= 0.0
                    && (wx as usize) < canvas.width()
                    && (wy as usize) < canvas.height();
                let c = if inside {
                    canvas.get(wx as usize, wy as usize).unwrap_or(LETTERBOX)
                } else {
                    LETTERBOX
                };
                self.px[y * self.w + x] = c;
            }
        }
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = None;
        let mut prev_bg = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(color(bot)))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(color(top)))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn color(c: Rgb) -> CColor {
    CColor::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Owns the world canvas and the terminal buffer it is sampled into.
pub struct Renderer {
    canvas: Bitmap,
    buf: PixelBuf,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(world_w: usize, world_h: usize, cols: u16, rows: u16) -> Self {
        let buf = PixelBuf::new(cols, rows);
        let viewport = Viewport::fit(world_w as f64, world_h as f64, buf.width(), buf.height());
        Self {
            canvas: Bitmap::new(world_w, world_h),
            buf,
            viewport,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.buf.resize(cols, rows);
        self.viewport = Viewport::fit(
            self.canvas.width() as f64,
            self.canvas.height() as f64,
            self.buf.width(),
            self.buf.height(),
        );
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn draw(&mut self, game: &Game) {
        compose(&mut self.canvas, game);
    }

    pub fn present(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.buf.sample(&self.canvas, &self.viewport);
        self.buf.render(out)
    }
}

/// Draws one frame of `game` at world resolution.
pub fn compose(canvas: &mut Bitmap, game: &Game) {
    let sprites = game.sprites();
    let cx = canvas.width() as f64 / 2.0;

    let background = match game.background() {
        Background::Day => &sprites.background_day,
        Background::Night => &sprites.background_night,
    };
    canvas.clear(LETTERBOX);
    canvas.blit(background, 0, 0);

    let ground = game.ground().rect();

    if game.mode() == Mode::StartScreen {
        canvas.blit(&sprites.ground.bitmap, ground.x, ground.y);
        blit_centered(canvas, &sprites.title, Vec2::new(cx, TITLE_Y));
        let avatar = game.avatar();
        blit_centered(canvas, &sprites.avatar(avatar.pose()).bitmap, avatar.center());
        let button = game.play_button();
        let face = if button.hovered {
            &sprites.play_button_hover
        } else {
            &sprites.play_button
        };
        canvas.blit(face, button.rect.x, button.rect.y);
        return;
    }

    for obstacle in game.obstacles() {
        let r = obstacle.rect();
        let sprite = match obstacle.variant {
            PipeVariant::Top => &sprites.pipe_top,
            PipeVariant::Bottom => &sprites.pipe_bottom,
        };
        canvas.blit(&sprite.bitmap, r.x, r.y);
    }

    let avatar_rect = game.avatar_rect();
    let bird = sprites.avatar(game.avatar().pose());
    canvas.blit(&bird.bitmap, avatar_rect.x, avatar_rect.y);

    canvas.blit(&sprites.ground.bitmap, ground.x, ground.y);

    font::draw_text_centered(canvas, cx as i32, SCORE_Y, &game.score().to_string(), SCORE_SCALE, WHITE);

    if game.mode() == Mode::GameOver {
        blit_centered(canvas, &sprites.game_over, Vec2::new(cx, TITLE_Y));
        font::draw_text_centered(
            canvas,
            cx as i32,
            GAME_OVER_TEXT_Y,
            "PRESS P TO PLAY AGAIN",
            GAME_OVER_TEXT_SCALE,
            WHITE,
        );
    }

    if game.config().debug {
        canvas.outline_rect(avatar_rect, DEBUG_AVATAR);
        for obstacle in game.obstacles() {
            canvas.outline_rect(obstacle.rect(), DEBUG_OBSTACLE);
        }
    }
}

fn blit_centered(canvas: &mut Bitmap, bmp: &Bitmap, center: Vec2) {
    let r = Rect::centered(center, bmp.width() as i32, bmp.height() as i32);
    canvas.blit(bmp, r.x, r.y);
}
