//! The sprite atlas: one sheet addressed by fixed regions.
//!
//! A PNG sheet can be supplied; otherwise the sheet is painted at startup from
//! built-in pixel art laid out in the same regions.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitmap::{Bitmap, Rgb};
use crate::error::AssetError;
use crate::font;

// ── Palette ─────────────────────────────────────────────────────────────────

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const NIGHT_TOP: Rgb = Rgb(18, 28, 66);
const NIGHT_BOT: Rgb = Rgb(58, 84, 140);
const STAR: Rgb = Rgb(235, 235, 200);
const CLOUD: Rgb = Rgb(236, 248, 250);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const EDGE: Rgb = Rgb(90, 70, 40);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const OUTLINE: Rgb = Rgb(52, 40, 40);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const BANNER_ORANGE: Rgb = Rgb(240, 140, 40);
const BUTTON_FACE: Rgb = Rgb(250, 246, 236);

// ── Regions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Named sprites of the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    BackgroundDay,
    BackgroundNight,
    Base,
    Bird1,
    Bird2,
    Bird3,
    Pipe,
    Title,
    GameOver,
    PlayButton,
}

impl SpriteId {
    pub const ALL: [SpriteId; 10] = [
        SpriteId::BackgroundDay,
        SpriteId::BackgroundNight,
        SpriteId::Base,
        SpriteId::Bird1,
        SpriteId::Bird2,
        SpriteId::Bird3,
        SpriteId::Pipe,
        SpriteId::Title,
        SpriteId::GameOver,
        SpriteId::PlayButton,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpriteId::BackgroundDay => "background-day",
            SpriteId::BackgroundNight => "background-night",
            SpriteId::Base => "base",
            SpriteId::Bird1 => "bird-1",
            SpriteId::Bird2 => "bird-2",
            SpriteId::Bird3 => "bird-3",
            SpriteId::Pipe => "pipe",
            SpriteId::Title => "title",
            SpriteId::GameOver => "game-over",
            SpriteId::PlayButton => "play-button",
        }
    }

    pub fn region(self) -> Region {
        let (x, y, w, h) = match self {
            SpriteId::BackgroundDay => (0, 0, 144, 256),
            SpriteId::BackgroundNight => (146, 0, 144, 256),
            SpriteId::Base => (292, 0, 168, 56),
            SpriteId::Bird1 => (31, 491, 17, 12),
            SpriteId::Bird2 => (59, 491, 17, 12),
            SpriteId::Bird3 => (3, 491, 17, 12),
            SpriteId::Pipe => (56, 323, 26, 160),
            SpriteId::Title => (351, 91, 89, 24),
            SpriteId::GameOver => (395, 59, 96, 21),
            SpriteId::PlayButton => (354, 118, 52, 29),
        };
        Region { x, y, w, h }
    }
}

// ── Atlas ───────────────────────────────────────────────────────────────────

pub struct Atlas {
    sheet: Bitmap,
}

impl Atlas {
    pub const WIDTH: usize = 512;
    pub const HEIGHT: usize = 512;

    /// Loads the sheet at `path`, or paints the built-in one.
    pub fn load(path: Option<&Path>) -> Result<Self, AssetError> {
        match path {
            Some(path) => Self::from_png(path),
            None => Self::procedural(),
        }
    }

    /// Pixels with alpha below one half become transparent.
    pub fn from_png(path: &Path) -> Result<Self, AssetError> {
        let img = image::open(path)
            .map_err(|source| AssetError::AtlasLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let mut sheet = Bitmap::new(img.width() as usize, img.height() as usize);
        for (x, y, px) in img.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            if a >= 128 {
                sheet.set(x as i32, y as i32, Rgb(r, g, b));
            }
        }
        Ok(Self { sheet })
    }

    pub fn procedural() -> Result<Self, AssetError> {
        let mut sheet = Bitmap::new(Self::WIDTH, Self::HEIGHT);
        for id in SpriteId::ALL {
            let art = match id {
                SpriteId::BackgroundDay => paint_background(false),
                SpriteId::BackgroundNight => paint_background(true),
                SpriteId::Base => paint_base(),
                SpriteId::Bird1 => paint_bird(id, 2)?,
                SpriteId::Bird2 => paint_bird(id, 4)?,
                SpriteId::Bird3 => paint_bird(id, 6)?,
                SpriteId::Pipe => paint_pipe(),
                SpriteId::Title => paint_banner(id, "FLAPPY BIRD", BIRD_Y),
                SpriteId::GameOver => paint_banner(id, "GAME OVER", BANNER_ORANGE),
                SpriteId::PlayButton => paint_play_button(),
            };
            let r = id.region();
            sheet.blit(&art, r.x as i32, r.y as i32);
        }
        Ok(Self { sheet })
    }

    /// Crops `id`'s region with the black color key applied.
    pub fn sprite(&self, id: SpriteId) -> Result<Bitmap, AssetError> {
        let r = id.region();
        let (atlas_w, atlas_h) = (self.sheet.width() as u32, self.sheet.height() as u32);
        if r.x + r.w > atlas_w || r.y + r.h > atlas_h {
            return Err(AssetError::RegionOutOfBounds {
                sprite: id.name(),
                x: r.x,
                y: r.y,
                w: r.w,
                h: r.h,
                atlas_w,
                atlas_h,
            });
        }
        let bmp = self
            .sheet
            .crop_keyed(r.x as usize, r.y as usize, r.w as usize, r.h as usize);
        if bmp.opaque_count() == 0 {
            return Err(AssetError::EmptySprite(id.name()));
        }
        Ok(bmp)
    }
}

// ── Built-in art ────────────────────────────────────────────────────────────

fn canvas(id: SpriteId) -> Bitmap {
    let r = id.region();
    Bitmap::new(r.w as usize, r.h as usize)
}

/// Fixed so the built-in sky is identical on every run.
const STAR_SEED: u64 = 0x5747;

fn paint_background(night: bool) -> Bitmap {
    let id = if night {
        SpriteId::BackgroundNight
    } else {
        SpriteId::BackgroundDay
    };
    let mut bmp = canvas(id);
    let (w, h) = (bmp.width() as i32, bmp.height() as i32);
    let (top, bot) = if night {
        (NIGHT_TOP, NIGHT_BOT)
    } else {
        (SKY_TOP, SKY_BOT)
    };
    for y in 0..h {
        let c = Rgb::lerp(top, bot, (y * 256 / h) as u16);
        bmp.fill_rect(0, y, w, 1, c);
    }

    if night {
        let mut rng = StdRng::seed_from_u64(STAR_SEED);
        for _ in 0..40 {
            let x = rng.random_range(0..w);
            let y = rng.random_range(0..150);
            bmp.set(x, y, STAR);
        }
    } else {
        for (cx, cy, r) in [(20, 170, 14), (52, 176, 11), (88, 168, 16), (126, 174, 12)] {
            for y in -r..=r {
                for x in -r * 2..=r * 2 {
                    if x * x + 4 * y * y <= 4 * r * r {
                        bmp.set(cx + x, cy + y, CLOUD);
                    }
                }
            }
        }
    }

    let (far, near) = if night {
        (HILL_FAR.scale(1, 2), HILL_NEAR.scale(1, 2))
    } else {
        (HILL_FAR, HILL_NEAR)
    };
    let base = 226;
    for x in 0..w {
        let fx = x as f64 * 0.08;
        let hgt = fx.sin() * 6.0 + (fx * 1.7).sin() * 3.0 + 14.0;
        for y in (base - hgt as i32)..h {
            bmp.set(x, y, far);
        }
    }
    for x in 0..w {
        let fx = x as f64 * 0.12 + 1.3;
        let hgt = fx.sin() * 4.0 + (fx * 2.3).sin() * 2.0 + 7.0;
        for y in (base - hgt as i32)..h {
            bmp.set(x, y, near);
        }
    }
    bmp
}

/// Stripes repeat every 12px so the sheet tiles at half its width.
fn paint_base() -> Bitmap {
    let mut bmp = canvas(SpriteId::Base);
    let (w, h) = (bmp.width() as i32, bmp.height() as i32);
    for x in 0..w {
        bmp.set(x, 0, EDGE);
        let alt = (x / 3) % 2 == 0;
        for y in 1..4 {
            bmp.set(x, y, if alt { GRASS } else { GRASS_LIGHT });
        }
        bmp.set(x, 4, GRASS);
        bmp.set(x, 5, EDGE);
    }
    for y in 6..h {
        for x in 0..w {
            let stripe = (x + (y - 6) * 2) % 12 < 6;
            bmp.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
    bmp
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// Opening faces down: the cap sits on the bottom rows.
fn paint_pipe() -> Bitmap {
    const CAP_H: i32 = 12;
    let mut bmp = canvas(SpriteId::Pipe);
    let (w, h) = (bmp.width() as i32, bmp.height() as i32);
    for x in 1..w - 1 {
        let c = pipe_shade(x - 1, w - 2);
        for y in 0..h - CAP_H {
            bmp.set(x, y, c);
        }
    }
    for x in 0..w {
        let c = pipe_shade(x, w);
        for y in h - CAP_H..h {
            bmp.set(x, y, c);
        }
        bmp.set(x, h - CAP_H, CAP_DARK);
        bmp.set(x, h - 1, CAP_DARK);
    }
    bmp
}

#[rustfmt::skip]
const BIRD_BODY: [&str; 12] = [
    "......kkkkkk.....",
    "....kkhhhykwwk...",
    "...khhyyykwwwwk..",
    "..kyyyyyykwwwpwk.",
    ".kyyyyyyykwwwpwk.",
    "kyyyyyyyyykwwwwk.",
    "kyyyyyyyyyykkkkkk",
    "kyyyyyyyyykoooooo",
    ".kyyyyyyykrkkkkkk",
    "..kyyyyyyykrrrrk.",
    "...kkyyyyyykkkk..",
    ".....kkkkkk......",
];

#[rustfmt::skip]
const BIRD_WING_ART: [&str; 4] = [
    "kkkkk.",
    "kggggk",
    "kggggk",
    ".kkkk.",
];

fn bird_color(ch: char) -> Option<Rgb> {
    match ch {
        'k' => Some(OUTLINE),
        'y' => Some(BIRD_Y),
        'h' => Some(BIRD_HI),
        'g' => Some(BIRD_WING),
        'w' => Some(BIRD_EYE),
        'p' => Some(BIRD_PUPIL),
        'o' => Some(BIRD_BEAK_HI),
        'r' => Some(BIRD_BEAK),
        _ => None,
    }
}

fn paint_art(
    bmp: &mut Bitmap,
    sprite: SpriteId,
    art: &[&str],
    ox: i32,
    oy: i32,
) -> Result<(), AssetError> {
    let expected = art.first().map_or(0, |row| row.chars().count());
    for (y, row) in art.iter().enumerate() {
        let len = row.chars().count();
        if len != expected {
            return Err(AssetError::MalformedArt {
                sprite: sprite.name(),
                row: y,
                len,
                expected,
            });
        }
        for (x, ch) in row.chars().enumerate() {
            if let Some(c) = bird_color(ch) {
                bmp.set(ox + x as i32, oy + y as i32, c);
            }
        }
    }
    Ok(())
}

/// The three frames differ only in where the wing sits.
fn paint_bird(id: SpriteId, wing_y: i32) -> Result<Bitmap, AssetError> {
    let mut bmp = canvas(id);
    let r = id.region();
    if BIRD_BODY.len() != r.h as usize {
        return Err(AssetError::MalformedArt {
            sprite: id.name(),
            row: BIRD_BODY.len(),
            len: BIRD_BODY.len(),
            expected: r.h as usize,
        });
    }
    paint_art(&mut bmp, id, &BIRD_BODY, 0, 0)?;
    paint_art(&mut bmp, id, &BIRD_WING_ART, 0, wing_y)?;
    Ok(bmp)
}

fn paint_banner(id: SpriteId, text: &str, fg: Rgb) -> Bitmap {
    let mut bmp = canvas(id);
    let (w, h) = (bmp.width() as i32, bmp.height() as i32);
    font::draw_text_centered(&mut bmp, w / 2 - 1, h / 2 - 1, text, 2, fg);
    bmp
}

fn paint_play_button() -> Bitmap {
    let mut bmp = canvas(SpriteId::PlayButton);
    let (w, h) = (bmp.width() as i32, bmp.height() as i32);
    bmp.fill_rect(1, 0, w - 2, h, OUTLINE);
    bmp.fill_rect(0, 1, w, h - 2, OUTLINE);
    bmp.fill_rect(2, 2, w - 4, h - 5, BUTTON_FACE);
    bmp.fill_rect(2, h - 3, w - 4, 1, DIRT_DARK);
    let cy = (h - 2) / 2;
    for c in 0..7 {
        let half = 6 - c;
        for y in (cy - half)..=(cy + half) {
            bmp.set(w / 2 - 3 + c, y, GRASS);
        }
    }
    bmp
}
