//! Color-keyed RGB bitmaps: sprite storage, the world canvas, and the pixel
//! transforms sprites go through (crop, nearest-neighbor scale, flip, rotate).

use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Color key of the sprite atlas: fully black atlas pixels are transparent.
    pub const KEY: Rgb = Rgb(0, 0, 0);

    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    pub const fn scale(self, num: u8, den: u8) -> Rgb {
        Rgb(
            (self.0 as u16 * num as u16 / den as u16) as u8,
            (self.1 as u16 * num as u16 / den as u16) as u8,
            (self.2 as u16 * num as u16 / den as u16) as u8,
        )
    }
}

/// A `width`×`height` grid of pixels where `None` is transparent.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    px: Vec<Option<Rgb>>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            px: vec![None; width * height],
        }
    }

    pub fn filled(width: usize, height: usize, c: Rgb) -> Self {
        Self {
            width,
            height,
            px: vec![Some(c); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.px[y * self.width + x]
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.px[y as usize * self.width + x as usize] = Some(c);
        }
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(Some(c));
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// One-pixel rectangle border, used by the debug overlay.
    pub fn outline_rect(&mut self, r: Rect, c: Rgb) {
        for x in r.x..r.right() {
            self.set(x, r.y, c);
            self.set(x, r.bottom() - 1, c);
        }
        for y in r.y..r.bottom() {
            self.set(r.x, y, c);
            self.set(r.right() - 1, y, c);
        }
    }

    /// Draws `src` with its top-left corner at (`x`, `y`), skipping
    /// transparent pixels.
    pub fn blit(&mut self, src: &Bitmap, x: i32, y: i32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                if let Some(c) = src.get(sx, sy) {
                    self.set(x + sx as i32, y + sy as i32, c);
                }
            }
        }
    }

    /// Copies a region, turning [`Rgb::KEY`] pixels transparent. Callers
    /// check the region against the bitmap bounds.
    pub fn crop_keyed(&self, x: usize, y: usize, w: usize, h: usize) -> Bitmap {
        let mut out = Bitmap::new(w, h);
        for dy in 0..h {
            for dx in 0..w {
                let c = self.get(x + dx, y + dy).filter(|&c| c != Rgb::KEY);
                out.px[dy * w + dx] = c;
            }
        }
        out
    }

    pub fn scale_nearest(&self, w: usize, h: usize) -> Bitmap {
        let mut out = Bitmap::new(w, h);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for dy in 0..h {
            let sy = dy * self.height / h;
            for dx in 0..w {
                let sx = dx * self.width / w;
                out.px[dy * w + dx] = self.get(sx, sy);
            }
        }
        out
    }

    pub fn scale_by(&self, factor: usize) -> Bitmap {
        self.scale_nearest(self.width * factor, self.height * factor)
    }

    pub fn flip_vertical(&self) -> Bitmap {
        let mut out = Bitmap::new(self.width, self.height);
        for y in 0..self.height {
            let src = (self.height - 1 - y) * self.width;
            out.px[y * self.width..(y + 1) * self.width]
                .copy_from_slice(&self.px[src..src + self.width]);
        }
        out
    }

    /// Rotates counter-clockwise by `degrees` about the center. The result
    /// grows to the rotated bounding box; uncovered corners are transparent.
    pub fn rotate(&self, degrees: f64) -> Bitmap {
        let turn = degrees.rem_euclid(360.0);
        if turn == 0.0 {
            return self.clone();
        }
        let (sin, cos) = turn.to_radians().sin_cos();
        let (w, h) = (self.width as f64, self.height as f64);
        let nw = ((w * cos.abs() + h * sin.abs()) - 1e-6).ceil().max(1.0) as usize;
        let nh = ((w * sin.abs() + h * cos.abs()) - 1e-6).ceil().max(1.0) as usize;
        let mut out = Bitmap::new(nw, nh);
        let (cx, cy) = (nw as f64 / 2.0, nh as f64 / 2.0);
        for dy in 0..nh {
            for dx in 0..nw {
                let vx = dx as f64 + 0.5 - cx;
                let vy = dy as f64 + 0.5 - cy;
                let sx = (vx * cos - vy * sin + w / 2.0).floor();
                let sy = (vx * sin + vy * cos + h / 2.0).floor();
                if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                    out.px[dy * nw + dx] = self.get(sx as usize, sy as usize);
                }
            }
        }
        out
    }

    /// Recolors every opaque pixel.
    pub fn map(&self, f: impl Fn(Rgb) -> Rgb) -> Bitmap {
        Bitmap {
            width: self.width,
            height: self.height,
            px: self.px.iter().map(|p| p.map(&f)).collect(),
        }
    }

    pub fn opaque_count(&self) -> usize {
        self.px.iter().filter(|p| p.is_some()).count()
    }
}
