//! 3x5 bitmap font for the score overlay and banners.

use crate::bitmap::{Bitmap, Rgb};

const SHADOW: Rgb = Rgb(30, 30, 30);

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // M
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 1,1,0, 0,1,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,1,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[ch as usize - 'A' as usize]),
        'a'..='z' => Some(&LETTERS[ch as usize - 'a' as usize]),
        _ => None,
    }
}

fn draw_glyph(buf: &mut Bitmap, x: i32, y: i32, g: &[u8; 15], scale: i32, fg: Rgb) {
    for row in 0..GLYPH_H {
        for col in 0..GLYPH_W {
            if g[(row * GLYPH_W + col) as usize] == 1 {
                buf.fill_rect(x + col * scale, y + row * scale, scale, scale, fg);
            }
        }
    }
}

/// Width in pixels of `text` at `scale`: 3px glyphs with 1px spacing.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 4 - 1) * scale }
}

/// Draws `text` with its top edge at `y`, horizontally centered on `cx`.
/// Characters without a glyph render as blanks.
pub fn draw_text(buf: &mut Bitmap, cx: i32, y: i32, text: &str, scale: i32, fg: Rgb, shadow: bool) {
    let start_x = cx - text_width(text, scale) / 2;
    let offset = scale / 2 + 1;
    // Every shadow goes down before any glyph so neighbors never overdraw.
    if shadow {
        for (i, ch) in text.chars().enumerate() {
            if let Some(g) = glyph(ch) {
                let x = start_x + i as i32 * 4 * scale;
                draw_glyph(buf, x + offset, y + offset, g, scale, SHADOW);
            }
        }
    }
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, start_x + i as i32 * 4 * scale, y, g, scale, fg);
        }
    }
}

/// Draws `text` centered on (`cx`, `cy`).
pub fn draw_text_centered(buf: &mut Bitmap, cx: i32, cy: i32, text: &str, scale: i32, fg: Rgb) {
    draw_text(buf, cx, cy - GLYPH_H * scale / 2, text, scale, fg, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ascii_letter_and_digit_has_a_glyph() {
        for ch in ('0'..='9').chain('A'..='Z').chain('a'..='z') {
            assert!(glyph(ch).is_some(), "missing glyph for {ch}");
        }
        assert!(glyph(' ').is_none());
    }

    #[test]
    fn text_width_counts_spacing() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("7", 1), 3);
        assert_eq!(text_width("10", 6), 42);
    }

    #[test]
    fn draws_one_into_center() {
        let mut buf = Bitmap::new(9, 5);
        draw_text(&mut buf, 4, 0, "1", 1, Rgb(255, 255, 255), false);
        // The stem of '1' is the middle column of the glyph.
        assert_eq!(buf.get(4, 2), Some(Rgb(255, 255, 255)));
        assert_eq!(buf.get(0, 2), None);
    }
}
