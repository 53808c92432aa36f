//! Per-pixel collision silhouettes.

use crate::bitmap::Bitmap;

/// Opacity silhouette of a sprite: one flag per pixel, set where the sprite
/// is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_bitmap(bitmap: &Bitmap) -> Self {
        let (width, height) = (bitmap.width(), bitmap.height());
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(bitmap.get(x, y).is_some());
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when any set pixel of `self` coincides with a set pixel of
    /// `other`, where `other`'s top-left corner sits at (`dx`, `dy`) relative
    /// to `self`'s.
    pub fn overlaps(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + other.width as i32).min(self.width as i32);
        let y1 = (dy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        (y0..y1).any(|y| {
            (x0..x1).any(|x| {
                self.get(x as usize, y as usize) && other.get((x - dx) as usize, (y - dy) as usize)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Rgb;

    const C: Rgb = Rgb(9, 9, 9);

    fn dot(w: usize, h: usize, x: i32, y: i32) -> Mask {
        let mut bmp = Bitmap::new(w, h);
        bmp.set(x, y, C);
        Mask::from_bitmap(&bmp)
    }

    #[test]
    fn overlap_requires_coinciding_opaque_pixels() {
        let a = dot(4, 4, 3, 3);
        let b = dot(4, 4, 0, 0);
        assert!(a.overlaps(&b, 3, 3));
        assert!(!a.overlaps(&b, 2, 2));
        assert!(b.overlaps(&a, -3, -3));
    }

    #[test]
    fn bounding_boxes_overlapping_on_transparent_pixels_do_not_collide() {
        let a = dot(10, 10, 0, 0);
        let b = Mask::from_bitmap(&Bitmap::filled(5, 5, C));
        assert!(!a.overlaps(&b, 2, 2));
        assert!(a.overlaps(&b, 0, 0));
    }

    #[test]
    fn disjoint_offsets_never_overlap() {
        let a = Mask::from_bitmap(&Bitmap::filled(3, 3, C));
        assert!(!a.overlaps(&a, 3, 0));
        assert!(!a.overlaps(&a, -3, 0));
        assert!(!a.overlaps(&a, 0, 10));
    }

    #[test]
    fn count_reports_opaque_pixels() {
        assert_eq!(Mask::from_bitmap(&Bitmap::filled(3, 2, C)).count(), 6);
        assert_eq!(dot(3, 3, 1, 1).count(), 1);
    }
}
