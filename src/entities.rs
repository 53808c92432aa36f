//! The moving things: avatar, ground and obstacles, with their per-frame
//! update rules. Each entity owns its position; collision geometry comes from
//! the sprite bank.

use crate::config::{AvatarConfig, GroundConfig, ObstacleConfig};
use crate::geometry::{Rect, Vec2};
use crate::sprites::{BIRD_FRAMES, Pose};

// ── Avatar ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Avatar {
    /// Top-left corner of the unrotated frame.
    pub pos: Vec2,
    /// Vertical velocity, positive is downward.
    pub velocity: f64,
    /// Tilt in degrees, counter-clockwise.
    pub rotation: f64,
    /// Fractional animation frame in `0..BIRD_FRAMES`.
    pub frame: f64,
    pub is_gravity: bool,
    pub is_jump: bool,
    pub is_animate: bool,
    pub is_rotate: bool,
    size: (f64, f64),
    tuning: AvatarConfig,
}

impl Avatar {
    /// Places the avatar so its center sits at the configured start.
    pub fn new(tuning: &AvatarConfig, size: (usize, usize)) -> Self {
        let size = (size.0 as f64, size.1 as f64);
        Self {
            pos: Vec2::new(tuning.start_x - size.0 / 2.0, tuning.start_y - size.1 / 2.0),
            velocity: tuning.initial_velocity,
            rotation: 0.0,
            frame: 0.0,
            is_gravity: true,
            is_jump: true,
            is_animate: true,
            is_rotate: true,
            size,
            tuning: *tuning,
        }
    }

    /// A motionless avatar centered on `center`, used by the start screen.
    pub fn resting_at(tuning: &AvatarConfig, size: (usize, usize), center: Vec2) -> Self {
        let mut avatar = Self::new(tuning, size);
        avatar.pos = Vec2::new(center.x - avatar.size.0 / 2.0, center.y - avatar.size.1 / 2.0);
        avatar.velocity = 0.0;
        avatar
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.0 / 2.0, self.pos.y + self.size.1 / 2.0)
    }

    pub fn pose(&self) -> Pose {
        Pose {
            frame: self.frame as usize % BIRD_FRAMES,
            rotation: self.rotation,
        }
    }

    /// True once every behavior has been switched off by collisions.
    pub fn is_frozen(&self) -> bool {
        !(self.is_gravity || self.is_jump || self.is_animate || self.is_rotate)
    }

    pub fn update(&mut self, dt: f64) {
        if self.is_gravity {
            self.velocity += self.tuning.acceleration * dt;
            self.pos.y += self.velocity * dt;
            // Only the position is held at the ceiling; velocity keeps
            // whatever the jump gave it.
            if self.pos.y < 0.0 {
                self.pos.y = 0.0;
            }
        }
        if self.is_animate {
            // Advances per call, not per second, so flap rate follows the
            // frame rate.
            self.frame += self.tuning.frame_step;
            if self.frame as usize >= BIRD_FRAMES {
                self.frame = 0.0;
            }
        }
        if self.is_rotate {
            self.rotation -= (self.tuning.rotation_speed * dt) % 360.0;
        }
    }

    /// Instant upward impulse. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.is_jump {
            return false;
        }
        self.velocity = -self.tuning.jump_velocity;
        self.rotation = self.tuning.jump_rotation;
        true
    }

    /// Ground contact stops the fall but leaves the jump enabled.
    pub fn on_ground_hit(&mut self) {
        self.is_gravity = false;
        self.is_animate = false;
        self.is_rotate = false;
    }

    /// Obstacle contact disables control; gravity keeps pulling.
    pub fn on_obstacle_hit(&mut self) {
        self.is_jump = false;
        self.is_animate = false;
        self.is_rotate = false;
    }
}

// ── Ground ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Ground {
    /// Horizontal scroll offset, in `(-screen_width, 0]`.
    pub offset: f64,
    top: f64,
    width: f64,
    height: f64,
    screen_width: f64,
    scroll_speed: f64,
}

impl Ground {
    /// A `2 * screen_width` wide strip resting on the bottom of the screen.
    pub fn new(tuning: &GroundConfig, screen_width: f64, screen_height: f64) -> Self {
        Self {
            offset: 0.0,
            top: screen_height - tuning.height as f64,
            width: screen_width * 2.0,
            height: tuning.height as f64,
            screen_width,
            scroll_speed: tuning.scroll_speed,
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.offset -= self.scroll_speed * dt;
        if self.offset.round() < -self.screen_width {
            self.offset = 0.0;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.offset.round() as i32,
            self.top as i32,
            self.width as i32,
            self.height as i32,
        )
    }
}

// ── Obstacles ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeVariant {
    /// Hangs from above; its bottom edge is the top of the gap.
    Top,
    /// Rises from below; its top edge is the bottom of the gap.
    Bottom,
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub variant: PipeVariant,
    pub pos: Vec2,
    /// Vertical center of the opening this pipe borders.
    pub gap_center: f64,
    pub gap: f64,
    pub removed: bool,
    width: f64,
    height: f64,
    speed: f64,
}

impl Obstacle {
    /// Both halves of a pair entering at `x`, sharing one gap center.
    pub fn pair(tuning: &ObstacleConfig, x: f64, gap_center: f64, size: (usize, usize)) -> [Obstacle; 2] {
        [
            Self::new(PipeVariant::Top, tuning, x, gap_center, size),
            Self::new(PipeVariant::Bottom, tuning, x, gap_center, size),
        ]
    }

    fn new(variant: PipeVariant, tuning: &ObstacleConfig, x: f64, gap_center: f64, size: (usize, usize)) -> Self {
        let (width, height) = (size.0 as f64, size.1 as f64);
        let half_gap = (tuning.gap / 2.0).trunc();
        let y = match variant {
            PipeVariant::Top => gap_center - half_gap - height,
            PipeVariant::Bottom => gap_center + half_gap,
        };
        Self {
            variant,
            pos: Vec2::new(x, y),
            gap_center,
            gap: tuning.gap,
            removed: false,
            width,
            height,
            speed: tuning.speed,
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.pos.x -= self.speed * dt;
        if self.rect().right() < 0 {
            self.removed = true;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x.round() as i32,
            self.pos.y.round() as i32,
            self.width as i32,
            self.height as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIRD: (usize, usize) = (34, 24);
    const PIPE: (usize, usize) = (52, 320);

    fn avatar() -> Avatar {
        Avatar::new(&AvatarConfig::default(), BIRD)
    }

    #[test]
    fn avatar_starts_centered_on_configured_point() {
        let a = avatar();
        let c = a.center();
        assert!((c.x - 100.0).abs() < 1e-9);
        assert!((c.y - 560.0 / 3.0).abs() < 1e-9);
        assert!((a.velocity - 100.0).abs() < 1e-9);
    }

    #[test]
    fn falls_strictly_without_input() {
        let mut a = avatar();
        let mut last = a.pos.y;
        for _ in 0..60 {
            a.update(1.0 / 60.0);
            assert!(a.pos.y > last);
            last = a.pos.y;
        }
    }

    #[test]
    fn never_rises_above_the_screen() {
        let mut a = avatar();
        for i in 0..400 {
            if i % 3 == 0 {
                a.jump();
            }
            a.update(0.05);
            assert!(a.pos.y >= 0.0);
        }
    }

    #[test]
    fn ceiling_clamps_position_but_not_velocity() {
        let mut a = avatar();
        a.pos.y = 1.0;
        a.jump();
        a.update(0.1);
        assert_eq!(a.pos.y, 0.0);
        assert!(a.velocity < 0.0);
    }

    #[test]
    fn jump_is_an_instant_impulse() {
        let mut a = avatar();
        a.velocity = 250.0;
        assert!(a.jump());
        a.update(0.0);
        assert_eq!(a.velocity, -350.0);
        assert_eq!(a.rotation, 18.0);
    }

    #[test]
    fn jump_disabled_after_obstacle_hit() {
        let mut a = avatar();
        a.on_obstacle_hit();
        let before = a.velocity;
        assert!(!a.jump());
        assert_eq!(a.velocity, before);
    }

    #[test]
    fn ground_hit_stops_motion_but_keeps_jump() {
        let mut a = avatar();
        a.frame = 1.5;
        a.rotation = 10.0;
        a.on_ground_hit();
        let (y, frame, rotation) = (a.pos.y, a.frame, a.rotation);
        a.update(0.5);
        assert_eq!((a.pos.y, a.frame, a.rotation), (y, frame, rotation));
        assert!(a.is_jump);
        assert!(!a.is_frozen());
    }

    #[test]
    fn obstacle_hit_keeps_gravity() {
        let mut a = avatar();
        a.on_obstacle_hit();
        let y = a.pos.y;
        let frame = a.frame;
        a.update(0.1);
        assert!(a.pos.y > y);
        assert_eq!(a.frame, frame);
    }

    #[test]
    fn both_hits_freeze_everything() {
        let mut a = avatar();
        a.on_ground_hit();
        a.on_obstacle_hit();
        assert!(a.is_frozen());
    }

    #[test]
    fn animation_cycles_through_three_frames_per_call() {
        let mut a = avatar();
        let mut seen = Vec::new();
        for _ in 0..40 {
            // dt does not affect animation.
            a.update(0.0);
            let f = a.pose().frame;
            if seen.last() != Some(&f) {
                seen.push(f);
            }
        }
        assert_eq!(&seen[..4], &[0, 1, 2, 0]);
    }

    #[test]
    fn rotation_decays_with_time() {
        let mut a = avatar();
        a.jump();
        a.update(0.5);
        assert!((a.rotation - (18.0 - 30.0)).abs() < 1e-9);
    }

    #[test]
    fn ground_wraps_after_one_screen_width() {
        let mut g = Ground::new(&GroundConfig::default(), 380.0, 560.0);
        assert_eq!(g.rect(), Rect::new(0, 480, 760, 80));
        g.update(3.8);
        assert!((g.offset + 380.0).abs() < 1e-9);
        g.update(0.02);
        assert_eq!(g.offset, 0.0);
    }

    #[test]
    fn pair_shares_gap_center_and_keeps_gap_width() {
        let tuning = ObstacleConfig::default();
        let [top, bottom] = Obstacle::pair(&tuning, 380.0, 250.0, PIPE);
        assert_eq!(top.variant, PipeVariant::Top);
        assert_eq!(bottom.variant, PipeVariant::Bottom);
        assert_eq!(top.gap_center, bottom.gap_center);
        assert_eq!(bottom.rect().y - top.rect().bottom(), 150);
        assert_eq!(top.rect().bottom(), 175);
        assert_eq!(top.rect().x, 380);
    }

    #[test]
    fn obstacle_is_removed_once_fully_off_screen() {
        let tuning = ObstacleConfig::default();
        let [mut top, _] = Obstacle::pair(&tuning, 0.0, 280.0, PIPE);
        top.update(0.5);
        assert!(!top.removed);
        top.update(0.03);
        assert!(top.removed);
    }
}
