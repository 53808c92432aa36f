//! Logical sprites and their collision silhouettes.
//!
//! Everything here is built once from the atlas at startup. The avatar is the
//! only sprite whose shape changes; its rotated frames are memoized per pose.

pub mod atlas;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::bitmap::{Bitmap, Rgb};
use crate::config::GameConfig;
use crate::error::AssetError;
use crate::mask::Mask;

pub use atlas::{Atlas, Region, SpriteId};

/// A bitmap together with the silhouette used to collide it.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub bitmap: Bitmap,
    pub mask: Mask,
}

impl Sprite {
    pub fn new(bitmap: Bitmap) -> Self {
        let mask = Mask::from_bitmap(&bitmap);
        Self { bitmap, mask }
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }

    pub fn height(&self) -> usize {
        self.bitmap.height()
    }
}

/// What the avatar looks like this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub frame: usize,
    /// Degrees, counter-clockwise; any value, wrapped when looked up.
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PoseKey {
    frame: usize,
    degrees: i32,
}

impl From<Pose> for PoseKey {
    fn from(pose: Pose) -> Self {
        Self {
            frame: pose.frame,
            degrees: (pose.rotation.round() as i64).rem_euclid(360) as i32,
        }
    }
}

pub const BIRD_FRAMES: usize = 3;

pub struct SpriteBank {
    bird_frames: [Bitmap; BIRD_FRAMES],
    poses: RefCell<HashMap<PoseKey, Rc<Sprite>>>,
    pub pipe_top: Sprite,
    pub pipe_bottom: Sprite,
    pub ground: Sprite,
    pub background_day: Bitmap,
    pub background_night: Bitmap,
    pub title: Bitmap,
    pub game_over: Bitmap,
    pub play_button: Bitmap,
    pub play_button_hover: Bitmap,
}

impl SpriteBank {
    pub fn new(atlas: &Atlas, config: &GameConfig) -> Result<Self, AssetError> {
        let scale = config.screen.sprite_scale as usize;
        let (w, h) = (config.screen.width as usize, config.screen.height as usize);

        let bird_frames = [
            atlas.sprite(SpriteId::Bird1)?.scale_by(scale),
            atlas.sprite(SpriteId::Bird2)?.scale_by(scale),
            atlas.sprite(SpriteId::Bird3)?.scale_by(scale),
        ];
        let pipe = atlas.sprite(SpriteId::Pipe)?.scale_by(scale);
        let ground = atlas
            .sprite(SpriteId::Base)?
            .scale_nearest(w * 2, config.ground.height as usize);
        let play_button = atlas.sprite(SpriteId::PlayButton)?.scale_by(scale);
        let play_button_hover = play_button.map(|c| Rgb::lerp(c, Rgb(255, 255, 255), 72));

        Ok(Self {
            bird_frames,
            poses: RefCell::new(HashMap::new()),
            pipe_bottom: Sprite::new(pipe.flip_vertical()),
            pipe_top: Sprite::new(pipe),
            ground: Sprite::new(ground),
            background_day: atlas.sprite(SpriteId::BackgroundDay)?.scale_nearest(w, h),
            background_night: atlas.sprite(SpriteId::BackgroundNight)?.scale_nearest(w, h),
            title: atlas.sprite(SpriteId::Title)?.scale_by(scale),
            game_over: atlas.sprite(SpriteId::GameOver)?.scale_by(scale),
            play_button,
            play_button_hover,
        })
    }

    /// Unrotated size of an avatar frame.
    pub fn bird_size(&self) -> (usize, usize) {
        (self.bird_frames[0].width(), self.bird_frames[0].height())
    }

    /// The avatar's bitmap and silhouette for `pose`, rotated to the nearest
    /// whole degree.
    pub fn avatar(&self, pose: Pose) -> Rc<Sprite> {
        let key = PoseKey::from(Pose {
            frame: pose.frame % BIRD_FRAMES,
            ..pose
        });
        let mut poses = self.poses.borrow_mut();
        poses
            .entry(key)
            .or_insert_with(|| {
                let frame = &self.bird_frames[key.frame];
                Rc::new(Sprite::new(frame.rotate(key.degrees as f64)))
            })
            .clone()
    }

    pub fn cached_poses(&self) -> usize {
        self.poses.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> SpriteBank {
        SpriteBank::new(&Atlas::procedural().unwrap(), &GameConfig::default()).unwrap()
    }

    #[test]
    fn sprites_are_scaled_to_logical_size() {
        let bank = bank();
        assert_eq!(bank.bird_size(), (34, 24));
        assert_eq!((bank.pipe_top.width(), bank.pipe_top.height()), (52, 320));
        assert_eq!((bank.ground.width(), bank.ground.height()), (760, 80));
        assert_eq!(bank.background_day.width(), 380);
        assert_eq!(bank.background_night.height(), 560);
        assert_eq!(bank.play_button.width(), 104);
    }

    #[test]
    fn bottom_pipe_is_the_top_pipe_flipped() {
        let bank = bank();
        assert_eq!(bank.pipe_bottom.bitmap, bank.pipe_top.bitmap.flip_vertical());
        assert_eq!(bank.pipe_bottom.mask.count(), bank.pipe_top.mask.count());
    }

    #[test]
    fn poses_are_memoized_by_whole_degree() {
        let bank = bank();
        let a = bank.avatar(Pose { frame: 1, rotation: 17.8 });
        let b = bank.avatar(Pose { frame: 1, rotation: 18.2 });
        assert!(Rc::ptr_eq(&a, &b));
        let c = bank.avatar(Pose { frame: 1, rotation: -342.0 });
        assert!(Rc::ptr_eq(&a, &c));
        assert_eq!(bank.cached_poses(), 1);
        bank.avatar(Pose { frame: 2, rotation: 18.0 });
        assert_eq!(bank.cached_poses(), 2);
    }

    #[test]
    fn rotated_pose_grows_its_silhouette_bounds() {
        let bank = bank();
        let flat = bank.avatar(Pose { frame: 0, rotation: 0.0 });
        let tilted = bank.avatar(Pose { frame: 0, rotation: 30.0 });
        assert_eq!((flat.width(), flat.height()), (34, 24));
        assert!(tilted.height() > flat.height());
        assert!(tilted.mask.count() > 0);
    }
}
