//! Sprite and animated sprite drawables

use crate::assets::{AssetError, TextureCache, TextureHandle};
use crate::foundation::math::{Color, Rect, Vec2};
use std::collections::BTreeMap;
use std::path::Path;

/// A textured quad
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Texture sampled from
    pub texture: TextureHandle,
    /// Source rectangle in texels
    pub source: Rect,
    /// Drawn size in world units before scaling
    pub size: Vec2,
    /// Pivot relative to the sprite's top-left corner
    pub origin: Vec2,
    /// Color modulation
    pub tint: Color,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
    owns_texture: bool,
}

impl Sprite {
    /// Create a sprite showing the whole of `texture` at `size`, pivoted on its centre
    pub fn new(texture: TextureHandle, size: Vec2) -> Self {
        Self {
            texture,
            source: Rect::from_position_size(Vec2::zeros(), size),
            size,
            origin: size * 0.5,
            tint: Color::WHITE,
            flip_x: false,
            flip_y: false,
            owns_texture: false,
        }
    }

    /// Load `path` through the cache and size the sprite to the texture.
    ///
    /// The sprite holds the cache reference taken here; the scene drops it
    /// when the entity is destroyed.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_cache(cache: &mut TextureCache, path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let texture = cache.load(path)?;
        let info = cache
            .info(texture)
            .ok_or_else(|| AssetError::NotLoaded(path.display().to_string()))?;

        let mut sprite = Self::new(texture, Vec2::new(info.width as f32, info.height as f32));
        sprite.owns_texture = true;
        Ok(sprite)
    }

    /// Show only `source` out of the texture, sized to match
    #[must_use]
    pub fn with_source(mut self, source: Rect) -> Self {
        self.source = source;
        self.size = Vec2::new(source.width.abs(), source.height.abs());
        self.origin = self.size * 0.5;
        self
    }

    /// Set the pivot
    #[must_use]
    pub const fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Set the tint
    #[must_use]
    pub const fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Whether this sprite holds a texture cache reference
    pub const fn owns_texture(&self) -> bool {
        self.owns_texture
    }

    /// Source rectangle with flips applied as negative extents
    pub fn flipped_source(&self) -> Rect {
        flip(self.source, self.flip_x, self.flip_y)
    }

    /// World-space bounds when drawn at `position` with `scale`
    pub fn bounds(&self, position: Vec2, scale: Vec2) -> Rect {
        quad_bounds(position, self.size, self.origin, scale)
    }
}

/// One named frame sequence
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAnimation {
    /// Source rectangles, in playback order
    pub frames: Vec<Rect>,
    /// Seconds each frame stays on screen
    pub frame_duration: f32,
    /// Restart after the last frame instead of holding it
    pub looping: bool,
}

impl SpriteAnimation {
    /// Frames laid out left to right on one atlas row
    #[allow(clippy::cast_precision_loss)]
    pub fn from_strip(start: Vec2, frame_size: Vec2, count: usize, fps: f32, looping: bool) -> Self {
        let frames = (0..count)
            .map(|i| Rect::from_position_size(start + Vec2::new(frame_size.x * i as f32, 0.0), frame_size))
            .collect();
        Self {
            frames,
            frame_duration: if fps > 0.0 { 1.0 / fps } else { 0.0 },
            looping,
        }
    }
}

/// A sprite cycling through named animations
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    /// Texture sampled from
    pub texture: TextureHandle,
    /// Pivot relative to the frame's top-left corner; `None` centres it
    pub origin: Option<Vec2>,
    /// Color modulation
    pub tint: Color,
    /// Mirror horizontally
    pub flip_x: bool,
    /// Mirror vertically
    pub flip_y: bool,
    animations: BTreeMap<String, SpriteAnimation>,
    current: Option<String>,
    frame: usize,
    elapsed: f32,
    playing: bool,
}

impl AnimatedSprite {
    /// Create an animated sprite with no animations
    pub const fn new(texture: TextureHandle) -> Self {
        Self {
            texture,
            origin: None,
            tint: Color::WHITE,
            flip_x: false,
            flip_y: false,
            animations: BTreeMap::new(),
            current: None,
            frame: 0,
            elapsed: 0.0,
            playing: false,
        }
    }

    /// Register an animation under `name`, replacing any previous one
    pub fn add_animation(&mut self, name: impl Into<String>, animation: SpriteAnimation) {
        self.animations.insert(name.into(), animation);
    }

    /// Builder form of [`add_animation`](Self::add_animation)
    #[must_use]
    pub fn with_animation(mut self, name: impl Into<String>, animation: SpriteAnimation) -> Self {
        self.add_animation(name, animation);
        self
    }

    /// Start playing `name`.
    ///
    /// Switching animations restarts from the first frame; asking for the one
    /// already playing leaves it running. Returns false for unknown names.
    pub fn play(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            return false;
        }
        if self.current.as_deref() != Some(name) {
            self.current = Some(name.to_string());
            self.frame = 0;
            self.elapsed = 0.0;
        }
        self.playing = true;
        true
    }

    /// Freeze on the current frame
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Whether frames are advancing
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Name of the selected animation
    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Index of the displayed frame
    pub const fn current_frame(&self) -> usize {
        self.frame
    }

    /// Advance playback by `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) {
        if !self.playing {
            return;
        }
        let Some(animation) = self.current.as_ref().and_then(|name| self.animations.get(name)) else {
            return;
        };
        if animation.frame_duration <= 0.0 || animation.frames.is_empty() {
            return;
        }

        self.elapsed += delta_time;
        while self.elapsed >= animation.frame_duration {
            self.elapsed -= animation.frame_duration;
            if self.frame + 1 < animation.frames.len() {
                self.frame += 1;
            } else if animation.looping {
                self.frame = 0;
            } else {
                self.playing = false;
                self.elapsed = 0.0;
                break;
            }
        }
    }

    /// Source rectangle of the displayed frame, flips applied
    pub fn frame_source(&self) -> Option<Rect> {
        let animation = self.animations.get(self.current.as_ref()?)?;
        let rect = *animation.frames.get(self.frame)?;
        Some(flip(rect, self.flip_x, self.flip_y))
    }

    /// Size of the displayed frame
    pub fn frame_size(&self) -> Vec2 {
        self.frame_source()
            .map_or_else(Vec2::zeros, |rect| Vec2::new(rect.width.abs(), rect.height.abs()))
    }

    /// Pivot of the displayed frame
    pub fn frame_origin(&self) -> Vec2 {
        self.origin.unwrap_or_else(|| self.frame_size() * 0.5)
    }

    /// World-space bounds when drawn at `position` with `scale`
    pub fn bounds(&self, position: Vec2, scale: Vec2) -> Rect {
        quad_bounds(position, self.frame_size(), self.frame_origin(), scale)
    }
}

fn flip(mut rect: Rect, flip_x: bool, flip_y: bool) -> Rect {
    if flip_x {
        rect.width = -rect.width;
    }
    if flip_y {
        rect.height = -rect.height;
    }
    rect
}

pub(super) fn quad_bounds(position: Vec2, size: Vec2, origin: Vec2, scale: Vec2) -> Rect {
    let size = size.component_mul(&scale).abs();
    let origin = origin.component_mul(&scale);
    Rect::from_position_size(position - origin, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_cycle() -> AnimatedSprite {
        AnimatedSprite::new(TextureHandle::default())
            .with_animation(
                "walk",
                SpriteAnimation::from_strip(Vec2::zeros(), Vec2::new(16.0, 24.0), 3, 10.0, true),
            )
            .with_animation(
                "die",
                SpriteAnimation::from_strip(Vec2::new(0.0, 24.0), Vec2::new(16.0, 24.0), 2, 10.0, false),
            )
    }

    #[test]
    fn test_sprite_bounds_respect_origin_and_scale() {
        let sprite = Sprite::new(TextureHandle::default(), Vec2::new(10.0, 20.0));
        let bounds = sprite.bounds(Vec2::new(100.0, 100.0), Vec2::new(2.0, 1.0));
        assert_eq!(bounds, Rect::new(90.0, 90.0, 20.0, 20.0));
    }

    #[test]
    fn test_flip_negates_source_extent() {
        let mut sprite = Sprite::new(TextureHandle::default(), Vec2::new(8.0, 8.0));
        sprite.flip_x = true;
        assert_eq!(sprite.flipped_source(), Rect::new(0.0, 0.0, -8.0, 8.0));
    }

    #[test]
    fn test_looping_animation_wraps() {
        let mut sprite = walk_cycle();
        assert!(sprite.play("walk"));
        sprite.advance(0.25);
        assert_eq!(sprite.current_frame(), 2);
        sprite.advance(0.1);
        assert_eq!(sprite.current_frame(), 0);
        assert!(sprite.is_playing());
    }

    #[test]
    fn test_one_shot_animation_holds_last_frame() {
        let mut sprite = walk_cycle();
        sprite.play("die");
        sprite.advance(1.0);
        assert_eq!(sprite.current_frame(), 1);
        assert!(!sprite.is_playing());
        assert_eq!(sprite.frame_source(), Some(Rect::new(16.0, 24.0, 16.0, 24.0)));
    }

    #[test]
    fn test_replaying_current_animation_keeps_frame() {
        let mut sprite = walk_cycle();
        sprite.play("walk");
        sprite.advance(0.15);
        sprite.play("walk");
        assert_eq!(sprite.current_frame(), 1);

        sprite.play("die");
        assert_eq!(sprite.current_frame(), 0);
        assert!(!sprite.play("jump"));
    }
}
