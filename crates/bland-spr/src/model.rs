//! In-memory sprite model shared by the binary and XML codecs.

use std::collections::HashMap;

use crate::{Error, Result};

/// Name given to the sprite at `index` when it comes from a binary file.
pub fn sprite_name(index: usize) -> String {
    format!("sprite{}", index)
}

/// How an image is composited with what is behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlendMode {
    Normal = 0,
    Additive = 1,
    Mask = 2,
    None = 3,
}

impl BlendMode {
    /// Interpret a raw blend byte; anything past `Mask` draws as `None`.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => BlendMode::Normal,
            1 => BlendMode::Additive,
            2 => BlendMode::Mask,
            _ => BlendMode::None,
        }
    }

    /// Look up a blend mode by its XML name. Unknown names map to `None`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "normal" => BlendMode::Normal,
            "additive" => BlendMode::Additive,
            "mask" => BlendMode::Mask,
            _ => BlendMode::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Additive => "additive",
            BlendMode::Mask => "mask",
            BlendMode::None => "none",
        }
    }
}

/// Alpha level (1.0, 0.75, 0.5 or 0.25) of an alpha mode byte.
///
/// Modes 4 and above are drawn fully opaque by the engine.
pub fn alpha_from_mode(mode: u8) -> f32 {
    if mode >= 4 {
        return 1.0;
    }
    (4 - mode) as f32 * 0.25
}

/// Quantize an alpha value to the nearest of the four alpha modes.
pub fn alpha_mode_from_alpha(alpha: f32) -> u8 {
    if alpha > 0.875 {
        0
    } else if alpha > 0.625 {
        1
    } else if alpha > 0.375 {
        2
    } else {
        3
    }
}

/// Axis-aligned rectangle in sprite space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub min_x: i16,
    pub min_y: i16,
    pub max_x: i16,
    pub max_y: i16,
}

impl Rect {
    /// Bounds of a sprite without images.
    pub const EMPTY: Rect = Rect {
        min_x: i16::MAX,
        min_y: i16::MAX,
        max_x: i16::MIN,
        max_y: i16::MIN,
    };

    /// Grow this rectangle to contain `other`.
    pub fn include(&mut self, other: Rect) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }
}

/// A textured quad drawn as part of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    pub texture_id: u16,
    /// Number of consecutive texture ids used as palette variants.
    pub num_palettes: u16,
    pub x: i16,
    pub y: i16,
    pub src_x: u16,
    pub src_y: u16,
    pub w: u16,
    pub h: u16,
    /// Raw alpha mode, see [`alpha_from_mode`].
    pub alpha_mode: u8,
    /// 0-4095 is one full turn.
    pub angle: i16,
    /// Raw blend mode, see [`BlendMode::from_raw`].
    pub blend_mode: u8,
    pub bilinear: bool,
    pub flip: u8,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            texture_id: 0,
            num_palettes: 1,
            x: 0,
            y: 0,
            src_x: 0,
            src_y: 0,
            w: 0,
            h: 0,
            alpha_mode: 0,
            angle: 0,
            blend_mode: 0,
            bilinear: false,
            flip: 0,
        }
    }
}

impl Image {
    pub const FLIP_X: u8 = 0x1;
    pub const FLIP_Y: u8 = 0x2;

    pub fn flip_x(&self) -> bool {
        self.flip & Self::FLIP_X != 0
    }

    pub fn flip_y(&self) -> bool {
        self.flip & Self::FLIP_Y != 0
    }

    pub fn alpha(&self) -> f32 {
        alpha_from_mode(self.alpha_mode)
    }

    pub fn blend(&self) -> BlendMode {
        BlendMode::from_raw(self.blend_mode)
    }

    /// Placement rectangle `(x, y, x + w, y + h)` in 16-bit arithmetic.
    pub fn placement(&self) -> Rect {
        Rect {
            min_x: self.x,
            min_y: self.y,
            max_x: self.x.wrapping_add(self.w as i16),
            max_y: self.y.wrapping_add(self.h as i16),
        }
    }
}

/// A named, ordered list of images with a bounding rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub images: Vec<Image>,
    /// Derived from `images`; refreshed by [`SpriteData::update_bounds`].
    pub bounds: Rect,
}

impl Sprite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            images: Vec::new(),
            bounds: Rect::default(),
        }
    }

    /// Union of all image placement rectangles.
    pub fn compute_bounds(&self) -> Rect {
        self.images.iter().fold(Rect::EMPTY, |mut bounds, image| {
            bounds.include(image.placement());
            bounds
        })
    }
}

/// One step of an animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimFrame {
    /// Name of the sprite shown during this frame.
    pub sprite: String,
    pub delay: u8,
    /// Upper bound of the random delay. Only meaningful when greater than
    /// `delay`; 0 disables randomization.
    pub max_delay: u8,
    pub x_scale: f32,
    pub y_scale: f32,
    pub x: f32,
    pub y: f32,
    pub angle: i16,
}

impl Default for AnimFrame {
    fn default() -> Self {
        Self {
            sprite: String::new(),
            delay: 1,
            max_delay: 0,
            x_scale: 1.0,
            y_scale: 1.0,
            x: 0.0,
            y: 0.0,
            angle: 0,
        }
    }
}

/// An ordered sequence of frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub frames: Vec<AnimFrame>,
}

/// Everything stored in one sprite file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteData {
    pub sprites: Vec<Sprite>,
    pub animations: Vec<Animation>,
}

impl SpriteData {
    /// Total number of frames across all animations.
    pub fn frame_count(&self) -> usize {
        self.animations.iter().map(|a| a.frames.len()).sum()
    }

    /// Total number of images across all sprites.
    pub fn image_count(&self) -> usize {
        self.sprites.iter().map(|s| s.images.len()).sum()
    }

    /// Map each sprite name to its position. When several sprites share a
    /// name, the first one wins.
    pub fn sprite_indices(&self) -> HashMap<&str, usize> {
        let mut indices = HashMap::with_capacity(self.sprites.len());
        for (index, sprite) in self.sprites.iter().enumerate() {
            indices.entry(sprite.name.as_str()).or_insert(index);
        }
        indices
    }

    /// Check that every frame refers to an existing sprite.
    pub fn resolve_references(&self) -> Result<()> {
        let indices = self.sprite_indices();
        for frame in self.animations.iter().flat_map(|a| &a.frames) {
            if !indices.contains_key(frame.sprite.as_str()) {
                return Err(Error::UnknownSprite(frame.sprite.clone()));
            }
        }
        Ok(())
    }

    /// Recompute every sprite's bounding rectangle from its images.
    pub fn update_bounds(&mut self) {
        for sprite in &mut self.sprites {
            sprite.bounds = sprite.compute_bounds();
        }
    }
}
