//! Fixed-size records stored in the four sprite file sections.
//!
//! All multi-byte fields are little-endian regardless of the host, and
//! floats are kept as their raw IEEE-754 bit pattern.

use zerocopy::byteorder::little_endian::{F32, I16, U16};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::model::{AnimFrame, Image, Rect};

/// Sprite section entry: a range of the image section plus the bounding rect.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct SpriteRecord {
    pub start_image: U16,
    pub image_count: U16,
    pub min_x: I16,
    pub min_y: I16,
    pub max_x: I16,
    pub max_y: I16,
}

impl SpriteRecord {
    pub fn new(start_image: u16, image_count: u16, bounds: Rect) -> Self {
        Self {
            start_image: U16::new(start_image),
            image_count: U16::new(image_count),
            min_x: I16::new(bounds.min_x),
            min_y: I16::new(bounds.min_y),
            max_x: I16::new(bounds.max_x),
            max_y: I16::new(bounds.max_y),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            min_x: self.min_x.get(),
            min_y: self.min_y.get(),
            max_x: self.max_x.get(),
            max_y: self.max_y.get(),
        }
    }
}

/// Animation section entry: a range of the frame section.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AnimRecord {
    pub start_frame: U16,
    pub frame_count: U16,
}

impl AnimRecord {
    pub fn new(start_frame: u16, frame_count: u16) -> Self {
        Self {
            start_frame: U16::new(start_frame),
            frame_count: U16::new(frame_count),
        }
    }
}

/// Frame section entry.
///
/// The last three fields are derived from the frame's position and are
/// rebuilt on every write.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct FrameRecord {
    pub sprite_index: U16,
    pub delay: u8,
    pub max_delay: u8,
    pub x_scale: F32,
    pub y_scale: F32,
    pub x: F32,
    pub y: F32,
    pub angle: I16,
    pub anim_index: I16,
    pub next_frame: I16,
    pub marker: I16,
}

impl FrameRecord {
    /// Value the engine expects in the trailing slot.
    pub const MARKER: i16 = 1;

    pub fn new(frame: &AnimFrame, sprite_index: u16, anim_index: i16, next_frame: i16) -> Self {
        Self {
            sprite_index: U16::new(sprite_index),
            delay: frame.delay,
            max_delay: frame.max_delay,
            x_scale: F32::new(frame.x_scale),
            y_scale: F32::new(frame.y_scale),
            x: F32::new(frame.x),
            y: F32::new(frame.y),
            angle: I16::new(frame.angle),
            anim_index: I16::new(anim_index),
            next_frame: I16::new(next_frame),
            marker: I16::new(Self::MARKER),
        }
    }

    /// Convert to a model frame, naming the sprite after its index.
    pub fn to_frame(&self) -> AnimFrame {
        AnimFrame {
            sprite: crate::model::sprite_name(self.sprite_index.get() as usize),
            delay: self.delay,
            max_delay: self.max_delay,
            x_scale: self.x_scale.get(),
            y_scale: self.y_scale.get(),
            x: self.x.get(),
            y: self.y.get(),
            angle: self.angle.get(),
        }
    }
}

/// Image section entry.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct ImageRecord {
    pub texture_id: U16,
    pub num_palettes: U16,
    pub x: I16,
    pub y: I16,
    pub src_x: U16,
    pub src_y: U16,
    pub w: U16,
    pub h: U16,
    pub _reserved0: u8,
    pub alpha_mode: u8,
    pub _reserved1: [u8; 2],
    pub angle: I16,
    pub blend_mode: u8,
    pub bilinear: u8,
    pub flip: u8,
    /// Always 255 in files the engine ships.
    pub alpha: u8,
    pub _reserved2: [u8; 2],
}

impl ImageRecord {
    pub const ALPHA: u8 = 255;

    pub fn new(image: &Image) -> Self {
        Self {
            texture_id: U16::new(image.texture_id),
            num_palettes: U16::new(image.num_palettes),
            x: I16::new(image.x),
            y: I16::new(image.y),
            src_x: U16::new(image.src_x),
            src_y: U16::new(image.src_y),
            w: U16::new(image.w),
            h: U16::new(image.h),
            _reserved0: 0,
            alpha_mode: image.alpha_mode,
            _reserved1: [0; 2],
            angle: I16::new(image.angle),
            blend_mode: image.blend_mode,
            bilinear: image.bilinear as u8,
            flip: image.flip,
            alpha: Self::ALPHA,
            _reserved2: [0; 2],
        }
    }

    pub fn to_image(&self) -> Image {
        Image {
            texture_id: self.texture_id.get(),
            num_palettes: self.num_palettes.get(),
            x: self.x.get(),
            y: self.y.get(),
            src_x: self.src_x.get(),
            src_y: self.src_y.get(),
            w: self.w.get(),
            h: self.h.get(),
            alpha_mode: self.alpha_mode,
            angle: self.angle.get(),
            blend_mode: self.blend_mode,
            bilinear: self.bilinear != 0,
            flip: self.flip,
        }
    }
}
