//! Sprite file header structure.

use std::fmt;

use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::record::{AnimRecord, FrameRecord, ImageRecord, SpriteRecord};
use crate::{Error, Result};

/// One of the four fixed-record-size regions of a sprite file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Sprite,
    Animation,
    Frame,
    Image,
}

impl Section {
    /// All sections, in header order.
    pub const ALL: [Section; 4] = [
        Section::Sprite,
        Section::Animation,
        Section::Frame,
        Section::Image,
    ];

    /// Size in bytes of one record in this section.
    pub const fn record_size(self) -> usize {
        match self {
            Section::Sprite => std::mem::size_of::<SpriteRecord>(),
            Section::Animation => std::mem::size_of::<AnimRecord>(),
            Section::Frame => std::mem::size_of::<FrameRecord>(),
            Section::Image => std::mem::size_of::<ImageRecord>(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Sprite => "sprite",
            Section::Animation => "animation",
            Section::Frame => "frame",
            Section::Image => "image",
        })
    }
}

/// Sprite file header.
///
/// Four record counts followed by the absolute byte offset of each section.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct SpriteHeader {
    pub sprite_count: U16,
    pub anim_count: U16,
    pub frame_count: U16,
    pub image_count: U16,
    pub sprite_offset: U32,
    pub anim_offset: U32,
    pub frame_offset: U32,
    pub image_offset: U32,
}

const _: () = assert!(std::mem::size_of::<SpriteHeader>() == SpriteHeader::SIZE);

impl SpriteHeader {
    /// Size of the header in bytes. The sprite section starts right after it.
    pub const SIZE: usize = 24;

    /// Lay out the four sections back to back after the header.
    pub fn with_counts(sprites: u16, anims: u16, frames: u16, images: u16) -> Self {
        let sprite_offset = Self::SIZE as u32;
        let anim_offset = sprite_offset + sprites as u32 * Section::Sprite.record_size() as u32;
        let frame_offset = anim_offset + anims as u32 * Section::Animation.record_size() as u32;
        let image_offset = frame_offset + frames as u32 * Section::Frame.record_size() as u32;

        Self {
            sprite_count: U16::new(sprites),
            anim_count: U16::new(anims),
            frame_count: U16::new(frames),
            image_count: U16::new(images),
            sprite_offset: U32::new(sprite_offset),
            anim_offset: U32::new(anim_offset),
            frame_offset: U32::new(frame_offset),
            image_offset: U32::new(image_offset),
        }
    }

    /// Offset and record count of a section.
    pub fn section(&self, section: Section) -> (u32, u16) {
        match section {
            Section::Sprite => (self.sprite_offset.get(), self.sprite_count.get()),
            Section::Animation => (self.anim_offset.get(), self.anim_count.get()),
            Section::Frame => (self.frame_offset.get(), self.frame_count.get()),
            Section::Image => (self.image_offset.get(), self.image_count.get()),
        }
    }

    /// Total size of a file laid out by [`SpriteHeader::with_counts`].
    pub fn file_size(&self) -> usize {
        let (offset, count) = self.section(Section::Image);
        offset as usize + count as usize * Section::Image.record_size()
    }

    /// Check that every section lies within a file of `file_size` bytes.
    pub fn validate(&self, file_size: usize) -> Result<()> {
        for section in Section::ALL {
            let (offset, count) = self.section(section);
            let end = offset as u64 + count as u64 * section.record_size() as u64;
            if end > file_size as u64 {
                return Err(Error::SectionOutOfBounds {
                    section,
                    offset,
                    count,
                    file_size,
                });
            }
        }
        Ok(())
    }
}
