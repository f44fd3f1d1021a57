//! Sprite file writer.

use tracing::debug;
use zerocopy::IntoBytes;

use crate::model::SpriteData;
use crate::record::{AnimRecord, FrameRecord, ImageRecord, SpriteRecord};
use crate::{Error, Result, Section, SpriteHeader};

fn count_u16(section: Section, count: usize) -> Result<u16> {
    u16::try_from(count).map_err(|_| Error::TooManyRecords { section, count })
}

impl SpriteData {
    /// Serialize to the binary sprite format.
    ///
    /// Sprite bounds are written as stored; call
    /// [`SpriteData::update_bounds`] first when they may be stale. Fails if a
    /// frame names a sprite that does not exist.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        // Step 1: Counts and section layout
        let header = SpriteHeader::with_counts(
            count_u16(Section::Sprite, self.sprites.len())?,
            count_u16(Section::Animation, self.animations.len())?,
            count_u16(Section::Frame, self.frame_count())?,
            count_u16(Section::Image, self.image_count())?,
        );
        let sprite_indices = self.sprite_indices();

        debug!(
            sprites = self.sprites.len(),
            animations = self.animations.len(),
            size = header.file_size(),
            "writing sprite file"
        );

        let mut output = Vec::with_capacity(header.file_size());
        output.extend_from_slice(header.as_bytes());

        // Step 2: Sprites, each pointing at a run of the image section.
        // Counts fit in u16 because the totals were checked above.
        let mut start_image = 0u16;
        for sprite in &self.sprites {
            let image_count = sprite.images.len() as u16;
            output.extend_from_slice(SpriteRecord::new(start_image, image_count, sprite.bounds).as_bytes());
            start_image += image_count;
        }

        // Step 3: Animations
        let mut start_frame = 0u16;
        for anim in &self.animations {
            let frame_count = anim.frames.len() as u16;
            output.extend_from_slice(AnimRecord::new(start_frame, frame_count).as_bytes());
            start_frame += frame_count;
        }

        // Step 4: Frames, with sprite names resolved to indices
        for (anim_index, anim) in self.animations.iter().enumerate() {
            let len = anim.frames.len();
            for (i, frame) in anim.frames.iter().enumerate() {
                let sprite_index = sprite_indices
                    .get(frame.sprite.as_str())
                    .copied()
                    .ok_or_else(|| Error::UnknownSprite(frame.sprite.clone()))?;
                let next_frame = (i + 1) % len;
                let record = FrameRecord::new(frame, sprite_index as u16, anim_index as i16, next_frame as i16);
                output.extend_from_slice(record.as_bytes());
            }
        }

        // Step 5: Images
        for image in self.sprites.iter().flat_map(|s| &s.images) {
            output.extend_from_slice(ImageRecord::new(image).as_bytes());
        }

        debug_assert_eq!(output.len(), header.file_size());
        Ok(output)
    }
}
