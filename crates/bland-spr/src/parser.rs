//! Sprite file parser.

use bland_common::BinaryReader;
use tracing::debug;

use crate::model::{sprite_name, Animation, Sprite, SpriteData};
use crate::record::{AnimRecord, FrameRecord, ImageRecord, SpriteRecord};
use crate::{Result, Section, SpriteHeader};

impl SpriteData {
    /// Parse a sprite file from bytes.
    ///
    /// Every section declared by the header must fit inside `data`. Sprites
    /// are named `sprite0`, `sprite1`, ... after their position, and frames
    /// refer to them by those names.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header: SpriteHeader = reader.read_struct()?;
        header.validate(data.len())?;

        debug!(
            sprites = header.sprite_count.get(),
            animations = header.anim_count.get(),
            frames = header.frame_count.get(),
            images = header.image_count.get(),
            "read sprite header"
        );

        let animations = read_animations(&mut reader, &header)?;
        let sprites = read_sprites(&mut reader, &header)?;

        Ok(Self {
            sprites,
            animations,
        })
    }
}

fn read_animations(reader: &mut BinaryReader<'_>, header: &SpriteHeader) -> Result<Vec<Animation>> {
    let (anim_offset, anim_count) = header.section(Section::Animation);
    let (frame_offset, _) = header.section(Section::Frame);

    reader.seek(anim_offset as usize);
    let mut animations = Vec::with_capacity(anim_count as usize);
    for _ in 0..anim_count {
        let record: AnimRecord = reader.read_struct()?;
        let resume = reader.position();

        reader.seek(frame_offset as usize + record.start_frame.get() as usize * Section::Frame.record_size());
        let frames = reader
            .read_array::<FrameRecord>(record.frame_count.get() as usize)?
            .iter()
            .map(FrameRecord::to_frame)
            .collect();

        reader.seek(resume);
        animations.push(Animation { frames });
    }

    Ok(animations)
}

fn read_sprites(reader: &mut BinaryReader<'_>, header: &SpriteHeader) -> Result<Vec<Sprite>> {
    let (sprite_offset, sprite_count) = header.section(Section::Sprite);
    let (image_offset, _) = header.section(Section::Image);

    reader.seek(sprite_offset as usize);
    let mut sprites = Vec::with_capacity(sprite_count as usize);
    for index in 0..sprite_count as usize {
        let record: SpriteRecord = reader.read_struct()?;
        let resume = reader.position();

        reader.seek(image_offset as usize + record.start_image.get() as usize * Section::Image.record_size());
        let images = reader
            .read_array::<ImageRecord>(record.image_count.get() as usize)?
            .iter()
            .map(ImageRecord::to_image)
            .collect();

        reader.seek(resume);
        sprites.push(Sprite {
            name: sprite_name(index),
            images,
            bounds: record.bounds(),
        });
    }

    Ok(sprites)
}
