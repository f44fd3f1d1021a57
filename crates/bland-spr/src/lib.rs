//! Sprite files for the Bland engine.
//!
//! A sprite file (`.spr`) describes sprites, each a list of textured quads
//! ("images"), and animations, each a list of frames that show a sprite with
//! a delay and a transform. This crate reads and writes the binary format and
//! converts it to and from an editable XML form.
//!
//! # Binary layout
//!
//! A 24-byte header holds four record counts and four section offsets,
//! followed by the sprite (12-byte records), animation (4-byte), frame
//! (28-byte) and image (28-byte) sections. All values are little-endian.
//!
//! # Example
//!
//! ```no_run
//! use bland_spr::SpriteData;
//!
//! let data = std::fs::read("player.spr")?;
//! let sprites = SpriteData::parse(&data)?;
//! let xml = sprites.to_xml_string()?;
//! println!("{}", xml);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod header;
mod model;
mod parser;
mod record;
mod writer;

#[cfg(feature = "xml")]
pub mod xml;

pub use error::{Error, Result};
pub use header::{Section, SpriteHeader};
pub use model::{
    alpha_from_mode, alpha_mode_from_alpha, sprite_name, AnimFrame, Animation, BlendMode, Image, Rect, Sprite,
    SpriteData,
};
pub use record::{AnimRecord, FrameRecord, ImageRecord, SpriteRecord};

/// Convert a binary sprite file to XML.
#[cfg(feature = "xml")]
pub fn dump(data: &[u8]) -> Result<(SpriteData, String)> {
    let sprites = SpriteData::parse(data)?;
    let xml = sprites.to_xml_string()?;
    Ok((sprites, xml))
}

/// Build a binary sprite file from XML.
///
/// Frame references are checked and sprite bounds recomputed before any
/// bytes are produced.
#[cfg(feature = "xml")]
pub fn build(xml: &str) -> Result<(SpriteData, Vec<u8>)> {
    let mut sprites = SpriteData::from_xml(xml)?;
    sprites.update_bounds();
    let bytes = sprites.to_bytes()?;
    Ok((sprites, bytes))
}
