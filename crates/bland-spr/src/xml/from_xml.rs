//! Build [`SpriteData`] from its XML form.

use std::str::FromStr;

use tracing::warn;

use super::{parse_document, XmlElement};
use crate::model::{alpha_mode_from_alpha, AnimFrame, Animation, BlendMode, Image, Sprite, SpriteData};
use crate::{Error, Result};

/// Name of the document's root element.
pub const ROOT_TAG: &str = "spritedata";

impl SpriteData {
    /// Parse the XML form of a sprite file.
    ///
    /// Every frame's sprite name must match a `<sprite>` in the same
    /// document. Bounding rectangles are left zeroed; they are recomputed
    /// with [`SpriteData::update_bounds`] before writing.
    ///
    /// # Example
    ///
    /// ```
    /// use bland_spr::SpriteData;
    ///
    /// let xml = r#"<spritedata>
    ///     <anim><frame sprite="hero" delay="4"/></anim>
    ///     <sprite name="hero">
    ///         <image texture_id="5" src_x="0" src_y="0" x="0" y="0" w="16" h="16"/>
    ///     </sprite>
    /// </spritedata>"#;
    ///
    /// let data = SpriteData::from_xml(xml).unwrap();
    /// assert_eq!(data.animations[0].frames[0].delay, 4);
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self> {
        let elements = parse_document(xml)?;
        let root = elements
            .iter()
            .find(|e| e.tag == ROOT_TAG)
            .ok_or(Error::MissingRoot { expected: ROOT_TAG })?;

        let sprites = root
            .children_named("sprite")
            .map(parse_sprite)
            .collect::<Result<Vec<_>>>()?;
        let animations = root
            .children_named("anim")
            .enumerate()
            .map(|(index, anim)| parse_animation(index, anim))
            .collect::<Result<Vec<_>>>()?;

        let data = Self {
            sprites,
            animations,
        };
        data.resolve_references()?;
        Ok(data)
    }
}

/// Typed attribute access for one element.
struct Attributes<'a> {
    element: &'static str,
    node: &'a XmlElement,
}

impl<'a> Attributes<'a> {
    fn new(element: &'static str, node: &'a XmlElement) -> Self {
        Self { element, node }
    }

    fn string(&self, attribute: &'static str) -> Result<&'a str> {
        self.node.get(attribute).ok_or(Error::MissingAttribute {
            element: self.element,
            attribute,
        })
    }

    fn required<T: FromStr>(&self, attribute: &'static str) -> Result<T> {
        let value = self.string(attribute)?;
        value.trim().parse().map_err(|_| Error::InvalidAttribute {
            element: self.element,
            attribute,
            value: value.to_string(),
        })
    }

    /// Malformed optional values fall back to the default with a warning.
    fn optional<T: FromStr>(&self, attribute: &'static str, default: T) -> T {
        self.parse_optional(attribute, default, |v| v.trim().parse().ok())
    }

    fn flag(&self, attribute: &'static str) -> bool {
        self.parse_optional(attribute, false, parse_bool)
    }

    fn parse_optional<T>(&self, attribute: &'static str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
        let Some(value) = self.node.get(attribute) else {
            return default;
        };
        match parse(value) {
            Some(parsed) => parsed,
            None => {
                warn!(
                    element = self.element,
                    attribute,
                    value,
                    "ignoring malformed attribute, using default"
                );
                default
            }
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        value.parse::<i64>().ok().map(|v| v != 0)
    }
}

fn parse_sprite(node: &XmlElement) -> Result<Sprite> {
    let attrs = Attributes::new("sprite", node);
    let mut sprite = Sprite::new(attrs.string("name")?);

    sprite.images = node
        .children_named("image")
        .map(parse_image)
        .collect::<Result<Vec<_>>>()?;

    Ok(sprite)
}

fn parse_image(node: &XmlElement) -> Result<Image> {
    let attrs = Attributes::new("image", node);

    let mut flip = 0;
    if attrs.flag("flip_x") {
        flip |= Image::FLIP_X;
    }
    if attrs.flag("flip_y") {
        flip |= Image::FLIP_Y;
    }

    let blend_mode = node.get("blend_mode").map_or(BlendMode::Normal, BlendMode::from_name);

    Ok(Image {
        texture_id: attrs.required("texture_id")?,
        num_palettes: attrs.optional("num_palettes", 1),
        x: attrs.required("x")?,
        y: attrs.required("y")?,
        src_x: attrs.required("src_x")?,
        src_y: attrs.required("src_y")?,
        w: attrs.required("w")?,
        h: attrs.required("h")?,
        alpha_mode: alpha_mode_from_alpha(attrs.optional("alpha", 1.0)),
        angle: attrs.optional("angle", 0),
        blend_mode: blend_mode as u8,
        bilinear: attrs.flag("bilinear"),
        flip,
    })
}

fn parse_animation(index: usize, node: &XmlElement) -> Result<Animation> {
    let frames = node
        .children_named("frame")
        .map(parse_frame)
        .collect::<Result<Vec<_>>>()?;

    if frames.is_empty() {
        warn!(animation = index, "animation has no frames");
    }

    Ok(Animation { frames })
}

fn parse_frame(node: &XmlElement) -> Result<AnimFrame> {
    let attrs = Attributes::new("frame", node);
    let defaults = AnimFrame::default();

    // Older documents spell the delay range as max_delay.
    let max_delay = if node.get("delay_range").is_some() {
        attrs.optional("delay_range", defaults.max_delay)
    } else {
        attrs.optional("max_delay", defaults.max_delay)
    };

    Ok(AnimFrame {
        sprite: attrs.string("sprite")?.to_string(),
        delay: attrs.optional("delay", defaults.delay),
        max_delay,
        x_scale: attrs.optional("x_scale", defaults.x_scale),
        y_scale: attrs.optional("y_scale", defaults.y_scale),
        x: attrs.optional("x", defaults.x),
        y: attrs.optional("y", defaults.y),
        angle: attrs.optional("angle", defaults.angle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    const HERO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<spritedata>
  <anim>
    <frame sprite="hero"/>
  </anim>
  <sprite name="hero">
    <image texture_id="5" x="0" y="0" src_x="0" src_y="0" w="16" h="16"/>
  </sprite>
</spritedata>"#;

    fn single_image(attributes: &str) -> Result<Image> {
        let xml = format!(
            r#"<spritedata><sprite name="s"><image texture_id="1" x="-2" y="3" src_x="4" src_y="5" w="6" h="7" {}/></sprite></spritedata>"#,
            attributes
        );
        SpriteData::from_xml(&xml).map(|data| data.sprites[0].images[0])
    }

    fn single_frame(attributes: &str) -> AnimFrame {
        let xml = format!(
            r#"<spritedata><anim><frame sprite="s" {}/></anim><sprite name="s"/></spritedata>"#,
            attributes
        );
        SpriteData::from_xml(&xml).unwrap().animations[0].frames[0].clone()
    }

    #[test]
    fn test_defaults() {
        let data = SpriteData::from_xml(HERO).unwrap();

        assert_eq!(data.sprites.len(), 1);
        assert_eq!(data.sprites[0].name, "hero");
        assert_eq!(data.sprites[0].bounds, Rect::default());
        assert_eq!(
            data.sprites[0].images[0],
            Image {
                texture_id: 5,
                w: 16,
                h: 16,
                ..Image::default()
            }
        );
        assert_eq!(
            data.animations[0].frames[0],
            AnimFrame {
                sprite: "hero".to_string(),
                ..AnimFrame::default()
            }
        );
    }

    #[test]
    fn test_image_attributes() {
        let image = single_image(
            r#"num_palettes="4" alpha="0.5" angle="-1024" blend_mode="additive" bilinear="true" flip_y="true""#,
        )
        .unwrap();

        assert_eq!(image.x, -2);
        assert_eq!(image.h, 7);
        assert_eq!(image.num_palettes, 4);
        assert_eq!(image.alpha_mode, 2);
        assert_eq!(image.angle, -1024);
        assert_eq!(image.blend_mode, BlendMode::Additive as u8);
        assert!(image.bilinear);
        assert_eq!(image.flip, Image::FLIP_Y);
    }

    #[test]
    fn test_unknown_blend_mode_is_none() {
        assert_eq!(single_image(r#"blend_mode="Normal""#).unwrap().blend_mode, 3);
        assert_eq!(single_image(r#"blend_mode="none""#).unwrap().blend_mode, 3);
    }

    #[test]
    fn test_flip_flags_combine() {
        assert_eq!(single_image(r#"flip_x="true" flip_y="1""#).unwrap().flip, 3);
        assert_eq!(single_image(r#"flip_x="false""#).unwrap().flip, 0);
    }

    #[test]
    fn test_malformed_optional_keeps_default() {
        let image = single_image(r#"angle="sideways" alpha="half""#).unwrap();
        assert_eq!(image.angle, 0);
        assert_eq!(image.alpha_mode, 0);
    }

    #[test]
    fn test_out_of_range_optional_keeps_default() {
        let image = single_image(r#"num_palettes="70000" angle="40000""#).unwrap();
        assert_eq!(image.num_palettes, 1);
        assert_eq!(image.angle, 0);

        let frame = single_frame(r#"delay="300" delay_range="256" angle="-32769""#);
        assert_eq!(frame.delay, 1);
        assert_eq!(frame.max_delay, AnimFrame::default().max_delay);
        assert_eq!(frame.angle, 0);
    }

    #[test]
    fn test_missing_required_attribute() {
        let xml = r#"<spritedata><sprite name="s"><image texture_id="1" x="0" y="0" src_x="0" w="1" h="1"/></sprite></spritedata>"#;
        let err = SpriteData::from_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute {
                element: "image",
                attribute: "src_y",
            }
        ));
    }

    #[test]
    fn test_malformed_required_attribute() {
        let xml = r#"<spritedata><sprite name="s"><image texture_id="70000" x="0" y="0" src_x="0" src_y="0" w="1" h="1"/></sprite></spritedata>"#;
        let err = SpriteData::from_xml(xml).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidAttribute {
                attribute: "texture_id",
                ..
            }
        ));

        let xml = r#"<spritedata><sprite name="s"><image texture_id="1" x="left" y="0" src_x="0" src_y="0" w="1" h="1"/></sprite></spritedata>"#;
        assert!(matches!(
            SpriteData::from_xml(xml),
            Err(Error::InvalidAttribute { attribute: "x", value, .. }) if value == "left"
        ));
    }

    #[test]
    fn test_sprite_without_name() {
        let err = SpriteData::from_xml("<spritedata><sprite/></spritedata>").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute {
                element: "sprite",
                attribute: "name",
            }
        ));
    }

    #[test]
    fn test_frame_attributes() {
        let frame = single_frame(
            r#"delay="3" delay_range="8" x_scale="-1" y_scale="0.5" x="1.25" y="-4" angle="2048""#,
        );

        assert_eq!(frame.delay, 3);
        assert_eq!(frame.max_delay, 8);
        assert_eq!(frame.x_scale, -1.0);
        assert_eq!(frame.y_scale, 0.5);
        assert_eq!(frame.x, 1.25);
        assert_eq!(frame.y, -4.0);
        assert_eq!(frame.angle, 2048);
    }

    #[test]
    fn test_legacy_max_delay() {
        assert_eq!(single_frame(r#"max_delay="6""#).max_delay, 6);
        assert_eq!(single_frame(r#"delay_range="2" max_delay="6""#).max_delay, 2);
    }

    #[test]
    fn test_frame_without_sprite() {
        let err = SpriteData::from_xml("<spritedata><anim><frame/></anim></spritedata>").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute {
                element: "frame",
                attribute: "sprite",
            }
        ));
    }

    #[test]
    fn test_unknown_sprite_reference() {
        let xml = HERO.replace(r#"frame sprite="hero""#, r#"frame sprite="ghost""#);
        let err = SpriteData::from_xml(&xml).unwrap_err();
        assert!(matches!(err, Error::UnknownSprite(name) if name == "ghost"));
    }

    #[test]
    fn test_missing_root() {
        let err = SpriteData::from_xml(r#"<sprites><sprite name="a"/></sprites>"#).unwrap_err();
        assert!(matches!(err, Error::MissingRoot { expected: "spritedata" }));

        assert!(matches!(
            SpriteData::from_xml(""),
            Err(Error::MissingRoot { .. })
        ));
    }

    #[test]
    fn test_only_direct_children_are_read() {
        let xml = r#"<spritedata>
            <group><sprite name="nested"/></group>
            <sprite name="top"><other><image/></other></sprite>
        </spritedata>"#;
        let data = SpriteData::from_xml(xml).unwrap();

        assert_eq!(data.sprites.len(), 1);
        assert_eq!(data.sprites[0].name, "top");
        assert!(data.sprites[0].images.is_empty());
    }

    #[test]
    fn test_empty_animation_is_kept() {
        let data = SpriteData::from_xml("<spritedata><anim/></spritedata>").unwrap();
        assert_eq!(data.animations, vec![Animation::default()]);
    }
}
