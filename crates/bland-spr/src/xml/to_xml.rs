//! Write [`SpriteData`] as XML.
//!
//! Attributes holding their default value are left out, so that reading the
//! document back restores the same values.

use std::io::Write;

use super::{XmlElement, ROOT_TAG};
use crate::model::{AnimFrame, Image, Sprite, SpriteData};
use crate::{Error, Result};

impl SpriteData {
    /// Build the XML element tree: all animations, then all sprites.
    pub fn to_xml_element(&self) -> XmlElement {
        let mut root = XmlElement::new(ROOT_TAG);

        for anim in &self.animations {
            let mut element = XmlElement::new("anim");
            element.children = anim.frames.iter().map(frame_element).collect();
            root.children.push(element);
        }

        root.children.extend(self.sprites.iter().map(sprite_element));
        root
    }

    /// Convert to an XML string.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut output = Vec::new();
        self.write_xml(&mut output)?;
        String::from_utf8(output).map_err(|e| Error::Xml(e.to_string()))
    }

    /// Write XML to a writer.
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.to_xml_element().write_document(writer)
    }
}

fn frame_element(frame: &AnimFrame) -> XmlElement {
    let defaults = AnimFrame::default();

    XmlElement::new("frame")
        .attr("sprite", &frame.sprite)
        .attr_opt("delay", Some(frame.delay).filter(|&v| v != defaults.delay))
        .attr_opt("delay_range", Some(frame.max_delay).filter(|&v| v != defaults.max_delay))
        .attr_opt("x_scale", Some(frame.x_scale).filter(|&v| v != defaults.x_scale))
        .attr_opt("y_scale", Some(frame.y_scale).filter(|&v| v != defaults.y_scale))
        .attr_opt("x", Some(frame.x).filter(|&v| v != defaults.x))
        .attr_opt("y", Some(frame.y).filter(|&v| v != defaults.y))
        .attr_opt("angle", Some(frame.angle).filter(|&v| v != defaults.angle))
}

fn sprite_element(sprite: &Sprite) -> XmlElement {
    let mut element = XmlElement::new("sprite").attr("name", &sprite.name);
    element.children = sprite.images.iter().map(image_element).collect();
    element
}

fn image_element(image: &Image) -> XmlElement {
    XmlElement::new("image")
        .attr("texture_id", image.texture_id)
        .attr_opt("num_palettes", Some(image.num_palettes).filter(|&n| n > 1))
        .attr("src_x", image.src_x)
        .attr("src_y", image.src_y)
        .attr("x", image.x)
        .attr("y", image.y)
        .attr("w", image.w)
        .attr("h", image.h)
        .attr_opt("alpha", (image.alpha_mode != 0).then(|| image.alpha()))
        .attr_opt("angle", Some(image.angle).filter(|&a| a != 0))
        .attr_opt("blend_mode", (image.blend_mode != 0).then(|| image.blend().name()))
        .attr_opt("bilinear", image.bilinear.then_some(true))
        .attr_opt("flip_x", image.flip_x().then_some(true))
        .attr_opt("flip_y", image.flip_y().then_some(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Animation, Rect};

    fn hero() -> SpriteData {
        let mut sprite = Sprite::new("hero");
        sprite.images.push(Image {
            texture_id: 5,
            w: 16,
            h: 16,
            ..Image::default()
        });
        SpriteData {
            sprites: vec![sprite],
            animations: vec![Animation {
                frames: vec![AnimFrame {
                    sprite: "hero".to_string(),
                    ..AnimFrame::default()
                }],
            }],
        }
    }

    #[test]
    fn test_defaults_are_elided() {
        let xml = hero().to_xml_string().unwrap();

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <spritedata>\n\
             \x20 <anim>\n\
             \x20   <frame sprite=\"hero\"/>\n\
             \x20 </anim>\n\
             \x20 <sprite name=\"hero\">\n\
             \x20   <image texture_id=\"5\" src_x=\"0\" src_y=\"0\" x=\"0\" y=\"0\" w=\"16\" h=\"16\"/>\n\
             \x20 </sprite>\n\
             </spritedata>"
        );
    }

    #[test]
    fn test_default_model_round_trips() {
        let data = hero();
        let parsed = SpriteData::from_xml(&data.to_xml_string().unwrap()).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_non_default_values_round_trip() {
        let mut data = hero();
        data.sprites[0].images.push(Image {
            texture_id: 9,
            num_palettes: 3,
            x: -12,
            y: 7,
            src_x: 64,
            src_y: 32,
            w: 8,
            h: 24,
            alpha_mode: 3,
            angle: 4000,
            blend_mode: 2,
            bilinear: true,
            flip: Image::FLIP_X,
        });
        data.animations[0].frames.push(AnimFrame {
            sprite: "hero".to_string(),
            delay: 0,
            max_delay: 12,
            x_scale: 0.1,
            y_scale: -2.5,
            x: 3.75,
            y: -0.001,
            angle: -5,
        });

        let parsed = SpriteData::from_xml(&data.to_xml_string().unwrap()).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_image_encodings() {
        let image = Image {
            alpha_mode: 1,
            blend_mode: 1,
            flip: Image::FLIP_Y,
            bilinear: true,
            ..Image::default()
        };
        let element = image_element(&image);

        assert_eq!(element.get("alpha"), Some("0.75"));
        assert_eq!(element.get("blend_mode"), Some("additive"));
        assert_eq!(element.get("bilinear"), Some("true"));
        assert_eq!(element.get("flip_x"), None);
        assert_eq!(element.get("flip_y"), Some("true"));
        assert_eq!(element.get("num_palettes"), None);
    }

    #[test]
    fn test_out_of_range_modes_are_normalized() {
        let image = Image {
            alpha_mode: 7,
            blend_mode: 9,
            ..Image::default()
        };
        let element = image_element(&image);

        assert_eq!(element.get("alpha"), Some("1"));
        assert_eq!(element.get("blend_mode"), Some("none"));
    }

    #[test]
    fn test_bounds_are_not_written() {
        let mut data = hero();
        data.sprites[0].bounds = Rect {
            min_x: 1,
            min_y: 2,
            max_x: 3,
            max_y: 4,
        };
        let element = data.to_xml_element();
        let sprite = element.children_named("sprite").next().unwrap();

        assert_eq!(sprite.attributes, vec![("name".to_string(), "hero".to_string())]);
    }

    #[test]
    fn test_animations_precede_sprites() {
        let element = hero().to_xml_element();
        let tags: Vec<&str> = element.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["anim", "sprite"]);
    }
}
