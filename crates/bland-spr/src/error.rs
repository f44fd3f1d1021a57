//! Error types for sprite file parsing and writing.

use thiserror::Error;

use crate::Section;

/// Errors that can occur when converting sprite files.
#[derive(Debug, Error)]
pub enum Error {
    /// Common library error.
    #[error("{0}")]
    Common(#[from] bland_common::Error),

    /// A section declared by the header does not fit in the file.
    #[error(
        "invalid sprite file: {section} section ({count} records at offset {offset}) \
         extends past end of file ({file_size} bytes)"
    )]
    SectionOutOfBounds {
        section: Section,
        offset: u32,
        count: u16,
        file_size: usize,
    },

    /// More records than the 16-bit header counts can describe.
    #[error("too many {section} records: {count} (maximum {})", u16::MAX)]
    TooManyRecords { section: Section, count: usize },

    /// The XML document has no root element with the expected name.
    #[error("no root element found: expected <{expected}>")]
    MissingRoot { expected: &'static str },

    /// A required attribute is absent.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute value could not be parsed as the expected type.
    #[error("<{element}> attribute '{attribute}' has invalid value {value:?}")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// An animation frame names a sprite that does not exist.
    #[error("sprite name {0} not found")]
    UnknownSprite(String),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// Result type for sprite operations.
pub type Result<T> = std::result::Result<T, Error>;
