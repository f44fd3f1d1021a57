//! Common utilities for the Bland sprite tools.
//!
//! - [`BinaryReader`] - positional little-endian reading from byte slices
//! - [`Error`] - errors shared by the format crates

mod error;
mod reader;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
