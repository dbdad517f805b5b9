//! Coordinate space tag.
//!
//! Every rectangle in this crate records whether its values are absolute
//! pixel positions or fractions of the image dimensions. Conversions consult
//! the tag so that a value is never scaled twice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The coordinate space a set of values lives in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Space {
    /// Absolute positions, where (0, 0) is the top-left corner of the image.
    #[default]
    Pixel,
    /// Fractions of the image width/height, conventionally in `[0, 1]`.
    Normalized,
}

impl Space {
    #[inline]
    pub fn is_normalized(self) -> bool {
        matches!(self, Space::Normalized)
    }

    #[inline]
    pub fn from_normalized_flag(normalized: bool) -> Self {
        if normalized {
            Space::Normalized
        } else {
            Space::Pixel
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Space::Pixel => f.write_str("pixel"),
            Space::Normalized => f.write_str("normalized"),
        }
    }
}
