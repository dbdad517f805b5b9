//! Image dimensions used to move between pixel and normalized space.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BoxError;

/// Image dimensions in `(height, width)` order, both strictly positive.
///
/// The ordering matches the row-major `[row, col, channel]` layout of image
/// buffers, and is used uniformly by every conversion in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShapeData")]
pub struct ImageShape {
    height: u32,
    width: u32,
}

impl ImageShape {
    /// Creates a shape, rejecting zero dimensions.
    pub fn new(height: u32, width: u32) -> Result<Self, BoxError> {
        if height == 0 || width == 0 {
            return Err(BoxError::geometry(format!(
                "image dimensions must be positive, got {}x{} (height x width)",
                height, width
            )));
        }
        Ok(Self { height, width })
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub(crate) fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }

    #[inline]
    pub(crate) fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }
}

impl TryFrom<(u32, u32)> for ImageShape {
    type Error = BoxError;

    /// Interprets the tuple as `(height, width)`.
    fn try_from((height, width): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(height, width)
    }
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Deserialize)]
struct ShapeData {
    height: u32,
    width: u32,
}

impl TryFrom<ShapeData> for ImageShape {
    type Error = BoxError;

    fn try_from(data: ShapeData) -> Result<Self, Self::Error> {
        Self::new(data.height, data.width)
    }
}
