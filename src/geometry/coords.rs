//! Canonical rectangle representation in XYXY corner form.

use serde::{Deserialize, Serialize};

use super::{ImageShape, Space};
use crate::error::BoxError;

/// An axis-aligned rectangle given by its top-left `(x1, y1)` and
/// bottom-right `(x2, y2)` corners, tagged with its coordinate [`Space`].
///
/// Unlike a raw corner tuple, a `Coordinates` value is always properly
/// ordered: construction fails unless `x1 < x2` and `y1 < y2`. The `[0, 1]`
/// range of normalized values is not enforced; see [`is_within_unit`].
///
/// [`is_within_unit`]: Coordinates::is_within_unit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CoordinatesData")]
pub struct Coordinates {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    space: Space,
}

impl Coordinates {
    /// Creates pixel-space coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, BoxError> {
        Self::with_space(x1, y1, x2, y2, Space::Pixel)
    }

    /// Creates normalized coordinates.
    pub fn normalized(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, BoxError> {
        Self::with_space(x1, y1, x2, y2, Space::Normalized)
    }

    /// Creates coordinates in the given space.
    ///
    /// Fails with [`BoxError::InvalidGeometry`] unless every value is finite,
    /// `x1 < x2`, `y1 < y2` and the area is representable.
    pub fn with_space(x1: f64, y1: f64, x2: f64, y2: f64, space: Space) -> Result<Self, BoxError> {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(BoxError::geometry(format!(
                "coordinates must be finite (x1={}, y1={}, x2={}, y2={})",
                x1, y1, x2, y2
            )));
        }
        if !(x1 < x2) {
            return Err(BoxError::geometry(format!(
                "x1 must be less than x2 (x1={}, x2={})",
                x1, x2
            )));
        }
        if !(y1 < y2) {
            return Err(BoxError::geometry(format!(
                "y1 must be less than y2 (y1={}, y2={})",
                y1, y2
            )));
        }
        let area = (x2 - x1) * (y2 - y1);
        if !area.is_finite() {
            return Err(BoxError::geometry(format!(
                "box extent overflows (width={}, height={})",
                x2 - x1,
                y2 - y1
            )));
        }
        Ok(Self {
            x1,
            y1,
            x2,
            y2,
            space,
        })
    }

    #[inline]
    pub fn x1(&self) -> f64 {
        self.x1
    }

    #[inline]
    pub fn y1(&self) -> f64 {
        self.y1
    }

    #[inline]
    pub fn x2(&self) -> f64 {
        self.x2
    }

    #[inline]
    pub fn y2(&self) -> f64 {
        self.y2
    }

    #[inline]
    pub fn space(&self) -> Space {
        self.space
    }

    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.space.is_normalized()
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn x_center(&self) -> f64 {
        (self.x1 + self.x2) / 2.0
    }

    #[inline]
    pub fn y_center(&self) -> f64 {
        (self.y1 + self.y2) / 2.0
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the corners as `(x1, y1, x2, y2)`.
    #[inline]
    pub fn to_xyxy(&self) -> (f64, f64, f64, f64) {
        (self.x1, self.y1, self.x2, self.y2)
    }

    /// Returns true if every value lies in `[0, 1]`.
    pub fn is_within_unit(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Scales normalized values up to pixels.
    ///
    /// Coordinates that are already in pixel space are returned unchanged.
    /// Fails with [`BoxError::InvalidGeometry`] if scaling overflows.
    pub fn to_pixel(&self, shape: ImageShape) -> Result<Coordinates, BoxError> {
        if !self.is_normalized() {
            return Ok(*self);
        }
        let (w, h) = (shape.width_f64(), shape.height_f64());
        Coordinates::with_space(
            self.x1 * w,
            self.y1 * h,
            self.x2 * w,
            self.y2 * h,
            Space::Pixel,
        )
    }

    /// Divides pixel values by the image dimensions.
    ///
    /// Coordinates that are already normalized are returned unchanged.
    /// Fails with [`BoxError::InvalidGeometry`] if the division collapses
    /// the box to zero extent.
    pub fn to_normalized(&self, shape: ImageShape) -> Result<Coordinates, BoxError> {
        if self.is_normalized() {
            return Ok(*self);
        }
        let (w, h) = (shape.width_f64(), shape.height_f64());
        Coordinates::with_space(
            self.x1 / w,
            self.y1 / h,
            self.x2 / w,
            self.y2 / h,
            Space::Normalized,
        )
    }

    /// Area of the overlap between two rectangles, `0.0` when they only
    /// touch or are disjoint.
    pub(crate) fn intersection_area(&self, other: &Coordinates) -> f64 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0)
    }
}

#[derive(Deserialize)]
struct CoordinatesData {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    #[serde(default)]
    space: Space,
}

impl TryFrom<CoordinatesData> for Coordinates {
    type Error = BoxError;

    fn try_from(data: CoordinatesData) -> Result<Self, Self::Error> {
        Coordinates::with_space(data.x1, data.y1, data.x2, data.y2, data.space)
    }
}
