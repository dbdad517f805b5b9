//! Bounding-box geometry.
//!
//! This module holds the coordinate model shared by every other part of the
//! crate: a canonical corner-form rectangle ([`Coordinates`]), the three
//! annotation conventions it converts to and from ([`VocBox`], [`CocoBox`],
//! [`YoloBox`]), and the [`BoundingBox`] facade that keeps one pixel-space
//! rectangle and answers overlap queries.
//!
//! # Design Principles
//!
//! 1. **Ordered by construction**: a `Coordinates` value always holds finite
//!    values with `x1 < x2` and `y1 < y2`, so widths, heights and areas are
//!    positive. Scaling and format round trips re-check this.
//!
//! 2. **Tagged space**: every rectangle records whether it holds pixel or
//!    normalized values ([`Space`]); conversions never scale twice.
//!
//! 3. **One axis convention**: image dimensions are always given as
//!    `(height, width)` through [`ImageShape`].
//!
//! # Example
//!
//! ```
//! use boxkit::geometry::{BoundingBox, ImageShape, YoloBox};
//!
//! let shape = ImageShape::new(500, 500).unwrap();
//! let bb = BoundingBox::new(YoloBox::new(0.5, 0.5, 0.2, 0.2).unwrap(), Some(shape)).unwrap();
//! let voc = bb.to_voc(false).unwrap();
//! assert!((voc.xmin() - 200.0).abs() < 1e-9);
//! ```

mod bbox;
mod coords;
mod formats;
mod shape;
mod space;

pub use bbox::BoundingBox;
pub use coords::Coordinates;
pub use formats::{AnyBox, BoxFormat, CocoBox, VocBox, YoloBox};
pub use shape::ImageShape;
pub use space::Space;
