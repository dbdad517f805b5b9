//! The pixel-space bounding box facade.

use serde::Serialize;
use tracing::{debug, trace};

use super::{AnyBox, BoxFormat, CocoBox, Coordinates, ImageShape, VocBox, YoloBox};
use crate::error::BoxError;

/// A bounding box held canonically in pixel space.
///
/// Built from any [`AnyBox`] shape. Normalized inputs are scaled up using the
/// supplied [`ImageShape`], which is then kept so that normalized exports
/// (`to_yolo`, `to_voc(true)`, ...) remain possible. Every export produces a
/// new value; the box itself never changes after construction.
///
/// # Example
///
/// ```
/// use boxkit::geometry::{BoundingBox, ImageShape, VocBox};
///
/// let shape = ImageShape::new(500, 500).unwrap();
/// let bb = BoundingBox::new(VocBox::new(100.0, 100.0, 300.0, 300.0).unwrap(), Some(shape)).unwrap();
/// let coco = bb.to_coco(false).unwrap();
/// assert_eq!(coco.width(), 200.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoundingBox {
    pixel_box: Coordinates,
    image_shape: Option<ImageShape>,
}

impl BoundingBox {
    /// Wraps a box of any supported format.
    ///
    /// Fails with [`BoxError::MissingImageShape`] when the input is
    /// normalized (YOLO boxes are, by default) and no shape is given, and
    /// with [`BoxError::InvalidGeometry`] when the pixel-space corners are
    /// not a valid box (for example when scaling overflows).
    pub fn new(input: impl Into<AnyBox>, image_shape: Option<ImageShape>) -> Result<Self, BoxError> {
        let input = input.into();
        let coords = input.to_coordinates()?;

        let pixel_box = if coords.is_normalized() {
            let shape = image_shape.ok_or(BoxError::MissingImageShape {
                operation: "convert normalized coordinates to pixels",
            })?;
            coords.to_pixel(shape)?
        } else {
            coords
        };

        debug!(
            format = input.format_name(),
            space = %coords.space(),
            x1 = pixel_box.x1(),
            y1 = pixel_box.y1(),
            x2 = pixel_box.x2(),
            y2 = pixel_box.y2(),
            "built bounding box"
        );

        Ok(Self {
            pixel_box,
            image_shape,
        })
    }

    /// The box in pixel coordinates.
    #[inline]
    pub fn pixel_box(&self) -> &Coordinates {
        &self.pixel_box
    }

    #[inline]
    pub fn image_shape(&self) -> Option<ImageShape> {
        self.image_shape
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.pixel_box.area()
    }

    /// Returns the corner coordinates, normalized on request.
    pub fn to_coordinates(&self, normalized: bool) -> Result<Coordinates, BoxError> {
        if !normalized {
            return Ok(self.pixel_box);
        }
        let shape = self.require_shape("export normalized coordinates")?;
        self.pixel_box.to_normalized(shape)
    }

    /// Exports as a VOC box, normalized on request.
    pub fn to_voc(&self, normalized: bool) -> Result<VocBox, BoxError> {
        Ok(VocBox::from_coordinates(&self.to_coordinates(normalized)?))
    }

    /// Exports as a COCO box, normalized on request.
    pub fn to_coco(&self, normalized: bool) -> Result<CocoBox, BoxError> {
        Ok(CocoBox::from_coordinates(&self.to_coordinates(normalized)?))
    }

    /// Exports as a normalized YOLO box.
    pub fn to_yolo(&self) -> Result<YoloBox, BoxError> {
        let shape = self.require_shape("export a YOLO box")?;
        let yolo = YoloBox::from_coordinates(&self.pixel_box.to_normalized(shape)?);
        // Center form must still describe a box.
        yolo.to_coordinates()?;
        Ok(yolo)
    }

    /// Area shared by both boxes, in square pixels.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        self.pixel_box.intersection_area(&other.pixel_box)
    }

    /// Intersection over union of two boxes.
    ///
    /// Symmetric and within `[0, 1]`. Boxes that only share an edge or a
    /// corner score `0.0`, as does a zero union.
    pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
        let intersection = a.intersection_area(b);
        // Symmetric in `a` and `b`, and finite whenever both areas are.
        let (small, large) = if a.area() <= b.area() {
            (a.area(), b.area())
        } else {
            (b.area(), a.area())
        };
        let union = large + (small - intersection);
        let iou = if union > 0.0 {
            intersection / union
        } else {
            0.0
        };
        trace!(intersection, union, iou, "computed iou");
        iou
    }

    /// Fraction of this box's area that lies inside `other`.
    ///
    /// Not symmetric: a small box fully inside a large one scores `1.0`,
    /// while the large box scores the ratio of the two areas.
    pub fn percentage_inside(&self, other: &BoundingBox) -> f64 {
        let area = self.area();
        if area <= 0.0 {
            return 0.0;
        }
        let fraction = self.intersection_area(other) / area;
        trace!(fraction, "computed percentage inside");
        fraction
    }

    fn require_shape(&self, operation: &'static str) -> Result<ImageShape, BoxError> {
        self.image_shape.ok_or(BoxError::MissingImageShape { operation })
    }
}
