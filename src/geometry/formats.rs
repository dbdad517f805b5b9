//! VOC, COCO and YOLO box representations.
//!
//! Each format is a named view of the same rectangle. All three convert to
//! and from [`Coordinates`] through the [`BoxFormat`] trait, and carry the
//! [`Space`] tag of the values they hold so a normalized VOC box cannot be
//! mistaken for a pixel one.
//!
//! | Format | Fields | Default space |
//! |--------|--------|---------------|
//! | VOC    | `xmin, ymin, xmax, ymax` | pixel |
//! | COCO   | `x, y, width, height` (top-left + extent) | pixel |
//! | YOLO   | `x_center, y_center, width, height` | normalized |

use serde::{Deserialize, Serialize};

use super::{Coordinates, Space};
use crate::error::BoxError;

/// Conversion to and from the canonical [`Coordinates`] representation.
pub trait BoxFormat: Sized {
    /// Materializes the rectangle as corner coordinates in the same space.
    ///
    /// Corners are recomputed from the stored fields and validated again, so
    /// a box whose extent is lost to rounding fails with
    /// [`BoxError::InvalidGeometry`].
    fn to_coordinates(&self) -> Result<Coordinates, BoxError>;

    /// Builds this format from corner coordinates, keeping their space.
    fn from_coordinates(coords: &Coordinates) -> Self;
}

fn check_extent(width: f64, height: f64) -> Result<(), BoxError> {
    if !(width > 0.0 && width.is_finite()) || !(height > 0.0 && height.is_finite()) {
        return Err(BoxError::geometry(format!(
            "width and height must be positive and finite (width={}, height={})",
            width, height
        )));
    }
    Ok(())
}

// VOC

/// Pascal VOC box: corner coordinates `(xmin, ymin, xmax, ymax)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VocData")]
pub struct VocBox {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    space: Space,
}

impl VocBox {
    /// Creates a pixel-space VOC box.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, BoxError> {
        Self::with_space(xmin, ymin, xmax, ymax, Space::Pixel)
    }

    /// Creates a VOC box holding normalized values.
    pub fn new_normalized(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self, BoxError> {
        Self::with_space(xmin, ymin, xmax, ymax, Space::Normalized)
    }

    pub fn with_space(
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
        space: Space,
    ) -> Result<Self, BoxError> {
        let coords = Coordinates::with_space(xmin, ymin, xmax, ymax, space)?;
        Ok(Self::from_coordinates(&coords))
    }

    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    pub fn space(&self) -> Space {
        self.space
    }
}

impl BoxFormat for VocBox {
    fn to_coordinates(&self) -> Result<Coordinates, BoxError> {
        Coordinates::with_space(self.xmin, self.ymin, self.xmax, self.ymax, self.space)
    }

    fn from_coordinates(coords: &Coordinates) -> Self {
        Self {
            xmin: coords.x1(),
            ymin: coords.y1(),
            xmax: coords.x2(),
            ymax: coords.y2(),
            space: coords.space(),
        }
    }
}

#[derive(Deserialize)]
struct VocData {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    #[serde(default)]
    space: Space,
}

impl TryFrom<VocData> for VocBox {
    type Error = BoxError;

    fn try_from(d: VocData) -> Result<Self, Self::Error> {
        VocBox::with_space(d.xmin, d.ymin, d.xmax, d.ymax, d.space)
    }
}

// COCO

/// COCO box: top-left corner plus extent `(x, y, width, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CocoData")]
pub struct CocoBox {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    space: Space,
}

impl CocoBox {
    /// Creates a pixel-space COCO box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Result<Self, BoxError> {
        Self::with_space(x, y, width, height, Space::Pixel)
    }

    /// Creates a COCO box holding normalized values.
    pub fn new_normalized(x: f64, y: f64, width: f64, height: f64) -> Result<Self, BoxError> {
        Self::with_space(x, y, width, height, Space::Normalized)
    }

    pub fn with_space(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        space: Space,
    ) -> Result<Self, BoxError> {
        check_extent(width, height)?;
        // Reject extents that vanish when added to a large origin.
        Coordinates::with_space(x, y, x + width, y + height, space)?;
        Ok(Self {
            x,
            y,
            width,
            height,
            space,
        })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn space(&self) -> Space {
        self.space
    }
}

impl BoxFormat for CocoBox {
    fn to_coordinates(&self) -> Result<Coordinates, BoxError> {
        Coordinates::with_space(
            self.x,
            self.y,
            self.x + self.width,
            self.y + self.height,
            self.space,
        )
    }

    fn from_coordinates(coords: &Coordinates) -> Self {
        Self {
            x: coords.x1(),
            y: coords.y1(),
            width: coords.width(),
            height: coords.height(),
            space: coords.space(),
        }
    }
}

#[derive(Deserialize)]
struct CocoData {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    space: Space,
}

impl TryFrom<CocoData> for CocoBox {
    type Error = BoxError;

    fn try_from(d: CocoData) -> Result<Self, Self::Error> {
        CocoBox::with_space(d.x, d.y, d.width, d.height, d.space)
    }
}

// YOLO

/// YOLO box: center plus extent `(x_center, y_center, width, height)`.
///
/// YOLO labels are normalized by convention, so [`YoloBox::new`] tags the
/// values as normalized. Use [`YoloBox::pixel`] for pixel-valued boxes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "YoloData")]
pub struct YoloBox {
    x_center: f64,
    y_center: f64,
    width: f64,
    height: f64,
    space: Space,
}

impl YoloBox {
    /// Creates a normalized YOLO box.
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Result<Self, BoxError> {
        Self::with_space(x_center, y_center, width, height, Space::Normalized)
    }

    /// Creates a YOLO box holding pixel values.
    pub fn pixel(x_center: f64, y_center: f64, width: f64, height: f64) -> Result<Self, BoxError> {
        Self::with_space(x_center, y_center, width, height, Space::Pixel)
    }

    pub fn with_space(
        x_center: f64,
        y_center: f64,
        width: f64,
        height: f64,
        space: Space,
    ) -> Result<Self, BoxError> {
        check_extent(width, height)?;
        let (hw, hh) = (width / 2.0, height / 2.0);
        Coordinates::with_space(
            x_center - hw,
            y_center - hh,
            x_center + hw,
            y_center + hh,
            space,
        )?;
        Ok(Self {
            x_center,
            y_center,
            width,
            height,
            space,
        })
    }

    pub fn x_center(&self) -> f64 {
        self.x_center
    }

    pub fn y_center(&self) -> f64 {
        self.y_center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn space(&self) -> Space {
        self.space
    }
}

impl BoxFormat for YoloBox {
    fn to_coordinates(&self) -> Result<Coordinates, BoxError> {
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        Coordinates::with_space(
            self.x_center - hw,
            self.y_center - hh,
            self.x_center + hw,
            self.y_center + hh,
            self.space,
        )
    }

    fn from_coordinates(coords: &Coordinates) -> Self {
        Self {
            x_center: coords.x_center(),
            y_center: coords.y_center(),
            width: coords.width(),
            height: coords.height(),
            space: coords.space(),
        }
    }
}

#[derive(Deserialize)]
struct YoloData {
    x_center: f64,
    y_center: f64,
    width: f64,
    height: f64,
    #[serde(default = "normalized_space")]
    space: Space,
}

fn normalized_space() -> Space {
    Space::Normalized
}

impl TryFrom<YoloData> for YoloBox {
    type Error = BoxError;

    fn try_from(d: YoloData) -> Result<Self, Self::Error> {
        YoloBox::with_space(d.x_center, d.y_center, d.width, d.height, d.space)
    }
}

// Any format

/// Any of the box shapes a [`BoundingBox`](super::BoundingBox) accepts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnyBox {
    Coordinates(Coordinates),
    Voc(VocBox),
    Coco(CocoBox),
    Yolo(YoloBox),
}

impl AnyBox {
    pub fn to_coordinates(&self) -> Result<Coordinates, BoxError> {
        match self {
            AnyBox::Coordinates(c) => Ok(*c),
            AnyBox::Voc(b) => b.to_coordinates(),
            AnyBox::Coco(b) => b.to_coordinates(),
            AnyBox::Yolo(b) => b.to_coordinates(),
        }
    }

    /// Short lowercase name of the wrapped format.
    pub fn format_name(&self) -> &'static str {
        match self {
            AnyBox::Coordinates(_) => "coords",
            AnyBox::Voc(_) => "voc",
            AnyBox::Coco(_) => "coco",
            AnyBox::Yolo(_) => "yolo",
        }
    }
}

impl From<Coordinates> for AnyBox {
    fn from(c: Coordinates) -> Self {
        AnyBox::Coordinates(c)
    }
}

impl From<VocBox> for AnyBox {
    fn from(b: VocBox) -> Self {
        AnyBox::Voc(b)
    }
}

impl From<CocoBox> for AnyBox {
    fn from(b: CocoBox) -> Self {
        AnyBox::Coco(b)
    }
}

impl From<YoloBox> for AnyBox {
    fn from(b: YoloBox) -> Self {
        AnyBox::Yolo(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voc_fields() {
        let voc = VocBox::new(100.0, 100.0, 300.0, 300.0).unwrap();
        assert_eq!(voc.xmin(), 100.0);
        assert_eq!(voc.ymin(), 100.0);
        assert_eq!(voc.xmax(), 300.0);
        assert_eq!(voc.ymax(), 300.0);
        assert_eq!(voc.space(), Space::Pixel);
    }

    #[test]
    fn test_voc_ordering_rejected() {
        assert!(matches!(
            VocBox::new(300.0, 100.0, 100.0, 300.0),
            Err(BoxError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_coco_fields_and_coordinates() {
        let coco = CocoBox::new(100.0, 100.0, 200.0, 200.0).unwrap();
        assert_eq!(coco.x(), 100.0);
        assert_eq!(coco.y(), 100.0);
        assert_eq!(coco.width(), 200.0);
        assert_eq!(coco.height(), 200.0);
        assert_eq!(
            coco.to_coordinates().unwrap().to_xyxy(),
            (100.0, 100.0, 300.0, 300.0)
        );
    }

    #[test]
    fn test_coco_non_positive_extent_rejected() {
        assert!(CocoBox::new(10.0, 10.0, 0.0, 5.0).is_err());
        assert!(CocoBox::new(10.0, 10.0, 5.0, -1.0).is_err());
    }

    #[test]
    fn test_yolo_defaults_to_normalized() {
        let yolo = YoloBox::new(0.5, 0.5, 0.2, 0.2).unwrap();
        assert!((yolo.x_center() - 0.5).abs() < 1e-12);
        assert!((yolo.width() - 0.2).abs() < 1e-12);
        assert_eq!(yolo.space(), Space::Normalized);

        let c = yolo.to_coordinates().unwrap();
        assert!(c.is_normalized());
        assert!((c.x1() - 0.4).abs() < 1e-12);
        assert!((c.x2() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_yolo_pixel_constructor() {
        let yolo = YoloBox::pixel(50.0, 40.0, 20.0, 10.0).unwrap();
        let c = yolo.to_coordinates().unwrap();
        assert!(!c.is_normalized());
        assert_eq!(c.to_xyxy(), (40.0, 35.0, 60.0, 45.0));
    }

    #[test]
    fn test_from_coordinates_keeps_space() {
        let c = Coordinates::normalized(0.2, 0.2, 0.6, 0.6).unwrap();
        let voc = VocBox::from_coordinates(&c);
        assert_eq!(voc.space(), Space::Normalized);
        let coco = CocoBox::from_coordinates(&c);
        assert!((coco.width() - 0.4).abs() < 1e-12);
        let yolo = YoloBox::from_coordinates(&c);
        assert!((yolo.x_center() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_any_box_dispatch() {
        let any: AnyBox = CocoBox::new(1.0, 2.0, 3.0, 4.0).unwrap().into();
        assert_eq!(any.format_name(), "coco");
        assert_eq!(any.to_coordinates().unwrap().to_xyxy(), (1.0, 2.0, 4.0, 6.0));
    }

    #[test]
    fn test_non_finite_extent_rejected() {
        assert!(CocoBox::new(0.0, 0.0, f64::INFINITY, 1.0).is_err());
        assert!(YoloBox::new(0.5, 0.5, 0.2, f64::NAN).is_err());
        assert!(YoloBox::pixel(f64::INFINITY, 0.5, 1.0, 1.0).is_err());
        assert!(VocBox::new(0.0, f64::NEG_INFINITY, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_yolo_extent_lost_to_rounding_fails() {
        // Center and half extents cannot be told apart at this magnitude.
        let c = Coordinates::new(1e16, 0.0, 1e16 + 2.0, 1.0).unwrap();
        let yolo = YoloBox::from_coordinates(&c);
        assert!(matches!(
            yolo.to_coordinates(),
            Err(BoxError::InvalidGeometry { .. })
        ));
        assert!(AnyBox::from(yolo).to_coordinates().is_err());
    }

    #[test]
    fn test_yolo_deserialize_defaults_to_normalized() {
        let yolo: YoloBox = serde_json::from_str(
            r#"{"x_center": 0.5, "y_center": 0.5, "width": 0.1, "height": 0.1}"#,
        )
        .unwrap();
        assert_eq!(yolo.space(), Space::Normalized);

        let bad: Result<YoloBox, _> = serde_json::from_str(
            r#"{"x_center": 0.5, "y_center": 0.5, "width": 0.0, "height": 0.1}"#,
        );
        assert!(bad.is_err());
    }
}
