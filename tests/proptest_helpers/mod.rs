#![allow(dead_code)]

use boxkit::geometry::{BoundingBox, Coordinates, ImageShape, VocBox};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Tolerance for a pixel → normalized → pixel round trip.
pub fn eps_roundtrip(shape: ImageShape) -> f64 {
    shape.width().max(shape.height()) as f64 * 1e-9
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(256);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_shape() -> BoxedStrategy<ImageShape> {
    (1u32..4096, 1u32..4096)
        .prop_map(|(h, w)| ImageShape::new(h, w).expect("positive dimensions"))
        .boxed()
}

/// Ordered pixel corners with extents of at least one pixel.
pub fn arb_pixel_coords() -> BoxedStrategy<Coordinates> {
    (-500.0f64..2000.0, -500.0f64..2000.0, 1.0f64..1500.0, 1.0f64..1500.0)
        .prop_map(|(x, y, w, h)| Coordinates::new(x, y, x + w, y + h).expect("ordered corners"))
        .boxed()
}

/// Ordered normalized corners inside the unit square.
pub fn arb_normalized_coords() -> BoxedStrategy<Coordinates> {
    (0.0f64..0.9, 0.0f64..0.9, 0.01f64..0.1, 0.01f64..0.1)
        .prop_map(|(x, y, w, h)| {
            Coordinates::normalized(x, y, x + w, y + h).expect("ordered corners")
        })
        .boxed()
}

/// A pixel-space bounding box built from a VOC box.
pub fn arb_bounding_box() -> BoxedStrategy<BoundingBox> {
    arb_pixel_coords()
        .prop_map(|c| {
            let voc = VocBox::new(c.x1(), c.y1(), c.x2(), c.y2()).expect("valid voc");
            BoundingBox::new(voc, None).expect("pixel box needs no shape")
        })
        .boxed()
}

pub fn approx_xyxy(a: &Coordinates, b: &Coordinates, eps: f64) -> Result<(), String> {
    let (l, r) = (a.to_xyxy(), b.to_xyxy());
    let diffs = [
        (l.0 - r.0).abs(),
        (l.1 - r.1).abs(),
        (l.2 - r.2).abs(),
        (l.3 - r.3).abs(),
    ];
    if diffs.iter().all(|d| *d <= eps) {
        Ok(())
    } else {
        Err(format!("{:?} != {:?} (eps={})", l, r, eps))
    }
}
