use boxkit::containment::{BoxContainmentChecker, ContainmentMethod};
use boxkit::geometry::BoundingBox;
use proptest::prelude::*;

mod proptest_helpers;

fn arb_method() -> impl Strategy<Value = ContainmentMethod> {
    prop_oneof![
        Just(ContainmentMethod::Iou),
        Just(ContainmentMethod::PercentageInside),
        Just(ContainmentMethod::Adaptive),
    ]
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn decision_matches_score_threshold(
        method in arb_method(),
        threshold in 0.0f64..1.0,
        a in proptest_helpers::arb_bounding_box(),
        b in proptest_helpers::arb_bounding_box()
    ) {
        let checker = BoxContainmentChecker::new(method, threshold).expect("threshold method");
        let score = checker.score(&a, &b).expect("threshold methods always score");
        prop_assert_eq!(checker.is_contained(&a, &b), score >= threshold);
    }

    #[test]
    fn adaptive_is_at_least_as_permissive(
        threshold in 0.0f64..1.0,
        a in proptest_helpers::arb_bounding_box(),
        b in proptest_helpers::arb_bounding_box()
    ) {
        let adaptive = BoxContainmentChecker::new(ContainmentMethod::Adaptive, threshold).unwrap();
        let iou = BoxContainmentChecker::new(ContainmentMethod::Iou, threshold).unwrap();
        let pct = BoxContainmentChecker::new(ContainmentMethod::PercentageInside, threshold).unwrap();

        if iou.is_contained(&a, &b) || pct.is_contained(&a, &b) {
            prop_assert!(adaptive.is_contained(&a, &b));
        }
    }

    #[test]
    fn iou_policy_is_symmetric(
        threshold in 0.0f64..1.0,
        a in proptest_helpers::arb_bounding_box(),
        b in proptest_helpers::arb_bounding_box()
    ) {
        let checker = BoxContainmentChecker::new(ContainmentMethod::Iou, threshold).unwrap();
        prop_assert_eq!(checker.is_contained(&a, &b), checker.is_contained(&b, &a));
    }

    #[test]
    fn every_box_contains_itself_under_percentage_inside(a in proptest_helpers::arb_bounding_box()) {
        let checker = BoxContainmentChecker::new(ContainmentMethod::PercentageInside, 1.0).unwrap();
        prop_assert!(checker.is_contained(&a, &a));
        prop_assert_eq!(a.percentage_inside(&a), 1.0);
    }

    #[test]
    fn contained_pairs_agrees_with_is_contained(
        inner in prop::collection::vec(proptest_helpers::arb_bounding_box(), 0..5),
        outer in prop::collection::vec(proptest_helpers::arb_bounding_box(), 0..5)
    ) {
        let checker = BoxContainmentChecker::custom(|a: &BoundingBox, b: &BoundingBox| {
            a.area() <= b.area()
        });
        let pairs = checker.contained_pairs(&inner, &outer);
        let expected: Vec<(usize, usize)> = (0..inner.len())
            .flat_map(|i| (0..outer.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| checker.is_contained(&inner[i], &outer[j]))
            .collect();
        prop_assert_eq!(pairs, expected);
    }
}
