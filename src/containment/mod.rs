//! Containment policies: deciding whether one box lies inside another.
//!
//! A [`BoxContainmentChecker`] is a fixed policy evaluated over pairs of
//! [`BoundingBox`] values. Three policies compare an overlap score with a
//! threshold; the fourth delegates to a caller-supplied predicate.
//!
//! | Method | Score compared against the threshold |
//! |--------|--------------------------------------|
//! | `iou` | `BoundingBox::iou(a, b)` |
//! | `percentage_inside` | `a.percentage_inside(b)` |
//! | `adaptive` | the larger of the two above |
//!
//! `adaptive` favours small boxes inside large ones, where IoU alone is low
//! even though the inner box is fully covered.

mod config;

pub use config::ContainmentConfig;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BoxError;
use crate::geometry::BoundingBox;

/// The containment methods a checker can be built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentMethod {
    Iou,
    PercentageInside,
    Adaptive,
    Custom,
}

impl ContainmentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainmentMethod::Iou => "iou",
            ContainmentMethod::PercentageInside => "percentage_inside",
            ContainmentMethod::Adaptive => "adaptive",
            ContainmentMethod::Custom => "custom",
        }
    }
}

impl fmt::Display for ContainmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainmentMethod {
    type Err = BoxError;

    /// Parses a method token, case-insensitively and accepting `-` for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "iou" => Ok(ContainmentMethod::Iou),
            "percentage_inside" => Ok(ContainmentMethod::PercentageInside),
            "adaptive" => Ok(ContainmentMethod::Adaptive),
            "custom" => Ok(ContainmentMethod::Custom),
            _ => Err(BoxError::InvalidConfiguration(format!(
                "unknown containment method '{}' (supported: iou, percentage_inside, adaptive, custom)",
                s
            ))),
        }
    }
}

/// A caller-supplied containment rule: `predicate(inner, outer)`.
pub type ContainmentPredicate = Arc<dyn Fn(&BoundingBox, &BoundingBox) -> bool + Send + Sync>;

#[derive(Clone)]
enum Policy {
    Iou(f64),
    PercentageInside(f64),
    Adaptive(f64),
    Custom(ContainmentPredicate),
}

/// Decides whether box `a` is contained in box `b` under a fixed policy.
///
/// # Example
///
/// ```
/// use boxkit::containment::{BoxContainmentChecker, ContainmentMethod};
/// use boxkit::geometry::{BoundingBox, VocBox};
///
/// let inner = BoundingBox::new(VocBox::new(20.0, 20.0, 40.0, 40.0).unwrap(), None).unwrap();
/// let outer = BoundingBox::new(VocBox::new(10.0, 10.0, 50.0, 50.0).unwrap(), None).unwrap();
///
/// let checker = BoxContainmentChecker::new(ContainmentMethod::PercentageInside, 0.9).unwrap();
/// assert!(checker.is_contained(&inner, &outer));
/// assert!(!checker.is_contained(&outer, &inner));
/// ```
#[derive(Clone)]
pub struct BoxContainmentChecker {
    policy: Policy,
}

impl BoxContainmentChecker {
    /// Creates a threshold-based checker.
    ///
    /// Fails with [`BoxError::InvalidConfiguration`] for
    /// [`ContainmentMethod::Custom`] (use [`custom`](Self::custom)) or a
    /// non-finite threshold.
    pub fn new(method: ContainmentMethod, threshold: f64) -> Result<Self, BoxError> {
        if !threshold.is_finite() {
            return Err(BoxError::InvalidConfiguration(format!(
                "threshold must be finite, got {}",
                threshold
            )));
        }
        let policy = match method {
            ContainmentMethod::Iou => Policy::Iou(threshold),
            ContainmentMethod::PercentageInside => Policy::PercentageInside(threshold),
            ContainmentMethod::Adaptive => Policy::Adaptive(threshold),
            ContainmentMethod::Custom => {
                return Err(BoxError::InvalidConfiguration(
                    "the custom method requires a predicate; use BoxContainmentChecker::custom"
                        .to_string(),
                ))
            }
        };
        Ok(Self { policy })
    }

    /// Creates a threshold-based checker from a method token such as `"iou"`.
    pub fn from_token(token: &str, threshold: f64) -> Result<Self, BoxError> {
        Self::new(token.parse()?, threshold)
    }

    /// Creates a checker that delegates to `predicate(inner, outer)`.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&BoundingBox, &BoundingBox) -> bool + Send + Sync + 'static,
    {
        Self {
            policy: Policy::Custom(Arc::new(predicate)),
        }
    }

    pub fn method(&self) -> ContainmentMethod {
        match self.policy {
            Policy::Iou(_) => ContainmentMethod::Iou,
            Policy::PercentageInside(_) => ContainmentMethod::PercentageInside,
            Policy::Adaptive(_) => ContainmentMethod::Adaptive,
            Policy::Custom(_) => ContainmentMethod::Custom,
        }
    }

    /// The threshold, or `None` for a custom checker.
    pub fn threshold(&self) -> Option<f64> {
        match self.policy {
            Policy::Iou(t) | Policy::PercentageInside(t) | Policy::Adaptive(t) => Some(t),
            Policy::Custom(_) => None,
        }
    }

    /// The score compared against the threshold, or `None` for a custom
    /// checker.
    pub fn score(&self, a: &BoundingBox, b: &BoundingBox) -> Option<f64> {
        match self.policy {
            Policy::Iou(_) => Some(BoundingBox::iou(a, b)),
            Policy::PercentageInside(_) => Some(a.percentage_inside(b)),
            Policy::Adaptive(_) => Some(BoundingBox::iou(a, b).max(a.percentage_inside(b))),
            Policy::Custom(_) => None,
        }
    }

    /// Returns true if `a` is contained in `b` under this policy.
    pub fn is_contained(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        let contained = match &self.policy {
            Policy::Custom(predicate) => predicate(a, b),
            Policy::Iou(t) | Policy::PercentageInside(t) | Policy::Adaptive(t) => {
                self.score(a, b).is_some_and(|score| score >= *t)
            }
        };
        debug!(method = %self.method(), contained, "containment check");
        contained
    }

    /// Every `(i, j)` such that `inner[i]` is contained in `outer[j]`, in
    /// row-major order.
    pub fn contained_pairs(&self, inner: &[BoundingBox], outer: &[BoundingBox]) -> Vec<(usize, usize)> {
        inner
            .iter()
            .enumerate()
            .flat_map(|(i, a)| {
                outer
                    .iter()
                    .enumerate()
                    .filter(move |(_, b)| self.is_contained(a, b))
                    .map(move |(j, _)| (i, j))
            })
            .collect()
    }
}

impl fmt::Debug for BoxContainmentChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxContainmentChecker")
            .field("method", &self.method())
            .field("threshold", &self.threshold())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ImageShape, VocBox};

    fn bb(x1: f64, y1: f64, x2: f64, y2: f64) -> BoundingBox {
        BoundingBox::new(
            VocBox::new(x1, y1, x2, y2).unwrap(),
            Some(ImageShape::new(100, 100).unwrap()),
        )
        .unwrap()
    }

    fn inner() -> BoundingBox {
        bb(20.0, 20.0, 40.0, 40.0)
    }

    fn outer() -> BoundingBox {
        bb(10.0, 10.0, 50.0, 50.0)
    }

    fn far() -> BoundingBox {
        bb(60.0, 60.0, 90.0, 90.0)
    }

    #[test]
    fn test_method_tokens() {
        assert_eq!("iou".parse::<ContainmentMethod>().unwrap(), ContainmentMethod::Iou);
        assert_eq!(
            "Percentage-Inside".parse::<ContainmentMethod>().unwrap(),
            ContainmentMethod::PercentageInside
        );
        assert_eq!(
            "ADAPTIVE".parse::<ContainmentMethod>().unwrap(),
            ContainmentMethod::Adaptive
        );
        assert!(matches!(
            "invalid_method".parse::<ContainmentMethod>(),
            Err(BoxError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_iou_policy() {
        // inner/outer IoU is 400 / 1600.
        let low = BoxContainmentChecker::new(ContainmentMethod::Iou, 0.24).unwrap();
        let high = BoxContainmentChecker::new(ContainmentMethod::Iou, 0.26).unwrap();
        assert!(low.is_contained(&inner(), &outer()));
        assert!(!high.is_contained(&inner(), &outer()));
        assert!(!low.is_contained(&inner(), &far()));
    }

    #[test]
    fn test_percentage_inside_policy_is_asymmetric() {
        let checker = BoxContainmentChecker::new(ContainmentMethod::PercentageInside, 0.99).unwrap();
        assert!(checker.is_contained(&inner(), &outer()));
        assert!(!checker.is_contained(&outer(), &inner()));
    }

    #[test]
    fn test_adaptive_takes_larger_score() {
        let checker = BoxContainmentChecker::new(ContainmentMethod::Adaptive, 0.5).unwrap();
        assert_eq!(checker.score(&inner(), &outer()), Some(1.0));
        assert_eq!(checker.score(&outer(), &inner()), Some(0.25));
        assert!(checker.is_contained(&inner(), &outer()));
        assert!(!checker.is_contained(&outer(), &inner()));
    }

    #[test]
    fn test_custom_predicate() {
        let checker = BoxContainmentChecker::custom(|a, b| a.area() < b.area());
        assert_eq!(checker.method(), ContainmentMethod::Custom);
        assert_eq!(checker.threshold(), None);
        assert_eq!(checker.score(&inner(), &outer()), None);
        assert!(checker.is_contained(&inner(), &outer()));
        assert!(!checker.is_contained(&outer(), &inner()));
    }

    #[test]
    fn test_custom_via_new_rejected() {
        assert!(matches!(
            BoxContainmentChecker::new(ContainmentMethod::Custom, 0.5),
            Err(BoxError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_token_rejected() {
        assert!(matches!(
            BoxContainmentChecker::from_token("invalid_method", 0.5),
            Err(BoxError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        assert!(BoxContainmentChecker::new(ContainmentMethod::Iou, f64::NAN).is_err());
        assert!(BoxContainmentChecker::new(ContainmentMethod::Adaptive, f64::INFINITY).is_err());
    }

    #[test]
    fn test_contained_pairs() {
        let checker = BoxContainmentChecker::new(ContainmentMethod::PercentageInside, 1.0).unwrap();
        let pairs = checker.contained_pairs(&[inner(), far()], &[far(), outer()]);
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_checker_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BoxContainmentChecker>();
    }
}
