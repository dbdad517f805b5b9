//! Data-driven checker configuration.
//!
//! Lets a containment policy come from a YAML or JSON file instead of code:
//!
//! ```yaml
//! method: adaptive
//! threshold: 0.6
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BoxContainmentChecker, ContainmentMethod};
use crate::error::BoxError;

/// Serializable description of a threshold-based checker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainmentConfig {
    /// Method token, e.g. `iou`, `percentage_inside` or `adaptive`.
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

impl ContainmentConfig {
    pub fn new(method: impl Into<String>, threshold: Option<f64>) -> Self {
        Self {
            method: method.into(),
            threshold,
        }
    }

    /// Parses a config from YAML (JSON is accepted as a YAML subset).
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Reads a config file.
    pub fn read(path: &Path) -> Result<Self, BoxError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|source| BoxError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the checker this config describes.
    ///
    /// Fails with [`BoxError::InvalidConfiguration`] for an unknown method,
    /// for `custom` (predicates cannot be described as data), and for a
    /// threshold method without a threshold.
    pub fn build(&self) -> Result<BoxContainmentChecker, BoxError> {
        let method: ContainmentMethod = self.method.parse()?;
        if method == ContainmentMethod::Custom {
            return Err(BoxError::InvalidConfiguration(
                "the custom method cannot be configured from data".to_string(),
            ));
        }
        let threshold = self.threshold.ok_or_else(|| {
            BoxError::InvalidConfiguration(format!("method '{}' requires a threshold", method))
        })?;
        BoxContainmentChecker::new(method, threshold)
    }
}
