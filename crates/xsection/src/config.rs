//! Tunables for solving and validation.
//!
//! Both settings structs are plain data with defaults for every field, so a
//! YAML file only needs to name what it changes:
//!
//! ```yaml
//! cross_slope_limit: 0.08
//! traversable_ratio: 6.0
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Thresholds the validator measures against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Advisory bound on |cross_slope| (rise/run)
    pub cross_slope_limit: f64,
    /// Allowed gap between an insertion point and the prior attachment (m)
    pub continuity_tolerance: f64,
    /// Flattest H:V ratio below which a slope is not traversable
    pub traversable_ratio: f64,
    /// Compare components against the recommended design profiles
    pub check_standards: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            cross_slope_limit: 0.10,
            continuity_tolerance: 0.001,
            traversable_ratio: 4.0,
            check_standards: true,
        }
    }
}

impl ValidationPolicy {
    /// Parse a policy from YAML; missing fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let policy: ValidationPolicy = serde_yaml::from_str(yaml)?;
        policy.checked()
    }

    /// Load a policy from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    fn checked(self) -> Result<Self> {
        if !(self.cross_slope_limit >= 0.0) {
            return Err(invalid("cross_slope_limit", self.cross_slope_limit));
        }
        if !(self.continuity_tolerance >= 0.0) {
            return Err(invalid("continuity_tolerance", self.continuity_tolerance));
        }
        if !(self.traversable_ratio > 0.0) {
            return Err(invalid("traversable_ratio", self.traversable_ratio));
        }
        Ok(self)
    }
}

/// Reference elevations used to close component outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Pavement datum: surface outlines are closed down to this elevation,
    /// or to the lowest surface vertex when that is lower.
    pub datum: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self { datum: 0.0 }
    }
}

impl GeometrySettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: GeometrySettings = serde_yaml::from_str(yaml)?;
        if !settings.datum.is_finite() {
            return Err(invalid("datum", settings.datum));
        }
        Ok(settings)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

fn invalid(field: &'static str, value: f64) -> ConfigError {
    ConfigError::Invalid { field, reason: format!("got {}", value) }
}
