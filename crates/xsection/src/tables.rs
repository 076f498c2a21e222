//! Static lookup tables: per-kind display metadata, default materials and
//! recommended design ranges.
//!
//! ## Rust Lesson #11: `static` slices
//!
//! A `static` lives for the whole program and can never be mutated (without
//! `unsafe`). Handing out `&'static` references is free, so every solve and
//! validate call reads the same table with no locking at all.

use serde::Serialize;

use crate::components::ComponentKind;

/// Display metadata for a component kind.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct KindMetadata {
    /// Human readable label
    pub label: &'static str,
    /// Layer name used by drawing exporters
    pub layer: &'static str,
    /// Brief description of the component
    pub description: &'static str,
}

impl KindMetadata {
    pub const fn new(label: &'static str, layer: &'static str, description: &'static str) -> Self {
        Self { label, layer, description }
    }
}

/// A construction material a component is drawn/hatched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Material {
    pub key: &'static str,
    pub description: &'static str,
}

pub static MATERIALS: &[Material] = &[
    Material { key: "asphalt", description: "Hot-mix asphalt pavement" },
    Material { key: "concrete", description: "Portland cement concrete" },
    Material { key: "turf", description: "Seeded or sodded topsoil" },
    Material { key: "earth", description: "Graded native or embankment soil" },
    Material { key: "steel", description: "Steel sheet or post" },
    Material { key: "crushed_rock", description: "Crushed stone base or subbase" },
];

/// Look up a material by key.
pub fn material(key: &str) -> Option<&'static Material> {
    MATERIALS.iter().find(|m| m.key == key)
}

/// Default material per kind. Every kind has one.
pub fn material_for(kind: ComponentKind) -> &'static Material {
    let key = match kind {
        ComponentKind::Lane | ComponentKind::Shoulder | ComponentKind::BikeLane => "asphalt",
        ComponentKind::Curb
        | ComponentKind::Sidewalk
        | ComponentKind::Barrier
        | ComponentKind::RetainingWall => "concrete",
        ComponentKind::Median | ComponentKind::Buffer => "turf",
        ComponentKind::CutSlope | ComponentKind::FillSlope => "earth",
    };
    material(key).unwrap_or(&MATERIALS[0])
}

/// Recommended design envelope for a kind.
///
/// These are advisories. Falling outside a profile is reported as a
/// standards warning and never blocks solving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardProfile {
    pub kind: ComponentKind,
    /// Recommended width (thickness for walls) in meters
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    /// Recommended cross-slope magnitude for drainage
    pub min_cross_slope: Option<f64>,
    pub max_cross_slope: Option<f64>,
    /// Recommended maximum height in meters
    pub max_height: Option<f64>,
}

impl StandardProfile {
    const fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            min_width: None,
            max_width: None,
            min_cross_slope: None,
            max_cross_slope: None,
            max_height: None,
        }
    }

    const fn width(mut self, min: f64, max: f64) -> Self {
        self.min_width = Some(min);
        self.max_width = Some(max);
        self
    }

    const fn min_width(mut self, min: f64) -> Self {
        self.min_width = Some(min);
        self
    }

    const fn cross_slope(mut self, min: f64, max: f64) -> Self {
        self.min_cross_slope = Some(min);
        self.max_cross_slope = Some(max);
        self
    }

    const fn max_cross_slope(mut self, max: f64) -> Self {
        self.max_cross_slope = Some(max);
        self
    }

    const fn max_height(mut self, max: f64) -> Self {
        self.max_height = Some(max);
        self
    }
}

pub static STANDARD_PROFILES: &[StandardProfile] = &[
    StandardProfile::new(ComponentKind::Lane).width(2.7, 4.0).cross_slope(0.015, 0.06),
    StandardProfile::new(ComponentKind::Shoulder).width(0.6, 3.6).cross_slope(0.015, 0.06),
    // Accessible route: 2% maximum cross-slope
    StandardProfile::new(ComponentKind::Sidewalk).width(1.5, 6.0).max_cross_slope(0.02),
    StandardProfile::new(ComponentKind::BikeLane).width(1.2, 2.5).max_cross_slope(0.06),
    StandardProfile::new(ComponentKind::Curb).width(0.1, 1.3).max_height(0.30),
    StandardProfile::new(ComponentKind::Median).min_width(1.2),
    StandardProfile::new(ComponentKind::Buffer).min_width(0.3),
    StandardProfile::new(ComponentKind::Barrier).width(0.15, 1.0).max_height(1.5),
    StandardProfile::new(ComponentKind::RetainingWall).width(0.05, 1.5).max_height(15.0),
];

/// Look up the profile for a kind, if it has one.
pub fn standard_profile(kind: ComponentKind) -> Option<&'static StandardProfile> {
    STANDARD_PROFILES.iter().find(|p| p.kind == kind)
}

/// Slopes steeper than this H:V ratio are flagged as unstable.
pub const STEEPEST_SLOPE_RATIO: f64 = 2.0;

/// Slopes flatter than this H:V ratio are flagged for review.
pub const FLATTEST_SLOPE_RATIO: f64 = 20.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_material() {
        for kind in ComponentKind::all() {
            let material = material_for(*kind);
            assert!(MATERIALS.contains(material), "{:?} has no table material", kind);
        }
    }

    #[test]
    fn profiles_are_unique_per_kind() {
        for profile in STANDARD_PROFILES {
            let count = STANDARD_PROFILES.iter().filter(|p| p.kind == profile.kind).count();
            assert_eq!(count, 1, "{:?} listed {} times", profile.kind, count);
        }
    }

    #[test]
    fn slopes_have_no_width_profile() {
        assert!(standard_profile(ComponentKind::CutSlope).is_none());
        assert!(standard_profile(ComponentKind::FillSlope).is_none());
    }

    #[test]
    fn profile_ranges_are_ordered() {
        for p in STANDARD_PROFILES {
            if let (Some(min), Some(max)) = (p.min_width, p.max_width) {
                assert!(min < max, "{:?} width range inverted", p.kind);
            }
            if let (Some(min), Some(max)) = (p.min_cross_slope, p.max_cross_slope) {
                assert!(min < max, "{:?} cross-slope range inverted", p.kind);
            }
        }
    }
}
