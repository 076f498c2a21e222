//! Pavement layers: the structure under a lane or shoulder surface.
//!
//! Layers are listed from the surface down. Each one is a band of constant
//! thickness that follows the surface cross-slope, so a layered strip is
//! drawn as a stack of parallelograms instead of one outline closed to the
//! datum.
//!
//! ## Rust Lesson #15: Making bad states unrepresentable
//!
//! A concrete slab is reinforced exactly when it carries a steel rate, so
//! the rate is an `Option` instead of a `reinforced: bool` next to a number
//! that might or might not be there. There's no "reinforced but no steel"
//! case left to validate.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Polygon};
use crate::tables::{self, Material};
use crate::validate::{Category, Findings, Requirement};

/// One layer of a pavement structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "material", rename_all = "snake_case")]
pub enum PavementLayer {
    /// Hot-mix asphalt lift
    Asphalt {
        thickness: f64,
        /// Maximum aggregate size (mm)
        aggregate_size: f64,
        /// Performance grade, e.g. "PG 64-22"
        binder_type: String,
        /// Binder content, percent by weight
        binder_percentage: f64,
        /// Compacted density (kg/m³)
        density: f64,
    },
    /// Portland cement concrete slab
    Concrete {
        thickness: f64,
        /// 28-day compressive strength (MPa)
        compressive_strength: f64,
        /// Reinforcing steel in lb per cubic yard; `None` for plain slabs
        #[serde(default)]
        steel_per_cy: Option<f64>,
    },
    /// Crushed rock base or subbase
    CrushedRock {
        thickness: f64,
        aggregate_size: f64,
        density: f64,
        #[serde(default = "default_rock_type")]
        material_type: String,
    },
}

fn default_rock_type() -> String {
    "crushed_stone".to_string()
}

// Typical ranges, reported as standards warnings when exceeded.
const ASPHALT_THICKNESS: (f64, f64) = (0.04, 0.15);
const ASPHALT_MAX_AGGREGATE: f64 = 37.5;
const ASPHALT_BINDER: (f64, f64) = (4.0, 7.0);
const ASPHALT_DENSITY: (f64, f64) = (2200.0, 2500.0);
const CONCRETE_THICKNESS: (f64, f64) = (0.15, 0.40);
const CONCRETE_STRENGTH: (f64, f64) = (20.0, 50.0);
const CONCRETE_STEEL: (f64, f64) = (20.0, 100.0);
const ROCK_THICKNESS: (f64, f64) = (0.10, 0.60);
const ROCK_AGGREGATE: (f64, f64) = (19.0, 63.0);
const ROCK_DENSITY: (f64, f64) = (1800.0, 2400.0);

impl PavementLayer {
    /// A dense-graded surface lift with a PG 64-22 binder.
    pub fn asphalt(thickness: f64) -> Self {
        PavementLayer::Asphalt {
            thickness,
            aggregate_size: 12.5,
            binder_type: "PG 64-22".to_string(),
            binder_percentage: 5.5,
            density: 2400.0,
        }
    }

    /// A plain (unreinforced) concrete slab.
    pub fn concrete(thickness: f64, compressive_strength: f64) -> Self {
        PavementLayer::Concrete { thickness, compressive_strength, steel_per_cy: None }
    }

    pub fn reinforced_concrete(
        thickness: f64,
        compressive_strength: f64,
        steel_per_cy: f64,
    ) -> Self {
        PavementLayer::Concrete {
            thickness,
            compressive_strength,
            steel_per_cy: Some(steel_per_cy),
        }
    }

    /// A crushed stone base course with 37.5 mm aggregate.
    pub fn crushed_rock(thickness: f64) -> Self {
        PavementLayer::CrushedRock {
            thickness,
            aggregate_size: 37.5,
            density: 2200.0,
            material_type: default_rock_type(),
        }
    }

    pub fn thickness(&self) -> f64 {
        match *self {
            PavementLayer::Asphalt { thickness, .. }
            | PavementLayer::Concrete { thickness, .. }
            | PavementLayer::CrushedRock { thickness, .. } => thickness,
        }
    }

    pub fn material(&self) -> &'static Material {
        let key = match self {
            PavementLayer::Asphalt { .. } => "asphalt",
            PavementLayer::Concrete { .. } => "concrete",
            PavementLayer::CrushedRock { .. } => "crushed_rock",
        };
        tables::material(key).unwrap_or(&tables::MATERIALS[0])
    }

    /// Thickness must be finite and positive; everything else is advisory.
    pub(crate) fn check(&self, findings: &mut Findings) {
        let standards = findings.policy().check_standards;
        match *self {
            PavementLayer::Asphalt {
                thickness,
                aggregate_size,
                binder_percentage,
                density,
                ..
            } => {
                if findings.positive("thickness", thickness) && standards {
                    typical(findings, "thickness", thickness, ASPHALT_THICKNESS);
                }
                if findings.positive("aggregate_size", aggregate_size) && standards {
                    findings.advise(
                        Category::Standard,
                        "aggregate_size",
                        aggregate_size,
                        Requirement::AtMost(ASPHALT_MAX_AGGREGATE),
                        "aggregate coarser than typical",
                    );
                }
                if standards {
                    typical(findings, "binder_percentage", binder_percentage, ASPHALT_BINDER);
                    typical(findings, "density", density, ASPHALT_DENSITY);
                }
            }
            PavementLayer::Concrete { thickness, compressive_strength, steel_per_cy } => {
                if findings.positive("thickness", thickness) && standards {
                    typical(findings, "thickness", thickness, CONCRETE_THICKNESS);
                }
                let strength = compressive_strength;
                if findings.positive("compressive_strength", strength) && standards {
                    typical(findings, "compressive_strength", strength, CONCRETE_STRENGTH);
                }
                if let Some(steel) = steel_per_cy {
                    if findings.positive("steel_per_cy", steel) && standards {
                        typical(findings, "steel_per_cy", steel, CONCRETE_STEEL);
                    }
                }
            }
            PavementLayer::CrushedRock { thickness, aggregate_size, density, .. } => {
                if findings.positive("thickness", thickness) && standards {
                    typical(findings, "thickness", thickness, ROCK_THICKNESS);
                }
                if findings.positive("aggregate_size", aggregate_size) && standards {
                    typical(findings, "aggregate_size", aggregate_size, ROCK_AGGREGATE);
                }
                if standards {
                    typical(findings, "density", density, ROCK_DENSITY);
                }
            }
        }
    }
}

fn typical(findings: &mut Findings, attribute: &'static str, value: f64, (min, max): (f64, f64)) {
    findings.advise(
        Category::Standard,
        attribute,
        value,
        Requirement::Between { min, max },
        "outside typical pavement layer range",
    );
}

/// Combined thickness of a layer stack.
pub fn total_depth(layers: &[PavementLayer]) -> f64 {
    layers.iter().map(PavementLayer::thickness).sum()
}

/// One polygon per layer under the surface edge `insertion`→`attachment`,
/// surface layer first. Each layer's top is the previous layer's bottom.
pub fn stack(layers: &[PavementLayer], insertion: Point, attachment: Point) -> Vec<Polygon> {
    let mut depth = 0.0;
    layers
        .iter()
        .map(|layer| {
            let top = depth;
            depth += layer.thickness();
            Polygon::from_ring([
                insertion.offset(0.0, -depth),
                attachment.offset(0.0, -depth),
                attachment.offset(0.0, -top),
                insertion.offset(0.0, -top),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentKind;
    use crate::config::ValidationPolicy;

    fn layer_findings(layer: &PavementLayer) -> Vec<crate::validate::Violation> {
        let policy = ValidationPolicy::default();
        let mut findings = Findings::new(0, ComponentKind::Lane, &policy);
        layer.check(&mut findings);
        findings.into_violations()
    }

    #[test]
    fn typical_layers_are_clean() {
        assert!(layer_findings(&PavementLayer::asphalt(0.05)).is_empty());
        assert!(layer_findings(&PavementLayer::reinforced_concrete(0.25, 35.0, 40.0)).is_empty());
        assert!(layer_findings(&PavementLayer::crushed_rock(0.20)).is_empty());
    }

    #[test]
    fn negative_thickness_is_an_error() {
        let violations = layer_findings(&PavementLayer::asphalt(-0.05));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].attribute, Some("thickness"));
        assert!(violations[0].is_error());
    }

    #[test]
    fn infinite_thickness_is_an_error() {
        let violations = layer_findings(&PavementLayer::crushed_rock(f64::INFINITY));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].required_value, Requirement::Finite);
    }

    #[test]
    fn thin_slab_and_light_steel_are_advisories() {
        let violations = layer_findings(&PavementLayer::reinforced_concrete(0.10, 35.0, 10.0));
        let attrs: Vec<_> = violations.iter().map(|v| v.attribute).collect();
        assert_eq!(attrs, [Some("thickness"), Some("steel_per_cy")]);
        assert!(violations.iter().all(|v| v.category == Category::Standard));
    }

    #[test]
    fn stack_follows_surface() {
        let layers = [PavementLayer::asphalt(0.10), PavementLayer::crushed_rock(0.20)];
        let ins = Point::new(0.0, 100.0);
        let att = Point::new(3.6, 100.0 - 3.6 * 0.02);
        let polys = stack(&layers, ins, att);
        assert_eq!(polys.len(), 2);

        let inside = |poly: &Polygon| -> Vec<f64> {
            poly.outer.iter().filter(|p| p.x == ins.x).map(|p| p.y).collect()
        };
        let surface = inside(&polys[0]);
        let base = inside(&polys[1]);
        assert!(surface.contains(&100.0));
        assert!(surface.iter().any(|y| (y - 99.9).abs() < 1e-12));
        assert!(base.iter().any(|y| (y - 99.9).abs() < 1e-12));
        assert!(base.iter().any(|y| (y - 99.7).abs() < 1e-12));
        assert!(polys.iter().all(|p| p.signed_area() > 0.0));
        assert!((total_depth(&layers) - 0.30).abs() < 1e-12);
    }

    #[test]
    fn layers_deserialize_by_material() {
        let layer: PavementLayer = serde_yaml::from_str(
            "material: crushed_rock\nthickness: 0.15\naggregate_size: 50.0\ndensity: 2100.0\n",
        )
        .unwrap();
        assert_eq!(layer.thickness(), 0.15);
        assert_eq!(layer.material().key, "crushed_rock");

        let slab: PavementLayer = serde_yaml::from_str(
            "material: concrete\nthickness: 0.25\ncompressive_strength: 35.0\n",
        )
        .unwrap();
        assert_eq!(slab, PavementLayer::concrete(0.25, 35.0));
    }
}
