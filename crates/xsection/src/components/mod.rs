//! Road components and their snap-together rules.
//!
//! Every kind answers four questions:
//! - **insertion**: where do I begin, given the incoming attachment point?
//! - **attachment**: where does the next component begin?
//! - **geometry**: what closed outline do I occupy?
//! - **check**: are my attributes sound?
//!
//! The rules themselves live in one file per family of kinds; this module
//! holds the closed `ComponentSpec` sum type and dispatches to them.

mod barrier;
mod curb;
mod slope;
mod strip;
mod wall;

pub use slope::horizontal_extent;

use serde::{Deserialize, Serialize};

use crate::config::{GeometrySettings, ValidationPolicy};
use crate::geometry::{Point, Polygon};
use crate::pavement::{self, PavementLayer};
use crate::tables::{self, KindMetadata};
use crate::validate::{Findings, Violation};

/// The closed set of component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Lane,
    Shoulder,
    Curb,
    Median,
    Buffer,
    Sidewalk,
    BikeLane,
    Barrier,
    RetainingWall,
    CutSlope,
    FillSlope,
}

impl ComponentKind {
    /// Get all component kinds.
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Lane,
            ComponentKind::Shoulder,
            ComponentKind::Curb,
            ComponentKind::Median,
            ComponentKind::Buffer,
            ComponentKind::Sidewalk,
            ComponentKind::BikeLane,
            ComponentKind::Barrier,
            ComponentKind::RetainingWall,
            ComponentKind::CutSlope,
            ComponentKind::FillSlope,
        ]
    }

    /// Get kind name as string.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Lane => "lane",
            ComponentKind::Shoulder => "shoulder",
            ComponentKind::Curb => "curb",
            ComponentKind::Median => "median",
            ComponentKind::Buffer => "buffer",
            ComponentKind::Sidewalk => "sidewalk",
            ComponentKind::BikeLane => "bike_lane",
            ComponentKind::Barrier => "barrier",
            ComponentKind::RetainingWall => "retaining_wall",
            ComponentKind::CutSlope => "cut_slope",
            ComponentKind::FillSlope => "fill_slope",
        }
    }

    /// Parse a kind from its name or a common alias.
    pub fn from_name(name: &str) -> Option<ComponentKind> {
        match name.to_lowercase().as_str() {
            "lane" | "travel_lane" => Some(ComponentKind::Lane),
            "shoulder" => Some(ComponentKind::Shoulder),
            "curb" | "curb_and_gutter" => Some(ComponentKind::Curb),
            "median" => Some(ComponentKind::Median),
            "buffer" | "planting_strip" => Some(ComponentKind::Buffer),
            "sidewalk" => Some(ComponentKind::Sidewalk),
            "bike_lane" | "bikelane" => Some(ComponentKind::BikeLane),
            "barrier" | "guardrail" => Some(ComponentKind::Barrier),
            "retaining_wall" | "wall" | "shoring" => Some(ComponentKind::RetainingWall),
            "cut_slope" | "backslope" => Some(ComponentKind::CutSlope),
            "fill_slope" | "foreslope" => Some(ComponentKind::FillSlope),
            _ => None,
        }
    }

    /// Get display metadata for this kind.
    pub fn metadata(&self) -> KindMetadata {
        match self {
            ComponentKind::Lane =>
                KindMetadata::new("Travel Lane", "XS-LANE", "Vehicular travel lane"),
            ComponentKind::Shoulder =>
                KindMetadata::new("Shoulder", "XS-SHLD", "Paved or unpaved shoulder"),
            ComponentKind::Curb =>
                KindMetadata::new("Curb", "XS-CURB", "Raised curb edge"),
            ComponentKind::Median =>
                KindMetadata::new("Median", "XS-MEDN", "Separator between opposing lanes"),
            ComponentKind::Buffer =>
                KindMetadata::new("Buffer", "XS-BUFF", "Landscape or painted buffer strip"),
            ComponentKind::Sidewalk =>
                KindMetadata::new("Sidewalk", "XS-WALK", "Pedestrian walkway"),
            ComponentKind::BikeLane =>
                KindMetadata::new("Bike Lane", "XS-BIKE", "Dedicated cycling lane"),
            ComponentKind::Barrier =>
                KindMetadata::new("Barrier", "XS-BARR", "Roadside or median barrier"),
            ComponentKind::RetainingWall =>
                KindMetadata::new("Retaining Wall", "XS-WALL", "Vertical earth retention"),
            ComponentKind::CutSlope =>
                KindMetadata::new("Cut Slope", "XS-CUT", "Backslope rising to existing ground"),
            ComponentKind::FillSlope =>
                KindMetadata::new("Fill Slope", "XS-FILL", "Embankment falling to existing ground"),
        }
    }
}

/// Which side of a retaining wall holds the higher ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retains {
    /// Wall drops from the roadway down to lower ground
    Fill,
    /// Wall rises from the roadway up to higher ground
    Cut,
}

/// One component of a cross-section.
///
/// ## Rust Lesson #12: Enums that carry data
///
/// Each variant holds exactly the attributes its kind understands, so a
/// curb can't be handed a slope ratio by accident. `match` on a
/// `ComponentSpec` must cover every variant, so adding a kind forces every
/// rule below to handle it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComponentSpec {
    Lane {
        width: f64,
        cross_slope: f64,
        /// Pavement structure from the surface down; empty for a plain strip
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pavement: Vec<PavementLayer>,
    },
    Shoulder {
        width: f64,
        cross_slope: f64,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pavement: Vec<PavementLayer>,
    },
    Sidewalk { width: f64, cross_slope: f64 },
    BikeLane { width: f64, cross_slope: f64 },
    Curb {
        width: f64,
        height: f64,
        /// Horizontal run of the curb face (0 = vertical)
        #[serde(default)]
        face_batter: f64,
    },
    Median {
        width: f64,
        #[serde(default)]
        cross_slope: Option<f64>,
    },
    Buffer {
        width: f64,
        #[serde(default)]
        cross_slope: Option<f64>,
    },
    Barrier {
        width: f64,
        height: f64,
        /// Setback from the incoming attachment point
        #[serde(default)]
        lateral_offset: f64,
    },
    RetainingWall { thickness: f64, height: f64, retains: Retains },
    CutSlope { h_ratio: f64, v_ratio: f64, height: f64 },
    FillSlope { h_ratio: f64, v_ratio: f64, height: f64 },
}

/// A named numeric attribute echoed into geometry metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub value: f64,
}

/// Everything a consumer needs to label and style a component's polygons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentMetadata {
    pub kind: ComponentKind,
    pub layer: &'static str,
    pub material: &'static str,
    pub attributes: Vec<Attribute>,
}

/// Elevations that component outlines are closed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosingLevels {
    /// Pavement datum for strips and curbs
    pub datum: f64,
    /// Shared bottom for every slope in a section
    pub section_bottom: f64,
}

impl ClosingLevels {
    /// Levels for a component drawn on its own: the datum is the bottom.
    pub fn at_datum(datum: f64) -> Self {
        Self { datum, section_bottom: datum }
    }
}

impl From<&GeometrySettings> for ClosingLevels {
    fn from(settings: &GeometrySettings) -> Self {
        Self::at_datum(settings.datum)
    }
}

/// Derived outline of one placed component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentGeometry {
    pub polygons: Vec<Polygon>,
    pub metadata: ComponentMetadata,
}

impl ComponentGeometry {
    /// Bounding box over all polygons, zeros when there are none.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        crate::geometry::union_bounds(self.polygons.iter().filter_map(Polygon::bounding_box))
            .unwrap_or((0.0, 0.0, 0.0, 0.0))
    }
}

impl ComponentSpec {
    pub fn lane(width: f64, cross_slope: f64) -> Self {
        ComponentSpec::Lane { width, cross_slope, pavement: Vec::new() }
    }

    pub fn shoulder(width: f64, cross_slope: f64) -> Self {
        ComponentSpec::Shoulder { width, cross_slope, pavement: Vec::new() }
    }

    /// A lane drawn as its pavement layers, surface first.
    pub fn layered_lane(
        width: f64,
        cross_slope: f64,
        pavement: impl IntoIterator<Item = PavementLayer>,
    ) -> Self {
        ComponentSpec::Lane { width, cross_slope, pavement: pavement.into_iter().collect() }
    }

    /// A shoulder drawn as its pavement layers, surface first.
    pub fn layered_shoulder(
        width: f64,
        cross_slope: f64,
        pavement: impl IntoIterator<Item = PavementLayer>,
    ) -> Self {
        ComponentSpec::Shoulder { width, cross_slope, pavement: pavement.into_iter().collect() }
    }

    pub fn sidewalk(width: f64, cross_slope: f64) -> Self {
        ComponentSpec::Sidewalk { width, cross_slope }
    }

    pub fn bike_lane(width: f64, cross_slope: f64) -> Self {
        ComponentSpec::BikeLane { width, cross_slope }
    }

    /// A curb with a vertical face.
    pub fn curb(width: f64, height: f64) -> Self {
        ComponentSpec::Curb { width, height, face_batter: 0.0 }
    }

    /// A flat median.
    pub fn median(width: f64) -> Self {
        ComponentSpec::Median { width, cross_slope: None }
    }

    /// A flat buffer strip.
    pub fn buffer(width: f64) -> Self {
        ComponentSpec::Buffer { width, cross_slope: None }
    }

    pub fn barrier(width: f64, height: f64, lateral_offset: f64) -> Self {
        ComponentSpec::Barrier { width, height, lateral_offset }
    }

    pub fn retaining_wall(thickness: f64, height: f64, retains: Retains) -> Self {
        ComponentSpec::RetainingWall { thickness, height, retains }
    }

    pub fn cut_slope(h_ratio: f64, v_ratio: f64, height: f64) -> Self {
        ComponentSpec::CutSlope { h_ratio, v_ratio, height }
    }

    pub fn fill_slope(h_ratio: f64, v_ratio: f64, height: f64) -> Self {
        ComponentSpec::FillSlope { h_ratio, v_ratio, height }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentSpec::Lane { .. } => ComponentKind::Lane,
            ComponentSpec::Shoulder { .. } => ComponentKind::Shoulder,
            ComponentSpec::Sidewalk { .. } => ComponentKind::Sidewalk,
            ComponentSpec::BikeLane { .. } => ComponentKind::BikeLane,
            ComponentSpec::Curb { .. } => ComponentKind::Curb,
            ComponentSpec::Median { .. } => ComponentKind::Median,
            ComponentSpec::Buffer { .. } => ComponentKind::Buffer,
            ComponentSpec::Barrier { .. } => ComponentKind::Barrier,
            ComponentSpec::RetainingWall { .. } => ComponentKind::RetainingWall,
            ComponentSpec::CutSlope { .. } => ComponentKind::CutSlope,
            ComponentSpec::FillSlope { .. } => ComponentKind::FillSlope,
        }
    }

    /// Pavement layers, surface first. Empty for kinds without a structure.
    pub fn pavement(&self) -> &[PavementLayer] {
        match self {
            ComponentSpec::Lane { pavement, .. } | ComponentSpec::Shoulder { pavement, .. } => {
                pavement.as_slice()
            }
            _ => &[],
        }
    }

    /// Lateral setback this component declares from its predecessor, if any.
    ///
    /// A declared offset is the only sanctioned way for an insertion point
    /// to differ from the incoming attachment point.
    pub fn declared_offset(&self) -> Option<f64> {
        match self {
            ComponentSpec::Barrier { lateral_offset, .. } if *lateral_offset != 0.0 => {
                Some(*lateral_offset)
            }
            _ => None,
        }
    }

    /// Where this component begins, given the incoming attachment point.
    pub fn insertion(&self, incoming: Point) -> Point {
        match self {
            ComponentSpec::Barrier { lateral_offset, .. } => {
                barrier::insertion(incoming, *lateral_offset)
            }
            _ => incoming,
        }
    }

    /// Where the next component begins.
    pub fn attachment(&self, insertion: Point) -> Point {
        match *self {
            ComponentSpec::Lane { width, cross_slope, .. }
            | ComponentSpec::Shoulder { width, cross_slope, .. }
            | ComponentSpec::Sidewalk { width, cross_slope }
            | ComponentSpec::BikeLane { width, cross_slope } => {
                strip::attachment(insertion, width, cross_slope)
            }
            ComponentSpec::Median { width, cross_slope }
            | ComponentSpec::Buffer { width, cross_slope } => {
                strip::attachment(insertion, width, cross_slope.unwrap_or(0.0))
            }
            ComponentSpec::Curb { width, height, .. } => curb::attachment(insertion, width, height),
            ComponentSpec::Barrier { width, .. } => barrier::attachment(insertion, width),
            ComponentSpec::RetainingWall { thickness, height, retains } => {
                wall::attachment(insertion, thickness, height, retains)
            }
            ComponentSpec::CutSlope { h_ratio, v_ratio, height } => {
                slope::attachment(insertion, h_ratio, v_ratio, height)
            }
            ComponentSpec::FillSlope { h_ratio, v_ratio, height } => {
                slope::attachment(insertion, h_ratio, v_ratio, -height)
            }
        }
    }

    /// Build this component's outline from its insertion point.
    ///
    /// Layered lanes and shoulders give one polygon per pavement layer;
    /// everything else gives a single closed outline.
    pub fn geometry(&self, insertion: Point, levels: &ClosingLevels) -> ComponentGeometry {
        let attachment = self.attachment(insertion);
        let layers = self.pavement();

        let polygons = if layers.is_empty() {
            vec![self.outline(insertion, attachment, levels)]
        } else {
            pavement::stack(layers, insertion, attachment)
        };

        let kind = self.kind();
        let material = match layers.first() {
            Some(surface) => surface.material(),
            None => tables::material_for(kind),
        };
        ComponentGeometry {
            polygons,
            metadata: ComponentMetadata {
                kind,
                layer: kind.metadata().layer,
                material: material.key,
                attributes: self.attributes(),
            },
        }
    }

    fn outline(&self, insertion: Point, attachment: Point, levels: &ClosingLevels) -> Polygon {
        let datum = levels.datum;
        match *self {
            ComponentSpec::Lane { .. }
            | ComponentSpec::Shoulder { .. }
            | ComponentSpec::Sidewalk { .. }
            | ComponentSpec::BikeLane { .. }
            | ComponentSpec::Median { .. }
            | ComponentSpec::Buffer { .. } => strip::outline(insertion, attachment, datum),
            ComponentSpec::Curb { width, height, face_batter } => {
                curb::outline(insertion, width, height, face_batter, datum)
            }
            ComponentSpec::Barrier { width, height, .. } => {
                barrier::outline(insertion, width, height)
            }
            ComponentSpec::RetainingWall { .. } => wall::outline(insertion, attachment),
            ComponentSpec::CutSlope { .. } | ComponentSpec::FillSlope { .. } => {
                slope::outline(insertion, attachment, levels.section_bottom)
            }
        }
    }

    /// Numeric attributes by name, in declaration order. Layered strips add
    /// `layer_count` and `total_depth`.
    pub fn attributes(&self) -> Vec<Attribute> {
        let attr = |name, value| Attribute { name, value };
        match *self {
            ComponentSpec::Lane { width, cross_slope, .. }
            | ComponentSpec::Shoulder { width, cross_slope, .. }
            | ComponentSpec::Sidewalk { width, cross_slope }
            | ComponentSpec::BikeLane { width, cross_slope } => {
                let mut attrs = vec![attr("width", width), attr("cross_slope", cross_slope)];
                let layers = self.pavement();
                if !layers.is_empty() {
                    attrs.push(attr("layer_count", layers.len() as f64));
                    attrs.push(attr("total_depth", pavement::total_depth(layers)));
                }
                attrs
            }
            ComponentSpec::Median { width, cross_slope }
            | ComponentSpec::Buffer { width, cross_slope } => {
                let mut attrs = vec![attr("width", width)];
                if let Some(s) = cross_slope {
                    attrs.push(attr("cross_slope", s));
                }
                attrs
            }
            ComponentSpec::Curb { width, height, face_batter } => vec![
                attr("width", width),
                attr("height", height),
                attr("face_batter", face_batter),
            ],
            ComponentSpec::Barrier { width, height, lateral_offset } => vec![
                attr("width", width),
                attr("height", height),
                attr("lateral_offset", lateral_offset),
            ],
            ComponentSpec::RetainingWall { thickness, height, retains } => vec![
                attr("thickness", thickness),
                attr("height", height),
                // 1 = retains cut (wall rises), -1 = retains fill (wall drops)
                attr("retains", if retains == Retains::Cut { 1.0 } else { -1.0 }),
            ],
            ComponentSpec::CutSlope { h_ratio, v_ratio, height }
            | ComponentSpec::FillSlope { h_ratio, v_ratio, height } => vec![
                attr("h_ratio", h_ratio),
                attr("v_ratio", v_ratio),
                attr("height", height),
            ],
        }
    }

    /// Run this kind's validation rule, collecting every finding.
    pub fn check(&self, index: usize, policy: &ValidationPolicy) -> Vec<Violation> {
        let mut findings = Findings::new(index, self.kind(), policy);
        match *self {
            ComponentSpec::Lane { width, cross_slope, .. }
            | ComponentSpec::Shoulder { width, cross_slope, .. }
            | ComponentSpec::Sidewalk { width, cross_slope }
            | ComponentSpec::BikeLane { width, cross_slope } => {
                strip::check(&mut findings, width, Some(cross_slope));
                for (layer, structure) in self.pavement().iter().enumerate() {
                    findings.in_layer(Some(layer));
                    structure.check(&mut findings);
                }
                findings.in_layer(None);
            }
            ComponentSpec::Median { width, cross_slope }
            | ComponentSpec::Buffer { width, cross_slope } => {
                strip::check(&mut findings, width, cross_slope)
            }
            ComponentSpec::Curb { width, height, face_batter } => {
                curb::check(&mut findings, width, height, face_batter)
            }
            ComponentSpec::Barrier { width, height, lateral_offset } => {
                barrier::check(&mut findings, width, height, lateral_offset)
            }
            ComponentSpec::RetainingWall { thickness, height, .. } => {
                wall::check(&mut findings, thickness, height)
            }
            ComponentSpec::CutSlope { h_ratio, v_ratio, height }
            | ComponentSpec::FillSlope { h_ratio, v_ratio, height } => {
                slope::check(&mut findings, h_ratio, v_ratio, height)
            }
        }
        findings.into_violations()
    }
}

/// Close a surface edge down to `bottom`, producing a counter-clockwise ring.
///
/// `top` runs left to right. The ring walks the bottom edge left to right,
/// then climbs and follows the surface back. Vertices that coincide with the
/// surface are dropped, so a surface touching the bottom gives a triangle.
pub(crate) fn close_to_bottom(top: &[Point], bottom: f64) -> Polygon {
    let (Some(first), Some(last)) = (top.first(), top.last()) else {
        return Polygon::new(Vec::new());
    };
    let bottom_left = Point::new(first.x, bottom);
    let bottom_right = Point::new(last.x, bottom);
    Polygon::from_ring(
        std::iter::once(bottom_left)
            .chain(std::iter::once(bottom_right))
            .chain(top.iter().rev().copied()),
    )
}

/// Lowest of the datum and every surface elevation.
pub(crate) fn bottom_reference(top: &[Point], datum: f64) -> f64 {
    top.iter().map(|p| p.y).fold(datum, f64::min)
}
