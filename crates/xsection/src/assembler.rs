//! Assembly: walk a section left to right and place every component.
//!
//! The walk keeps a single cursor, starting at the control point's
//! attachment. Each component:
//! 1. computes its insertion point from the cursor,
//! 2. generates its geometry there,
//! 3. moves the cursor to its attachment point.
//!
//! One pass, no backtracking. A component only ever sees what precedes it.

use serde::Serialize;
use tracing::{debug, trace};

use crate::components::{ClosingLevels, ComponentGeometry, ComponentSpec};
use crate::config::GeometrySettings;
use crate::error::StructuralError;
use crate::geometry::{union_bounds, Point, Polygon};
use crate::section::Section;

/// One step of the placement walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement<'a> {
    pub index: usize,
    pub spec: &'a ComponentSpec,
    /// Attachment point of the predecessor (or the control point)
    pub incoming: Point,
    pub insertion: Point,
    pub attachment: Point,
}

/// Iterator over the placement walk of a section.
///
/// ## Rust Lesson #14: Custom iterators
///
/// Implementing `Iterator` means writing just `next()`. The cursor lives in
/// the struct between calls, and callers get `map`, `filter`, `collect` and
/// friends for free. Both the assembler and the validator drive this same
/// walk, so they can never disagree about where something sits.
pub struct Placements<'a> {
    components: std::iter::Enumerate<std::slice::Iter<'a, ComponentSpec>>,
    cursor: Point,
}

impl<'a> Iterator for Placements<'a> {
    type Item = Placement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, spec) = self.components.next()?;
        let incoming = self.cursor;
        let insertion = spec.insertion(incoming);
        let attachment = spec.attachment(insertion);
        self.cursor = attachment;
        Some(Placement { index, spec, incoming, insertion, attachment })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.components.size_hint()
    }
}

impl ExactSizeIterator for Placements<'_> {}

/// Start the placement walk of `section`.
pub fn placements(section: &Section) -> Placements<'_> {
    Placements {
        components: section.components().iter().enumerate(),
        cursor: section.control().attachment(),
    }
}

/// A component placed in absolute coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedComponent {
    pub spec: ComponentSpec,
    pub geometry: ComponentGeometry,
    pub insertion: Point,
    pub attachment: Point,
}

/// Solved geometry of a whole section.
///
/// Derived data: always produced by `solve`, never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionGeometry {
    pub name: Option<String>,
    /// Control point attachment the walk started from
    pub origin: Point,
    pub components: Vec<PlacedComponent>,
    /// Attachment point of the last component
    pub cursor: Point,
}

impl SectionGeometry {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Horizontal distance from the origin to the final cursor.
    pub fn total_width(&self) -> f64 {
        self.cursor.x - self.origin.x
    }

    /// All polygons in assembly order.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.components.iter().flat_map(|c| c.geometry.polygons.iter())
    }

    /// Bounding box of the entire section as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        union_bounds(self.polygons().filter_map(Polygon::bounding_box))
            .unwrap_or((0.0, 0.0, 0.0, 0.0))
    }

    /// The same section drawn to the left of the origin.
    ///
    /// Every point is reflected about the origin's x; polygons keep their
    /// counter-clockwise winding.
    pub fn mirrored(&self) -> SectionGeometry {
        let axis = self.origin.x;
        let flip = |p: Point| Point::new(2.0 * axis - p.x, p.y);
        SectionGeometry {
            name: self.name.clone(),
            origin: self.origin,
            components: self
                .components
                .iter()
                .map(|c| PlacedComponent {
                    spec: c.spec.clone(),
                    geometry: ComponentGeometry {
                        polygons: c.geometry.polygons.iter().map(|p| p.mirror_x(axis)).collect(),
                        metadata: c.geometry.metadata.clone(),
                    },
                    insertion: flip(c.insertion),
                    attachment: flip(c.attachment),
                })
                .collect(),
            cursor: flip(self.cursor),
        }
    }
}

/// Solve a section with default geometry settings.
pub fn solve(section: &Section) -> Result<SectionGeometry, StructuralError> {
    solve_with(section, &GeometrySettings::default())
}

/// Solve a section, producing absolute coordinates and polygons.
///
/// The walk runs once up front so every slope can close to the same
/// section bottom: the datum, or the lowest surface point when that is
/// lower. An empty section is a `StructuralError`, never an empty result.
pub fn solve_with(
    section: &Section,
    settings: &GeometrySettings,
) -> Result<SectionGeometry, StructuralError> {
    if section.is_empty() {
        return Err(StructuralError::EmptySection);
    }

    debug!(
        name = section.name().unwrap_or("<unnamed>"),
        components = section.len(),
        datum = settings.datum,
        "solving section"
    );

    let steps: Vec<Placement<'_>> = placements(section).collect();
    let section_bottom = steps
        .iter()
        .flat_map(|p| [p.insertion.y, p.attachment.y])
        .fold(settings.datum, f64::min);
    let levels = ClosingLevels { datum: settings.datum, section_bottom };
    trace!(section_bottom, "closing levels");

    let origin = section.control().attachment();
    let mut cursor = origin;
    let mut components = Vec::with_capacity(section.len());

    for placement in steps {
        trace!(
            index = placement.index,
            kind = placement.spec.kind().name(),
            x = placement.insertion.x,
            y = placement.insertion.y,
            "placing component"
        );
        components.push(PlacedComponent {
            spec: placement.spec.clone(),
            geometry: placement.spec.geometry(placement.insertion, &levels),
            insertion: placement.insertion,
            attachment: placement.attachment,
        });
        cursor = placement.attachment;
    }

    Ok(SectionGeometry {
        name: section.name().map(str::to_owned),
        origin,
        components,
        cursor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ComponentSpec;
    use crate::section::ControlPoint;

    fn two_lane() -> Section {
        Section::named("Two-Lane Road", ControlPoint::new(0.0, 100.0))
            .with(ComponentSpec::lane(3.6, 0.02))
            .with(ComponentSpec::lane(3.6, 0.02))
    }

    #[test]
    fn empty_section_is_structural_error() {
        let section = Section::new(ControlPoint::origin());
        assert_eq!(solve(&section), Err(StructuralError::EmptySection));
    }

    #[test]
    fn lanes_snap_together() {
        let geom = solve(&two_lane()).unwrap();
        assert_eq!(geom.len(), 2);
        assert_eq!(geom.components[1].insertion, geom.components[0].attachment);
        assert_eq!(geom.cursor, geom.components[1].attachment);
        assert!((geom.total_width() - 7.2).abs() < 1e-12);
        assert!((geom.cursor.y - (100.0 - 2.0 * 0.072)).abs() < 1e-12);
    }

    #[test]
    fn walk_starts_at_control_attachment() {
        let section = Section::new(ControlPoint::new(1.0, 5.0).with_attachment_offset(0.5))
            .with(ComponentSpec::median(2.0));
        let first = placements(&section).next().unwrap();
        assert_eq!(first.incoming, Point::new(1.5, 5.0));
        assert_eq!(first.insertion, first.incoming);
    }

    #[test]
    fn placements_is_exact_size() {
        let section = two_lane();
        assert_eq!(placements(&section).len(), 2);
    }

    #[test]
    fn barrier_offset_leaves_gap() {
        let section = Section::new(ControlPoint::origin())
            .with(ComponentSpec::shoulder(2.5, 0.04))
            .with(ComponentSpec::barrier(0.5, 0.8, 0.5));
        let geom = solve(&section).unwrap();
        let gap = geom.components[1].insertion.x - geom.components[0].attachment.x;
        assert!((gap - 0.5).abs() < 1e-12);
        assert!((geom.total_width() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn bounds_cover_every_component() {
        let geom = solve(&two_lane()).unwrap();
        let (min_x, min_y, max_x, max_y) = geom.bounds();
        assert_eq!(min_x, 0.0);
        assert_eq!(min_y, 0.0);
        assert!((max_x - 7.2).abs() < 1e-12);
        assert_eq!(max_y, 100.0);
        assert_eq!(geom.polygons().count(), 2);
    }

    #[test]
    fn adjacent_slopes_share_one_bottom() {
        let section = Section::new(ControlPoint::new(0.0, 10.0))
            .with(ComponentSpec::fill_slope(2.0, 1.0, 1.0))
            .with(ComponentSpec::fill_slope(4.0, 1.0, 2.0));
        let geom = solve(&section).unwrap();
        let bottoms: Vec<f64> = geom.polygons().map(|p| p.bounds().1).collect();
        assert_eq!(bottoms, [0.0, 0.0]);

        // below the datum, both close at the lowest toe
        let deep = Section::new(ControlPoint::new(0.0, 1.0))
            .with(ComponentSpec::fill_slope(2.0, 1.0, 1.0))
            .with(ComponentSpec::fill_slope(4.0, 1.0, 2.0));
        let geom = solve(&deep).unwrap();
        let toe = geom.cursor.y;
        assert_eq!(toe, -2.0);
        assert!(geom.polygons().all(|p| p.bounds().1 == toe));
    }

    #[test]
    fn mirrored_runs_left() {
        let geom = solve(&two_lane()).unwrap();
        let left = geom.mirrored();
        assert!((left.cursor.x + 7.2).abs() < 1e-12);
        assert_eq!(left.cursor.y, geom.cursor.y);
        assert!(left.polygons().all(|p| p.signed_area() > 0.0));
        assert!((left.total_width() + 7.2).abs() < 1e-12);
    }

    #[test]
    fn geometry_serializes_for_consumers() {
        let geom = solve(&two_lane()).unwrap();
        let json = serde_json::to_value(&geom).unwrap();
        assert_eq!(json["name"], "Two-Lane Road");
        assert_eq!(json["components"][0]["geometry"]["metadata"]["layer"], "XS-LANE");
        assert_eq!(json["components"][0]["spec"]["kind"], "lane");
    }
}
