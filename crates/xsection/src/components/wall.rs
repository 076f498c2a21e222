//! Retaining walls (including temporary shoring).
//!
//! A wall retaining fill drops from the insertion point to lower ground; a
//! wall retaining cut climbs to higher ground. Either way the next
//! component attaches at the far face, `thickness` outward.

use crate::geometry::{Point, Polygon};
use crate::validate::Findings;

use super::Retains;

pub(super) fn attachment(insertion: Point, thickness: f64, height: f64, retains: Retains) -> Point {
    let rise = match retains {
        Retains::Fill => -height,
        Retains::Cut => height,
    };
    insertion.offset(thickness, rise)
}

/// The wall stem between the insertion and attachment elevations.
pub(super) fn outline(insertion: Point, attachment: Point) -> Polygon {
    let low = insertion.y.min(attachment.y);
    let high = insertion.y.max(attachment.y);
    Polygon::from_ring([
        Point::new(insertion.x, low),
        Point::new(attachment.x, low),
        Point::new(attachment.x, high),
        Point::new(insertion.x, high),
    ])
}

pub(super) fn check(findings: &mut Findings, thickness: f64, height: f64) {
    findings.width("thickness", thickness);
    findings.height("height", height);
}
