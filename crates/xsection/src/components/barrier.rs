//! Barriers: the one kind allowed to stand off from its predecessor.

use crate::geometry::{Point, Polygon};
use crate::validate::Findings;

/// Barriers may be set back from the pavement edge by a lateral offset.
pub(super) fn insertion(incoming: Point, lateral_offset: f64) -> Point {
    incoming.offset(lateral_offset, 0.0)
}

/// Back face at ground level.
pub(super) fn attachment(insertion: Point, width: f64) -> Point {
    insertion.offset(width, 0.0)
}

/// The barrier body standing on the ground at its insertion elevation.
pub(super) fn outline(insertion: Point, width: f64, height: f64) -> Polygon {
    Polygon::from_ring([
        insertion,
        insertion.offset(width, 0.0),
        insertion.offset(width, height),
        insertion.offset(0.0, height),
    ])
}

pub(super) fn check(findings: &mut Findings, width: f64, height: f64, lateral_offset: f64) {
    findings.width("width", width);
    findings.height("height", height);
    findings.non_negative("lateral_offset", lateral_offset);
}
