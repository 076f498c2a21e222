//! Curbs: a short width that steps the surface up by the curb height.

use crate::geometry::{Point, Polygon};
use crate::validate::{Findings, Requirement};

use super::close_to_bottom;

/// Back of curb: `(+width, +height)`.
pub(super) fn attachment(insertion: Point, width: f64, height: f64) -> Point {
    insertion.offset(width, height)
}

/// Gutter line, face, top of curb, closed to the datum.
///
/// The face climbs from the insertion elevation to `insertion + height`,
/// leaning back by `face_batter` (0 gives a vertical face).
pub(super) fn outline(
    insertion: Point,
    width: f64,
    height: f64,
    face_batter: f64,
    datum: f64,
) -> Polygon {
    let top = [
        insertion,
        insertion.offset(face_batter, height),
        insertion.offset(width, height),
    ];
    // gutter line and back of curb only; the face top is never lowest
    let bottom = datum.min(insertion.y).min(insertion.y + height);
    close_to_bottom(&top, bottom)
}

pub(super) fn check(findings: &mut Findings, width: f64, height: f64, face_batter: f64) {
    let width_ok = findings.width("width", width);
    findings.height("height", height);
    let batter_ok = findings.non_negative("face_batter", face_batter);
    if width_ok && batter_ok {
        findings.require("face_batter", face_batter, Requirement::AtMost(width));
    }
}
