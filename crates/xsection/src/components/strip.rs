//! Surface strips: lanes, shoulders, sidewalks, bike lanes, medians, buffers.
//!
//! A strip is a width run at a cross-slope. Positive cross-slope drains
//! away from the control point, so the outer edge sits lower.

use crate::geometry::{Point, Polygon};
use crate::validate::Findings;

use super::{bottom_reference, close_to_bottom};

/// Outer edge: `(+width, -width * cross_slope)`.
pub(super) fn attachment(insertion: Point, width: f64, cross_slope: f64) -> Point {
    insertion.offset(width, -width * cross_slope)
}

/// Surface edge closed down to the pavement datum.
pub(super) fn outline(insertion: Point, attachment: Point, datum: f64) -> Polygon {
    let top = [insertion, attachment];
    close_to_bottom(&top, bottom_reference(&top, datum))
}

/// `cross_slope` is `None` for flat medians and buffers; they only answer for
/// their width.
pub(super) fn check(findings: &mut Findings, width: f64, cross_slope: Option<f64>) {
    findings.width("width", width);
    if let Some(s) = cross_slope {
        findings.cross_slope(s);
    }
}
