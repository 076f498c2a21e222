//! Cut and fill slopes.
//!
//! Ratios are horizontal:vertical, so a 4:1 fill slope with 2 m of height
//! runs 8 m outward. `rise` is signed: positive for cut, negative for fill.

use crate::geometry::{Point, Polygon};
use crate::tables::{FLATTEST_SLOPE_RATIO, STEEPEST_SLOPE_RATIO};
use crate::validate::{Category, Findings, Requirement};

use super::{bottom_reference, close_to_bottom};

/// Horizontal extent of a slope: `height * h_ratio / v_ratio`.
pub fn horizontal_extent(h_ratio: f64, v_ratio: f64, height: f64) -> f64 {
    height.abs() * h_ratio / v_ratio
}

pub(super) fn attachment(insertion: Point, h_ratio: f64, v_ratio: f64, rise: f64) -> Point {
    insertion.offset(horizontal_extent(h_ratio, v_ratio, rise), rise)
}

/// Slope face closed down to the section bottom.
///
/// A fill slope that ends at the bottom gives a triangle; a cut slope
/// standing on the bottom gives a triangle too, otherwise a trapezoid.
/// A face that dips below `bottom` closes at its own lowest point.
pub(super) fn outline(insertion: Point, attachment: Point, bottom: f64) -> Polygon {
    let top = [insertion, attachment];
    close_to_bottom(&top, bottom_reference(&top, bottom))
}

/// Ratios and height must be finite and strictly positive. Steepness is
/// only ever advised on, never corrected.
pub(super) fn check(findings: &mut Findings, h_ratio: f64, v_ratio: f64, height: f64) {
    findings.positive("height", height);
    let h_ok = findings.positive("h_ratio", h_ratio);
    let v_ok = findings.positive("v_ratio", v_ratio);
    if !(h_ok && v_ok) {
        return;
    }

    let ratio = h_ratio / v_ratio;
    let traversable = findings.policy().traversable_ratio;
    findings.advise(
        Category::Standard,
        "slope_ratio",
        ratio,
        Requirement::AtLeast(traversable),
        "not traversable; roadside protection may be needed",
    );
    if findings.policy().check_standards {
        findings.advise(
            Category::Standard,
            "slope_ratio",
            ratio,
            Requirement::Between { min: STEEPEST_SLOPE_RATIO, max: FLATTEST_SLOPE_RATIO },
            "outside the stable/practical slope range",
        );
    }
}
