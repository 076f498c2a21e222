//! Validation: report everything wrong with a section, in one pass.
//!
//! Two independent, read-only passes:
//! 1. **attributes** - each component's own rule (plus advisory standards),
//! 2. **continuity** - re-run the placement walk and compare every insertion
//!    point against the attachment point before it.
//!
//! Nothing here returns `Err` or stops early. Callers get a list of
//! `Violation`s and decide for themselves what is fatal.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::assembler::placements;
use crate::components::ComponentKind;
use crate::config::ValidationPolicy;
use crate::geometry::Point;
use crate::section::Section;
use crate::tables::{self, StandardProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A component attribute is out of range
    Attribute,
    /// An insertion point doesn't meet the prior attachment point
    Continuity,
    /// Advisory: outside a recommended design envelope
    Standard,
    /// The section can't be assembled at all
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// The measured value a violation is about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Quantity {
    Scalar(f64),
    Point(Point),
    Count(usize),
}

/// What the measured value should have satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum Requirement {
    GreaterThan(f64),
    AtLeast(f64),
    AtMost(f64),
    Between { min: f64, max: f64 },
    MagnitudeAtMost(f64),
    MagnitudeBetween { min: f64, max: f64 },
    /// Within `tolerance` of `target`
    Near { target: Point, tolerance: f64 },
    /// Neither NaN nor infinite
    Finite,
    NonEmpty,
}

impl Requirement {
    /// Whether a scalar value satisfies the requirement.
    ///
    /// NaN never does. Point and count requirements don't apply to scalars
    /// and always report unmet.
    pub fn accepts(&self, value: f64) -> bool {
        match *self {
            Requirement::GreaterThan(min) => value > min,
            Requirement::AtLeast(min) => value >= min,
            Requirement::AtMost(max) => value <= max,
            Requirement::Between { min, max } => value >= min && value <= max,
            Requirement::MagnitudeAtMost(max) => value.abs() <= max,
            Requirement::MagnitudeBetween { min, max } => {
                value.abs() >= min && value.abs() <= max
            }
            Requirement::Finite => value.is_finite(),
            Requirement::Near { .. } | Requirement::NonEmpty => false,
        }
    }

    /// Build a range requirement from optional bounds.
    fn range(min: Option<f64>, max: Option<f64>) -> Option<Requirement> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Requirement::Between { min, max }),
            (Some(min), None) => Some(Requirement::AtLeast(min)),
            (None, Some(max)) => Some(Requirement::AtMost(max)),
            (None, None) => None,
        }
    }

    fn magnitude_range(min: Option<f64>, max: Option<f64>) -> Option<Requirement> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Requirement::MagnitudeBetween { min, max }),
            (Some(min), None) => Some(Requirement::MagnitudeBetween { min, max: f64::INFINITY }),
            (None, Some(max)) => Some(Requirement::MagnitudeAtMost(max)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Scalar(v) => write!(f, "{:.3}", v),
            Quantity::Point(p) => write!(f, "({:.3}, {:.3})", p.x, p.y),
            Quantity::Count(n) => write!(f, "{}", n),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::GreaterThan(v) => write!(f, "> {:.3}", v),
            Requirement::AtLeast(v) => write!(f, ">= {:.3}", v),
            Requirement::AtMost(v) => write!(f, "<= {:.3}", v),
            Requirement::Between { min, max } => write!(f, "{:.3}..={:.3}", min, max),
            Requirement::MagnitudeAtMost(v) => write!(f, "|x| <= {:.3}", v),
            Requirement::MagnitudeBetween { min, max } => {
                write!(f, "{:.3} <= |x| <= {:.3}", min, max)
            }
            Requirement::Near { target, tolerance } => {
                write!(f, "within {:.3} of ({:.3}, {:.3})", tolerance, target.x, target.y)
            }
            Requirement::Finite => write!(f, "a finite value"),
            Requirement::NonEmpty => write!(f, "at least one component"),
        }
    }
}

/// One problem found in a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub category: Category,
    pub severity: Severity,
    /// `None` for section-level problems
    pub component_index: Option<usize>,
    pub component_kind: Option<ComponentKind>,
    /// Pavement layer the violation is about, counted from the surface
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pavement_layer: Option<usize>,
    /// Attribute the violation is about, if it concerns a single one
    pub attribute: Option<&'static str>,
    pub current_value: Quantity,
    pub required_value: Requirement,
    /// Short explanation
    pub note: &'static str,
}

impl Violation {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}", severity)?;
        if let (Some(index), Some(kind)) = (self.component_index, self.component_kind) {
            write!(f, ": component {} ({})", index, kind.name())?;
        }
        if let Some(layer) = self.pavement_layer {
            write!(f, " layer {}", layer)?;
        }
        if let Some(attribute) = self.attribute {
            write!(f, " {}", attribute)?;
        }
        write!(
            f,
            " = {}, required {} - {}",
            self.current_value, self.required_value, self.note
        )
    }
}

/// True when any violation is an error (as opposed to a warning).
pub fn has_errors(violations: &[Violation]) -> bool {
    violations.iter().any(Violation::is_error)
}

/// Collects the findings of one component's validation rule.
///
/// Rules call `require` for hard attribute limits and `advise` for soft
/// ones; both record a violation only when the value falls short.
pub(crate) struct Findings<'p> {
    index: usize,
    kind: ComponentKind,
    policy: &'p ValidationPolicy,
    profile: Option<&'static StandardProfile>,
    layer: Option<usize>,
    violations: Vec<Violation>,
}

impl<'p> Findings<'p> {
    pub(crate) fn new(index: usize, kind: ComponentKind, policy: &'p ValidationPolicy) -> Self {
        Self {
            index,
            kind,
            policy,
            profile: tables::standard_profile(kind),
            layer: None,
            violations: Vec::new(),
        }
    }

    pub(crate) fn policy(&self) -> &ValidationPolicy {
        self.policy
    }

    /// Findings recorded from here on concern this pavement layer.
    pub(crate) fn in_layer(&mut self, layer: Option<usize>) {
        self.layer = layer;
    }

    fn record(
        &mut self,
        category: Category,
        severity: Severity,
        attribute: &'static str,
        value: f64,
        requirement: Requirement,
        note: &'static str,
    ) {
        self.violations.push(Violation {
            category,
            severity,
            component_index: Some(self.index),
            component_kind: Some(self.kind),
            pavement_layer: self.layer,
            attribute: Some(attribute),
            current_value: Quantity::Scalar(value),
            required_value: requirement,
            note,
        });
    }

    /// Hard attribute rule. Returns whether it held.
    pub(crate) fn require(
        &mut self,
        attribute: &'static str,
        value: f64,
        requirement: Requirement,
    ) -> bool {
        let ok = requirement.accepts(value);
        if !ok {
            let note = "invalid attribute";
            self.record(Category::Attribute, Severity::Error, attribute, value, requirement, note);
        }
        ok
    }

    /// Finite and strictly positive; at most one error per attribute.
    pub(crate) fn positive(&mut self, attribute: &'static str, value: f64) -> bool {
        self.require(attribute, value, Requirement::Finite)
            && self.require(attribute, value, Requirement::GreaterThan(0.0))
    }

    /// Finite and at least zero.
    pub(crate) fn non_negative(&mut self, attribute: &'static str, value: f64) -> bool {
        self.require(attribute, value, Requirement::Finite)
            && self.require(attribute, value, Requirement::AtLeast(0.0))
    }

    /// Soft rule, reported as a warning. Returns whether it held.
    pub(crate) fn advise(
        &mut self,
        category: Category,
        attribute: &'static str,
        value: f64,
        requirement: Requirement,
        note: &'static str,
    ) -> bool {
        let ok = requirement.accepts(value);
        if !ok {
            self.record(category, Severity::Warning, attribute, value, requirement, note);
        }
        ok
    }

    /// Width (or thickness) must be finite and strictly positive, and should sit in the
    /// kind's recommended range.
    pub(crate) fn width(&mut self, attribute: &'static str, value: f64) -> bool {
        if !self.positive(attribute, value) {
            return false;
        }
        let range = self.profile.and_then(|p| Requirement::range(p.min_width, p.max_width));
        if let (true, Some(req)) = (self.policy.check_standards, range) {
            self.advise(Category::Standard, attribute, value, req, "outside recommended width");
        }
        true
    }

    /// Height may be zero but never negative or infinite.
    pub(crate) fn height(&mut self, attribute: &'static str, value: f64) -> bool {
        if !self.non_negative(attribute, value) {
            return false;
        }
        let max = self.profile.and_then(|p| p.max_height);
        if let (true, Some(max)) = (self.policy.check_standards, max) {
            let req = Requirement::AtMost(max);
            self.advise(Category::Standard, attribute, value, req, "above recommended height");
        }
        true
    }

    /// Cross-slope is soft-bounded by the policy and, with standards on,
    /// checked against the kind's drainage range.
    pub(crate) fn cross_slope(&mut self, value: f64) -> bool {
        if !self.require("cross_slope", value, Requirement::Finite) {
            return false;
        }
        let limit = self.policy.cross_slope_limit;
        let within = self.advise(
            Category::Attribute,
            "cross_slope",
            value,
            Requirement::MagnitudeAtMost(limit),
            "cross-slope beyond advisory bound",
        );
        if within && self.policy.check_standards {
            let range = self
                .profile
                .and_then(|p| Requirement::magnitude_range(p.min_cross_slope, p.max_cross_slope));
            if let Some(req) = range {
                let note = "outside recommended drainage range";
                self.advise(Category::Standard, "cross_slope", value, req, note);
            }
        }
        within
    }

    pub(crate) fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Validate with the default policy.
pub fn validate(section: &Section) -> Vec<Violation> {
    validate_with(section, &ValidationPolicy::default())
}

/// Run the attribute and continuity passes and return every violation.
///
/// An empty section yields a single structural error: the assembler has
/// nothing to run on.
pub fn validate_with(section: &Section, policy: &ValidationPolicy) -> Vec<Violation> {
    if section.is_empty() {
        return vec![Violation {
            category: Category::Structural,
            severity: Severity::Error,
            component_index: None,
            component_kind: None,
            pavement_layer: None,
            attribute: None,
            current_value: Quantity::Count(0),
            required_value: Requirement::NonEmpty,
            note: "assembler cannot run on an empty section",
        }];
    }

    let mut violations = check_attributes(section, policy);
    violations.extend(check_continuity(section, policy));

    debug!(
        components = section.len(),
        violations = violations.len(),
        errors = violations.iter().filter(|v| v.is_error()).count(),
        "validated section"
    );
    violations
}

/// Pass 1: every component's own rule.
pub fn check_attributes(section: &Section, policy: &ValidationPolicy) -> Vec<Violation> {
    section
        .components()
        .iter()
        .enumerate()
        .flat_map(|(index, spec)| spec.check(index, policy))
        .collect()
}

/// Pass 2: re-run the placement walk and compare each insertion point with
/// the attachment point before it.
///
/// A gap produced by a declared lateral offset is reported as a warning; any
/// other gap is an error. NaN coordinates count as gaps.
pub fn check_continuity(section: &Section, policy: &ValidationPolicy) -> Vec<Violation> {
    let tolerance = policy.continuity_tolerance;
    let mut violations = Vec::new();

    for placement in placements(section) {
        if placement.insertion.is_close(placement.incoming, tolerance) {
            continue;
        }
        let kind = placement.spec.kind();
        let declared = placement.spec.declared_offset().is_some();
        let (severity, note) = if declared {
            (Severity::Warning, "declared lateral offset leaves a gap")
        } else {
            (Severity::Error, "insertion does not meet prior attachment")
        };
        if declared {
            warn!(index = placement.index, kind = kind.name(), "declared offset leaves a gap");
        }
        violations.push(Violation {
            category: Category::Continuity,
            severity,
            component_index: Some(placement.index),
            component_kind: Some(kind),
            pavement_layer: None,
            attribute: None,
            current_value: Quantity::Point(placement.insertion),
            required_value: Requirement::Near { target: placement.incoming, tolerance },
            note,
        });
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentSpec, Retains};
    use crate::pavement::PavementLayer;
    use crate::section::ControlPoint;

    fn section(specs: impl IntoIterator<Item = ComponentSpec>) -> Section {
        let mut s = Section::new(ControlPoint::new(0.0, 100.0));
        s.extend(specs);
        s
    }

    #[test]
    fn empty_section_reports_structural_error() {
        let violations = validate(&Section::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Structural);
        assert!(has_errors(&violations));
    }

    #[test]
    fn collects_every_attribute_problem() {
        let violations = validate(&section([
            ComponentSpec::lane(-1.0, 0.02),
            ComponentSpec::curb(0.0, -0.2),
            ComponentSpec::fill_slope(0.0, 1.0, 2.0),
        ]));
        let indices: Vec<_> = violations
            .iter()
            .filter(|v| v.category == Category::Attribute && v.is_error())
            .map(|v| (v.component_index, v.attribute))
            .collect();
        assert_eq!(
            indices,
            [
                (Some(0), Some("width")),
                (Some(1), Some("width")),
                (Some(1), Some("height")),
                (Some(2), Some("h_ratio")),
            ]
        );
    }

    #[test]
    fn nan_width_is_an_error_and_breaks_the_chain() {
        let violations = validate(&section([
            ComponentSpec::lane(f64::NAN, 0.02),
            ComponentSpec::lane(3.6, 0.02),
        ]));
        assert!(violations
            .iter()
            .any(|v| v.component_index == Some(0) && v.attribute == Some("width") && v.is_error()));
        // the NaN attachment can't be met by anything after it
        let continuity: Vec<_> = violations
            .iter()
            .filter(|v| v.category == Category::Continuity)
            .collect();
        assert_eq!(continuity.len(), 1);
        assert_eq!(continuity[0].component_index, Some(1));
        assert!(continuity[0].is_error());
    }

    #[test]
    fn infinite_sizes_are_attribute_errors() {
        let policy = ValidationPolicy { check_standards: false, ..Default::default() };
        for (spec, attribute) in [
            (ComponentSpec::lane(f64::INFINITY, 0.02), "width"),
            (ComponentSpec::median(f64::INFINITY), "width"),
            (ComponentSpec::curb(0.15, f64::INFINITY), "height"),
            (ComponentSpec::fill_slope(4.0, 1.0, f64::INFINITY), "height"),
            (ComponentSpec::cut_slope(f64::INFINITY, 1.0, 2.0), "h_ratio"),
            (ComponentSpec::retaining_wall(f64::INFINITY, 2.0, Retains::Fill), "thickness"),
            (ComponentSpec::barrier(0.6, 0.8, f64::INFINITY), "lateral_offset"),
            (ComponentSpec::lane(3.6, f64::NEG_INFINITY), "cross_slope"),
            (ComponentSpec::curb(0.15, f64::NEG_INFINITY), "height"),
        ] {
            let violations = check_attributes(&section([spec.clone()]), &policy);
            assert_eq!(violations.len(), 1, "{:?}: {:?}", spec, violations);
            assert_eq!(violations[0].attribute, Some(attribute));
            assert_eq!(violations[0].required_value, Requirement::Finite);
            assert!(violations[0].is_error());
        }
    }

    #[test]
    fn negative_infinite_width_is_one_error() {
        let violations = validate(&section([ComponentSpec::lane(f64::NEG_INFINITY, 0.02)]));
        let errors: Vec<_> = violations
            .iter()
            .filter(|v| v.category == Category::Attribute)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].required_value, Requirement::Finite);
    }

    #[test]
    fn pavement_layer_findings_name_their_layer() {
        let lane = ComponentSpec::layered_lane(
            3.6,
            0.02,
            [PavementLayer::asphalt(0.05), PavementLayer::crushed_rock(-0.2)],
        );
        let violations = validate(&section([lane]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].pavement_layer, Some(1));
        assert_eq!(violations[0].attribute, Some("thickness"));
        assert!(violations[0].is_error());

        let text = violations[0].to_string();
        assert!(text.starts_with("error: component 0 (lane) layer 1 thickness"), "{}", text);
    }

    #[test]
    fn steep_cross_slope_is_a_warning() {
        let violations = validate(&section([ComponentSpec::lane(3.6, 0.12)]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Attribute);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(!has_errors(&violations));
    }

    #[test]
    fn policy_can_tighten_cross_slope() {
        let policy = ValidationPolicy { cross_slope_limit: 0.03, ..Default::default() };
        let violations = validate_with(&section([ComponentSpec::shoulder(2.4, 0.04)]), &policy);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].attribute, Some("cross_slope"));
    }

    #[test]
    fn narrow_lane_is_a_standards_warning() {
        let violations = validate(&section([ComponentSpec::lane(2.4, 0.02)]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Standard);
        assert_eq!(violations[0].required_value, Requirement::Between { min: 2.7, max: 4.0 });
    }

    #[test]
    fn standards_can_be_switched_off() {
        let policy = ValidationPolicy { check_standards: false, ..Default::default() };
        let violations = validate_with(&section([ComponentSpec::lane(2.4, 0.0)]), &policy);
        assert!(violations.is_empty());
    }

    #[test]
    fn declared_offset_gap_is_a_continuity_warning() {
        let violations = validate(&section([
            ComponentSpec::shoulder(2.4, 0.04),
            ComponentSpec::barrier(0.6, 0.8, 0.5),
        ]));
        let continuity: Vec<_> = violations
            .iter()
            .filter(|v| v.category == Category::Continuity)
            .collect();
        assert_eq!(continuity.len(), 1);
        assert_eq!(continuity[0].component_index, Some(1));
        assert_eq!(continuity[0].component_kind, Some(ComponentKind::Barrier));
        assert_eq!(continuity[0].severity, Severity::Warning);
        match (continuity[0].current_value, continuity[0].required_value) {
            (Quantity::Point(current), Requirement::Near { target, tolerance }) => {
                assert!((current.x - target.x - 0.5).abs() < 1e-12);
                assert_eq!(tolerance, 0.001);
            }
            other => panic!("unexpected continuity payload: {:?}", other),
        }
    }

    #[test]
    fn offset_within_tolerance_is_not_reported() {
        let violations = validate(&section([
            ComponentSpec::shoulder(2.4, 0.04),
            ComponentSpec::barrier(0.6, 0.8, 0.0005),
        ]));
        assert!(violations.iter().all(|v| v.category != Category::Continuity));
    }

    #[test]
    fn negative_offset_is_an_attribute_error() {
        let violations = validate(&section([
            ComponentSpec::shoulder(2.4, 0.04),
            ComponentSpec::barrier(0.6, 0.8, -0.3),
        ]));
        assert!(violations
            .iter()
            .any(|v| v.attribute == Some("lateral_offset") && v.is_error()));
    }

    #[test]
    fn display_is_one_line() {
        let violations = validate(&section([ComponentSpec::lane(-1.0, 0.02)]));
        let text = violations[0].to_string();
        assert!(text.starts_with("error: component 0 (lane) width = -1.000"), "{}", text);
        assert!(!text.contains('\n'));
    }

    #[test]
    fn violations_serialize() {
        let violations = validate(&section([ComponentSpec::lane(2.4, 0.02)]));
        let json = serde_json::to_value(&violations).unwrap();
        assert_eq!(json[0]["category"], "standard");
        assert_eq!(json[0]["severity"], "warning");
        assert_eq!(json[0]["component_kind"], "lane");
        assert_eq!(json[0]["required_value"]["rule"], "between");
    }
}
