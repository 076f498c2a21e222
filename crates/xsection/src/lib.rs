//! # xsection
//!
//! Road cross-section assembly. Describe a section as an ordered run of
//! components (lanes, shoulders, curbs, slopes, ...) from a control point;
//! `solve` snaps them together left to right into absolute coordinates and
//! polygons, and `validate` reports everything that looks wrong.
//!
//! ```
//! use xsection::{solve, validate, ComponentSpec, ControlPoint, Section};
//!
//! let section = Section::new(ControlPoint::new(0.0, 100.0))
//!     .with(ComponentSpec::lane(3.6, 0.02))
//!     .with(ComponentSpec::shoulder(2.4, 0.04));
//!
//! assert!(validate(&section).is_empty());
//! let geometry = solve(&section).unwrap();
//! assert!((geometry.total_width() - 6.0).abs() < 1e-12);
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level

pub mod assembler;
pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pavement;
pub mod section;
pub mod tables;
pub mod validate;

// Re-export common types at crate root for convenience.
pub use assembler::{placements, solve, solve_with, PlacedComponent, Placement, SectionGeometry};
pub use components::{
    Attribute, ClosingLevels, ComponentGeometry, ComponentKind, ComponentMetadata, ComponentSpec,
    Retains,
};
pub use config::{GeometrySettings, ValidationPolicy};
pub use error::{ConfigError, StructuralError};
pub use geometry::{Point, Polygon};
pub use pavement::PavementLayer;
pub use section::{ControlPoint, Section};
pub use validate::{
    has_errors, validate, validate_with, Category, Quantity, Requirement, Severity, Violation,
};
