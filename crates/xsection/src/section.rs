//! Sections: a control point plus an ordered run of components.
//!
//! ## Rust Lesson #13: Append-only by construction
//!
//! The component list is private. The only ways in are `push` and `with`,
//! and the only way out is a borrowed slice, so nobody can reorder or edit a
//! component that's already placed. To change a section you build a new one;
//! `Clone` gives you a cheap snapshot to start from.

use serde::{Deserialize, Serialize};

use crate::components::ComponentSpec;
use crate::geometry::Point;

/// Origin of a section, e.g. the roadway crown.
///
/// Has no insertion point, only an attachment point where the first
/// component begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub x: f64,
    pub elevation: f64,
    /// Horizontal shift of the attachment point, e.g. half a median on a
    /// divided road
    #[serde(default)]
    pub attachment_offset: f64,
    #[serde(default)]
    pub description: String,
}

impl ControlPoint {
    pub fn new(x: f64, elevation: f64) -> Self {
        Self {
            x,
            elevation,
            attachment_offset: 0.0,
            description: String::new(),
        }
    }

    /// Origin at `(0, 0)`.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn with_attachment_offset(mut self, offset: f64) -> Self {
        self.attachment_offset = offset;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Where the first component begins.
    pub fn attachment(&self) -> Point {
        Point::new(self.x + self.attachment_offset, self.elevation)
    }
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self::origin()
    }
}

/// An ordered, append-only run of components anchored at a control point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    name: Option<String>,
    control: ControlPoint,
    components: Vec<ComponentSpec>,
}

impl Section {
    pub fn new(control: ControlPoint) -> Self {
        Self {
            name: None,
            control,
            components: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>, control: ControlPoint) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(control)
        }
    }

    /// Builder-style append, consuming and returning the section.
    pub fn with(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    /// Append in place.
    pub fn push(&mut self, component: ComponentSpec) -> &mut Self {
        self.components.push(component);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn control(&self) -> &ControlPoint {
        &self.control
    }

    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl Extend<ComponentSpec> for Section {
    fn extend<I: IntoIterator<Item = ComponentSpec>>(&mut self, iter: I) {
        self.components.extend(iter);
    }
}
