//! Scene object model
//!
//! An [`Object`] carries the data every entity shares (name, transform,
//! wireframe flag) plus a [`Shape`] payload. Shapes are a closed set, so
//! dispatch is a `match` on the enum rather than any runtime type query.
//!
//! Curves refer to Point objects through [`ObjectId`] handles; the scene owns
//! every object and prunes those handles when a Point is deleted.

pub mod geometry;
pub mod torus;
pub mod point;
pub mod cursor;
pub mod polyline;
pub mod bezier;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

use crate::foundation::transform::Transform;

pub use bezier::{BezierSampling, C0Bezier};
pub use cursor::Cursor;
pub use geometry::{MeshBuffers, ShapeGeometry, Vertex, WireframeBuffers};
pub use point::{PointParams, PointShape};
pub use polyline::PolyLine;
pub use torus::{Torus, TorusParams};

new_key_type! {
    /// Stable handle to an object owned by a scene
    pub struct ObjectId;
}

/// Discriminant of an object's shape, for UI dispatch and naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Parametric torus
    Torus,
    /// Point marker
    Point,
    /// Axis gizmo
    Cursor,
    /// Chain through points
    PolyLine,
    /// Cubic Bezier chain through points
    C0Bezier,
}

impl ObjectKind {
    /// All kinds, in declaration order
    pub const ALL: [Self; 5] = [
        Self::Torus,
        Self::Point,
        Self::Cursor,
        Self::PolyLine,
        Self::C0Bezier,
    ];

    /// Prefix used for generated names
    pub fn label(self) -> &'static str {
        match self {
            Self::Torus => "Torus",
            Self::Point => "Point",
            Self::Cursor => "Cursor",
            Self::PolyLine => "PolyLine",
            Self::C0Bezier => "C0Bezier",
        }
    }

    /// True for shapes whose geometry follows referenced points
    pub fn is_curve(self) -> bool {
        matches!(self, Self::PolyLine | Self::C0Bezier)
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Invalid shape parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Fewer than three samples
    #[error("{name} must be at least 3 (got {value})")]
    TooFewSamples {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: u32,
    },

    /// Zero, negative or non-finite radius
    #[error("{name} must be positive and finite (got {value})")]
    InvalidRadius {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f32,
    },
}

/// Minimum sample count along any shape parameter
pub const MIN_SAMPLES: u32 = 3;

pub(crate) fn validate_samples(name: &'static str, value: u32) -> Result<(), ShapeError> {
    if value < MIN_SAMPLES {
        return Err(ShapeError::TooFewSamples { name, value });
    }
    Ok(())
}

pub(crate) fn validate_radius(name: &'static str, value: f32) -> Result<(), ShapeError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ShapeError::InvalidRadius { name, value });
    }
    Ok(())
}

/// Shape payload of an object
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Torus
    Torus(Torus),
    /// Point marker
    Point(PointShape),
    /// Axis gizmo
    Cursor(Cursor),
    /// Polyline
    PolyLine(PolyLine),
    /// Bezier chain
    C0Bezier(C0Bezier),
}

impl Shape {
    /// Discriminant of this shape
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Torus(_) => ObjectKind::Torus,
            Self::Point(_) => ObjectKind::Point,
            Self::Cursor(_) => ObjectKind::Cursor,
            Self::PolyLine(_) => ObjectKind::PolyLine,
            Self::C0Bezier(_) => ObjectKind::C0Bezier,
        }
    }

    /// Parameter-only geometry, if this shape has any.
    ///
    /// Curves return `None`: their vertices come from other objects.
    pub fn geometry(&self) -> Option<&dyn ShapeGeometry> {
        match self {
            Self::Torus(torus) => Some(torus),
            Self::Point(point) => Some(point),
            Self::Cursor(cursor) => Some(cursor),
            Self::PolyLine(_) | Self::C0Bezier(_) => None,
        }
    }

    /// Referenced points, for curves
    pub fn control_points(&self) -> Option<&[ObjectId]> {
        match self {
            Self::PolyLine(line) => Some(line.points()),
            Self::C0Bezier(curve) => Some(curve.points()),
            _ => None,
        }
    }

    /// Structural hash for static shapes
    pub fn structural_hash(&self) -> Option<u64> {
        self.geometry().map(|geometry| geometry.structural_hash())
    }
}

/// Shape parameters for creating or replacing a shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeParams {
    /// Torus parameters
    Torus(TorusParams),
    /// Point parameters
    Point(PointParams),
    /// Axis gizmo (no parameters)
    Cursor,
    /// Polyline through the given points
    PolyLine(Vec<ObjectId>),
    /// Bezier chain through the given control points
    C0Bezier(Vec<ObjectId>),
}

impl ShapeParams {
    /// Kind of shape these parameters build
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::Torus(_) => ObjectKind::Torus,
            Self::Point(_) => ObjectKind::Point,
            Self::Cursor => ObjectKind::Cursor,
            Self::PolyLine(_) => ObjectKind::PolyLine,
            Self::C0Bezier(_) => ObjectKind::C0Bezier,
        }
    }

    /// Validate and build the shape
    pub fn build(self) -> Result<Shape, ShapeError> {
        Ok(match self {
            Self::Torus(params) => Shape::Torus(Torus::new(params)?),
            Self::Point(params) => Shape::Point(PointShape::new(params)?),
            Self::Cursor => Shape::Cursor(Cursor),
            Self::PolyLine(points) => Shape::PolyLine(PolyLine::new(points)),
            Self::C0Bezier(points) => Shape::C0Bezier(C0Bezier::new(points)),
        })
    }
}

/// Scene entity
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Display name
    pub name: String,
    /// Placement in the world
    pub transform: Transform,
    /// Draw as lines instead of filled triangles
    pub wireframe: bool,
    shape: Shape,
}

impl Object {
    /// Create an object at the origin
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            wireframe: false,
            shape,
        }
    }

    /// Builder pattern: set transform
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: set wireframe flag
    #[must_use]
    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    /// Discriminant of the shape
    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    /// Shape payload
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub(crate) fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    /// Swap in a new shape, returning the old one
    pub(crate) fn replace_shape(&mut self, shape: Shape) -> Shape {
        std::mem::replace(&mut self.shape, shape)
    }

    /// Structural hash of the shape, `None` for curves
    pub fn structural_hash(&self) -> Option<u64> {
        self.shape.structural_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_hash_ignores_transform_and_name() {
        let shape = ShapeParams::Torus(TorusParams::default()).build().unwrap();
        let a = Object::new("Torus0", shape.clone());
        let b = Object::new("Other", shape)
            .with_transform(Transform::from_translation(Vec3::new(5.0, 0.0, 1.0)))
            .with_wireframe(true);

        assert!(a.structural_hash().is_some());
        assert_eq!(a.structural_hash(), b.structural_hash());
    }

    #[test]
    fn test_curves_have_no_static_geometry() {
        let line = ShapeParams::PolyLine(Vec::new()).build().unwrap();
        assert!(line.geometry().is_none());
        assert!(line.structural_hash().is_none());
        assert_eq!(line.control_points(), Some(&[][..]));
        assert!(line.kind().is_curve());
    }

    #[test]
    fn test_params_report_kind() {
        for params in [
            ShapeParams::Torus(TorusParams::default()),
            ShapeParams::Point(PointParams::default()),
            ShapeParams::Cursor,
            ShapeParams::PolyLine(Vec::new()),
            ShapeParams::C0Bezier(Vec::new()),
        ] {
            let kind = params.kind();
            assert_eq!(params.build().unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_invalid_params_fail_to_build() {
        let err = ShapeParams::Point(PointParams { radius: 0.1, samples: 1 }).build();
        assert_eq!(err, Err(ShapeError::TooFewSamples { name: "samples", value: 1 }));
    }
}
