//! Procedural spline shapes.
//!
//! A primitive stores its generating parameters instead of points. Consumers
//! that need point data call [`PrimitiveSpline::resolve`] to get the concrete
//! [`Spline`]. All shapes lie in the XY plane, centered on the origin.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::{Spline, SplineParams, SplineType, Tangent};

// k = 4/3 * tan(π/8), circular arc approximation with cubics
const K: f32 = 0.552_284_8;

/// Generating parameters of a procedural shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveShape {
    /// Axis-aligned rectangle.
    Rectangle {
        /// Extent along X.
        width: f32,
        /// Extent along Y.
        height: f32,
    },
    /// Circle built from four Bezier points.
    Circle {
        /// Circle radius.
        radius: f32,
    },
    /// Regular polygon, first corner at the top.
    Polygon {
        /// Distance from center to each corner.
        radius: f32,
        /// Number of corners (at least 3).
        sides: u32,
    },
    /// Open two-point line.
    Line {
        /// Start point.
        from: Vec3,
        /// End point.
        to: Vec3,
    },
}

impl PrimitiveShape {
    /// Returns true if the shape forms a loop.
    pub fn is_closed(&self) -> bool {
        !matches!(self, PrimitiveShape::Line { .. })
    }
}

/// A procedural spline: shape parameters plus sampling settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrimitiveSpline {
    /// Shape parameters.
    pub shape: PrimitiveShape,
    /// Sampling settings copied onto the resolved spline.
    pub params: SplineParams,
}

impl PrimitiveSpline {
    /// Creates a primitive with default sampling settings.
    pub fn new(shape: PrimitiveShape) -> Self {
        Self {
            shape,
            params: SplineParams::default(),
        }
    }

    /// Creates a rectangle primitive.
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(PrimitiveShape::Rectangle { width, height })
    }

    /// Creates a circle primitive.
    pub fn circle(radius: f32) -> Self {
        Self::new(PrimitiveShape::Circle { radius })
    }

    /// Creates a regular polygon primitive.
    pub fn polygon(radius: f32, sides: u32) -> Self {
        Self::new(PrimitiveShape::Polygon { radius, sides })
    }

    /// Creates a line primitive.
    pub fn line(from: Vec3, to: Vec3) -> Self {
        Self::new(PrimitiveShape::Line { from, to })
    }

    /// Sets the sampling settings, builder style.
    pub fn with_params(mut self, params: SplineParams) -> Self {
        self.params = params;
        self
    }

    /// Returns true if the resolved spline will be closed.
    pub fn is_closed(&self) -> bool {
        self.shape.is_closed()
    }

    /// Generates the concrete point-based spline.
    pub fn resolve(&self) -> Spline {
        let spline = match self.shape {
            PrimitiveShape::Rectangle { width, height } => {
                let hx = width * 0.5;
                let hy = height * 0.5;
                Spline::new(
                    SplineType::Linear,
                    vec![
                        Vec3::new(-hx, -hy, 0.0),
                        Vec3::new(hx, -hy, 0.0),
                        Vec3::new(hx, hy, 0.0),
                        Vec3::new(-hx, hy, 0.0),
                    ],
                )
            }
            PrimitiveShape::Circle { radius } => circle(radius),
            PrimitiveShape::Polygon { radius, sides } => {
                let sides = sides.max(3);
                let points = (0..sides)
                    .map(|i| {
                        let angle = TAU * (i as f32) / (sides as f32) + TAU / 4.0;
                        Vec3::new(angle.cos(), angle.sin(), 0.0) * radius
                    })
                    .collect();
                Spline::new(SplineType::Linear, points)
            }
            PrimitiveShape::Line { from, to } => Spline::new(SplineType::Linear, vec![from, to]),
        };

        spline.closed(self.is_closed()).with_params(self.params)
    }
}

fn circle(radius: f32) -> Spline {
    let k = K * radius;
    let points = [
        Vec3::new(radius, 0.0, 0.0),
        Vec3::new(0.0, radius, 0.0),
        Vec3::new(-radius, 0.0, 0.0),
        Vec3::new(0.0, -radius, 0.0),
    ];
    // Counter-clockwise travel direction at each quadrant point
    let tangents = [
        Tangent::smooth(Vec3::new(0.0, k, 0.0)),
        Tangent::smooth(Vec3::new(-k, 0.0, 0.0)),
        Tangent::smooth(Vec3::new(0.0, -k, 0.0)),
        Tangent::smooth(Vec3::new(k, 0.0, 0.0)),
    ];

    Spline::from_pairs(SplineType::Bezier, points.into_iter().zip(tangents))
}
