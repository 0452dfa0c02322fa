//! Collision geometry
//!
//! Rays, segments and projection intervals, plus the world-space geometry
//! cache that every collider keeps in sync with its transform.

use crate::foundation::math::{utils, Mat3, Mat3Ext, Vec2};

use super::bounds::Bounds;

/// Parallel ray/segment pairs below this cross product are treated as disjoint
const PARALLEL_EPSILON: f32 = 1e-9;

/// Segments used when approximating a circle outline
pub const CIRCLE_OUTLINE_SEGMENTS: usize = 24;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec2,
    /// Unit direction (zero if constructed from a zero vector)
    pub direction: Vec2,
}

impl Ray {
    /// Creates a new ray; the direction is normalized
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: direction.try_normalize(0.0).unwrap_or_else(Vec2::zeros),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to where it crosses `line`
    ///
    /// The segment parameter is half-open, `[0, 1)`: the `begin` vertex
    /// belongs to the segment, `end` does not, so a closed polygon counts a
    /// shared vertex exactly once. Parallel segments never intersect.
    pub fn intersect(&self, line: &Line) -> Option<f32> {
        let segment = line.direction();
        let denominator = utils::cross(&self.direction, &segment);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let to_begin = line.begin - self.origin;
        let t = utils::cross(&to_begin, &segment) / denominator;
        let u = utils::cross(&to_begin, &self.direction) / denominator;

        (t >= 0.0 && (0.0..1.0).contains(&u)).then_some(t)
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<H> {
    /// What was hit
    pub target: H,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec2,
}

/// Line segment
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Line {
    /// Start point
    pub begin: Vec2,
    /// End point
    pub end: Vec2,
}

impl Line {
    /// Create a segment
    pub fn new(begin: Vec2, end: Vec2) -> Self {
        Self { begin, end }
    }

    /// Vector from `begin` to `end`
    pub fn direction(&self) -> Vec2 {
        self.end - self.begin
    }

    /// Segment length
    pub fn length(&self) -> f32 {
        self.direction().norm()
    }
}

/// Scalar interval produced by projecting a shape onto an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Lower end
    pub min: f32,
    /// Upper end
    pub max: f32,
}

impl Projection {
    /// Create an interval
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether the intervals share at least one point
    pub fn overlaps(&self, other: &Projection) -> bool {
        self.max >= other.min && other.max >= self.min
    }

    /// Length of the shared part (negative when disjoint)
    pub fn overlap(&self, other: &Projection) -> f32 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// Whether a value lies inside the interval
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Concrete shape kind, used to key the collision jump table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Oriented rectangle
    Box = 0,
    /// Circle
    Circle = 1,
}

impl ShapeKind {
    /// Number of shape kinds
    pub const COUNT: usize = 2;

    /// Every kind, in index order
    pub const ALL: [ShapeKind; Self::COUNT] = [ShapeKind::Box, ShapeKind::Circle];

    /// Row/column in the jump table
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Local shape description
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Rectangle centred on the collider origin
    Box {
        /// Half width and half height
        half_extents: Vec2,
    },
    /// Circle centred on the collider origin
    Circle {
        /// Radius before scaling
        radius: f32,
    },
}

impl ColliderShape {
    /// Box from full width and height
    pub fn rect(width: f32, height: f32) -> Self {
        ColliderShape::Box {
            half_extents: Vec2::new(width.abs() * 0.5, height.abs() * 0.5),
        }
    }

    /// Circle from radius
    pub fn circle(radius: f32) -> Self {
        ColliderShape::Circle { radius: radius.abs() }
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Box { .. } => ShapeKind::Box,
            ColliderShape::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Number of world-space vertices (and edges) the shape caches
    pub fn vertex_count(&self) -> usize {
        match self {
            ColliderShape::Box { .. } => 4,
            ColliderShape::Circle { .. } => 0,
        }
    }
}

/// World-space geometry of a collider
///
/// Buffers are sized once by [`ShapeGeometry::allocate`] and rewritten in
/// place by every [`ShapeGeometry::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    kind: ShapeKind,
    points: Vec<Vec2>,
    edges: Vec<Vec2>,
    axes: Vec<Vec2>,
    sides: Vec<Line>,
    center: Vec2,
    radius: f32,
    bounds: Bounds,
}

impl ShapeGeometry {
    /// Geometry with no cache allocated yet
    pub fn unallocated(kind: ShapeKind) -> Self {
        Self {
            kind,
            points: Vec::new(),
            edges: Vec::new(),
            axes: Vec::new(),
            sides: Vec::new(),
            center: Vec2::zeros(),
            radius: 0.0,
            bounds: Bounds::default(),
        }
    }

    /// Geometry with buffers sized for `shape`
    pub fn allocate(shape: &ColliderShape) -> Self {
        let count = shape.vertex_count();
        Self {
            points: vec![Vec2::zeros(); count],
            edges: vec![Vec2::zeros(); count],
            axes: vec![Vec2::zeros(); count],
            sides: vec![Line::default(); count],
            ..Self::unallocated(shape.kind())
        }
    }

    /// Whether the cache has been sized for its shape
    pub fn is_allocated(&self) -> bool {
        self.kind != ShapeKind::Box || self.points.len() == 4
    }

    /// Recompute vertices, edges, axes, sides and bounds
    ///
    /// `offset` is the shape center in local space; `to_world` is the host's
    /// local-to-world matrix.
    pub fn refresh(&mut self, shape: &ColliderShape, offset: &Vec2, to_world: &Mat3) {
        self.center = to_world.transform_point2(offset);

        match *shape {
            ColliderShape::Box { half_extents } => {
                let (hx, hy) = (half_extents.x, half_extents.y);
                let corners = [
                    Vec2::new(-hx, -hy),
                    Vec2::new(hx, -hy),
                    Vec2::new(hx, hy),
                    Vec2::new(-hx, hy),
                ];
                for (point, corner) in self.points.iter_mut().zip(corners) {
                    *point = to_world.transform_point2(&(offset + corner));
                }

                let count = self.points.len();
                for index in 0..count {
                    let begin = self.points[index];
                    let end = self.points[(index + 1) % count];
                    let edge = end - begin;
                    self.edges[index] = edge;
                    self.axes[index] = utils::perpendicular(&edge)
                        .try_normalize(0.0)
                        .unwrap_or_else(Vec2::zeros);
                    self.sides[index] = Line::new(begin, end);
                }

                self.radius = 0.0;
                self.bounds = Bounds::from_points(&self.points).unwrap_or(Bounds {
                    center: self.center,
                    extents: Vec2::zeros(),
                });
            }
            ColliderShape::Circle { radius } => {
                let scale_x = to_world.transform_vector2(&Vec2::x()).norm();
                let scale_y = to_world.transform_vector2(&Vec2::y()).norm();
                self.radius = radius * scale_x.max(scale_y);
                self.bounds = Bounds::new(self.center, Vec2::new(self.radius, self.radius));
            }
        }
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// World-space vertices, counter-clockwise for unmirrored transforms
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Edge vectors, `points[i + 1] - points[i]`
    pub fn edges(&self) -> &[Vec2] {
        &self.edges
    }

    /// One unit perpendicular per edge
    pub fn axes(&self) -> &[Vec2] {
        &self.axes
    }

    /// Edge segments
    pub fn sides(&self) -> &[Line] {
        &self.sides
    }

    /// World-space center
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// World-space radius (circles only, zero otherwise)
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Axis-aligned bounds
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Point-in-shape test
    pub fn contains(&self, point: &Vec2) -> bool {
        match self.kind {
            ShapeKind::Box => {
                let ray = Ray::new(*point, Vec2::x());
                let crossings = self
                    .sides
                    .iter()
                    .filter(|side| ray.intersect(side).is_some())
                    .count();
                crossings % 2 == 1
            }
            ShapeKind::Circle => (point - self.center).norm_squared() <= self.radius * self.radius,
        }
    }

    /// Closest boundary point hit at a positive distance
    pub fn ray_cast(&self, ray: &Ray) -> Option<Vec2> {
        self.ray_distance(ray).map(|t| ray.point_at(t))
    }

    /// Distance to the closest boundary hit at a positive distance
    pub fn ray_distance(&self, ray: &Ray) -> Option<f32> {
        match self.kind {
            ShapeKind::Box => self
                .sides
                .iter()
                .filter_map(|side| ray.intersect(side))
                .filter(|&t| t > 0.0)
                .min_by(f32::total_cmp),
            ShapeKind::Circle => {
                let oc = ray.origin - self.center;
                let b = oc.dot(&ray.direction);
                let c = oc.norm_squared() - self.radius * self.radius;
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }

                let root = discriminant.sqrt();
                [-b - root, -b + root].into_iter().find(|&t| t > 0.0)
            }
        }
    }

    /// Project onto `axis`
    pub fn project(&self, axis: &Vec2) -> Projection {
        match self.kind {
            ShapeKind::Box => {
                let (min, max) = self.points.iter().fold(
                    (f32::MAX, -f32::MAX),
                    |(min, max), point| {
                        let s = point.dot(axis);
                        (min.min(s), max.max(s))
                    },
                );
                Projection::new(min, max)
            }
            ShapeKind::Circle => {
                let center = self.center.dot(axis);
                let reach = self.radius * axis.norm();
                Projection::new(center - reach, center + reach)
            }
        }
    }

    /// Support point: the point furthest along `direction`
    pub fn furthest_point(&self, direction: &Vec2) -> Vec2 {
        match self.kind {
            ShapeKind::Box => {
                let mut best = self.center;
                let mut max = -f32::MAX;
                for point in &self.points {
                    let dot = point.dot(direction);
                    if dot > max {
                        max = dot;
                        best = *point;
                    }
                }
                best
            }
            ShapeKind::Circle => {
                let unit = direction.try_normalize(0.0).unwrap_or_else(Vec2::zeros);
                self.center + unit * self.radius
            }
        }
    }

    /// Closed outline for debug drawing; circles are approximated
    pub fn outline_into(&self, out: &mut Vec<Vec2>) {
        out.clear();
        match self.kind {
            ShapeKind::Box => out.extend_from_slice(&self.points),
            ShapeKind::Circle => {
                let step = std::f32::consts::TAU / CIRCLE_OUTLINE_SEGMENTS as f32;
                out.extend((0..CIRCLE_OUTLINE_SEGMENTS).map(|i| {
                    let angle = step * i as f32;
                    self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
                }));
            }
        }
    }
}
