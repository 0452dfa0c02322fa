//! Collision jump table and SAT narrow phase
//!
//! The table maps an ordered pair of [`ShapeKind`]s to a test function. It is
//! filled from an exhaustive match, so adding a shape kind fails to compile
//! until every pair has an entry. Pairs without a function report no contact.

use crate::foundation::logging::trace;
use crate::foundation::math::Vec2;

use super::collision::{Projection, ShapeGeometry, ShapeKind};
use super::contact::CollisionContact;

/// Narrow-phase test for one ordered pair of shape kinds
pub type NarrowPhaseFn = fn(&ShapeGeometry, &ShapeGeometry) -> Option<CollisionContact>;

/// Pair-keyed dispatch of narrow-phase tests
#[derive(Clone)]
pub struct CollisionJumpTable {
    table: [[Option<NarrowPhaseFn>; ShapeKind::COUNT]; ShapeKind::COUNT],
}

impl CollisionJumpTable {
    /// Table with every built-in pair registered
    pub fn new() -> Self {
        let mut table = Self::empty();
        for a in ShapeKind::ALL {
            for b in ShapeKind::ALL {
                table.table[a.index()][b.index()] = Some(Self::builtin(a, b));
            }
        }
        table
    }

    /// Table with no pairs registered
    pub fn empty() -> Self {
        Self {
            table: [[None; ShapeKind::COUNT]; ShapeKind::COUNT],
        }
    }

    fn builtin(a: ShapeKind, b: ShapeKind) -> NarrowPhaseFn {
        match (a, b) {
            (ShapeKind::Box, ShapeKind::Box) => box_box,
            (ShapeKind::Circle, ShapeKind::Circle) => circle_circle,
            (ShapeKind::Box, ShapeKind::Circle) => box_circle,
            (ShapeKind::Circle, ShapeKind::Box) => circle_box,
        }
    }

    /// Register a test for the ordered pair `(a, b)`
    pub fn register(&mut self, a: ShapeKind, b: ShapeKind, test: NarrowPhaseFn) {
        self.table[a.index()][b.index()] = Some(test);
    }

    /// Remove the tests for both orders of a pair
    pub fn unregister(&mut self, a: ShapeKind, b: ShapeKind) {
        self.table[a.index()][b.index()] = None;
        self.table[b.index()][a.index()] = None;
    }

    /// Whether some test handles the pair in either order
    pub fn supports(&self, a: ShapeKind, b: ShapeKind) -> bool {
        self.table[a.index()][b.index()].is_some() || self.table[b.index()][a.index()].is_some()
    }

    /// Run the narrow phase for two shapes
    ///
    /// Falls back to the reversed pair with a flipped normal; returns `None`
    /// when neither order is registered.
    pub fn collide(&self, a: &ShapeGeometry, b: &ShapeGeometry) -> Option<CollisionContact> {
        let (ka, kb) = (a.kind(), b.kind());
        if let Some(test) = self.table[ka.index()][kb.index()] {
            return test(a, b);
        }
        if let Some(test) = self.table[kb.index()][ka.index()] {
            return test(b, a).map(CollisionContact::flipped);
        }

        trace!("No narrow-phase test for {:?} vs {:?}", ka, kb);
        None
    }
}

impl Default for CollisionJumpTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CollisionJumpTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs: Vec<(ShapeKind, ShapeKind)> = ShapeKind::ALL
            .iter()
            .flat_map(|&a| ShapeKind::ALL.iter().map(move |&b| (a, b)))
            .filter(|(a, b)| self.table[a.index()][b.index()].is_some())
            .collect();
        f.debug_struct("CollisionJumpTable").field("pairs", &pairs).finish()
    }
}

/// Minimum-overlap search across candidate axes
///
/// Returns `None` as soon as one axis separates the shapes.
fn min_overlap_axis<'a>(
    a: &ShapeGeometry,
    b: &ShapeGeometry,
    axes: impl IntoIterator<Item = &'a Vec2>,
) -> Option<(Vec2, f32)> {
    let mut best: Option<(Vec2, f32)> = None;

    for axis in axes {
        if *axis == Vec2::zeros() {
            continue;
        }

        let pa: Projection = a.project(axis);
        let pb: Projection = b.project(axis);
        if !pa.overlaps(&pb) {
            return None;
        }

        let overlap = pa.overlap(&pb);
        if best.map_or(true, |(_, depth)| overlap < depth) {
            best = Some((*axis, overlap));
        }
    }

    best
}

/// Point `normal` from `a` toward `b`
fn orient(normal: Vec2, a: &ShapeGeometry, b: &ShapeGeometry) -> Vec2 {
    if normal.dot(&(b.center() - a.center())) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// Box against box over all eight edge axes
pub fn box_box(a: &ShapeGeometry, b: &ShapeGeometry) -> Option<CollisionContact> {
    let (axis, depth) = min_overlap_axis(a, b, a.axes().iter().chain(b.axes()))?;
    Some(CollisionContact::new(orient(axis, a, b), depth))
}

/// Circle against circle along the line between centers
///
/// Coincident centers report `+X` with the full radius sum as depth.
pub fn circle_circle(a: &ShapeGeometry, b: &ShapeGeometry) -> Option<CollisionContact> {
    let delta = b.center() - a.center();
    let distance = delta.norm();
    let reach = a.radius() + b.radius();
    if distance > reach {
        return None;
    }

    let normal = if distance > f32::EPSILON {
        delta / distance
    } else {
        Vec2::x()
    };
    Some(CollisionContact::new(normal, reach - distance))
}

/// Box against circle over the box axes plus the axis to the nearest vertex
pub fn box_circle(boxed: &ShapeGeometry, circle: &ShapeGeometry) -> Option<CollisionContact> {
    let center = circle.center();
    let nearest = boxed
        .points()
        .iter()
        .min_by(|p, q| (*p - center).norm_squared().total_cmp(&(*q - center).norm_squared()))
        .copied()?;
    let vertex_axis = (center - nearest).try_normalize(0.0).unwrap_or_else(Vec2::zeros);

    let (axis, depth) = min_overlap_axis(
        boxed,
        circle,
        boxed.axes().iter().chain(std::iter::once(&vertex_axis)),
    )?;
    Some(CollisionContact::new(orient(axis, boxed, circle), depth))
}

/// Circle against box, normal pointing from the circle to the box
pub fn circle_box(circle: &ShapeGeometry, boxed: &ShapeGeometry) -> Option<CollisionContact> {
    box_circle(boxed, circle).map(CollisionContact::flipped)
}
