//! Axis-aligned bounding box used by the broad phase

use crate::foundation::math::Vec2;

/// AABB stored as center and half-extents
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    /// Box center
    pub center: Vec2,
    /// Half-extents along X and Y (never negative)
    pub extents: Vec2,
}

impl Bounds {
    /// Create bounds from center and half-extents
    pub fn new(center: Vec2, extents: Vec2) -> Self {
        Self {
            center,
            extents: extents.abs(),
        }
    }

    /// Create bounds spanning two corners
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            extents: (max - min).abs() * 0.5,
        }
    }

    /// Smallest bounds enclosing every point, `None` when there are none
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), point| {
            (min.inf(point), max.sup(point))
        });
        Some(Self::from_min_max(min, max))
    }

    /// Lower-left corner
    pub fn min(&self) -> Vec2 {
        self.center - self.extents
    }

    /// Upper-right corner
    pub fn max(&self) -> Vec2 {
        self.center + self.extents
    }

    /// Full width and height
    pub fn size(&self) -> Vec2 {
        self.extents * 2.0
    }

    /// Whether the X intervals overlap (touching counts)
    pub fn overlaps_x(&self, other: &Bounds) -> bool {
        (self.center.x - other.center.x).abs() <= self.extents.x + other.extents.x
    }

    /// Whether the Y intervals overlap (touching counts)
    pub fn overlaps_y(&self, other: &Bounds) -> bool {
        (self.center.y - other.center.y).abs() <= self.extents.y + other.extents.y
    }

    /// Broad-phase overlap test
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Whether a point lies inside or on the boundary
    pub fn contains_point(&self, point: &Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.extents.x && offset.y <= self.extents.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_roundtrip() {
        let bounds = Bounds::from_min_max(Vec2::new(-1.0, 2.0), Vec2::new(3.0, 4.0));
        assert_eq!(bounds.center, Vec2::new(1.0, 3.0));
        assert_eq!(bounds.extents, Vec2::new(2.0, 1.0));
        assert_eq!(bounds.min(), Vec2::new(-1.0, 2.0));
        assert_eq!(bounds.max(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_axes_tested_independently() {
        let a = Bounds::new(Vec2::zeros(), Vec2::new(1.0, 1.0));
        let b = Bounds::new(Vec2::new(1.5, 5.0), Vec2::new(1.0, 1.0));

        assert!(a.overlaps_x(&b));
        assert!(!a.overlaps_y(&b));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Bounds::new(Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0))));
    }

    #[test]
    fn test_from_points() {
        let points = [Vec2::new(1.0, -1.0), Vec2::new(-2.0, 0.5), Vec2::new(0.0, 3.0)];
        let bounds = Bounds::from_points(&points).unwrap();

        assert_eq!(bounds.min(), Vec2::new(-2.0, -1.0));
        assert_eq!(bounds.max(), Vec2::new(1.0, 3.0));
        assert!(Bounds::from_points(std::iter::empty::<&Vec2>()).is_none());
    }

    #[test]
    fn test_contains_point_includes_edges() {
        let bounds = Bounds::new(Vec2::new(2.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(bounds.contains_point(&Vec2::new(3.0, -1.0)));
        assert!(bounds.contains_point(&Vec2::new(2.5, 0.5)));
        assert!(!bounds.contains_point(&Vec2::new(0.5, 0.0)));
        assert!(!bounds.contains_point(&Vec2::new(2.0, 1.5)));
    }
}
