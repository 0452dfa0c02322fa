//! Math utilities and types
//!
//! Provides the 2D vector and affine matrix types used by the simulation.
//! Everything is a plain value type; nothing here allocates.

pub use nalgebra::{Vector2, Vector4, Matrix3, Rotation2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3x3 matrix type, used as a 2x3 affine transform in homogeneous form
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// RGBA color
pub type Vec4 = Vector4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross(a: &Vec2, b: &Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// Left-hand perpendicular of a vector, `(-y, x)`
    pub fn perpendicular(v: &Vec2) -> Vec2 {
        Vec2::new(-v.y, v.x)
    }
}

/// Extension trait for Mat3 used as a 2D affine transform
pub trait Mat3Ext {
    /// Build a translation * rotation * scale affine matrix
    fn affine_trs(position: &Vec2, rotation: f32, scale: &Vec2) -> Mat3;

    /// Transform a point (applies translation)
    fn transform_point2(&self, point: &Vec2) -> Vec2;

    /// Transform a direction (ignores translation)
    fn transform_vector2(&self, vector: &Vec2) -> Vec2;
}

impl Mat3Ext for Mat3 {
    fn affine_trs(position: &Vec2, rotation: f32, scale: &Vec2) -> Mat3 {
        Mat3::new_translation(position)
            * Rotation2::new(rotation).to_homogeneous()
            * Mat3::new_nonuniform_scaling(scale)
    }

    fn transform_point2(&self, point: &Vec2) -> Vec2 {
        self.transform_point(&Point2::from(*point)).coords
    }

    fn transform_vector2(&self, vector: &Vec2) -> Vec2 {
        self.transform_vector(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_affine_translation_only() {
        let m = Mat3::affine_trs(&Vec2::new(3.0, -2.0), 0.0, &Vec2::new(1.0, 1.0));
        let p = m.transform_point2(&Vec2::new(1.0, 1.0));
        assert_relative_eq!(p, Vec2::new(4.0, -1.0), epsilon = 1e-6);

        // Directions are not translated
        let v = m.transform_vector2(&Vec2::new(1.0, 1.0));
        assert_relative_eq!(v, Vec2::new(1.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_affine_rotation_is_counter_clockwise() {
        let m = Mat3::affine_trs(&Vec2::zeros(), constants::HALF_PI, &Vec2::new(1.0, 1.0));
        let p = m.transform_point2(&Vec2::new(1.0, 0.0));
        assert_relative_eq!(p, Vec2::new(0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_affine_scale_applies_before_translation() {
        let m = Mat3::affine_trs(&Vec2::new(10.0, 0.0), 0.0, &Vec2::new(2.0, 3.0));
        let p = m.transform_point2(&Vec2::new(1.0, 1.0));
        assert_relative_eq!(p, Vec2::new(12.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn test_cross_and_perpendicular() {
        let x = Vec2::new(1.0, 0.0);
        let y = Vec2::new(0.0, 1.0);
        assert_eq!(utils::cross(&x, &y), 1.0);
        assert_eq!(utils::cross(&y, &x), -1.0);
        assert_eq!(utils::perpendicular(&x), y);
    }
}
