//! Transform component for the ECS system
//!
//! Pure data: position, rotation (radians, counter-clockwise) and scale in
//! world space, plus the derived local-to-world matrix. Rigid bodies write it,
//! colliders read it.

use crate::ecs::Component;
use crate::foundation::math::{Mat3, Mat3Ext, Vec2};

/// ECS Transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec2,

    /// Rotation in radians
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Component for TransformComponent {
    const UNIQUE: bool = true;
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from position and rotation
    pub fn from_position_rotation(position: Vec2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation in radians
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::new(scale, scale);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-world affine matrix (TRS order)
    pub fn to_world_matrix(&self) -> Mat3 {
        Mat3::affine_trs(&self.position, self.rotation, &self.scale)
    }

    /// Transform a local point into world space
    pub fn transform_point(&self, local: &Vec2) -> Vec2 {
        self.to_world_matrix().transform_point2(local)
    }

    /// Unit vector along the local +X axis in world space
    pub fn right(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }

    /// Unit vector along the local +Y axis in world space
    pub fn up(&self) -> Vec2 {
        Vec2::new(-self.rotation.sin(), self.rotation.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_identity() {
        let transform = TransformComponent::identity();
        let point = Vec2::new(3.0, -2.0);

        assert_eq!(transform.transform_point(&point), point);
    }

    #[test]
    fn test_world_matrix_applies_scale_then_rotation_then_translation() {
        let transform = TransformComponent::from_position_rotation(Vec2::new(10.0, 0.0), HALF_PI)
            .with_scale(Vec2::new(2.0, 1.0));

        let world = transform.transform_point(&Vec2::new(1.0, 0.0));
        assert_relative_eq!(world, Vec2::new(10.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_basis_vectors_follow_rotation() {
        let transform = TransformComponent::identity().with_rotation(HALF_PI);

        assert_relative_eq!(transform.right(), Vec2::new(0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(transform.up(), Vec2::new(-1.0, 0.0), epsilon = 1e-6);
    }
}
