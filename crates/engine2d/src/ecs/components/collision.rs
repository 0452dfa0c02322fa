//! Collider component
//!
//! Wraps a local [`ColliderShape`] with its world-space [`ShapeGeometry`]
//! cache, material values and broad-phase layer. Geometry is allocated when
//! the component is attached and refreshed in place every fixed step.

use crate::debug::draw::LineRendererComponent;
use crate::ecs::storage::ComponentHandle;
use crate::ecs::{Component, Entity, World};
use crate::foundation::math::Vec2;
use crate::physics::bounds::Bounds;
use crate::physics::collision::{ColliderShape, Projection, Ray, ShapeGeometry, ShapeKind};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::contact::CollisionContact;
use crate::physics::dispatch::CollisionJumpTable;

use super::{RigidBodyComponent, TransformComponent};

/// Default bounciness
pub const DEFAULT_RESTITUTION: f32 = 0.2;

/// Default friction
pub const DEFAULT_FRICTION: f32 = 0.99;

/// How the collider moves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColliderType {
    /// No rigid body on the host
    #[default]
    Static,
    /// Driven by a sibling rigid body
    Rigidbody,
    /// Moved by game code, never by the integrator
    Kinematic,
}

/// Component giving an entity a collision shape
#[derive(Debug, Clone)]
pub struct ColliderComponent {
    shape: ColliderShape,
    geometry: ShapeGeometry,

    /// Shape center relative to the host origin, before the world transform
    pub offset: Vec2,

    /// Layer mask
    pub layer: CollisionLayers,

    /// Bounciness used by the contact resolver
    pub restitution: f32,

    /// Friction used by the contact resolver
    pub friction: f32,

    /// Draw the shape outline every frame
    pub debug: bool,

    body_type: ColliderType,
    kinematic: bool,
    rigid_body: Option<ComponentHandle<RigidBodyComponent>>,
    pub(crate) debug_renderer: Option<ComponentHandle<LineRendererComponent>>,
}

impl Component for ColliderComponent {
    const REQUIRES_TRANSFORM: bool = true;

    fn start(&mut self, entity: Entity, world: &World) {
        self.geometry = ShapeGeometry::allocate(&self.shape);

        self.link_rigid_body(world.get_component_handle::<RigidBodyComponent>(entity));

        if let Some(transform) = world.get_component::<TransformComponent>(entity) {
            self.refresh(transform);
        }
    }
}

impl ColliderComponent {
    /// Create a collider with default material
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            geometry: ShapeGeometry::unallocated(shape.kind()),
            shape,
            offset: Vec2::zeros(),
            layer: CollisionLayers::DEFAULT,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
            debug: false,
            body_type: ColliderType::Static,
            kinematic: false,
            rigid_body: None,
            debug_renderer: None,
        }
    }

    /// Box collider from full width and height
    pub fn rect(width: f32, height: f32) -> Self {
        Self::new(ColliderShape::rect(width, height))
    }

    /// Circle collider
    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderShape::circle(radius))
    }

    /// Builder pattern: Set local offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Builder pattern: Set layer mask
    pub fn with_layer(mut self, layer: CollisionLayers) -> Self {
        self.layer = layer;
        self
    }

    /// Builder pattern: Set material values
    pub fn with_material(mut self, restitution: f32, friction: f32) -> Self {
        self.restitution = restitution;
        self.friction = friction;
        self
    }

    /// Builder pattern: Enable debug drawing
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Builder pattern: Mark as kinematic
    pub fn as_kinematic(mut self) -> Self {
        self.kinematic = true;
        self.body_type = ColliderType::Kinematic;
        self
    }

    /// Local shape
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Replace the local shape; the geometry cache is resized and must be
    /// refreshed before the next query
    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
        self.geometry = ShapeGeometry::allocate(&shape);
    }

    /// Shape kind
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// World-space geometry
    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    /// Axis-aligned bounds
    pub fn bounds(&self) -> &Bounds {
        self.geometry.bounds()
    }

    /// Body type, resolved on attach and every geometry refresh
    pub fn body_type(&self) -> ColliderType {
        self.body_type
    }

    /// Sibling rigid body, if one is attached
    pub fn rigid_body(&self) -> Option<ComponentHandle<RigidBodyComponent>> {
        self.rigid_body
    }

    /// Point at the host's current rigid body and derive the body type.
    /// A kinematic collider stays kinematic.
    pub(crate) fn link_rigid_body(&mut self, body: Option<ComponentHandle<RigidBodyComponent>>) {
        self.rigid_body = body;
        self.body_type = if self.kinematic {
            ColliderType::Kinematic
        } else if body.is_some() {
            ColliderType::Rigidbody
        } else {
            ColliderType::Static
        };
    }

    /// Debug line renderer currently fed by this collider
    pub fn debug_renderer(&self) -> Option<ComponentHandle<LineRendererComponent>> {
        self.debug_renderer
    }

    /// Recompute world-space geometry from the host transform
    pub fn refresh(&mut self, transform: &TransformComponent) {
        self.geometry
            .refresh(&self.shape, &self.offset, &transform.to_world_matrix());
    }

    /// Narrow-phase test against another collider
    pub fn collide(&self, other: &ColliderComponent, table: &CollisionJumpTable) -> Option<CollisionContact> {
        table.collide(&self.geometry, &other.geometry)
    }

    /// Point-in-shape test
    pub fn contains(&self, point: &Vec2) -> bool {
        self.geometry.contains(point)
    }

    /// Closest boundary point hit by the ray
    pub fn ray_cast(&self, ray: &Ray) -> Option<Vec2> {
        self.geometry.ray_cast(ray)
    }

    /// Project onto an axis
    pub fn project(&self, axis: &Vec2) -> Projection {
        self.geometry.project(axis)
    }

    /// Support point along a direction
    pub fn furthest_point(&self, direction: &Vec2) -> Vec2 {
        self.geometry.furthest_point(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::world::AttachError;
    use approx::assert_relative_eq;

    #[test]
    fn test_attach_requires_transform() {
        let mut world = World::new();
        let entity = world.create_entity();

        assert!(matches!(
            world.add_component(entity, ColliderComponent::rect(1.0, 1.0)),
            Err(AttachError::MissingTransform { .. })
        ));
    }

    #[test]
    fn test_attach_allocates_and_refreshes_geometry() {
        let mut world = World::new();
        let entity = world.create_entity();
        world
            .add_component(entity, TransformComponent::from_position(Vec2::new(2.0, 3.0)))
            .unwrap();
        let handle = world.add_component(entity, ColliderComponent::rect(2.0, 4.0)).unwrap();

        let collider = world.component(handle).unwrap();
        assert_eq!(collider.geometry().points().len(), 4);
        assert_relative_eq!(collider.bounds().center, Vec2::new(2.0, 3.0));
        assert_relative_eq!(collider.bounds().extents, Vec2::new(1.0, 2.0));
        assert_eq!(collider.body_type(), ColliderType::Static);
        assert_eq!(collider.restitution, DEFAULT_RESTITUTION);
        assert_eq!(collider.layer, CollisionLayers::DEFAULT);
    }

    #[test]
    fn test_sibling_rigid_body_is_linked() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, TransformComponent::default()).unwrap();
        let body = world.add_component(entity, RigidBodyComponent::new()).unwrap();
        let handle = world.add_component(entity, ColliderComponent::circle(1.0)).unwrap();

        let collider = world.component(handle).unwrap();
        assert_eq!(collider.rigid_body(), Some(body));
        assert_eq!(collider.body_type(), ColliderType::Rigidbody);
    }

    #[test]
    fn test_kinematic_is_kept() {
        let mut world = World::new();
        let entity = world.create_entity();
        world.add_component(entity, TransformComponent::default()).unwrap();
        world.add_component(entity, RigidBodyComponent::new()).unwrap();
        let handle = world
            .add_component(entity, ColliderComponent::rect(1.0, 1.0).as_kinematic())
            .unwrap();

        assert_eq!(world.component(handle).unwrap().body_type(), ColliderType::Kinematic);
    }

    #[test]
    fn test_offset_moves_shape() {
        let mut collider = ColliderComponent::circle(1.0).with_offset(Vec2::new(1.0, 0.0));
        collider.set_shape(ColliderShape::circle(1.0));
        collider.refresh(&TransformComponent::identity().with_rotation(std::f32::consts::FRAC_PI_2));

        assert_relative_eq!(collider.geometry().center(), Vec2::new(0.0, 1.0), epsilon = 1e-6);
        assert!(collider.contains(&Vec2::new(0.0, 1.5)));
    }
}
