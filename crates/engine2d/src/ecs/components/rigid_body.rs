//! Rigid body component
//!
//! Accumulates forces and torques by [`ForceMode`] and integrates them into
//! velocity, angular velocity and the host transform once per fixed step.

use crate::ecs::system::SimulationContext;
use crate::ecs::Component;
use crate::foundation::math::Vec2;

use super::TransformComponent;

/// Default mass in kilograms
pub const DEFAULT_MASS: f32 = 1.0;

/// Default moment of inertia
pub const DEFAULT_INERTIA: f32 = 1000.0;

/// Angular speeds at or below this magnitude are not integrated
pub const ANGULAR_VELOCITY_EPSILON: f32 = 1e-6;

/// How an applied force or torque changes velocity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ForceMode {
    /// Scaled by step time and inverse mass
    #[default]
    Force = 0,
    /// Scaled by step time only
    Acceleration = 1,
    /// Scaled by inverse mass only
    Impulse = 2,
    /// Applied to velocity as is
    VelocityChange = 3,
}

impl ForceMode {
    /// Integration order
    pub const ALL: [ForceMode; 4] = [
        ForceMode::Force,
        ForceMode::Acceleration,
        ForceMode::Impulse,
        ForceMode::VelocityChange,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Velocity delta factor for this mode given step time and inverse mass
    fn scale(self, dt: f32, inverse_mass: f32) -> f32 {
        match self {
            ForceMode::Force => dt * inverse_mass,
            ForceMode::Acceleration => dt,
            ForceMode::Impulse => inverse_mass,
            ForceMode::VelocityChange => 1.0,
        }
    }
}

/// Rejected rigid body configuration
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RigidBodyError {
    /// Mass must be positive and finite
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    /// Moment of inertia must be positive and finite
    #[error("moment of inertia must be positive and finite, got {0}")]
    InvalidInertia(f32),
}

fn is_valid_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Rigid body state
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyComponent {
    mass: f32,
    inverse_mass: f32,
    inertia: f32,
    inverse_inertia: f32,

    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Angular velocity in radians per second
    pub angular_velocity: f32,

    /// Linear drag coefficient
    pub drag: f32,

    /// Angular drag coefficient
    pub angular_drag: f32,

    /// Whether global gravity is applied every step
    pub use_gravity: bool,

    /// Lock rotation; angular velocity is held at zero
    pub freeze_rotation: bool,

    /// Upper bound on angular speed
    pub max_angular_velocity: f32,

    forces: [Vec2; 4],
    torques: [f32; 4],
}

impl Component for RigidBodyComponent {
    const UNIQUE: bool = true;
    const REQUIRES_TRANSFORM: bool = true;
}

impl Default for RigidBodyComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBodyComponent {
    /// Create a body with unit mass, at rest
    pub fn new() -> Self {
        Self {
            mass: DEFAULT_MASS,
            inverse_mass: 1.0 / DEFAULT_MASS,
            inertia: DEFAULT_INERTIA,
            inverse_inertia: 1.0 / DEFAULT_INERTIA,
            velocity: Vec2::zeros(),
            angular_velocity: 0.0,
            drag: 0.0,
            angular_drag: 0.0,
            use_gravity: false,
            freeze_rotation: false,
            max_angular_velocity: f32::INFINITY,
            forces: [Vec2::zeros(); 4],
            torques: [0.0; 4],
        }
    }

    /// Create a body with the given mass
    pub fn with_mass(mass: f32) -> Result<Self, RigidBodyError> {
        let mut body = Self::new();
        body.set_mass(mass)?;
        Ok(body)
    }

    /// Builder pattern: Set moment of inertia
    pub fn with_inertia(mut self, inertia: f32) -> Result<Self, RigidBodyError> {
        self.set_inertia(inertia)?;
        Ok(self)
    }

    /// Builder pattern: Set initial velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder pattern: Set linear and angular drag
    pub fn with_drag(mut self, drag: f32, angular_drag: f32) -> Self {
        self.drag = drag;
        self.angular_drag = angular_drag;
        self
    }

    /// Builder pattern: Enable gravity
    pub fn with_gravity(mut self, use_gravity: bool) -> Self {
        self.use_gravity = use_gravity;
        self
    }

    /// Builder pattern: Freeze rotation
    pub fn with_freeze_rotation(mut self, freeze: bool) -> Self {
        self.freeze_rotation = freeze;
        self
    }

    /// Builder pattern: Clamp angular speed
    pub fn with_max_angular_velocity(mut self, max: f32) -> Self {
        self.max_angular_velocity = max.abs();
        self
    }

    /// Mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Cached `1 / mass`
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    /// Moment of inertia
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// Cached `1 / inertia`
    pub fn inverse_inertia(&self) -> f32 {
        self.inverse_inertia
    }

    /// Set mass; the cached inverse is updated with it
    pub fn set_mass(&mut self, mass: f32) -> Result<(), RigidBodyError> {
        if !is_valid_positive(mass) {
            return Err(RigidBodyError::InvalidMass(mass));
        }
        self.mass = mass;
        self.inverse_mass = 1.0 / mass;
        Ok(())
    }

    /// Set moment of inertia; the cached inverse is updated with it
    pub fn set_inertia(&mut self, inertia: f32) -> Result<(), RigidBodyError> {
        if !is_valid_positive(inertia) {
            return Err(RigidBodyError::InvalidInertia(inertia));
        }
        self.inertia = inertia;
        self.inverse_inertia = 1.0 / inertia;
        Ok(())
    }

    /// Queue a force for the next step
    pub fn add_force(&mut self, force: Vec2, mode: ForceMode) {
        self.forces[mode.index()] += force;
    }

    /// Queue a torque for the next step
    pub fn add_torque(&mut self, torque: f32, mode: ForceMode) {
        self.torques[mode.index()] += torque;
    }

    /// Drop every pending force and torque
    pub fn clear_force(&mut self) {
        self.forces = [Vec2::zeros(); 4];
        self.torques = [0.0; 4];
    }

    /// Pending force for a mode
    pub fn pending_force(&self, mode: ForceMode) -> Vec2 {
        self.forces[mode.index()]
    }

    /// Pending torque for a mode
    pub fn pending_torque(&self, mode: ForceMode) -> f32 {
        self.torques[mode.index()]
    }

    /// Integrate one fixed step into `transform`
    ///
    /// `alpha` scales the step length (1 for full steps). Every accumulator
    /// is cleared after use.
    pub fn fixed_update(&mut self, alpha: f32, ctx: &SimulationContext, transform: &mut TransformComponent) {
        let dt = ctx.step_seconds(alpha);

        if self.use_gravity {
            self.add_force(ctx.gravity, ForceMode::Acceleration);
        }

        for mode in ForceMode::ALL {
            let index = mode.index();
            self.velocity += self.forces[index] * mode.scale(dt, self.inverse_mass);
            self.forces[index] = Vec2::zeros();

            self.angular_velocity += self.torques[index] * mode.scale(dt, self.inverse_inertia);
            self.torques[index] = 0.0;
        }

        if self.velocity != Vec2::zeros() {
            self.velocity *= (1.0 - self.drag * dt).max(0.0);
            transform.position += self.velocity * dt;
        }

        if self.freeze_rotation {
            self.angular_velocity = 0.0;
            return;
        }

        self.angular_velocity = self
            .angular_velocity
            .clamp(-self.max_angular_velocity, self.max_angular_velocity);

        if self.angular_velocity.abs() > ANGULAR_VELOCITY_EPSILON {
            self.angular_velocity *= (1.0 - self.angular_drag * dt).max(0.0);
            transform.rotation += self.angular_velocity * dt;
        }
    }
}
