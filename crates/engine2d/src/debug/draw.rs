//! Debug drawing primitives
//!
//! [`LineRendererComponent`] is an output-only polyline attached to an
//! entity. [`DebugDrawSystem`] gathers those polylines into a flat list a
//! renderer can consume.

use crate::ecs::components::ColliderComponent;
use crate::ecs::storage::ComponentHandle;
use crate::ecs::{Component, World};
use crate::foundation::math::{Vec2, Vec4};
use crate::physics::collision::Line;

/// Default debug color (green)
pub const DEFAULT_DEBUG_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

/// Polyline drawn every frame
#[derive(Debug, Clone)]
pub struct LineRendererComponent {
    points: Vec<Vec2>,

    /// Connect the last point back to the first
    pub close_path: bool,

    /// Line color
    pub color: Vec4,

    pub(crate) source: Option<ComponentHandle<ColliderComponent>>,
}

impl Component for LineRendererComponent {}

impl LineRendererComponent {
    /// Create an empty open polyline
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            close_path: false,
            color: Vec4::from(DEFAULT_DEBUG_COLOR),
            source: None,
        }
    }

    /// Renderer fed from a collider outline
    pub(crate) fn for_collider(collider: ComponentHandle<ColliderComponent>) -> Self {
        Self {
            close_path: true,
            source: Some(collider),
            ..Self::new()
        }
    }

    /// Builder pattern: Close the path
    pub fn with_close_path(mut self, close: bool) -> Self {
        self.close_path = close;
        self
    }

    /// Builder pattern: Set color
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Current points
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Collider feeding this renderer, if any
    pub fn source(&self) -> Option<ComponentHandle<ColliderComponent>> {
        self.source
    }

    /// Remove every point
    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    /// Append points
    pub fn add_points(&mut self, points: &[Vec2]) {
        self.points.extend_from_slice(points);
    }

    /// Replace all points, reusing the buffer
    pub fn set_points(&mut self, points: &[Vec2]) {
        self.points.clear();
        self.points.extend_from_slice(points);
    }

    /// Mutable access to the point buffer
    pub(crate) fn points_mut(&mut self) -> &mut Vec<Vec2> {
        &mut self.points
    }

    /// Segments of the polyline, including the closing one
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        let count = self.points.len();
        let segment_count = match count {
            0 | 1 => 0,
            _ if self.close_path => count,
            _ => count - 1,
        };
        (0..segment_count).map(move |i| Line::new(self.points[i], self.points[(i + 1) % count]))
    }
}

impl Default for LineRendererComponent {
    fn default() -> Self {
        Self::new()
    }
}

/// Single colored segment ready for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    /// Segment
    pub line: Line,
    /// Color
    pub color: Vec4,
}

/// Debug drawing system
///
/// Line renderer components are re-read on every [`DebugDrawSystem::collect`].
#[derive(Debug)]
pub struct DebugDrawSystem {
    lines: Vec<DebugLine>,

    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            enabled: true,
        }
    }

    /// Gather every line to draw this frame
    pub fn collect(&mut self, world: &World) -> &[DebugLine] {
        self.lines.clear();
        if !self.enabled {
            return &self.lines;
        }

        for (_, renderer) in world.query::<LineRendererComponent>() {
            let color = renderer.color;
            self.lines
                .extend(renderer.segments().map(|line| DebugLine { line, color }));
        }
        &self.lines
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}
