//! Object factory
//!
//! Creates bodies with configuration-supplied defaults and inserts them
//! into a simulator. The defaults are an explicit value handed in at
//! startup (see [`crate::config`]); the factory never reads global state.

use glam::Vec2;

use super::body::{Body, BodyId, Shape};
use super::simulator::Simulator;
use crate::config::{Config, ObjectDefaults, ShapeDefaults, parse_color};
use crate::consts;

/// Shape kind selector for the generic `create` entry point (toolbox drops)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Box,
    Circle,
    Triangle,
    Spring,
    Rope,
    Ramp,
}

pub struct ObjectFactory {
    defaults: ObjectDefaults,
    base_friction: f32,
    base_restitution: f32,
}

impl ObjectFactory {
    pub fn new(defaults: ObjectDefaults) -> Self {
        Self {
            defaults,
            base_friction: consts::DEFAULT_FRICTION,
            base_restitution: consts::DEFAULT_RESTITUTION,
        }
    }

    /// Factory wired to a loaded config: the per-shape defaults plus the
    /// global friction/restitution applied to every new body
    pub fn from_config(config: &Config) -> Self {
        Self {
            defaults: config.object_defaults.clone(),
            base_friction: config.physics.default_friction,
            base_restitution: config.physics.default_restitution,
        }
    }

    pub fn defaults(&self) -> &ObjectDefaults {
        &self.defaults
    }

    /// Axis-aligned box centered at `position`
    pub fn add_box(&self, sim: &mut Simulator, position: Vec2) -> Option<BodyId> {
        let d = &self.defaults.box_;
        let shape = Shape::Box {
            width: d.width.unwrap_or(consts::BOX_WIDTH),
            height: d.height.unwrap_or(consts::BOX_HEIGHT),
        };
        let body = self.finish(Body::new(position, d.mass.unwrap_or(1.0), shape), d);
        sim.add_body(body)
    }

    pub fn add_circle(&self, sim: &mut Simulator, position: Vec2) -> Option<BodyId> {
        let d = &self.defaults.circle;
        let shape = Shape::Circle {
            radius: d.radius.unwrap_or(consts::CIRCLE_RADIUS),
        };
        let body = self.finish(Body::new(position, d.mass.unwrap_or(1.0), shape), d);
        sim.add_body(body)
    }

    /// Isoceles triangle: base `width` centered under the apex at `height`
    pub fn add_triangle(&self, sim: &mut Simulator, position: Vec2) -> Option<BodyId> {
        let d = &self.defaults.triangle;
        let width = d.width.unwrap_or(1.0);
        let height = d.height.unwrap_or(1.0);
        let shape = Shape::Triangle {
            vertices: [
                Vec2::new(-width / 2.0, 0.0),
                Vec2::new(width / 2.0, 0.0),
                Vec2::new(0.0, height),
            ],
        };
        let body = self.finish(Body::new(position, d.mass.unwrap_or(1.0), shape), d);
        sim.add_body(body)
    }

    /// Massless spring between two anchors, rest length captured from them
    pub fn add_spring(&self, sim: &mut Simulator, start: Vec2, end: Vec2) -> Option<BodyId> {
        let d = &self.defaults.spring;
        let shape = Shape::spring(start, end, d.k.unwrap_or(consts::SPRING_K));
        let position = (start + end) / 2.0;
        let body = self.finish(Body::new(position, 0.0, shape), d);
        sim.add_body(body)
    }

    /// Massless rope between two anchors
    pub fn add_rope(&self, sim: &mut Simulator, start: Vec2, end: Vec2) -> Option<BodyId> {
        let d = &self.defaults.rope;
        let shape = Shape::rope(start, end, d.segments.unwrap_or(consts::ROPE_SEGMENTS));
        let position = (start + end) / 2.0;
        let body = self.finish(Body::new(position, 0.0, shape), d);
        sim.add_body(body)
    }

    /// Static ramp anchored at its lower-left corner
    pub fn add_ramp(&self, sim: &mut Simulator, position: Vec2) -> Option<BodyId> {
        let d = &self.defaults.ramp;
        let shape = Shape::ramp(
            d.width.unwrap_or(consts::RAMP_WIDTH),
            d.height.unwrap_or(consts::RAMP_HEIGHT),
        );
        let mut body = self.finish(Body::new(position, 0.0, shape), d);
        // Ramps are scenery: immovable colliders
        body.fixed = true;
        sim.add_body(body)
    }

    /// Generic dispatcher used when a toolbox item is dropped at a point.
    /// Two-anchor kinds (spring, rope) span one meter to the right.
    pub fn create(&self, sim: &mut Simulator, kind: ShapeKind, position: Vec2) -> Option<BodyId> {
        match kind {
            ShapeKind::Box => self.add_box(sim, position),
            ShapeKind::Circle => self.add_circle(sim, position),
            ShapeKind::Triangle => self.add_triangle(sim, position),
            ShapeKind::Spring => self.add_spring(sim, position, position + Vec2::new(1.0, 0.0)),
            ShapeKind::Rope => self.add_rope(sim, position, position + Vec2::new(1.0, 0.0)),
            ShapeKind::Ramp => self.add_ramp(sim, position),
        }
    }

    /// Apply the shared defaulted attributes. Per-shape friction wins over
    /// the global default; restitution is global only.
    fn finish(&self, mut body: Body, d: &ShapeDefaults) -> Body {
        body.friction = d.friction.unwrap_or(self.base_friction);
        body.restitution = self.base_restitution;
        if let Some(color) = d.color.as_deref().and_then(parse_color) {
            body.color = color;
        }
        body
    }
}

impl Default for ObjectFactory {
    fn default() -> Self {
        Self::new(ObjectDefaults::default())
    }
}
