//! Collision geometry attached to kinematic bodies
//!
//! Two shapes exist: circles (balls, bumpers) and frames (open polylines in
//! body space: walls, floors, flippers). Frame segments are rebuilt from the
//! current pose on every query so a spinning flipper never goes stale.

use std::fmt;
use std::sync::Arc;

use glam::Quat;
use parking_lot::Mutex;

use super::cinematic::Cinematic;
use super::collision::ShapeKind;
use super::moveable::Pose;
use super::segment::Segment;
use super::units::{DeltaSpace, Mass, Position};
use crate::error::PhysicsError;

/// Callback run when a contact is detected; receives the other participant
pub type CollisionAction = Arc<dyn Fn(&Hitbox) + Send + Sync>;

/// Unscaled geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Connected polyline through body-local vertices
    Frame { vertices: Vec<Position> },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Frame { .. } => ShapeKind::Frame,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scale {
    factor: f32,
    /// Circle radius with `factor` already applied
    radius: f32,
}

pub struct Hitbox {
    label: String,
    body: Cinematic,
    shape: Shape,
    scale: Mutex<Scale>,
    action: Mutex<Option<CollisionAction>>,
}

impl fmt::Debug for Hitbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hitbox")
            .field("label", &self.label)
            .field("shape", &self.shape)
            .field("scale_factor", &self.scale_factor())
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Hitbox {
    /// Wrap a body with collision geometry
    ///
    /// Fails for frames with fewer than two vertices.
    pub fn new(body: Cinematic, shape: Shape) -> Result<Self, PhysicsError> {
        let radius = match &shape {
            Shape::Circle { radius } => *radius,
            Shape::Frame { vertices } if vertices.len() < 2 => {
                return Err(PhysicsError::DegenerateFrame {
                    vertices: vertices.len(),
                });
            }
            Shape::Frame { .. } => 0.0,
        };
        Ok(Self::assemble(body, shape, radius))
    }

    /// Circles have no vertex count to check, so this cannot fail
    pub fn circle(position: Position, mass: Mass, radius: f32) -> Self {
        Self::assemble(
            Cinematic::new(position, Quat::IDENTITY, mass),
            Shape::Circle { radius },
            radius,
        )
    }

    fn assemble(body: Cinematic, shape: Shape, radius: f32) -> Self {
        let label = match shape.kind() {
            ShapeKind::Circle => "circle",
            ShapeKind::Frame => "frame",
        };
        Self {
            label: label.to_string(),
            body,
            shape,
            scale: Mutex::new(Scale { factor: 1.0, radius }),
            action: Mutex::new(None),
        }
    }

    pub fn frame(
        position: Position,
        rotation: Quat,
        mass: Mass,
        vertices: Vec<Position>,
    ) -> Result<Self, PhysicsError> {
        Self::new(
            Cinematic::new(position, rotation, mass),
            Shape::Frame { vertices },
        )
    }

    /// Name used in log output
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Kinematic state: position, speed, forces, emitted field
    pub fn body(&self) -> &Cinematic {
        &self.body
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Scaled radius, `None` for frames
    pub fn radius(&self) -> Option<f32> {
        match self.shape {
            Shape::Circle { .. } => Some(self.scale.lock().radius),
            Shape::Frame { .. } => None,
        }
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale.lock().factor
    }

    /// Rescale the geometry; circle radius is recomputed from the base radius
    pub fn set_scale_factor(&self, factor: f32) {
        let mut scale = self.scale.lock();
        scale.factor = factor;
        if let Shape::Circle { radius } = self.shape {
            scale.radius = radius * factor;
        }
    }

    /// Number of polyline segments (0 for circles)
    pub fn segment_count(&self) -> usize {
        match &self.shape {
            Shape::Frame { vertices } => vertices.len().saturating_sub(1),
            Shape::Circle { .. } => 0,
        }
    }

    /// Segment `index` in world space, from the current pose
    pub fn segment(&self, index: usize) -> Option<Segment> {
        let Shape::Frame { vertices } = &self.shape else {
            return None;
        };
        let (start, end) = (vertices.get(index)?, vertices.get(index + 1)?);
        let pose = self.body.pose();
        let factor = self.scale_factor();
        Some(Segment::between(
            to_world(&pose, factor, *start),
            to_world(&pose, factor, *end),
        ))
    }

    /// All world-space segments, built from a single pose snapshot
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let vertices: &[Position] = match &self.shape {
            Shape::Frame { vertices } => vertices,
            Shape::Circle { .. } => &[],
        };
        let pose = self.body.pose();
        let factor = self.scale_factor();
        vertices.windows(2).map(move |pair| {
            Segment::between(
                to_world(&pose, factor, pair[0]),
                to_world(&pose, factor, pair[1]),
            )
        })
    }

    pub fn set_collision_action<F>(&self, action: F)
    where
        F: Fn(&Hitbox) + Send + Sync + 'static,
    {
        *self.action.lock() = Some(Arc::new(action));
    }

    pub fn clear_collision_action(&self) {
        *self.action.lock() = None;
    }

    /// Run the collision action, if any, against `other`
    ///
    /// The lock is released before the call, so the action may touch this
    /// hitbox (reset its position, replace its own action).
    pub fn on_collision(&self, other: &Hitbox) {
        let action = self.action.lock().clone();
        if let Some(action) = action {
            action(other);
        }
    }
}

/// Body-local vertex to world space: scale, rotate, translate
fn to_world(pose: &Pose, factor: f32, local: Position) -> Position {
    let offset = pose.rotation * (local.vec() * factor);
    pose.position + DeltaSpace::from_vec(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn flipper() -> Hitbox {
        Hitbox::frame(
            Position::new(10.0, 0.0, 0.0),
            Quat::IDENTITY,
            Mass::new(1.0),
            vec![
                Position::ZERO,
                Position::new(4.0, 0.0, 0.0),
                Position::new(4.0, 2.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_frame_needs_two_vertices() {
        let err = Hitbox::frame(
            Position::ZERO,
            Quat::IDENTITY,
            Mass::new(1.0),
            vec![Position::ZERO],
        )
        .unwrap_err();
        assert!(matches!(err, PhysicsError::DegenerateFrame { vertices: 1 }));
    }

    #[test]
    fn test_segments_follow_pose() {
        let f = flipper();
        assert_eq!(f.segment_count(), 2);

        let first = f.segment(0).unwrap();
        assert_eq!(first.origin, Position::new(10.0, 0.0, 0.0));
        assert_eq!(first.end(), Position::new(14.0, 0.0, 0.0));
        assert!(f.segment(2).is_none());

        f.body().set_rotation(Quat::from_rotation_z(FRAC_PI_2));
        f.body().set_position(Position::new(0.0, 0.0, 0.0));
        let first = f.segment(0).unwrap();
        assert!((first.end().vec() - glam::Vec3::new(0.0, 4.0, 0.0)).length() < 1e-5);

        let all: Vec<_> = f.segments().collect();
        assert_eq!(all.len(), 2);
        assert!((all[1].end().vec() - glam::Vec3::new(-2.0, 4.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_circle_shortcut_matches_new() {
        let shortcut = Hitbox::circle(Position::new(1.0, 2.0, 0.0), Mass::new(3.0), 0.5);
        let built = Hitbox::new(
            Cinematic::new(Position::new(1.0, 2.0, 0.0), Quat::IDENTITY, Mass::new(3.0)),
            Shape::Circle { radius: 0.5 },
        )
        .unwrap();

        assert_eq!(shortcut.shape(), built.shape());
        assert_eq!(shortcut.label(), built.label());
        assert_eq!(shortcut.radius(), Some(0.5));
        assert_eq!(shortcut.scale_factor(), built.scale_factor());
        assert_eq!(shortcut.body().position(), built.body().position());
        assert_eq!(shortcut.body().mass(), built.body().mass());
    }

    #[test]
    fn test_scale_factor() {
        let ball = Hitbox::circle(Position::ZERO, Mass::new(1.0), 2.0);
        assert_eq!(ball.radius(), Some(2.0));
        ball.set_scale_factor(1.5);
        assert_eq!(ball.radius(), Some(3.0));
        assert_eq!(ball.scale_factor(), 1.5);
        assert_eq!(ball.segments().count(), 0);

        let f = flipper();
        f.set_scale_factor(2.0);
        assert_eq!(f.radius(), None);
        assert_eq!(f.segment(0).unwrap().end(), Position::new(18.0, 0.0, 0.0));
    }

    #[test]
    fn test_collision_action_receives_other() {
        let ball = Hitbox::circle(Position::ZERO, Mass::new(1.0), 1.0).with_label("ball");
        let wall = flipper().with_label("wall");

        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        ball.set_collision_action(move |other| {
            assert_eq!(other.label(), "wall");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        ball.on_collision(&wall);
        wall.on_collision(&ball);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        ball.clear_collision_action();
        ball.on_collision(&wall);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
