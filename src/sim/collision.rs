//! Narrow-phase collision detection and impulse response
//!
//! Pairs are routed through [`detector_for`], a closed table over the two
//! shape kinds. Frame-frame contact has no algorithm and is reported as
//! [`PhysicsError::UnsupportedPair`] instead of silently missing.
//!
//! Response is a single-pass elastic impulse along the contact normal. A
//! rotating frame lends its contact point's tangential speed to the impulse,
//! but its own spin is never changed by it: a flipper does not slow down when
//! it strikes the ball.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::hitbox::Hitbox;
use super::units::{Impulse, Position, Speed, Time};
use crate::error::PhysicsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Frame,
}

/// Contact between two hitboxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Contact point in world space
    pub point: Position,
    /// Unit normal pointing from the first hitbox toward the second
    pub normal: Vec3,
    /// Overlap along the normal (0 when just touching)
    pub depth: f32,
}

/// Narrow-phase test for an ordered pair of hitboxes
pub type Detector = fn(&Hitbox, &Hitbox) -> Option<Contact>;

/// Pick the detection routine for a pair of shape kinds
pub fn detector_for(first: ShapeKind, second: ShapeKind) -> Result<Detector, PhysicsError> {
    match (first, second) {
        (ShapeKind::Circle, ShapeKind::Circle) => Ok(circle_circle),
        (ShapeKind::Circle, ShapeKind::Frame) => Ok(circle_frame),
        (ShapeKind::Frame, ShapeKind::Circle) => Ok(frame_circle),
        (ShapeKind::Frame, ShapeKind::Frame) => Err(PhysicsError::UnsupportedPair { first, second }),
    }
}

/// Circles touch when the distance between centres is at most `r1 + r2`
pub fn circle_circle(a: &Hitbox, b: &Hitbox) -> Option<Contact> {
    let (ra, rb) = (a.radius()?, b.radius()?);
    let (pa, pb) = (a.body().position(), b.body().position());

    let diff = (pb - pa).vec();
    let dist = diff.length();
    if dist > ra + rb {
        return None;
    }

    // Coincident centres: any direction will do
    let normal = diff.try_normalize().unwrap_or(Vec3::X);
    Some(Contact {
        point: Position::from_vec(pa.vec() + normal * ra),
        normal,
        depth: ra + rb - dist,
    })
}

/// Circle first, frame second: normal points from the circle into the frame
pub fn circle_frame(circle: &Hitbox, frame: &Hitbox) -> Option<Contact> {
    let contact = frame_circle(frame, circle)?;
    Some(Contact {
        normal: -contact.normal,
        ..contact
    })
}

/// Frame first, circle second: normal points from the frame toward the circle
///
/// Every segment is tested and the deepest one wins, so a ball sitting in a
/// corner produces one contact rather than one per touching segment.
pub fn frame_circle(frame: &Hitbox, circle: &Hitbox) -> Option<Contact> {
    let radius = circle.radius()?;
    let center = circle.body().position();

    let mut best: Option<Contact> = None;
    for segment in frame.segments() {
        let dist = segment.distance(center);
        if dist > radius {
            continue;
        }
        let depth = radius - dist;
        if best.is_some_and(|b| b.depth >= depth) {
            continue;
        }
        best = Some(Contact {
            point: segment.closest_point(center),
            normal: segment.normal_to(center),
            depth,
        });
    }
    best
}

/// Velocity of the material point of `hitbox` at `point`
///
/// Frames add the tangential term `ω ẑ × r` of their spin about their
/// position; circles contribute only their linear speed.
pub fn contact_velocity(hitbox: &Hitbox, point: Position) -> Speed {
    let body = hitbox.body();
    let linear = body.speed();
    match hitbox.shape().kind() {
        ShapeKind::Circle => linear,
        ShapeKind::Frame => {
            let lever = (point - body.position()).vec();
            let tangential = Vec3::Z.cross(lever) * body.angular_speed();
            linear + Speed::from_vec(tangential)
        }
    }
}

/// Apply an elastic impulse for `contact` as a force over `elapsed`
///
/// `j = -(1 + e) · vn · m1·m2/(m1 + m2)` with `vn` the relative speed along
/// the normal. Returns the impulse given to `b` (`a` receives its opposite),
/// or `None` when the bodies are already separating.
pub fn resolve(
    a: &Hitbox,
    b: &Hitbox,
    contact: &Contact,
    restitution: f32,
    elapsed: Time,
) -> Option<Impulse> {
    let relative = contact_velocity(b, contact.point) - contact_velocity(a, contact.point);
    let normal_speed = relative.vec().dot(contact.normal);
    if normal_speed >= 0.0 {
        return None;
    }

    let reduced = a.body().mass().reduced(b.body().mass());
    let magnitude = -(1.0 + restitution) * normal_speed * reduced.kg();
    let impulse = Impulse::from_vec(contact.normal * magnitude);

    b.body().add_external_force(impulse / elapsed);
    a.body().add_external_force(-impulse / elapsed);
    Some(impulse)
}
