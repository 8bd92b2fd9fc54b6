//! Directed line segments
//!
//! Frames are polylines; collision against a frame reduces to point-to-segment
//! distance and the direction from the segment's closest point to the ball.

use glam::Vec3;

use super::units::{DeltaSpace, Position};

/// Squared lengths below this are treated as a point
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub origin: Position,
    pub direction: DeltaSpace,
}

impl Segment {
    pub fn new(origin: Position, direction: DeltaSpace) -> Self {
        Self { origin, direction }
    }

    pub fn between(start: Position, end: Position) -> Self {
        Self::new(start, end - start)
    }

    #[inline]
    pub fn end(&self) -> Position {
        self.origin + self.direction
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.direction.magnitude()
    }

    /// Closest point on the segment to `point`, clamped to the endpoints
    pub fn closest_point(&self, point: Position) -> Position {
        let d = self.direction.vec();
        let len_sq = d.length_squared();
        if len_sq < DEGENERATE_LENGTH_SQ {
            return self.origin;
        }
        let t = ((point - self.origin).vec().dot(d) / len_sq).clamp(0.0, 1.0);
        self.origin + self.direction * t
    }

    /// Perpendicular distance when the projection lands on the segment,
    /// distance to the nearer endpoint otherwise
    pub fn distance(&self, point: Position) -> f32 {
        (point - self.closest_point(point)).magnitude()
    }

    /// Unit vector from the closest point toward `point`
    ///
    /// Falls back to [`Segment::normal`] when `point` lies on the segment.
    pub fn normal_to(&self, point: Position) -> Vec3 {
        let offset = (point - self.closest_point(point)).vec();
        offset.try_normalize().unwrap_or_else(|| self.normal())
    }

    /// Clockwise perpendicular of the direction in the XY plane
    ///
    /// For a left-to-right floor this points down; build floors right-to-left
    /// (or rely on [`Segment::normal_to`]) to face the ball.
    pub fn normal(&self) -> Vec3 {
        let d = self.direction.vec();
        Vec3::new(d.y, -d.x, 0.0).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn x_axis_segment() -> Segment {
        Segment::between(Position::ZERO, Position::new(10.0, 0.0, 0.0))
    }

    #[test]
    fn test_distance_perpendicular() {
        let s = x_axis_segment();
        assert!((s.distance(Position::new(5.0, 3.0, 0.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_clamped_to_endpoints() {
        let s = x_axis_segment();
        assert!((s.distance(Position::new(15.0, 0.0, 0.0)) - 5.0).abs() < 1e-6);
        assert!((s.distance(Position::new(-2.0, 0.0, 0.0)) - 2.0).abs() < 1e-6);
        // Off the end and off the line: Euclidean to the endpoint
        assert!((s.distance(Position::new(13.0, 4.0, 0.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_to_faces_point_from_either_side() {
        let s = x_axis_segment();
        let above = s.normal_to(Position::new(5.0, 2.0, 0.0));
        let below = s.normal_to(Position::new(5.0, -2.0, 0.0));
        assert!((above - Vec3::Y).length() < 1e-6);
        assert!((below - -Vec3::Y).length() < 1e-6);

        let past_end = s.normal_to(Position::new(13.0, 4.0, 0.0));
        assert!((past_end - Vec3::new(0.6, 0.8, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_static_normal_is_clockwise() {
        let s = x_axis_segment();
        assert!((s.normal() - -Vec3::Y).length() < 1e-6);
        // Point on the segment falls back to it
        assert!((s.normal_to(Position::new(4.0, 0.0, 0.0)) - -Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_degenerate_segment_is_a_point() {
        let s = Segment::new(Position::new(1.0, 1.0, 0.0), DeltaSpace::ZERO);
        assert_eq!(s.length(), 0.0);
        assert!((s.distance(Position::new(4.0, 5.0, 0.0)) - 5.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_distance_never_exceeds_endpoints(
            ax in -50.0f32..50.0, ay in -50.0f32..50.0,
            bx in -50.0f32..50.0, by in -50.0f32..50.0,
            px in -50.0f32..50.0, py in -50.0f32..50.0,
        ) {
            let a = Position::new(ax, ay, 0.0);
            let b = Position::new(bx, by, 0.0);
            let p = Position::new(px, py, 0.0);
            let s = Segment::between(a, b);
            let d = s.distance(p);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= (p - a).magnitude() + 1e-3);
            prop_assert!(d <= (p - b).magnitude() + 1e-3);
        }
    }
}
