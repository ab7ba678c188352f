use serde::{Deserialize, Serialize};

/// Segments shorter than this are treated as a single point.
const DEGENERATE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point on a circle of `radius` around the origin at `angle` radians.
    pub fn on_orbit(radius: f64, angle: f64) -> Self {
        Self {
            x: angle.cos() * radius,
            y: angle.sin() * radius,
        }
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Whether the segment `a -> b` touches the circle at `center` with `radius`.
///
/// Solves `|a + t(b - a) - center|^2 = radius^2` for `t` and reports a hit when
/// the root interval `[t1, t2]` overlaps `[0, 1]`. Tangent segments count as a
/// hit, as does a segment lying entirely inside the circle. A zero-length
/// segment never intersects.
pub fn intersects_obstacle(a: Point, b: Point, center: Point, radius: f64) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let qa = dx * dx + dy * dy;
    if qa < DEGENERATE_EPSILON {
        return false;
    }

    let fx = a.x - center.x;
    let fy = a.y - center.y;
    let qb = 2.0 * (dx * fx + dy * fy);
    let qc = fx * fx + fy * fy - radius * radius;
    let delta = qb * qb - 4.0 * qa * qc;
    if delta < 0.0 {
        return false;
    }

    let root = delta.sqrt();
    let t1 = (-qb - root) / (2.0 * qa);
    let t2 = (-qb + root) / (2.0 * qa);
    t1 <= 1.0 && t2 >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12, "expected 5, got {d}");
        assert_eq!(distance(Point::new(2.0, 2.0), Point::new(2.0, 2.0)), 0.0);
    }

    #[test]
    fn segment_through_center_intersects() {
        assert!(intersects_obstacle(
            Point::new(-200.0, 0.0),
            Point::new(200.0, 0.0),
            Point::ORIGIN,
            80.0
        ));
    }

    #[test]
    fn segment_outside_radius_misses() {
        assert!(!intersects_obstacle(
            Point::new(-200.0, 150.0),
            Point::new(200.0, 150.0),
            Point::ORIGIN,
            80.0
        ));
    }

    #[test]
    fn tangent_segment_counts_as_hit() {
        assert!(intersects_obstacle(
            Point::new(-100.0, 80.0),
            Point::new(100.0, 80.0),
            Point::ORIGIN,
            80.0
        ));
    }

    #[test]
    fn intersection_beyond_segment_end_is_ignored() {
        // The infinite line crosses the circle, the segment stops short of it.
        assert!(!intersects_obstacle(
            Point::new(-300.0, 0.0),
            Point::new(-150.0, 0.0),
            Point::ORIGIN,
            80.0
        ));
    }

    #[test]
    fn segment_inside_circle_intersects() {
        assert!(intersects_obstacle(
            Point::new(-10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::ORIGIN,
            80.0
        ));
    }

    #[test]
    fn zero_length_segment_never_intersects() {
        let p = Point::new(5.0, 5.0);
        assert!(!intersects_obstacle(p, p, Point::ORIGIN, 80.0));
    }

    #[test]
    fn orbit_points_sit_on_radius() {
        for step in 0..8 {
            let angle = step as f64 * std::f64::consts::FRAC_PI_4;
            let p = Point::on_orbit(250.0, angle);
            assert!((distance(p, Point::ORIGIN) - 250.0).abs() < 1e-9);
        }
    }
}
