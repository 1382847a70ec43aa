use bevy::prelude::*;
use rand::Rng;

use super::random::symmetric;

/// Control points of a single cubic bezier: start, two handles, end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BezierPath {
    pub points: [Vec3; 4],
}

impl BezierPath {
    pub fn new(start: Vec3, control1: Vec3, control2: Vec3, end: Vec3) -> Self {
        Self {
            points: [start, control1, control2, end],
        }
    }

    #[inline]
    pub fn start(&self) -> Vec3 {
        self.points[0]
    }

    #[inline]
    pub fn end(&self) -> Vec3 {
        self.points[3]
    }

    /// Position along the curve; `t` is clamped to [0, 1].
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let [a, b, c, d] = self.points;
        evaluate_cubic(a, b, c, d, t)
    }

    /// Reverse in place so the curve runs end -> start.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn reversed(mut self) -> Self {
        self.reverse();
        self
    }
}

/// De Casteljau evaluation of a cubic bezier. Endpoints are returned bit-exact.
pub fn evaluate_cubic(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    // NaN falls through to the start point.
    if t.is_nan() || t <= 0.0 {
        return p0;
    }
    if t >= 1.0 {
        return p3;
    }
    let u = 1.0 - t;
    let a1 = p0 * u + p1 * t;
    let b1 = p1 * u + p2 * t;
    let c1 = p2 * u + p3 * t;
    let a2 = a1 * u + b1 * t;
    let b2 = b1 * u + c1 * t;
    a2 * u + b2 * t
}

/// Control points for an S-curve from already drawn offset factors.
///
/// `draw1` / `draw2` are the random factors in `[-randomness, randomness]`; a
/// draw of 0 yields the symmetric S-curve for the given strength.
pub fn s_curve_control_points(
    start: Vec3,
    end: Vec3,
    curve_strength: f32,
    draw1: f32,
    draw2: f32,
) -> (Vec3, Vec3) {
    let dir = end - start;
    let perp = Vec3::new(-dir.y, dir.x, 0.0).normalize_or_zero();
    let base = dir.length() * curve_strength;
    let offset1 = base * (1.0 + draw1);
    let offset2 = base * (1.0 + draw2);
    let control1 = start + dir * 0.25 + perp * offset1;
    let control2 = start + dir * 0.75 - perp * offset2;
    (control1, control2)
}

/// Randomised asymmetric S-curve between two points.
///
/// The two handle offsets are drawn independently, so even a symmetric
/// start/end pair produces a lopsided curve unless `randomness` is 0.
pub fn asymmetric_s_curve<R: Rng + ?Sized>(
    rng: &mut R,
    start: Vec3,
    end: Vec3,
    curve_strength: f32,
    randomness: f32,
) -> BezierPath {
    let draw1 = symmetric(rng, randomness);
    let draw2 = symmetric(rng, randomness);
    let (c1, c2) = s_curve_control_points(start, end, curve_strength, draw1, draw2);
    BezierPath::new(start, c1, c2, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn midpoint_of_straight_line() {
        let p = evaluate_cubic(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            0.5,
        );
        assert!((p.x - 1.5).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn t_is_clamped() {
        let path = BezierPath::new(
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        );
        assert_eq!(path.evaluate(-3.0), path.start());
        assert_eq!(path.evaluate(7.5), path.end());
        assert_eq!(path.evaluate(f32::NAN), path.start());
    }

    #[test]
    fn zero_randomness_is_symmetric_offsets() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Vec3::ZERO;
        let end = Vec3::new(4.0, 0.0, 0.0);
        let path = asymmetric_s_curve(&mut rng, start, end, 0.5, 0.0);
        // perp of +x is +y; offsets are |dir| * strength = 2.0 on both handles
        assert!((path.points[1] - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
        assert!((path.points[2] - Vec3::new(3.0, -2.0, 0.0)).length() < 1e-6);
    }
}
