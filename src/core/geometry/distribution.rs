use bevy::prelude::*;
use rand::Rng;
use smallvec::SmallVec;

use super::random::{between, symmetric};

/// Sample budget per object before the last candidate is accepted regardless of spacing.
pub const MAX_SCATTER_ATTEMPTS: usize = 100;
pub const DEFAULT_MIN_SCATTER_DISTANCE: f32 = 0.5;
pub const DEFAULT_MAX_ROTATION: f32 = 360.0;
pub const DEFAULT_SORT_Z_OFFSET: f32 = -0.001;

/// Golden angle in radians, pi * (3 - sqrt 5).
#[inline]
pub fn golden_angle() -> f32 {
    std::f32::consts::PI * (3.0 - 5f32.sqrt())
}

/// One accepted spot from a scatter call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    /// Z rotation in degrees.
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterParams {
    pub min_distance: f32,
    /// Upper bound of the random Z rotation in degrees. 0 disables rotation.
    pub max_rotation: f32,
    /// Added to Z once per placement index so paint order is fixed.
    pub z_offset: f32,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_SCATTER_DISTANCE,
            max_rotation: DEFAULT_MAX_ROTATION,
            z_offset: DEFAULT_SORT_Z_OFFSET,
        }
    }
}

/// Positions accepted so far in the current distribution call.
#[derive(Debug, Default, Clone)]
pub struct PlacementSet {
    used: SmallVec<[Vec2; 16]>,
}

impl PlacementSet {
    pub fn is_valid(&self, candidate: Vec2, min_distance: f32) -> bool {
        let min_sq = min_distance * min_distance;
        self.used
            .iter()
            .all(|p| p.distance_squared(candidate) >= min_sq)
    }

    pub fn push(&mut self, p: Vec2) {
        self.used.push(p);
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    pub fn clear(&mut self) {
        self.used.clear();
    }
}

/// Placement algorithms for laying objects out around a scene.
///
/// The rejection set is scoped to a single call and cleared before returning.
/// Calls take `&mut self`, so overlapping invocations on one distributor cannot
/// happen.
#[derive(Debug, Default)]
pub struct SpatialDistributor {
    used: PlacementSet,
}

impl SpatialDistributor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scatter `count` objects inside the rectangle spanned by two corners.
    /// Z is taken from `top_left`.
    pub fn scatter_in_rectangle<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        top_left: Vec3,
        bottom_right: Vec3,
        params: ScatterParams,
    ) -> Vec<Placement> {
        self.scatter_with(rng, count, top_left.z, params, |rng| {
            Vec2::new(
                between(rng, top_left.x, bottom_right.x),
                between(rng, top_left.y, bottom_right.y),
            )
        })
    }

    /// Scatter `count` objects uniformly over a disc.
    pub fn scatter_in_circle<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: usize,
        center: Vec3,
        radius: f32,
        params: ScatterParams,
    ) -> Vec<Placement> {
        let radius = radius.max(0.0);
        self.scatter_with(rng, count, center.z, params, |rng| {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            // sqrt keeps the density uniform over the area
            let distance = rng.gen_range(0.0f32..=1.0).sqrt() * radius;
            Vec2::new(
                center.x + angle.cos() * distance,
                center.y + angle.sin() * distance,
            )
        })
    }

    fn scatter_with<R, F>(
        &mut self,
        rng: &mut R,
        count: usize,
        base_z: f32,
        params: ScatterParams,
        mut sample: F,
    ) -> Vec<Placement>
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Vec2,
    {
        self.used.clear();
        let mut out = Vec::with_capacity(count);
        let mut exhausted = 0usize;
        for index in 0..count {
            let mut candidate = sample(rng);
            let mut accepted = self.used.is_valid(candidate, params.min_distance);
            let mut attempts = 1;
            while !accepted && attempts < MAX_SCATTER_ATTEMPTS {
                candidate = sample(rng);
                accepted = self.used.is_valid(candidate, params.min_distance);
                attempts += 1;
            }
            if !accepted {
                exhausted += 1;
            }
            self.used.push(candidate);
            out.push(Placement {
                position: candidate.extend(base_z + index as f32 * params.z_offset),
                rotation: between(rng, 0.0, params.max_rotation.max(0.0)),
            });
        }
        if exhausted > 0 {
            debug!(
                target: "distribution",
                "scatter: {exhausted}/{count} placements fell back after {MAX_SCATTER_ATTEMPTS} attempts"
            );
        }
        self.used.clear();
        out
    }

    /// Sunflower (phyllotaxis) layout over an elliptical ring.
    ///
    /// Object `i` of `count` sits at angle `i * golden_angle` with radial
    /// fraction `sqrt(i / count)` mapped into the x and y radius ranges, plus
    /// a uniform jitter of at most `jitter` on each radius. No rejection loop.
    pub fn sunflower_spiral<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        center: Vec3,
        x_radius: Vec2,
        y_radius: Vec2,
        jitter: f32,
    ) -> Vec<Vec3> {
        if count == 0 {
            return Vec::new();
        }
        let golden = golden_angle();
        let n = count as f32;
        (0..count)
            .map(|i| {
                let theta = i as f32 * golden;
                let fraction = (i as f32 / n).sqrt();
                let rx = x_radius.x + (x_radius.y - x_radius.x) * fraction + symmetric(rng, jitter);
                let ry = y_radius.x + (y_radius.y - y_radius.x) * fraction + symmetric(rng, jitter);
                Vec3::new(
                    center.x + rx * theta.cos(),
                    center.y + ry * theta.sin(),
                    center.z,
                )
            })
            .collect()
    }
}
