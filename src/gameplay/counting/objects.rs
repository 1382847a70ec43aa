use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::core::geometry::random::between;
use crate::core::geometry::BezierPath;

/// Index of an object inside its counting part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

/// Idle drift around a resting anchor.
///
/// Two detuned sines per axis stand in for smooth noise: the offset stays
/// within `amplitude` and never snaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingMotion {
    anchor: Vec3,
    amplitude: f32,
    speed: f32,
    phase: Vec2,
    time: f32,
}

impl FloatingMotion {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, anchor: Vec3, amplitude: Vec2, speed: Vec2) -> Self {
        Self {
            anchor,
            amplitude: between(rng, amplitude.x, amplitude.y).max(0.0),
            speed: between(rng, speed.x, speed.y).max(0.0),
            phase: Vec2::new(rng.gen_range(0.0..TAU), rng.gen_range(0.0..TAU)),
            time: 0.0,
        }
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn offset(&self) -> Vec2 {
        let t = self.time * self.speed;
        let wave = |phase: f32| 0.6 * (t + phase).sin() + 0.4 * (2.3 * t + 1.7 * phase).sin();
        Vec2::new(wave(self.phase.x), wave(self.phase.y)) * self.amplitude
    }

    /// Advance and return the new position.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.time += dt.max(0.0);
        self.anchor + self.offset().extend(0.0)
    }
}

/// One numbered thing the player collects.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectibleObject {
    ordinal: u32,
    visual: Option<u32>,
    /// Origin to resting spot; reversed in place for the trip back.
    pub path: BezierPath,
    scale_factor: f32,
    interactive: bool,
    collected: bool,
    floating: Option<FloatingMotion>,
    pub position: Vec3,
    pub scale: f32,
    /// Degrees around Z.
    pub rotation: f32,
    pub label_scale: f32,
}

impl CollectibleObject {
    pub fn new(ordinal: u32, visual: Option<u32>, scale_factor: f32) -> Self {
        Self {
            ordinal,
            visual,
            path: BezierPath::default(),
            scale_factor,
            interactive: false,
            collected: false,
            floating: None,
            position: Vec3::ZERO,
            scale: 0.0,
            rotation: 0.0,
            label_scale: 0.0,
        }
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn visual(&self) -> Option<u32> {
        self.visual
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_floating(&self) -> bool {
        self.floating.is_some()
    }

    /// Shrunk back to the origin, waiting for the scatter.
    pub fn reset_for_scatter(&mut self) {
        self.position = Vec3::ZERO;
        self.scale = 0.0;
        self.rotation = 0.0;
        self.interactive = false;
        self.floating = None;
    }

    pub fn arrive(&mut self, floating: FloatingMotion) {
        self.position = floating.anchor();
        self.floating = Some(floating);
        self.interactive = true;
    }

    /// Taken by a correct click: no longer clickable or floating.
    pub fn collect(&mut self) {
        self.interactive = false;
        self.collected = true;
        self.floating = None;
    }

    pub fn float(&mut self, dt: f32) {
        if let Some(f) = self.floating.as_mut() {
            self.position = f.advance(dt);
        }
    }

    /// Whether `point` falls inside the pick circle, scaled with the object.
    pub fn hit_distance(&self, point: Vec2, pick_radius: f32) -> Option<f32> {
        let d = self.position.truncate().distance(point);
        let r = pick_radius * self.scale.abs().max(self.scale_factor * 0.5);
        (d <= r).then_some(d)
    }
}

/// Round-robin visual picker.
#[derive(Debug, Clone, Default)]
pub struct VisualPalette {
    visuals: Vec<u32>,
    next: usize,
    reported_empty: bool,
}

impl VisualPalette {
    pub fn new(visuals: Vec<u32>) -> Self {
        Self {
            visuals,
            next: 0,
            reported_empty: false,
        }
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Next visual, wrapping around. `None` when there is nothing to hand out.
    pub fn next_visual(&mut self) -> Option<u32> {
        if self.visuals.is_empty() {
            if !self.reported_empty {
                self.reported_empty = true;
                error!(target: "counting", "no visuals available for objects; spawning without one");
            }
            return None;
        }
        if self.next >= self.visuals.len() {
            self.next = 0;
        }
        let v = self.visuals[self.next];
        self.next += 1;
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn palette_wraps() {
        let mut p = VisualPalette::new(vec![7, 9]);
        let got: Vec<_> = (0..5).map(|_| p.next_visual()).collect();
        assert_eq!(got, vec![Some(7), Some(9), Some(7), Some(9), Some(7)]);
    }

    #[test]
    fn empty_palette_degrades() {
        let mut p = VisualPalette::default();
        assert_eq!(p.next_visual(), None);
        assert_eq!(p.next_visual(), None);
    }

    #[test]
    fn floating_stays_near_anchor() {
        let mut rng = StdRng::seed_from_u64(3);
        let anchor = Vec3::new(2.0, -1.0, 0.0);
        let mut f = FloatingMotion::new(&mut rng, anchor, Vec2::new(0.1, 0.2), Vec2::new(1.0, 2.0));
        for _ in 0..200 {
            let p = f.advance(0.016);
            assert!((p - anchor).truncate().length() <= f.amplitude() * 2f32.sqrt() + 1e-5);
        }
    }
}
