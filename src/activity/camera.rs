use bevy::prelude::*;

use crate::animation::{Ease, TweenSlot, TweenSpec};
use crate::core::config::CameraConfig;

/// The one camera every part shares.
///
/// Holds a single zoom slot; a new zoom request replaces whatever zoom is in
/// flight, so requests from different parts serialize on this rig. Owned by
/// the part context rather than a global so tests can build isolated rigs.
#[derive(Debug, Clone)]
pub struct CameraRig {
    zoom: f32,
    target: f32,
    slot: TweenSlot,
    duration: f32,
    tolerance: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraRig {
    pub fn new(initial_zoom: f32, duration: f32, tolerance: f32) -> Self {
        Self {
            zoom: initial_zoom,
            target: initial_zoom,
            slot: TweenSlot::default(),
            duration: duration.max(0.0),
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn from_config(cfg: &CameraConfig) -> Self {
        Self::new(cfg.initial_zoom, cfg.zoom_duration, cfg.zoom_tolerance)
    }

    pub fn current_zoom(&self) -> f32 {
        self.zoom
    }

    /// Where the last accepted request is heading.
    pub fn target_zoom(&self) -> f32 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.slot.is_active()
    }

    /// Animate toward `target`. Returns false when already within tolerance.
    pub fn animate_to(&mut self, target: f32, ease: Ease) -> bool {
        if (self.zoom - target).abs() < self.tolerance {
            return false;
        }
        let replaced = self.slot.stop().is_some();
        if replaced {
            debug!(target: "activity", "camera: replacing in-flight zoom toward {:.3}", self.target);
        }
        self.target = target;
        self.slot
            .start(TweenSpec::scalar(self.zoom, target, self.duration, ease));
        true
    }

    pub fn tick(&mut self, dt: f32) {
        let Some(step) = self.slot.tick(dt) else { return };
        if let Some(z) = step.value.and_then(|v| v.scalar()) {
            self.zoom = z;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_requests_inside_tolerance() {
        let mut rig = CameraRig::new(5.0, 0.34, 0.1);
        assert!(!rig.animate_to(5.05, Ease::InSine));
        assert!(!rig.is_animating());
    }

    #[test]
    fn second_request_wins() {
        let mut rig = CameraRig::new(5.0, 0.5, 0.1);
        assert!(rig.animate_to(4.0, Ease::InSine));
        rig.tick(0.1);
        assert!(rig.animate_to(6.0, Ease::OutSine));
        for _ in 0..20 {
            rig.tick(0.05);
        }
        assert_eq!(rig.current_zoom(), 6.0);
        assert!(!rig.is_animating());
    }
}
