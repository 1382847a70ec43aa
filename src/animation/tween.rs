use std::f32::consts::TAU;

use bevy::prelude::*;

use super::ease::Ease;
use crate::core::geometry::BezierPath;

/// What a tween drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Eased interpolation between two scalars.
    Scalar { from: f32, to: f32 },
    /// Eased traversal of a cubic bezier.
    Path(BezierPath),
    /// Damped oscillation around `base`; always settles back on `base`.
    Punch { base: f32, strength: f32, frequency: f32 },
    /// Produces no values; only the completion matters.
    Wait,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Point(Vec3),
}

impl TweenValue {
    pub fn scalar(self) -> Option<f32> {
        match self {
            TweenValue::Scalar(v) => Some(v),
            TweenValue::Point(_) => None,
        }
    }

    pub fn point(self) -> Option<Vec3> {
        match self {
            TweenValue::Point(p) => Some(p),
            TweenValue::Scalar(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub motion: Motion,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

impl TweenSpec {
    pub fn scalar(from: f32, to: f32, duration: f32, ease: Ease) -> Self {
        Self {
            motion: Motion::Scalar { from, to },
            duration,
            delay: 0.0,
            ease,
        }
    }

    pub fn path(path: BezierPath, duration: f32, ease: Ease) -> Self {
        Self {
            motion: Motion::Path(path),
            duration,
            delay: 0.0,
            ease,
        }
    }

    pub fn punch(base: f32, strength: f32, frequency: f32, duration: f32) -> Self {
        Self {
            motion: Motion::Punch {
                base,
                strength,
                frequency,
            },
            duration,
            delay: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn wait(duration: f32) -> Self {
        Self {
            motion: Motion::Wait,
            duration,
            delay: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Value at linear progress `t` in [0, 1].
    pub fn sample(&self, t: f32) -> Option<TweenValue> {
        let t = t.clamp(0.0, 1.0);
        match self.motion {
            Motion::Scalar { from, to } => {
                if t >= 1.0 {
                    Some(TweenValue::Scalar(to))
                } else {
                    Some(TweenValue::Scalar(from + (to - from) * self.ease.apply(t)))
                }
            }
            Motion::Path(path) => Some(TweenValue::Point(path.evaluate(self.ease.apply(t)))),
            Motion::Punch {
                base,
                strength,
                frequency,
            } => {
                if t >= 1.0 {
                    Some(TweenValue::Scalar(base))
                } else {
                    let wave = (t * frequency.max(0.0) * TAU).sin() * (1.0 - t);
                    Some(TweenValue::Scalar(base + strength * wave))
                }
            }
            Motion::Wait => None,
        }
    }
}

/// Identifies one started tween. Stale handles never match a newer tween in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenHandle(pub u64);

#[derive(Debug, Clone)]
struct ActiveTween {
    handle: TweenHandle,
    spec: TweenSpec,
    elapsed: f32,
}

/// Result of advancing a slot by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    pub value: Option<TweenValue>,
    /// Set on the frame the tween ran to completion.
    pub finished: Option<TweenHandle>,
}

/// Holds at most one in-flight tween.
///
/// Starting a new tween stops the previous one first. A stopped tween never
/// reports completion.
#[derive(Debug, Default, Clone)]
pub struct TweenSlot {
    active: Option<ActiveTween>,
    generation: u64,
}

impl TweenSlot {
    pub fn start(&mut self, spec: TweenSpec) -> TweenHandle {
        self.stop();
        self.generation += 1;
        let handle = TweenHandle(self.generation);
        self.active = Some(ActiveTween {
            handle,
            spec,
            elapsed: 0.0,
        });
        handle
    }

    /// Stop the in-flight tween, returning its handle if there was one.
    pub fn stop(&mut self) -> Option<TweenHandle> {
        self.active.take().map(|a| a.handle)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn handle(&self) -> Option<TweenHandle> {
        self.active.as_ref().map(|a| a.handle)
    }

    pub fn tick(&mut self, dt: f32) -> Option<TweenStep> {
        let active = self.active.as_mut()?;
        active.elapsed += dt.max(0.0);
        let spec = active.spec;
        let running = active.elapsed - spec.delay;
        if running < 0.0 {
            return Some(TweenStep {
                value: None,
                finished: None,
            });
        }
        let t = if spec.duration <= 0.0 {
            1.0
        } else {
            (running / spec.duration).min(1.0)
        };
        let value = spec.sample(t);
        if t >= 1.0 {
            let handle = active.handle;
            self.active = None;
            Some(TweenStep {
                value,
                finished: Some(handle),
            })
        } else {
            Some(TweenStep {
                value,
                finished: None,
            })
        }
    }
}
