use std::collections::BTreeMap;

use super::tween::{TweenHandle, TweenSlot, TweenSpec, TweenValue};

/// Animatable property of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Position,
    Scale,
    Rotation,
    Fill,
    Alpha,
    Zoom,
    /// Pure delay used to schedule a follow-up.
    Timer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenKey<T> {
    pub target: T,
    pub property: Property,
}

impl<T> TweenKey<T> {
    pub fn new(target: T, property: Property) -> Self {
        Self { target, property }
    }
}

/// Everything that happened in one `tick`, in key order.
#[derive(Debug, Clone)]
pub struct TweenFrame<T> {
    pub updates: Vec<(TweenKey<T>, TweenValue)>,
    pub finished: Vec<(TweenKey<T>, TweenHandle)>,
}

impl<T> Default for TweenFrame<T> {
    fn default() -> Self {
        Self {
            updates: Vec::new(),
            finished: Vec::new(),
        }
    }
}

/// One tween slot per (target, property).
///
/// Starting a tween on an occupied slot stops the previous one, so no two
/// tweens ever drive the same property.
#[derive(Debug, Clone)]
pub struct TweenCoordinator<T: Ord + Copy> {
    slots: BTreeMap<TweenKey<T>, TweenSlot>,
}

impl<T: Ord + Copy> Default for TweenCoordinator<T> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Copy> TweenCoordinator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, target: T, property: Property, spec: TweenSpec) -> TweenHandle {
        self.slots
            .entry(TweenKey::new(target, property))
            .or_default()
            .start(spec)
    }

    pub fn stop(&mut self, target: T, property: Property) -> bool {
        self.slots
            .get_mut(&TweenKey::new(target, property))
            .and_then(TweenSlot::stop)
            .is_some()
    }

    pub fn is_active(&self, target: T, property: Property) -> bool {
        self.slots
            .get(&TweenKey::new(target, property))
            .is_some_and(TweenSlot::is_active)
    }

    pub fn handle(&self, target: T, property: Property) -> Option<TweenHandle> {
        self.slots
            .get(&TweenKey::new(target, property))
            .and_then(TweenSlot::handle)
    }

    pub fn active_count(&self) -> usize {
        self.slots.values().filter(|s| s.is_active()).count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn tick(&mut self, dt: f32) -> TweenFrame<T> {
        let mut frame = TweenFrame::default();
        for (key, slot) in self.slots.iter_mut() {
            let Some(step) = slot.tick(dt) else { continue };
            if let Some(value) = step.value {
                frame.updates.push((*key, value));
            }
            if let Some(handle) = step.finished {
                frame.finished.push((*key, handle));
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ease::Ease;

    #[test]
    fn one_tween_per_property() {
        let mut tc = TweenCoordinator::<u32>::new();
        tc.start(1, Property::Scale, TweenSpec::scalar(0.0, 1.0, 1.0, Ease::Linear));
        tc.start(1, Property::Scale, TweenSpec::scalar(5.0, 6.0, 1.0, Ease::Linear));
        tc.start(1, Property::Rotation, TweenSpec::scalar(0.0, 90.0, 1.0, Ease::Linear));
        assert_eq!(tc.active_count(), 2);
        let frame = tc.tick(0.5);
        let scale = frame
            .updates
            .iter()
            .find(|(k, _)| k.property == Property::Scale)
            .and_then(|(_, v)| v.scalar())
            .unwrap();
        assert!((scale - 5.5).abs() < 1e-6);
    }

    #[test]
    fn stopped_tween_never_finishes() {
        let mut tc = TweenCoordinator::<u32>::new();
        tc.start(7, Property::Timer, TweenSpec::wait(0.1));
        assert!(tc.stop(7, Property::Timer));
        let frame = tc.tick(1.0);
        assert!(frame.finished.is_empty());
        assert!(!tc.stop(7, Property::Timer));
    }
}
