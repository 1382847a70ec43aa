//! Frame-driven tweening: one in-flight tween per (target, property).

pub mod coordinator;
pub mod ease;
pub mod tween;

pub use coordinator::{Property, TweenCoordinator, TweenFrame, TweenKey};
pub use ease::Ease;
pub use tween::{Motion, TweenHandle, TweenSlot, TweenSpec, TweenStep, TweenValue};
