//! The counting mini-game: objects fly out, the player taps them in order.

pub mod barrier;
pub mod center;
pub mod data;
pub mod objects;
pub mod part;

pub use barrier::CompletionBarrier;
pub use center::{CenterObject, Face};
pub use data::{build_counting_parts, CountingActivityData};
pub use objects::{CollectibleObject, FloatingMotion, ObjectId, VisualPalette};
pub use part::{CountingCue, CountingPart, CountingSetup};
