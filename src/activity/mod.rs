//! Generic multi-part activity flow.
//!
//! An activity is an ordered list of parts run by a [`PartSequencer`]. Parts
//! share one [`CameraRig`] through the [`PartContext`] and report completion
//! with a one-shot [`PartCompletion`] token. [`ActivitySession`] wraps the
//! sequencer with analytics and narration.

pub mod camera;
pub mod collaborators;
pub mod difficulty;
pub mod part;
pub mod sequencer;
pub mod session;

pub use camera::CameraRig;
pub use collaborators::{
    AnalyticsEvent, AnalyticsSink, JsonLinesAnalytics, LogAnalytics, LogNarrator, MemoryAnalytics,
    MemoryNarrator, Narrator,
};
pub use difficulty::{DifficultyContext, DifficultyRating, DifficultyTable};
pub use part::{
    ActivityPart, CompletionChannel, PartCompletion, PartContext, PartCore, PartKind, PartState,
};
pub use sequencer::{PartSequencer, SequencerHooks};
pub use session::{ActivitySession, SequencerEvent, SessionOutcome};
