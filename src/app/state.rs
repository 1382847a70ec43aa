use bevy::prelude::*;

/// High-level app lifecycle state.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// The activity is running.
    #[default]
    Playing,
    /// Every part finished; waiting for the player to leave.
    Completed,
}
