pub mod activity;
pub mod animation;
pub mod app;
pub mod core;
pub mod gameplay;
pub mod interaction;
pub mod rendering;

// Curated re-exports
pub use activity::{ActivitySession, PartSequencer};
pub use app::activity::{ActivityCorePlugin, ActivitySeed, CountingActivity};
pub use app::game::GamePlugin;
pub use app::state::AppState;
pub use core::config::GameConfig;
pub use gameplay::counting::CountingPart;
pub use gameplay::GalaxyPart;
