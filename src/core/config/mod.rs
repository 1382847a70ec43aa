pub mod config;

pub use config::{
    ActivityConfig, CameraConfig, CountingConfig, GameConfig, SkinConfig, ValueRange, WindowConfig,
};
