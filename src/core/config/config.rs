use std::{fs, path::Path};

use anyhow::{Context, Result};
use bevy::prelude::*;
use serde::Deserialize;

use crate::activity::difficulty::{DifficultyContext, DifficultyRating};

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Counting Galaxy".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Orthographic half-height in world units before any part zooms.
    pub initial_zoom: f32,
    pub zoom_duration: f32,
    pub zoom_tolerance: f32,
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 5.0,
            zoom_duration: 0.34,
            zoom_tolerance: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for ValueRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}
impl ValueRange<f32> {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.min, self.max)
    }
}

/// Tuning of the counting choreography. Distances are world units, times seconds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CountingConfig {
    pub distribution_jitter: f32,
    pub x_radius: ValueRange<f32>,
    pub y_radius: ValueRange<f32>,
    pub smallest_scale: f32,
    pub scatter_duration: f32,
    pub reach_center_duration: f32,
    pub number_reveal_duration: f32,
    pub number_reveal_stagger: f32,
    /// Degrees, applied as a random rotation in ±range on arrival.
    pub random_rotation: f32,
    pub pulsate_strength: f32,
    pub pulsate_duration: f32,
    pub pulsate_frequency: f32,
    pub spin_count: u32,
    pub spin_duration: f32,
    pub end_punch_strength: f32,
    pub curve_strength: f32,
    pub curve_randomness: f32,
    pub pick_radius: f32,
    pub additional_zoom: f32,
    /// Pixels per world unit for the sprite adapter.
    pub world_scale: f32,
    pub float_amplitude: ValueRange<f32>,
    pub float_speed: ValueRange<f32>,
}
impl Default for CountingConfig {
    fn default() -> Self {
        Self {
            distribution_jitter: 0.4,
            x_radius: ValueRange::new(3.0, 6.0),
            y_radius: ValueRange::new(3.0, 4.0),
            smallest_scale: 0.5,
            scatter_duration: 0.15,
            reach_center_duration: 0.65,
            number_reveal_duration: 0.3,
            number_reveal_stagger: 0.2,
            random_rotation: 20.0,
            pulsate_strength: 0.1,
            pulsate_duration: 0.5,
            pulsate_frequency: 2.0,
            spin_count: 3,
            spin_duration: 0.5,
            end_punch_strength: 1.1,
            curve_strength: 0.1,
            curve_randomness: 0.2,
            pick_radius: 0.6,
            additional_zoom: 0.0,
            world_scale: 60.0,
            float_amplitude: ValueRange::new(0.05, 0.15),
            float_speed: ValueRange::new(0.5, 1.2),
        }
    }
}

/// Look of one counting part: the surrounding objects and the centre object.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SkinConfig {
    pub name: String,
    pub palette: Vec<u32>,
    pub center_visual: u32,
}
impl Default for SkinConfig {
    fn default() -> Self {
        Self {
            name: "planet".into(),
            palette: vec![0, 1, 2],
            center_visual: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ActivityConfig {
    pub id: String,
    /// Completed-levels count used to pick a difficulty entry.
    pub level: u32,
    pub difficulties: Vec<DifficultyContext>,
    pub skins: Vec<SkinConfig>,
    pub orderings: Vec<Vec<String>>,
    pub repeat_after_complete: bool,
}
impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            id: "CountingGalaxy".into(),
            level: 1,
            difficulties: vec![DifficultyContext {
                rating: DifficultyRating::Beginner,
                object_count: 10,
                completed_levels_threshold: 0,
            }],
            skins: vec![
                SkinConfig::default(),
                SkinConfig {
                    name: "star".into(),
                    palette: vec![3, 4],
                    center_visual: 1,
                },
            ],
            orderings: vec![vec!["planet".into(), "star".into()]],
            repeat_after_complete: false,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub counting: CountingConfig,
    pub activity: ActivityConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        ron::from_str(&data).with_context(|| format!("parse RON {}", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(format!("{e:#}"))),
        }
    }

    /// Deep-merge several RON files, later files winning. Returns the
    /// config, the paths actually used and any errors met on the way.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let found = bm.iter_mut().find(|(ek, _)| **ek == k);
                        match found {
                            Some((_, existing)) => merge_value(existing, v),
                            None => {
                                bm.insert(k, v);
                            }
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        match &mut merged {
                            Some(cur) => merge_value(cur, val),
                            None => merged = Some(val),
                        }
                        used.push(path_ref.display().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose negative ({}); treated as disabled",
                self.window.auto_close
            ));
        }
        if self.camera.initial_zoom <= 0.0 {
            w.push(format!(
                "camera.initial_zoom {} must be > 0",
                self.camera.initial_zoom
            ));
        }
        if self.camera.zoom_tolerance < 0.0 {
            w.push("camera.zoom_tolerance negative".into());
        }
        let c = &self.counting;
        fn check_range(w: &mut Vec<String>, label: &str, r: &ValueRange<f32>) {
            if r.min > r.max {
                w.push(format!("{label} min ({}) greater than max ({})", r.min, r.max));
            }
            if r.min < 0.0 {
                w.push(format!("{label} min ({}) negative", r.min));
            }
        }
        check_range(&mut w, "counting.x_radius", &c.x_radius);
        check_range(&mut w, "counting.y_radius", &c.y_radius);
        check_range(&mut w, "counting.float_amplitude", &c.float_amplitude);
        check_range(&mut w, "counting.float_speed", &c.float_speed);
        if !(0.0..=1.0).contains(&c.smallest_scale) || c.smallest_scale == 0.0 {
            w.push(format!(
                "counting.smallest_scale {} outside (0, 1]",
                c.smallest_scale
            ));
        }
        for (label, value) in [
            ("scatter_duration", c.scatter_duration),
            ("reach_center_duration", c.reach_center_duration),
            ("number_reveal_duration", c.number_reveal_duration),
            ("number_reveal_stagger", c.number_reveal_stagger),
            ("pulsate_duration", c.pulsate_duration),
            ("spin_duration", c.spin_duration),
        ] {
            if value < 0.0 {
                w.push(format!("counting.{label} negative ({value})"));
            }
        }
        if c.spin_count == 0 {
            w.push("counting.spin_count is 0; no ending spin".into());
        }
        if c.pick_radius <= 0.0 {
            w.push("counting.pick_radius must be > 0; objects cannot be clicked".into());
        }
        if c.world_scale <= 0.0 {
            w.push("counting.world_scale must be > 0".into());
        }
        let a = &self.activity;
        if a.difficulties.is_empty() {
            w.push("activity.difficulties is empty".into());
        }
        for d in &a.difficulties {
            if d.object_count == 0 {
                w.push(format!(
                    "difficulty {} (threshold {}) spawns no objects",
                    d.rating, d.completed_levels_threshold
                ));
            }
        }
        if a.skins.is_empty() {
            w.push("activity.skins is empty".into());
        }
        for skin in &a.skins {
            if skin.palette.is_empty() {
                w.push(format!("skin '{}' has an empty palette", skin.name));
            }
        }
        if a.orderings.is_empty() {
            w.push("activity.orderings is empty; no parts will run".into());
        }
        for ordering in &a.orderings {
            for name in ordering {
                if !a.skins.iter().any(|s| &s.name == name) {
                    w.push(format!("ordering references unknown skin '{name}'"));
                }
            }
        }
        w
    }
}
