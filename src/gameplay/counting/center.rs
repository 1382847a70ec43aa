#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Face {
    #[default]
    Neutral,
    Happy,
}

/// The object every collected item flies into. It grows and fills up as the count rises.
#[derive(Debug, Clone, PartialEq)]
pub struct CenterObject {
    visual: u32,
    pub scale: f32,
    /// Degrees around Z.
    pub rotation: f32,
    /// Normalised fill level in [0, 1].
    pub fill: f32,
    pub shine_alpha: f32,
    pub face: Face,
}

impl CenterObject {
    pub fn new(visual: u32, scale: f32) -> Self {
        Self {
            visual,
            scale,
            rotation: 0.0,
            fill: 0.0,
            shine_alpha: 0.0,
            face: Face::Neutral,
        }
    }

    pub fn visual(&self) -> u32 {
        self.visual
    }

    pub fn is_happy(&self) -> bool {
        self.face == Face::Happy
    }
}
