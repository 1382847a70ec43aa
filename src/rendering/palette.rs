use bevy::color::Mix;
use bevy::prelude::*;

pub const OBJECT_COLORS: [Color; 6] = [
    Color::srgb(1.0, 0.45, 0.30), // coral
    Color::srgb(0.30, 0.65, 1.0), // sky blue
    Color::srgb(1.0, 0.85, 0.25), // sun yellow
    Color::srgb(0.45, 0.90, 0.55), // mint
    Color::srgb(0.80, 0.50, 1.0), // lilac
    Color::srgb(1.0, 0.60, 0.85), // pink
];

/// Centre object colour when empty; it blends toward the lit colour as it fills.
pub const CENTER_EMPTY: Color = Color::srgb(0.18, 0.20, 0.35);
pub const CENTER_LIT: [Color; 3] = [
    Color::srgb(0.95, 0.80, 0.30),
    Color::srgb(0.55, 0.85, 1.0),
    Color::srgb(1.0, 0.55, 0.45),
];

/// Neutral grey for objects spawned without a visual.
pub const MISSING_VISUAL: Color = Color::srgb(0.5, 0.5, 0.5);

#[inline]
pub fn object_color(visual: Option<u32>) -> Color {
    match visual {
        Some(v) => OBJECT_COLORS[v as usize % OBJECT_COLORS.len()],
        None => MISSING_VISUAL,
    }
}

pub fn center_color(visual: u32, fill: f32) -> Color {
    let lit = CENTER_LIT[visual as usize % CENTER_LIT.len()];
    let empty = LinearRgba::from(CENTER_EMPTY);
    Color::from(empty.mix(&LinearRgba::from(lit), fill.clamp(0.0, 1.0)))
}
