use bevy::prelude::*;

use crate::app::activity::CountingActivity;
use crate::core::config::GameConfig;

/// Spawns the 2D camera and follows the activity's camera rig.
pub struct CameraZoomPlugin;

impl Plugin for CameraZoomPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera).add_systems(
            PostUpdate,
            sync_zoom.run_if(resource_exists::<CountingActivity>),
        );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Projection scale relative to the configured starting zoom.
pub fn projection_scale(zoom: f32, initial_zoom: f32) -> f32 {
    if initial_zoom <= 0.0 || zoom <= 0.0 {
        return 1.0;
    }
    zoom / initial_zoom
}

fn sync_zoom(
    activity: Res<CountingActivity>,
    cfg: Option<Res<GameConfig>>,
    mut q: Query<&mut Projection, With<Camera2d>>,
) {
    let initial = cfg.map_or(crate::core::config::CameraConfig::default().initial_zoom, |c| {
        c.camera.initial_zoom
    });
    let scale = projection_scale(activity.session.context().camera.current_zoom(), initial);
    for mut projection in q.iter_mut() {
        if let Projection::Orthographic(ortho) = projection.as_mut() {
            if (ortho.scale - scale).abs() > f32::EPSILON {
                ortho.scale = scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zooming_in_shrinks_the_view() {
        assert_eq!(projection_scale(5.0, 5.0), 1.0);
        assert!(projection_scale(4.0, 5.0) < 1.0);
        assert_eq!(projection_scale(0.0, 5.0), 1.0);
    }
}
