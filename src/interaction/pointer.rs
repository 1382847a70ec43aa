use bevy::prelude::*;

use crate::app::activity::CountingActivity;
use crate::core::config::GameConfig;

/// Forwards taps and clicks to the running activity in activity units.
pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            forward_pointer_release.run_if(resource_exists::<CountingActivity>),
        );
    }
}

fn cursor_world_pos(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?;
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

/// Screen position of the pointer that was just released, touch first.
fn released_pointer_screen_pos(
    window: &Window,
    buttons: &ButtonInput<MouseButton>,
    touches: &Touches,
) -> Option<Vec2> {
    if let Some(touch) = touches.iter_just_released().next() {
        return Some(touch.position());
    }
    if buttons.just_released(MouseButton::Left) {
        return window.cursor_position();
    }
    None
}

/// Pixels to activity units.
pub fn to_activity_space(world_pos: Vec2, world_scale: f32) -> Vec2 {
    if world_scale <= 0.0 {
        return world_pos;
    }
    world_pos / world_scale
}

fn forward_pointer_release(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows_q: Query<&Window>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    cfg: Option<Res<GameConfig>>,
    mut activity: ResMut<CountingActivity>,
) {
    let Ok(window) = windows_q.single() else {
        return;
    };
    let Some(screen) = released_pointer_screen_pos(window, &buttons, &touches) else {
        return;
    };
    let Some(world) = cursor_world_pos(&camera_q, screen) else {
        return;
    };
    let scale = cfg.map_or(60.0, |c| c.counting.world_scale);
    let pos = to_activity_space(world, scale);
    trace!(target: "counting", "pointer at {pos:?}");
    activity.session.pointer_pressed(pos);
}
