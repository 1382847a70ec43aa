// Exits the app after `window.autoClose` seconds. 0 (default) disables it.

use bevy::prelude::*;

use crate::core::config::GameConfig;

#[derive(Resource, Deref, DerefMut)]
struct AutoCloseTimer(Timer);

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, arm_auto_close)
            .add_systems(Update, tick_auto_close.run_if(resource_exists::<AutoCloseTimer>));
    }
}

fn arm_auto_close(mut commands: Commands, cfg: Option<Res<GameConfig>>) {
    let Some(cfg) = cfg else { return };
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!(target: "config", seconds = secs, "auto close armed");
        commands.insert_resource(AutoCloseTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn tick_auto_close(
    time: Res<Time>,
    mut timer: ResMut<AutoCloseTimer>,
    mut exit: EventWriter<AppExit>,
) {
    if timer.tick(time.delta()).just_finished() {
        info!(target: "config", "auto close elapsed; exiting");
        exit.write(AppExit::Success);
    }
}
