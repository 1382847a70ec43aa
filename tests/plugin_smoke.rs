use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use counting_galaxy::app::activity::CountingCueEvent;
use counting_galaxy::core::config::GameConfig;
use counting_galaxy::gameplay::counting::CountingCue;
use counting_galaxy::{ActivityCorePlugin, ActivitySeed, AppState, CountingActivity};

#[derive(Resource, Default)]
struct SeenCues(Vec<CountingCue>);

fn record_cues(mut seen: ResMut<SeenCues>, mut cues: EventReader<CountingCueEvent>) {
    seen.0.extend(cues.read().map(|e| e.cue));
}

fn app_with(cfg: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)))
        .insert_resource(cfg)
        .insert_resource(ActivitySeed(77))
        .init_resource::<SeenCues>()
        .add_plugins(ActivityCorePlugin)
        .add_systems(PostUpdate, record_cues);
    app
}

fn small_config() -> GameConfig {
    let mut cfg = GameConfig::default();
    cfg.activity.difficulties[0].object_count = 2;
    cfg.activity.orderings = vec![vec!["planet".into()]];
    cfg
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn tap_all(app: &mut App) {
    let mut activity = app.world_mut().resource_mut::<CountingActivity>();
    let index = activity.session.sequencer().current_part_index();
    let Some(part) = activity.session.sequencer_mut().part_mut(index) else {
        panic!("no running part");
    };
    for ordinal in 1..=2 {
        let id = part.object_with_ordinal(ordinal).expect("object");
        assert!(part.click_object(id));
    }
}

#[test]
fn activity_starts_on_startup() {
    let mut app = app_with(small_config());
    app.update();
    let activity = app.world().resource::<CountingActivity>();
    assert!(activity.session.sequencer().is_started());
    assert_eq!(activity.rounds(), 1);
    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Playing);
}

#[test]
fn finishing_moves_to_completed_state() {
    let mut app = app_with(small_config());
    run_frames(&mut app, 30);
    assert!(app
        .world()
        .resource::<SeenCues>()
        .0
        .contains(&CountingCue::AllArrived));
    tap_all(&mut app);
    run_frames(&mut app, 300);

    let activity = app.world().resource::<CountingActivity>();
    assert!(activity.session.is_completed());
    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Completed);
    let seen = &app.world().resource::<SeenCues>().0;
    assert_eq!(seen.iter().filter(|c| **c == CountingCue::Finished).count(), 1);
}

#[test]
fn repeating_activity_restarts_instead_of_completing() {
    let mut cfg = small_config();
    cfg.activity.repeat_after_complete = true;
    let mut app = app_with(cfg);
    run_frames(&mut app, 30);
    tap_all(&mut app);
    run_frames(&mut app, 300);

    let activity = app.world().resource::<CountingActivity>();
    assert_eq!(activity.rounds(), 2);
    assert!(!activity.session.is_completed());
    assert_eq!(*app.world().resource::<State<AppState>>().get(), AppState::Playing);
}

#[test]
fn pre_inserted_activity_is_used() {
    let cfg = small_config();
    let mut app = app_with(cfg.clone());
    app.insert_resource(CountingActivity::with_logging(&cfg, 5));
    app.update();
    let activity = app.world().resource::<CountingActivity>();
    assert!(activity.session.sequencer().is_started());
}

#[test]
fn app_exit_marks_session_exited() {
    let mut app = app_with(small_config());
    app.update();
    app.world_mut().send_event(AppExit::Success);
    app.update();
    let activity = app.world().resource::<CountingActivity>();
    assert_eq!(
        activity.session.outcome(),
        counting_galaxy::activity::SessionOutcome::Exited
    );
}
