use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::state::AppState;
use crate::activity::{
    ActivitySession, AnalyticsSink, CameraRig, DifficultyTable, LogAnalytics, LogNarrator,
    Narrator, PartContext, PartSequencer,
};
use crate::core::config::GameConfig;
use crate::gameplay::counting::{build_counting_parts, CountingActivityData, CountingCue, CountingPart};
use crate::gameplay::GalaxyPart;

pub type CountingSession = ActivitySession<GalaxyPart, CountingPart<GalaxyPart>>;

/// Produces the analytics sink and narrator for each new session.
pub type CollaboratorFactory =
    Box<dyn Fn() -> (Box<dyn AnalyticsSink>, Box<dyn Narrator>) + Send + Sync>;

/// RNG seed for the whole activity. Random when absent.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySeed(pub u64);

/// Cue raised by the running counting part, for audio or effects.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountingCueEvent {
    pub part: usize,
    pub cue: CountingCue,
}

/// The running Counting Galaxy activity.
#[derive(Resource)]
pub struct CountingActivity {
    pub session: CountingSession,
    data: CountingActivityData,
    rng: StdRng,
    collaborators: CollaboratorFactory,
    repeat: bool,
    rounds: u32,
}

impl CountingActivity {
    pub fn new(cfg: &GameConfig, seed: u64, collaborators: CollaboratorFactory) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = CountingActivityData::from_config(&cfg.activity);
        let session = build_session(cfg, &mut data, &mut rng, &collaborators);
        Self {
            session,
            data,
            rng,
            collaborators,
            repeat: cfg.activity.repeat_after_complete,
            rounds: 1,
        }
    }

    /// Logs analytics and narration.
    pub fn with_logging(cfg: &GameConfig, seed: u64) -> Self {
        Self::new(
            cfg,
            seed,
            Box::new(|| (Box::new(LogAnalytics), Box::new(LogNarrator))),
        )
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn repeats(&self) -> bool {
        self.repeat
    }

    /// Replace the finished session with a fresh one using the next ordering.
    pub fn restart(&mut self, cfg: &GameConfig) {
        self.session = build_session(cfg, &mut self.data, &mut self.rng, &self.collaborators);
        self.rounds += 1;
        self.session.start();
    }

    /// Cues from every part, tagged with the part index.
    pub fn drain_cues(&mut self) -> Vec<CountingCueEvent> {
        let sequencer = self.session.sequencer_mut();
        let mut out = Vec::new();
        for part in 0..sequencer.parts_count() {
            if let Some(p) = sequencer.part_mut(part) {
                out.extend(p.drain_cues().into_iter().map(|cue| CountingCueEvent { part, cue }));
            }
        }
        out
    }
}

fn build_session(
    cfg: &GameConfig,
    data: &mut CountingActivityData,
    rng: &mut StdRng,
    collaborators: &CollaboratorFactory,
) -> CountingSession {
    let table = DifficultyTable::new(cfg.activity.difficulties.clone());
    let difficulty = table.select(cfg.activity.level).unwrap_or_default();
    let ordering = data.next_ordering(rng);
    let parts = build_counting_parts(
        data,
        &ordering,
        GalaxyPart::Counting,
        &cfg.counting,
        difficulty.object_count,
        rng,
    );
    info!(
        target: "activity",
        "{}: {} parts ({}), {} objects each",
        cfg.activity.id,
        parts.len(),
        ordering.join(" -> "),
        difficulty.object_count
    );
    let (analytics, narrator) = collaborators();
    ActivitySession::new(
        cfg.activity.id.clone(),
        difficulty,
        PartSequencer::new(parts),
        PartContext::new(CameraRig::from_config(&cfg.camera)),
        analytics,
        narrator,
    )
}

/// Builds (unless one was inserted), starts and drives the counting activity.
pub struct ActivityCorePlugin;

impl Plugin for ActivityCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .add_event::<CountingCueEvent>()
            .add_systems(Startup, start_activity)
            .add_systems(
                Update,
                drive_activity.run_if(resource_exists::<CountingActivity>),
            )
            .add_systems(Last, report_exit.run_if(resource_exists::<CountingActivity>));
    }
}

fn start_activity(
    mut commands: Commands,
    cfg: Option<Res<GameConfig>>,
    seed: Option<Res<ActivitySeed>>,
    existing: Option<ResMut<CountingActivity>>,
) {
    if let Some(mut activity) = existing {
        activity.session.start();
        return;
    }
    let cfg = cfg.map(|c| c.clone()).unwrap_or_default();
    let seed = seed.map(|s| s.0).unwrap_or_else(|| rand::thread_rng().gen());
    debug!(target: "activity", "activity seed {seed}");
    let mut activity = CountingActivity::with_logging(&cfg, seed);
    activity.session.start();
    commands.insert_resource(activity);
}

fn drive_activity(
    time: Res<Time>,
    cfg: Option<Res<GameConfig>>,
    mut activity: ResMut<CountingActivity>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut cues: EventWriter<CountingCueEvent>,
) {
    activity.session.update(time.delta_secs());
    for ev in activity.drain_cues() {
        debug!(target: "counting", "part {}: {:?}", ev.part, ev.cue);
        cues.write(ev);
    }
    if !activity.session.is_completed() {
        return;
    }
    if activity.repeats() {
        let cfg = cfg.map(|c| c.clone()).unwrap_or_default();
        activity.restart(&cfg);
    } else if *state.get() != AppState::Completed {
        info!(target: "activity", "activity completed");
        next_state.set(AppState::Completed);
    }
}

fn report_exit(mut exits: EventReader<AppExit>, mut activity: ResMut<CountingActivity>) {
    if exits.read().next().is_some() {
        activity.session.exit();
    }
}
