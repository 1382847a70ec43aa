use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};

use super::collaborators::{AnalyticsEvent, AnalyticsSink, Narrator};
use super::difficulty::DifficultyContext;
use super::part::{ActivityPart, PartContext, PartKind};
use super::sequencer::{PartSequencer, SequencerHooks};

pub const ACTIVITY_STARTED: &str = "Activity_Started";
pub const ACTIVITY_COMPLETED: &str = "Activity_Completed";
pub const ACTIVITY_EXITED: &str = "Activity_Exited";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent<K> {
    Started(K, usize),
    Completed(K, usize),
    AllCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionOutcome {
    #[default]
    Running,
    Completed,
    Exited,
}

/// Activity controller: owns the sequencer and reports to the outside world.
///
/// Sequencer hooks only enqueue events; the session handles them after each
/// call into the sequencer, so analytics and narration never run re-entrantly.
pub struct ActivitySession<K: PartKind, P: ActivityPart<K> + ?Sized = dyn ActivityPart<K>> {
    activity_id: String,
    difficulty: DifficultyContext,
    sequencer: PartSequencer<K, P>,
    context: PartContext,
    analytics: Box<dyn AnalyticsSink>,
    narrator: Box<dyn Narrator>,
    events: Receiver<SequencerEvent<K>>,
    intro_played: Vec<bool>,
    elapsed: f32,
    progress: f32,
    outcome: SessionOutcome,
}

impl<K: PartKind, P: ActivityPart<K> + ?Sized> ActivitySession<K, P> {
    pub fn new(
        activity_id: impl Into<String>,
        difficulty: DifficultyContext,
        mut sequencer: PartSequencer<K, P>,
        context: PartContext,
        analytics: Box<dyn AnalyticsSink>,
        narrator: Box<dyn Narrator>,
    ) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        sequencer.initialize(event_hooks(tx), difficulty);
        let intro_played = vec![false; sequencer.parts_count()];
        Self {
            activity_id: activity_id.into(),
            difficulty,
            sequencer,
            context,
            analytics,
            narrator,
            events: rx,
            intro_played,
            elapsed: 0.0,
            progress: 0.0,
            outcome: SessionOutcome::Running,
        }
    }

    pub fn start(&mut self) {
        if self.sequencer.is_started() {
            warn!(target: "activity", "{}: already started", self.activity_id);
            return;
        }
        self.elapsed = 0.0;
        self.track(ACTIVITY_STARTED.to_string());
        self.sequencer.begin(&mut self.context);
        self.process_events();
    }

    pub fn update(&mut self, dt: f32) {
        if self.outcome != SessionOutcome::Running {
            return;
        }
        self.elapsed += dt.max(0.0);
        self.context.camera.tick(dt);
        self.sequencer.update(&mut self.context, dt);
        self.process_events();
    }

    pub fn pointer_pressed(&mut self, world_pos: Vec2) {
        if self.outcome != SessionOutcome::Running {
            return;
        }
        self.sequencer.pointer_pressed(&mut self.context, world_pos);
        self.process_events();
    }

    /// Leave before finishing. Reported once; ignored after completion.
    pub fn exit(&mut self) {
        if self.outcome != SessionOutcome::Running {
            return;
        }
        self.outcome = SessionOutcome::Exited;
        self.track(ACTIVITY_EXITED.to_string());
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SequencerEvent::Started(kind, index) => {
                    self.track(format!("{kind}_Started"));
                    self.play_intro(index);
                }
                SequencerEvent::Completed(kind, index) => {
                    self.track(format!("{kind}_Completed"));
                    let count = self.sequencer.parts_count().max(1);
                    self.progress = ((index + 1) as f32 / count as f32).clamp(0.0, 1.0);
                }
                SequencerEvent::AllCompleted => {
                    self.outcome = SessionOutcome::Completed;
                    self.progress = 1.0;
                    self.track(ACTIVITY_COMPLETED.to_string());
                    let mistakes = self.sequencer.total_mistakes();
                    self.analytics
                        .track_mistakes(&self.activity_id, self.difficulty.rating, mistakes);
                    info!(
                        target: "activity",
                        "{} completed in {:.1}s with {mistakes} mistakes",
                        self.activity_id, self.elapsed
                    );
                }
            }
        }
    }

    fn play_intro(&mut self, index: usize) {
        let Some(played) = self.intro_played.get_mut(index) else {
            return;
        };
        if !*played {
            *played = true;
            self.narrator.play_part_announcement(index);
        }
    }

    fn track(&mut self, label: String) {
        self.analytics.track(AnalyticsEvent {
            activity_id: self.activity_id.clone(),
            difficulty: self.difficulty.rating,
            label,
            elapsed_seconds: self.elapsed.max(0.0) as u32,
        });
    }

    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    pub fn outcome(&self) -> SessionOutcome {
        self.outcome
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == SessionOutcome::Completed
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn context(&self) -> &PartContext {
        &self.context
    }

    pub fn sequencer(&self) -> &PartSequencer<K, P> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut PartSequencer<K, P> {
        &mut self.sequencer
    }
}

fn event_hooks<K: PartKind>(tx: Sender<SequencerEvent<K>>) -> SequencerHooks<K> {
    let started = tx.clone();
    let completed = tx.clone();
    SequencerHooks::new(
        move |kind, index| {
            let _ = started.send(SequencerEvent::Started(kind, index));
        },
        move |kind, index| {
            let _ = completed.send(SequencerEvent::Completed(kind, index));
        },
        move || {
            let _ = tx.send(SequencerEvent::AllCompleted);
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::camera::CameraRig;
    use crate::activity::collaborators::{MemoryAnalytics, MemoryNarrator};
    use crate::activity::part::PartCore;

    struct Instant {
        core: PartCore<&'static str>,
    }

    impl ActivityPart<&'static str> for Instant {
        fn core(&self) -> &PartCore<&'static str> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PartCore<&'static str> {
            &mut self.core
        }

        fn update(&mut self, ctx: &mut PartContext, _dt: f32) {
            self.core.complete(ctx);
        }
    }

    fn session(
        parts: usize,
    ) -> (ActivitySession<&'static str>, MemoryAnalytics, MemoryNarrator) {
        let parts: Vec<Box<dyn ActivityPart<&'static str>>> = (0..parts)
            .map(|_| {
                Box::new(Instant {
                    core: PartCore::new("Quick", 0.0),
                }) as Box<dyn ActivityPart<&'static str>>
            })
            .collect();
        let analytics = MemoryAnalytics::default();
        let narrator = MemoryNarrator::default();
        let s = ActivitySession::new(
            "demo",
            DifficultyContext::default(),
            PartSequencer::new(parts),
            PartContext::new(CameraRig::new(5.0, 0.1, 0.1)),
            Box::new(analytics.clone()),
            Box::new(narrator.clone()),
        );
        (s, analytics, narrator)
    }

    #[test]
    fn reports_lifecycle_labels() {
        let (mut s, analytics, narrator) = session(2);
        s.start();
        s.update(0.1);
        s.update(0.1);
        assert!(s.is_completed());
        assert_eq!(
            analytics.labels(),
            vec![
                "Activity_Started",
                "Quick_Started",
                "Quick_Completed",
                "Quick_Started",
                "Quick_Completed",
                "Activity_Completed",
            ]
        );
        assert_eq!(narrator.played(), vec![0, 1]);
        assert_eq!(analytics.mistakes(), vec![0]);
        assert_eq!(s.progress(), 1.0);
    }

    #[test]
    fn exit_is_reported_once() {
        let (mut s, analytics, _) = session(1);
        s.start();
        s.exit();
        s.exit();
        assert_eq!(s.outcome(), SessionOutcome::Exited);
        assert_eq!(
            analytics.labels().iter().filter(|l| *l == ACTIVITY_EXITED).count(),
            1
        );
    }
}
