use std::fmt::{Debug, Display};

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};

use super::camera::CameraRig;
use super::difficulty::DifficultyContext;
use crate::animation::Ease;

/// Opaque identifier of a part type (usually a small enum).
pub trait PartKind: Copy + Eq + Debug + Display + Send + Sync + 'static {}

impl<T> PartKind for T where T: Copy + Eq + Debug + Display + Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Shared resources handed to whichever part is running.
#[derive(Debug, Clone, Default)]
pub struct PartContext {
    pub camera: CameraRig,
}

impl PartContext {
    pub fn new(camera: CameraRig) -> Self {
        Self { camera }
    }
}

/// One-shot completion signal for the part at `index`.
///
/// Consumed by [`PartCompletion::complete`], so a token can fire at most once.
#[derive(Debug)]
pub struct PartCompletion {
    index: usize,
    tx: Sender<usize>,
}

impl PartCompletion {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn complete(self) {
        if self.tx.send(self.index).is_err() {
            warn!(target: "activity", "part {} completed after its sequencer was dropped", self.index);
        }
    }
}

/// Issues completion tokens and collects the signals they send.
#[derive(Debug, Clone)]
pub struct CompletionChannel {
    tx: Sender<usize>,
    rx: Receiver<usize>,
}

impl Default for CompletionChannel {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl CompletionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self, index: usize) -> PartCompletion {
        PartCompletion {
            index,
            tx: self.tx.clone(),
        }
    }

    pub fn try_next(&self) -> Option<usize> {
        self.rx.try_recv().ok()
    }

    pub fn drain(&self) -> Vec<usize> {
        self.rx.try_iter().collect()
    }
}

/// Lifecycle shared by every part: NotStarted -> InProgress -> Completed.
#[derive(Debug)]
pub struct PartCore<K> {
    kind: K,
    index: usize,
    state: PartState,
    mistakes: u32,
    additional_zoom: f32,
    root_enabled: bool,
    pub disable_root_on_complete: bool,
    pub reset_zoom_on_complete: bool,
    initial_zoom: Option<f32>,
    completion: Option<PartCompletion>,
}

impl<K: PartKind> PartCore<K> {
    pub fn new(kind: K, additional_zoom: f32) -> Self {
        Self {
            kind,
            index: 0,
            state: PartState::NotStarted,
            mistakes: 0,
            additional_zoom,
            root_enabled: false,
            disable_root_on_complete: true,
            reset_zoom_on_complete: true,
            initial_zoom: None,
            completion: None,
        }
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PartState {
        self.state
    }

    pub fn in_progress(&self) -> bool {
        self.state == PartState::InProgress
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn add_mistake(&mut self) {
        self.mistakes += 1;
    }

    pub fn additional_zoom(&self) -> f32 {
        self.additional_zoom
    }

    pub fn root_enabled(&self) -> bool {
        self.root_enabled
    }

    pub fn set_root_enabled(&mut self, enabled: bool) {
        self.root_enabled = enabled;
    }

    pub fn begin(&mut self, ctx: &mut PartContext, completion: PartCompletion) {
        if self.state != PartState::NotStarted {
            warn!(target: "activity", "part {:?} begun again from state {:?}", self.kind, self.state);
        }
        self.index = completion.index();
        self.completion = Some(completion);
        self.state = PartState::InProgress;
        self.root_enabled = true;
        let initial = self.initial_zoom(&ctx.camera);
        ctx.camera
            .animate_to(initial - self.additional_zoom, Ease::InSine);
    }

    /// Finish the part and fire its completion exactly once. Later calls are no-ops.
    pub fn complete(&mut self, ctx: &mut PartContext) -> bool {
        let Some(token) = self.completion.take() else {
            warn!(target: "activity", "part {:?} completed twice or before begin; ignoring", self.kind);
            return false;
        };
        self.state = PartState::Completed;
        if self.disable_root_on_complete {
            self.root_enabled = false;
        }
        if self.reset_zoom_on_complete {
            let initial = self.initial_zoom(&ctx.camera);
            ctx.camera.animate_to(initial, Ease::OutSine);
        }
        token.complete();
        true
    }

    // Captured on first use from the rig's target, so a restore still in flight
    // from the previous part counts as settled.
    fn initial_zoom(&mut self, camera: &CameraRig) -> f32 {
        *self.initial_zoom.get_or_insert_with(|| camera.target_zoom())
    }
}

/// A single playable segment driven by a sequencer.
///
/// Implementors own a [`PartCore`] and finish by calling
/// [`PartCore::complete`]. Parts that cannot run (missing setup) must complete
/// immediately instead of stalling.
pub trait ActivityPart<K: PartKind>: Send + Sync + 'static {
    fn core(&self) -> &PartCore<K>;

    fn core_mut(&mut self) -> &mut PartCore<K>;

    fn kind(&self) -> K {
        self.core().kind()
    }

    fn state(&self) -> PartState {
        self.core().state()
    }

    fn initialize(&mut self, _difficulty: &DifficultyContext) {}

    fn begin(&mut self, ctx: &mut PartContext, completion: PartCompletion) {
        self.core_mut().begin(ctx, completion);
    }

    /// Per-frame step while in progress.
    fn update(&mut self, _ctx: &mut PartContext, _dt: f32) {}

    fn pointer_pressed(&mut self, _ctx: &mut PartContext, _world_pos: Vec2) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_fires_once() {
        let channel = CompletionChannel::new();
        let mut ctx = PartContext::new(CameraRig::new(5.0, 0.1, 0.1));
        let mut core = PartCore::new("solo", 1.0);
        core.begin(&mut ctx, channel.token(0));
        assert!(core.root_enabled());
        assert!(core.complete(&mut ctx));
        assert!(!core.complete(&mut ctx));
        assert_eq!(channel.drain(), vec![0]);
        assert_eq!(core.state(), PartState::Completed);
        assert!(!core.root_enabled());
    }

    #[test]
    fn zoom_restores_to_captured_initial() {
        let channel = CompletionChannel::new();
        let mut ctx = PartContext::new(CameraRig::new(5.0, 0.1, 0.05));
        let mut core = PartCore::new("zoomer", 1.5);
        core.begin(&mut ctx, channel.token(0));
        assert_eq!(ctx.camera.target_zoom(), 3.5);
        ctx.camera.tick(1.0);
        core.complete(&mut ctx);
        assert_eq!(ctx.camera.target_zoom(), 5.0);
    }
}
