use bevy::prelude::*;

use super::difficulty::DifficultyContext;
use super::part::{ActivityPart, CompletionChannel, PartContext, PartKind, PartState};

pub type PartHook<K> = Box<dyn FnMut(K, usize) + Send + Sync>;
pub type AllPartsHook = Box<dyn FnMut() + Send + Sync>;

/// Lifecycle callbacks fired by the sequencer, each at most once per part.
pub struct SequencerHooks<K> {
    pub on_started: PartHook<K>,
    pub on_completed: PartHook<K>,
    pub on_all_completed: AllPartsHook,
}

impl<K> Default for SequencerHooks<K> {
    fn default() -> Self {
        Self {
            on_started: Box::new(|_, _| {}),
            on_completed: Box::new(|_, _| {}),
            on_all_completed: Box::new(|| {}),
        }
    }
}

impl<K> SequencerHooks<K> {
    pub fn new(
        on_started: impl FnMut(K, usize) + Send + Sync + 'static,
        on_completed: impl FnMut(K, usize) + Send + Sync + 'static,
        on_all_completed: impl FnMut() + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_started: Box::new(on_started),
            on_completed: Box::new(on_completed),
            on_all_completed: Box::new(on_all_completed),
        }
    }
}

/// Runs an ordered list of parts one at a time.
///
/// Progress is driven by part completions only: each completion fires
/// `on_completed`, advances the index and starts the next part. After the last
/// part `on_all_completed` fires once and the sequencer goes terminal. A part
/// that never completes stalls the sequence; there is no timeout.
pub struct PartSequencer<K: PartKind, P: ActivityPart<K> + ?Sized = dyn ActivityPart<K>> {
    parts: Vec<Box<P>>,
    index: usize,
    hooks: SequencerHooks<K>,
    difficulty: DifficultyContext,
    channel: CompletionChannel,
    initialized: bool,
    started: bool,
    finished: bool,
}

impl<K: PartKind, P: ActivityPart<K> + ?Sized> PartSequencer<K, P> {
    pub fn new(parts: Vec<Box<P>>) -> Self {
        Self {
            parts,
            index: 0,
            hooks: SequencerHooks::default(),
            difficulty: DifficultyContext::default(),
            channel: CompletionChannel::new(),
            initialized: false,
            started: false,
            finished: false,
        }
    }

    /// Append a part. Only allowed before the sequence has begun.
    pub fn push_part(&mut self, part: Box<P>) -> bool {
        if self.started {
            warn!(target: "activity", "cannot add parts after the sequence has begun");
            return false;
        }
        self.parts.push(part);
        true
    }

    /// Reset to the first part, install hooks and hand the difficulty to every part.
    pub fn initialize(&mut self, hooks: SequencerHooks<K>, difficulty: DifficultyContext) {
        if self.started {
            warn!(target: "activity", "initialize called on a running sequence; ignoring");
            return;
        }
        if self.initialized {
            warn!(target: "activity", "sequence initialized twice; replacing hooks");
        }
        self.index = 0;
        self.hooks = hooks;
        self.difficulty = difficulty;
        for part in self.parts.iter_mut() {
            part.initialize(&difficulty);
        }
        self.initialized = true;
    }

    pub fn begin(&mut self, ctx: &mut PartContext) {
        if self.started {
            warn!(target: "activity", "sequence already begun");
            return;
        }
        if !self.initialized {
            warn!(target: "activity", "beginning an uninitialized sequence; hooks are no-ops");
        }
        self.started = true;
        self.try_start_next_part(ctx);
        self.pump(ctx);
    }

    /// Start the part at the current index, or finish the sequence.
    ///
    /// Returns false once every part is done; calls after that are no-ops.
    pub fn try_start_next_part(&mut self, ctx: &mut PartContext) -> bool {
        if self.finished {
            return false;
        }
        if self.index >= self.parts.len() {
            self.finished = true;
            info!(target: "activity", "all {} parts completed", self.parts.len());
            (self.hooks.on_all_completed)();
            return false;
        }
        let index = self.index;
        if self.parts[index].state() != PartState::NotStarted {
            warn!(target: "activity", "part {index} already started; not starting it twice");
            return false;
        }
        let token = self.channel.token(index);
        let part = &mut self.parts[index];
        part.begin(ctx, token);
        let kind = part.kind();
        info!(target: "activity", "part {index} ({kind}) started");
        (self.hooks.on_started)(kind, index);
        true
    }

    pub fn update(&mut self, ctx: &mut PartContext, dt: f32) {
        if let Some(part) = self.running_part_mut() {
            part.update(ctx, dt);
        }
        self.pump(ctx);
    }

    pub fn pointer_pressed(&mut self, ctx: &mut PartContext, world_pos: Vec2) {
        if let Some(part) = self.running_part_mut() {
            part.pointer_pressed(ctx, world_pos);
        }
        self.pump(ctx);
    }

    // Completions may start a part that completes right away, so keep draining.
    fn pump(&mut self, ctx: &mut PartContext) {
        while let Some(index) = self.channel.try_next() {
            self.handle_completed(ctx, index);
        }
    }

    fn handle_completed(&mut self, ctx: &mut PartContext, index: usize) {
        if self.finished || index != self.index {
            error!(
                target: "activity",
                "stale completion for part {index} (current {}); ignoring", self.index
            );
            debug_assert!(index < self.index, "completion from a part that never started");
            return;
        }
        let kind = self.parts[index].kind();
        info!(target: "activity", "part {index} ({kind}) completed");
        (self.hooks.on_completed)(kind, index);
        self.index += 1;
        self.try_start_next_part(ctx);
    }

    fn running_part_mut(&mut self) -> Option<&mut Box<P>> {
        if !self.started || self.finished {
            return None;
        }
        self.parts.get_mut(self.index)
    }

    pub fn parts_count(&self) -> usize {
        self.parts.len()
    }

    pub fn current_part_index(&self) -> usize {
        self.index
    }

    /// `(index + 1) / count`, clamped to [0, 1]. 0 for an empty sequence.
    pub fn current_parts_progress(&self) -> f32 {
        if self.parts.is_empty() {
            return 0.0;
        }
        ((self.index + 1) as f32 / self.parts.len() as f32).clamp(0.0, 1.0)
    }

    pub fn is_last_part(&self) -> bool {
        !self.parts.is_empty() && self.index == self.parts.len() - 1
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn difficulty(&self) -> &DifficultyContext {
        &self.difficulty
    }

    pub fn current_part_kind(&self) -> Option<K> {
        self.parts.get(self.index).map(|p| p.kind())
    }

    pub fn part_state(&self, index: usize) -> Option<PartState> {
        self.parts.get(index).map(|p| p.state())
    }

    /// Mistakes of the running part, or of the last part once finished.
    pub fn mistakes_count(&self) -> u32 {
        let index = self.index.min(self.parts.len().saturating_sub(1));
        self.parts.get(index).map_or(0, |p| p.core().mistakes())
    }

    /// Mistakes across every part so far.
    pub fn total_mistakes(&self) -> u32 {
        self.parts.iter().map(|p| p.core().mistakes()).sum()
    }

    pub fn part(&self, index: usize) -> Option<&P> {
        self.parts.get(index).map(|p| p.as_ref())
    }

    pub fn part_mut(&mut self, index: usize) -> Option<&mut P> {
        self.parts.get_mut(index).map(|p| p.as_mut())
    }

    pub fn current_part(&self) -> Option<&P> {
        if self.finished {
            return None;
        }
        self.part(self.index)
    }

    pub fn current_part_mut(&mut self) -> Option<&mut P> {
        if self.finished {
            return None;
        }
        self.part_mut(self.index)
    }

    pub fn parts(&self) -> impl Iterator<Item = &P> {
        self.parts.iter().map(|p| p.as_ref())
    }
}
