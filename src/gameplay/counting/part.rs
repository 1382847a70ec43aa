use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::barrier::CompletionBarrier;
use super::center::{CenterObject, Face};
use super::objects::{CollectibleObject, FloatingMotion, ObjectId, VisualPalette};
use crate::activity::difficulty::DifficultyContext;
use crate::activity::part::{ActivityPart, PartCompletion, PartContext, PartCore, PartKind};
use crate::animation::{Ease, Property, TweenCoordinator, TweenKey, TweenSpec, TweenValue};
use crate::core::config::CountingConfig;
use crate::core::geometry::random::symmetric;
use crate::core::geometry::{asymmetric_s_curve, SpatialDistributor};

/// Animated things inside a counting part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Target {
    Object(ObjectId),
    Label(ObjectId),
    Center,
    Shine,
    Face,
}

/// Feedback moments other systems (audio, narration, particles) can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingCue {
    /// Every object reached its resting spot.
    AllArrived,
    Collected { ordinal: u32 },
    /// An object was clicked out of order. Nothing changes in the game.
    WrongNumber { ordinal: u32, expected: u32 },
    Finished,
}

/// Data a counting part needs before it can begin.
#[derive(Debug, Clone, PartialEq)]
pub struct CountingSetup {
    pub object_count: usize,
    pub center_visual: u32,
    pub palette: Vec<u32>,
}

/// Count-the-objects part.
///
/// On begin, N objects fly out of the centre along S-curves to a sunflower
/// layout. Once all have landed their numbers pop in and the player taps them
/// in order 1..N; each correct tap sends the object back along its reversed
/// path into the centre, which fills up. After the last one the centre spins
/// and the part completes.
pub struct CountingPart<K: PartKind> {
    core: PartCore<K>,
    config: CountingConfig,
    setup: Option<CountingSetup>,
    objects: Vec<CollectibleObject>,
    center: CenterObject,
    center_base_scale: f32,
    tweens: TweenCoordinator<Target>,
    barrier: CompletionBarrier,
    expected: u32,
    spins_left: u32,
    cues: Vec<CountingCue>,
    rng: StdRng,
}

impl<K: PartKind> CountingPart<K> {
    pub fn new(kind: K, config: CountingConfig, seed: u64) -> Self {
        let smallest = config.smallest_scale;
        Self {
            core: PartCore::new(kind, config.additional_zoom),
            config,
            setup: None,
            objects: Vec::new(),
            center: CenterObject::new(0, smallest),
            center_base_scale: smallest,
            tweens: TweenCoordinator::new(),
            barrier: CompletionBarrier::default(),
            expected: 1,
            spins_left: 0,
            cues: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Must be called before the part begins.
    pub fn set_initial_data(&mut self, object_count: usize, center_visual: u32, palette: Vec<u32>) {
        self.center = CenterObject::new(center_visual, self.config.smallest_scale);
        self.setup = Some(CountingSetup {
            object_count,
            center_visual,
            palette,
        });
    }

    pub fn setup(&self) -> Option<&CountingSetup> {
        self.setup.as_ref()
    }

    pub fn objects(&self) -> &[CollectibleObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&CollectibleObject> {
        self.objects.get(id.0)
    }

    pub fn object_with_ordinal(&self, ordinal: u32) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|o| o.ordinal() == ordinal)
            .map(ObjectId)
    }

    pub fn center(&self) -> &CenterObject {
        &self.center
    }

    /// Next number the player has to tap; N + 1 once everything is collected.
    pub fn expected_number(&self) -> u32 {
        self.expected
    }

    pub fn barrier(&self) -> &CompletionBarrier {
        &self.barrier
    }

    pub fn is_animating(&self) -> bool {
        self.tweens.active_count() > 0
    }

    pub fn drain_cues(&mut self) -> Vec<CountingCue> {
        std::mem::take(&mut self.cues)
    }

    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn run_choreography(&mut self, setup: CountingSetup) {
        self.objects.clear();
        self.tweens.clear();
        self.expected = 1;
        self.spins_left = 0;
        self.center = CenterObject::new(setup.center_visual, self.config.smallest_scale);
        self.center_base_scale = self.config.smallest_scale;
        self.spawn_objects(&setup);
        self.distribute();
        self.prepare_for_scatter();
        self.scatter();
        info!(
            target: "counting",
            "part {}: scattering {} objects", self.core.index(), self.objects.len()
        );
    }

    fn spawn_objects(&mut self, setup: &CountingSetup) {
        let n = setup.object_count;
        let mut palette = VisualPalette::new(setup.palette.clone());
        self.objects = (1..=n)
            .map(|ordinal| {
                let t = ordinal as f32 / n as f32;
                let factor = lerp(self.config.smallest_scale, 1.0, t);
                CollectibleObject::new(ordinal as u32, palette.next_visual(), factor)
            })
            .collect();
        self.barrier = CompletionBarrier::new(n);
    }

    // Spatial order is shuffled separately so numbers don't spiral outwards in sequence.
    fn distribute(&mut self) {
        let n = self.objects.len();
        let spots = SpatialDistributor::sunflower_spiral(
            &mut self.rng,
            n,
            Vec3::ZERO,
            self.config.x_radius.as_vec2(),
            self.config.y_radius.as_vec2(),
            self.config.distribution_jitter,
        );
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);
        for (spot, &i) in spots.into_iter().zip(order.iter()) {
            self.objects[i].path = asymmetric_s_curve(
                &mut self.rng,
                Vec3::ZERO,
                spot,
                self.config.curve_strength,
                self.config.curve_randomness,
            );
        }
    }

    fn prepare_for_scatter(&mut self) {
        for o in self.objects.iter_mut() {
            o.reset_for_scatter();
            o.label_scale = 0.0;
        }
    }

    fn scatter(&mut self) {
        let duration = self.config.scatter_duration;
        for i in 0..self.objects.len() {
            let id = ObjectId(i);
            let (path, factor) = {
                let o = &self.objects[i];
                (o.path, o.scale_factor())
            };
            let angle = symmetric(&mut self.rng, self.config.random_rotation);
            let target = Target::Object(id);
            self.tweens
                .start(target, Property::Position, TweenSpec::path(path, duration, Ease::InSine));
            self.tweens.start(
                target,
                Property::Scale,
                TweenSpec::scalar(0.0, factor, duration, Ease::OutBack),
            );
            self.tweens.start(
                target,
                Property::Rotation,
                TweenSpec::scalar(0.0, angle, duration, Ease::OutSine),
            );
        }
    }

    fn handle_arrival(&mut self, id: ObjectId) {
        let amplitude = self.config.float_amplitude.as_vec2();
        let speed = self.config.float_speed.as_vec2();
        let Some(object) = self.objects.get_mut(id.0) else { return };
        let floating = FloatingMotion::new(&mut self.rng, object.path.end(), amplitude, speed);
        object.arrive(floating);
        if self.barrier.signal() {
            debug!(target: "counting", "all {} objects arrived", self.barrier.expected());
            self.cues.push(CountingCue::AllArrived);
            self.reveal_numbers();
        }
    }

    fn reveal_numbers(&mut self) {
        let duration = self.config.number_reveal_duration;
        let stagger = self.config.number_reveal_stagger;
        for i in 0..self.objects.len() {
            let spec = TweenSpec::scalar(0.0, 1.0, duration, Ease::OutBack)
                .with_delay(i as f32 * stagger);
            self.tweens.start(Target::Label(ObjectId(i)), Property::Scale, spec);
        }
    }

    /// Tap on an object. Returns true if it was the expected number.
    pub fn click_object(&mut self, id: ObjectId) -> bool {
        if !self.core.in_progress() {
            return false;
        }
        let Some(object) = self.objects.get_mut(id.0) else {
            error!(target: "counting", "click on unknown object {}", id.0);
            return false;
        };
        if !object.is_interactive() {
            return false;
        }
        if object.ordinal() != self.expected {
            self.cues.push(CountingCue::WrongNumber {
                ordinal: object.ordinal(),
                expected: self.expected,
            });
            return false;
        }
        let ordinal = object.ordinal();
        object.collect();
        object.path.reverse();
        let path = object.path;
        let scale = object.scale;
        let rotation = object.rotation;
        self.expected += 1;
        self.cues.push(CountingCue::Collected { ordinal });

        let duration = self.config.reach_center_duration;
        let target = Target::Object(id);
        self.tweens
            .start(target, Property::Scale, TweenSpec::scalar(scale, 0.0, duration, Ease::InBack));
        self.tweens.start(
            target,
            Property::Rotation,
            TweenSpec::scalar(rotation, 0.0, duration, Ease::OutSine),
        );
        self.tweens
            .start(target, Property::Position, TweenSpec::path(path, duration, Ease::InSine));
        true
    }

    fn handle_reached_center(&mut self, ctx: &mut PartContext, final_object: bool) {
        self.pulsate_center();
        self.update_fill();
        if final_object {
            self.shine_forever();
            self.tweens.stop(Target::Face, Property::Timer);
            self.center.face = Face::Happy;
            self.begin_ending(ctx);
        } else {
            self.pulsate_shine();
            self.happy_face_for_a_moment();
        }
    }

    fn collected_fraction(&self) -> f32 {
        let n = self.object_count().max(1) as f32;
        ((self.expected.saturating_sub(1)) as f32 / n).clamp(0.0, 1.0)
    }

    fn pulsate_center(&mut self) {
        let base = lerp(self.config.smallest_scale, 1.0, self.collected_fraction());
        self.center_base_scale = base;
        self.center.scale = base;
        self.tweens.start(
            Target::Center,
            Property::Scale,
            TweenSpec::punch(
                base,
                self.config.pulsate_strength,
                self.config.pulsate_frequency,
                self.config.pulsate_duration,
            ),
        );
    }

    fn update_fill(&mut self) {
        let spec = TweenSpec::scalar(
            self.center.fill,
            self.collected_fraction(),
            self.config.pulsate_duration,
            Ease::OutSine,
        );
        self.tweens.start(Target::Center, Property::Fill, spec);
    }

    fn pulsate_shine(&mut self) {
        let spec = TweenSpec::punch(
            0.0,
            1.0,
            self.config.pulsate_frequency,
            self.config.pulsate_duration,
        );
        self.tweens.start(Target::Shine, Property::Alpha, spec);
    }

    fn shine_forever(&mut self) {
        let spec = TweenSpec::scalar(
            self.center.shine_alpha,
            1.0,
            self.config.pulsate_duration,
            Ease::InSine,
        );
        self.tweens.start(Target::Shine, Property::Alpha, spec);
    }

    fn happy_face_for_a_moment(&mut self) {
        self.center.face = Face::Happy;
        self.tweens.start(
            Target::Face,
            Property::Timer,
            TweenSpec::wait(self.config.pulsate_duration),
        );
    }

    fn begin_ending(&mut self, ctx: &mut PartContext) {
        self.spins_left = self.config.spin_count;
        if self.spins_left == 0 {
            self.finish(ctx);
            return;
        }
        self.spin_once();
    }

    // Punch and a full turn, run together.
    fn spin_once(&mut self) {
        self.spins_left = self.spins_left.saturating_sub(1);
        let d = self.config.spin_duration;
        self.tweens.start(
            Target::Center,
            Property::Scale,
            TweenSpec::punch(
                self.center_base_scale,
                self.config.end_punch_strength,
                self.config.pulsate_frequency,
                d,
            ),
        );
        self.tweens.start(
            Target::Center,
            Property::Rotation,
            TweenSpec::scalar(0.0, 360.0, d, Ease::InOutSine),
        );
    }

    fn finish(&mut self, ctx: &mut PartContext) {
        self.center.rotation = 0.0;
        self.cues.push(CountingCue::Finished);
        info!(target: "counting", "part {}: all {} objects counted", self.core.index(), self.object_count());
        self.core.complete(ctx);
    }

    fn apply(&mut self, key: TweenKey<Target>, value: TweenValue) {
        match (key.target, key.property, value) {
            (Target::Object(id), Property::Position, TweenValue::Point(p)) => {
                if let Some(o) = self.objects.get_mut(id.0) {
                    o.position = p.truncate().extend(o.path.end().z);
                }
            }
            (Target::Object(id), Property::Scale, TweenValue::Scalar(s)) => {
                if let Some(o) = self.objects.get_mut(id.0) {
                    o.scale = s;
                }
            }
            (Target::Object(id), Property::Rotation, TweenValue::Scalar(r)) => {
                if let Some(o) = self.objects.get_mut(id.0) {
                    o.rotation = r;
                }
            }
            (Target::Label(id), Property::Scale, TweenValue::Scalar(s)) => {
                if let Some(o) = self.objects.get_mut(id.0) {
                    o.label_scale = s;
                }
            }
            (Target::Center, Property::Scale, TweenValue::Scalar(s)) => self.center.scale = s,
            (Target::Center, Property::Rotation, TweenValue::Scalar(r)) => self.center.rotation = r,
            (Target::Center, Property::Fill, TweenValue::Scalar(f)) => {
                self.center.fill = f.clamp(0.0, 1.0)
            }
            (Target::Shine, Property::Alpha, TweenValue::Scalar(a)) => {
                self.center.shine_alpha = a.clamp(0.0, 1.0)
            }
            (t, p, v) => {
                warn!(target: "counting", "unhandled tween value {v:?} for {t:?}/{p:?}");
            }
        }
    }

    fn handle_finished(&mut self, ctx: &mut PartContext, key: TweenKey<Target>) {
        match (key.target, key.property) {
            (Target::Object(id), Property::Position) => {
                let Some(object) = self.objects.get(id.0) else { return };
                if object.is_collected() {
                    let final_object = object.ordinal() as usize == self.object_count();
                    self.handle_reached_center(ctx, final_object);
                } else {
                    self.handle_arrival(id);
                }
            }
            (Target::Face, Property::Timer) => {
                self.center.face = Face::Neutral;
            }
            (Target::Center, Property::Rotation) => {
                if self.spins_left > 0 {
                    self.spin_once();
                } else {
                    self.finish(ctx);
                }
            }
            _ => {}
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl<K: PartKind> ActivityPart<K> for CountingPart<K> {
    fn core(&self) -> &PartCore<K> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PartCore<K> {
        &mut self.core
    }

    fn initialize(&mut self, difficulty: &DifficultyContext) {
        if let Some(setup) = self.setup.as_mut() {
            if setup.object_count != difficulty.object_count {
                debug!(
                    target: "counting",
                    "object count {} -> {} from difficulty {}",
                    setup.object_count, difficulty.object_count, difficulty.rating
                );
            }
            setup.object_count = difficulty.object_count;
        }
    }

    fn begin(&mut self, ctx: &mut PartContext, completion: PartCompletion) {
        self.core.begin(ctx, completion);
        let Some(setup) = self.setup.clone() else {
            error!(target: "counting", "initial data not set before begin; completing part");
            self.core.complete(ctx);
            return;
        };
        if setup.object_count == 0 {
            warn!(target: "counting", "no objects to count; completing part");
            self.cues.push(CountingCue::Finished);
            self.core.complete(ctx);
            return;
        }
        self.run_choreography(setup);
    }

    fn update(&mut self, ctx: &mut PartContext, dt: f32) {
        if !self.core.in_progress() {
            return;
        }
        let frame = self.tweens.tick(dt);
        for (key, value) in frame.updates {
            self.apply(key, value);
        }
        for object in self.objects.iter_mut() {
            object.float(dt);
        }
        for (key, handle) in frame.finished {
            if !self.core.in_progress() {
                break;
            }
            // restarted by an earlier handler this frame
            if self
                .tweens
                .handle(key.target, key.property)
                .is_some_and(|current| current != handle)
            {
                continue;
            }
            self.handle_finished(ctx, key);
        }
    }

    fn pointer_pressed(&mut self, _ctx: &mut PartContext, world_pos: Vec2) {
        if !self.core.in_progress() {
            return;
        }
        let pick = self.config.pick_radius;
        let hit = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_interactive())
            .filter_map(|(i, o)| o.hit_distance(world_pos, pick).map(|d| (i, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((i, _)) = hit {
            self.click_object(ObjectId(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::camera::CameraRig;
    use crate::activity::part::CompletionChannel;

    fn running_part(n: usize, palette: Vec<u32>) -> (CountingPart<&'static str>, PartContext, CompletionChannel) {
        let mut part = CountingPart::new("Counting", CountingConfig::default(), 11);
        part.set_initial_data(n, 0, palette);
        let channel = CompletionChannel::new();
        let mut ctx = PartContext::new(CameraRig::new(5.0, 0.34, 0.1));
        part.begin(&mut ctx, channel.token(0));
        (part, ctx, channel)
    }

    fn settle(part: &mut CountingPart<&'static str>, ctx: &mut PartContext) {
        for _ in 0..400 {
            part.update(ctx, 0.02);
        }
    }

    #[test]
    fn scale_factors_grow_with_ordinal() {
        let (part, _, _) = running_part(4, vec![1]);
        let factors: Vec<f32> = part.objects().iter().map(|o| o.scale_factor()).collect();
        assert_eq!(factors, vec![0.625, 0.75, 0.875, 1.0]);
    }

    #[test]
    fn objects_land_on_their_path_ends() {
        let (mut part, mut ctx, _) = running_part(5, vec![1, 2]);
        assert!(part.objects().iter().all(|o| !o.is_interactive()));
        part.update(&mut ctx, 1.0);
        for o in part.objects() {
            assert!(o.is_interactive());
            assert!(o.is_floating());
            assert_eq!(o.position, o.path.end());
        }
        assert!(part.barrier().is_released());
        assert!(part.drain_cues().contains(&CountingCue::AllArrived));
    }

    #[test]
    fn labels_reveal_with_stagger() {
        let (mut part, mut ctx, _) = running_part(3, vec![1]);
        part.update(&mut ctx, 1.0);
        part.update(&mut ctx, 0.31);
        let labels: Vec<f32> = part.objects().iter().map(|o| o.label_scale).collect();
        assert_eq!(labels[0], 1.0);
        assert!(labels[2] < 1.0);
        settle(&mut part, &mut ctx);
        assert!(part.objects().iter().all(|o| o.label_scale == 1.0));
    }

    #[test]
    fn missing_setup_completes_immediately() {
        let mut part = CountingPart::new("Counting", CountingConfig::default(), 1);
        let channel = CompletionChannel::new();
        let mut ctx = PartContext::default();
        part.begin(&mut ctx, channel.token(0));
        assert_eq!(channel.drain(), vec![0]);
        assert!(part.objects().is_empty());
    }

    #[test]
    fn zero_objects_completes_immediately() {
        let (part, _, channel) = running_part(0, vec![1]);
        assert_eq!(channel.drain(), vec![0]);
        assert!(part.objects().is_empty());
    }

    #[test]
    fn final_object_makes_face_stay_happy() {
        let (mut part, mut ctx, channel) = running_part(2, vec![1]);
        part.update(&mut ctx, 1.0);
        for ordinal in 1..=2 {
            let id = part.object_with_ordinal(ordinal).unwrap();
            assert!(part.click_object(id));
        }
        settle(&mut part, &mut ctx);
        assert!(part.center().is_happy());
        assert_eq!(part.center().shine_alpha, 1.0);
        assert_eq!(part.center().fill, 1.0);
        assert_eq!(channel.drain(), vec![0]);
    }
}
