use bevy::prelude::*;
use counting_galaxy::activity::{
    ActivityPart, CameraRig, CompletionChannel, PartContext, PartSequencer, PartState,
    SequencerHooks,
};
use counting_galaxy::core::config::CountingConfig;
use counting_galaxy::gameplay::counting::{CountingCue, CountingPart, Face};
use std::sync::{Arc, Mutex};

const DT: f32 = 1.0 / 60.0;

fn begun(n: usize, palette: Vec<u32>, seed: u64) -> (CountingPart<&'static str>, PartContext, CompletionChannel) {
    let mut part = CountingPart::new("Counting", CountingConfig::default(), seed);
    part.set_initial_data(n, 7, palette);
    let channel = CompletionChannel::new();
    let mut ctx = PartContext::new(CameraRig::new(5.0, 0.34, 0.1));
    part.begin(&mut ctx, channel.token(0));
    (part, ctx, channel)
}

fn run(part: &mut CountingPart<&'static str>, ctx: &mut PartContext, seconds: f32) {
    let frames = (seconds / DT).ceil() as usize;
    for _ in 0..frames {
        part.update(ctx, DT);
    }
}

#[test]
fn three_objects_cycle_two_visuals() {
    let (part, _, _) = begun(3, vec![10, 20], 1);
    let visuals: Vec<Option<u32>> = part.objects().iter().map(|o| o.visual()).collect();
    assert_eq!(visuals, vec![Some(10), Some(20), Some(10)]);
    let ordinals: Vec<u32> = part.objects().iter().map(|o| o.ordinal()).collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
}

#[test]
fn empty_palette_leaves_visuals_unset() {
    let (part, _, _) = begun(2, vec![], 1);
    assert!(part.objects().iter().all(|o| o.visual().is_none()));
}

#[test]
fn objects_start_at_centre_and_hidden() {
    let (part, _, _) = begun(4, vec![1], 2);
    for o in part.objects() {
        assert_eq!(o.path.start(), Vec3::ZERO);
        assert_eq!(o.scale, 0.0);
        assert_eq!(o.label_scale, 0.0);
        assert!(!o.is_interactive());
    }
}

#[test]
fn clicks_before_arrival_are_ignored() {
    let (mut part, _, _) = begun(3, vec![1], 3);
    let first = part.object_with_ordinal(1).unwrap();
    assert!(!part.click_object(first));
    assert_eq!(part.expected_number(), 1);
}

#[test]
fn counts_in_order_and_completes_once() {
    let (mut part, mut ctx, channel) = begun(3, vec![10, 20], 4);
    run(&mut part, &mut ctx, 0.5);
    assert!(part.barrier().is_released());

    // out of order: nothing changes and no mistake is recorded
    let second = part.object_with_ordinal(2).unwrap();
    assert!(!part.click_object(second));
    assert_eq!(part.expected_number(), 1);
    assert!(part.object(second).unwrap().is_interactive());
    assert_eq!(part.core().mistakes(), 0);
    assert!(part
        .drain_cues()
        .contains(&CountingCue::WrongNumber { ordinal: 2, expected: 1 }));

    let mut last_fill = part.center().fill;
    for ordinal in 1..=3 {
        let id = part.object_with_ordinal(ordinal).unwrap();
        assert!(part.click_object(id));
        assert!(!part.object(id).unwrap().is_interactive());
        // a collected object cannot be clicked again
        assert!(!part.click_object(id));
        for _ in 0..60 {
            part.update(&mut ctx, DT);
            let fill = part.center().fill;
            assert!(fill + 1e-6 >= last_fill, "fill went down: {last_fill} -> {fill}");
            last_fill = fill;
        }
    }
    assert_eq!(part.expected_number(), 4);
    run(&mut part, &mut ctx, 4.0);

    assert_eq!(part.state(), PartState::Completed);
    assert_eq!(part.center().fill, 1.0);
    assert_eq!(part.center().face, Face::Happy);
    assert_eq!(part.center().shine_alpha, 1.0);
    assert_eq!(part.center().rotation, 0.0);
    assert_eq!(channel.drain(), vec![0]);

    let cues = part.drain_cues();
    let collected: Vec<u32> = cues
        .iter()
        .filter_map(|c| match c {
            CountingCue::Collected { ordinal } => Some(*ordinal),
            _ => None,
        })
        .collect();
    assert_eq!(collected, vec![1, 2, 3]);
    assert_eq!(cues.iter().filter(|c| **c == CountingCue::Finished).count(), 1);

    run(&mut part, &mut ctx, 1.0);
    assert!(channel.drain().is_empty());
}

#[test]
fn collected_object_returns_along_reversed_path() {
    let (mut part, mut ctx, _) = begun(2, vec![1], 5);
    run(&mut part, &mut ctx, 0.5);
    let id = part.object_with_ordinal(1).unwrap();
    let outward = part.object(id).unwrap().path;
    assert!(part.click_object(id));
    let back = part.object(id).unwrap().path;
    assert_eq!(back, outward.reversed());
    run(&mut part, &mut ctx, 1.0);
    let o = part.object(id).unwrap();
    assert!(o.position.truncate().length() < 1e-4);
    assert_eq!(o.scale, 0.0);
}

#[test]
fn face_returns_to_neutral_between_objects() {
    let (mut part, mut ctx, _) = begun(3, vec![1], 6);
    run(&mut part, &mut ctx, 0.5);
    let id = part.object_with_ordinal(1).unwrap();
    part.click_object(id);
    run(&mut part, &mut ctx, 0.7);
    assert_eq!(part.center().face, Face::Happy);
    run(&mut part, &mut ctx, 1.0);
    assert_eq!(part.center().face, Face::Neutral);
    assert!(part.center().fill > 0.3 && part.center().fill < 0.34);
}

#[test]
fn pointer_press_picks_the_touched_object() {
    let (mut part, mut ctx, _) = begun(5, vec![1], 8);
    run(&mut part, &mut ctx, 0.5);
    let id = part.object_with_ordinal(1).unwrap();
    let at = part.object(id).unwrap().position.truncate();
    part.pointer_pressed(&mut ctx, at);
    assert!(part.object(id).unwrap().is_collected());
    assert_eq!(part.expected_number(), 2);

    // far away from everything
    part.pointer_pressed(&mut ctx, Vec2::new(100.0, 100.0));
    assert_eq!(part.expected_number(), 2);
}

#[test]
fn difficulty_sets_object_count_through_sequencer() {
    let mut part = CountingPart::new("Counting", CountingConfig::default(), 9);
    part.set_initial_data(10, 0, vec![1]);
    let mut seq: PartSequencer<&'static str, CountingPart<&'static str>> =
        PartSequencer::new(vec![Box::new(part)]);
    let done = Arc::new(Mutex::new(0));
    let d = done.clone();
    seq.initialize(
        SequencerHooks::new(|_, _| {}, |_, _| {}, move || *d.lock().unwrap() += 1),
        counting_galaxy::activity::DifficultyContext {
            object_count: 2,
            ..Default::default()
        },
    );
    let mut ctx = PartContext::default();
    seq.begin(&mut ctx);
    assert_eq!(seq.part(0).unwrap().objects().len(), 2);
    for _ in 0..30 {
        seq.update(&mut ctx, DT);
    }
    for ordinal in 1..=2 {
        let part = seq.part_mut(0).unwrap();
        let id = part.object_with_ordinal(ordinal).unwrap();
        assert!(part.click_object(id));
    }
    for _ in 0..600 {
        seq.update(&mut ctx, DT);
    }
    assert!(seq.is_finished());
    assert_eq!(*done.lock().unwrap(), 1);
}
