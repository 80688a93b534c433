use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;
use crate::plugins::projectiles::SpawnProjectile;

fn wave(tick: u64, lane: f32) -> Wave {
    Wave { tick, lane, speed: 50.0, direction: Direction::Left, kind: EnemyKind::Green }
}

fn ticks_and_lanes(events: &[TimelineEvent]) -> (Vec<u64>, Vec<f32>) {
    (
        events.iter().map(|e| e.tick).collect(),
        events.iter().map(|e| e.order.movement.lane).collect(),
    )
}

// -----------------------------------------------------------------------------
// Expansion
// -----------------------------------------------------------------------------

#[test]
fn row_uses_defaults_when_omitted() {
    let events = expand_all(&[WaveDirective::Row { count: 3, wave: wave(10, 50.0), delay: None, offset: None }]);
    let (ticks, lanes) = ticks_and_lanes(&events);
    assert_eq!(ticks, vec![10, 13, 16]);
    assert_eq!(lanes, vec![50.0, 60.0, 70.0]);
}

#[test]
fn explicit_zero_delay_and_offset_are_honoured() {
    let events = expand_all(&[WaveDirective::Row {
        count: 4,
        wave: wave(7, 40.0),
        delay: Some(0),
        offset: Some(0.0),
    }]);
    let (ticks, lanes) = ticks_and_lanes(&events);
    assert_eq!(ticks, vec![7; 4]);
    assert_eq!(lanes, vec![40.0; 4]);
}

#[test]
fn single_is_one_event_and_order_is_kept() {
    let events = expand_all(&[
        WaveDirective::Single(wave(20, 5.0)),
        WaveDirective::Row { count: 2, wave: wave(10, 1.0), delay: Some(2), offset: Some(3.0) },
    ]);
    let (ticks, lanes) = ticks_and_lanes(&events);
    // Not re-sorted.
    assert_eq!(ticks, vec![20, 10, 12]);
    assert_eq!(lanes, vec![5.0, 1.0, 4.0]);
}

// -----------------------------------------------------------------------------
// Drain
// -----------------------------------------------------------------------------

#[test]
fn simultaneous_events_drain_in_one_step() {
    let mut tl = EncounterTimeline::from_directives(&[
        WaveDirective::Single(wave(2, 0.0)),
        WaveDirective::Single(wave(2, 1.0)),
        WaveDirective::Single(wave(2, 2.0)),
        WaveDirective::Single(wave(3, 3.0)),
    ]);

    assert!(tl.step().orders.is_empty());
    let d = tl.step();
    assert_eq!(d.orders.len(), 3);
    assert!(!d.exhausted);
    assert_eq!(tl.remaining(), 1);
}

#[test]
fn drain_at_a_fixed_counter_is_idempotent() {
    let mut tl = EncounterTimeline::from_directives(&[
        WaveDirective::Single(wave(1, 0.0)),
        WaveDirective::Single(wave(5, 0.0)),
    ]);

    assert_eq!(tl.step().orders.len(), 1);
    let again = tl.drain_due();
    assert!(again.orders.is_empty());
    assert!(!again.exhausted);
    assert_eq!(tl.counter(), 1);
}

#[test]
fn late_event_waits_behind_its_predecessor() {
    let mut tl = EncounterTimeline::from_directives(&[
        WaveDirective::Single(wave(3, 0.0)),
        WaveDirective::Single(wave(1, 1.0)),
    ]);

    assert!(tl.step().orders.is_empty());
    assert!(tl.step().orders.is_empty());
    let d = tl.step();
    assert_eq!(d.orders.len(), 2);
    assert!(d.exhausted);
}

#[test]
fn exhaustion_is_reported_once() {
    let mut tl = EncounterTimeline::from_directives(&[WaveDirective::Single(wave(1, 0.0))]);

    assert!(tl.step().exhausted);
    for _ in 0..10 {
        assert!(!tl.step().exhausted);
    }
}

#[test]
fn empty_timeline_never_exhausts() {
    let mut tl = EncounterTimeline::default();
    for _ in 0..10 {
        assert!(!tl.step().exhausted);
    }
    assert_eq!(tl.completion(), Completion::Pending);
}

#[test]
fn completion_signals_only_once_armed() {
    let mut sched = TickScheduler::default();
    let mut tl = EncounterTimeline::default();
    assert!(!tl.signal_completion());

    tl.arm_completion(sched.after(1, Task::EncounterComplete));
    assert!(tl.signal_completion());
    assert!(!tl.signal_completion());
    assert_eq!(tl.completion(), Completion::Signalled);
}

// -----------------------------------------------------------------------------
// Script
// -----------------------------------------------------------------------------

#[test]
fn scripted_encounter_shape() {
    let events = expand_all(&script::encounter(&ScreenBounds::default()));

    assert_eq!(events.len(), 86);
    assert_eq!(events[0].tick, 10);
    assert_eq!(events[0].order.kind, EnemyKind::Green);
    assert_eq!(events.iter().map(|e| e.tick).max(), Some(1274));

    // The first four-way crossing shares one step and meets at the centre lanes.
    let cross = events
        .iter()
        .filter(|e| e.tick == 350)
        .map(|e| (e.order.movement.direction, e.order.movement.lane))
        .collect::<Vec<_>>();
    assert_eq!(
        cross,
        vec![
            (Direction::Left, 60.0),
            (Direction::Right, 60.0),
            (Direction::Down, 80.0),
            (Direction::Up, 80.0),
        ]
    );
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

fn timeline_world(directives: &[WaveDirective]) -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(ScreenBounds::default());
    world.insert_resource(TickScheduler::default());
    world.insert_resource(crate::plugins::enemies::EnemyRegistry::default());
    world.insert_resource(EncounterTimeline::from_directives(directives));
    world.init_resource::<Messages<SpawnProjectile>>();
    world.init_resource::<Messages<EncounterComplete>>();
    world
}

/// One simulation tick of the spawn stage.
fn tick(world: &mut World) -> usize {
    world.resource_mut::<TickScheduler>().advance();
    run_system_once(world, drain_timeline);
    run_system_once(world, signal_completion);
    world.resource_mut::<Messages<EncounterComplete>>().drain().count()
}

#[test]
fn completion_fires_once_after_the_delay() {
    let mut world = timeline_world(&[WaveDirective::Single(wave(1, 30.0))]);
    let step = Tunables::default().ticks(STEP_MS);
    let delay = Tunables::default().ticks(COMPLETION_DELAY_MS);
    world.resource_mut::<TickScheduler>().every(step, Task::TimelineStep);

    // The only event is due at the first step; completion `delay` ticks later.
    let mut signals = Vec::new();
    for t in 1..=(step + delay + 50) {
        let seen = tick(&mut world);
        if seen > 0 {
            signals.push((t, seen));
        }
    }

    assert_eq!(signals, vec![(step + delay, 1)]);
    assert_eq!(world.resource::<crate::plugins::enemies::EnemyRegistry>().len(), 1);
}

#[test]
fn spawns_happen_even_when_actors_are_alive() {
    let mut world = timeline_world(&[
        WaveDirective::Row { count: 3, wave: wave(1, 10.0), delay: Some(1), offset: None },
    ]);
    world.resource_mut::<TickScheduler>().every(1, Task::TimelineStep);

    for _ in 0..3 {
        tick(&mut world);
    }

    assert_eq!(world.resource::<crate::plugins::enemies::EnemyRegistry>().len(), 3);
    assert!(matches!(world.resource::<EncounterTimeline>().completion(), Completion::Armed(_)));
}
