//! Encounter timeline: authored wave directives -> flat event queue -> spawns.
//!
//! ```text
//! OnEnter(InGame):   build the queue from the script, register the step task
//! SimSet::Spawn:     TimelineStep fired -> counter += 1 -> pop every due head -> spawn
//!                    queue just emptied -> one-shot EncounterComplete task
//!                    EncounterComplete fired -> message (once) -> GameState::Victory
//! ```
//!
//! The queue is drained strictly from the head and is never re-sorted: an event
//! authored out of order waits behind its predecessor.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::common::screen::ScreenBounds;
use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::clock::{Task, TaskHandle, TickScheduler};
use crate::plugins::enemies::{EnemyKind, EnemySpawner};
use crate::plugins::movement::{Direction, MovementSpec};

pub mod script;

/// One timeline step, in milliseconds of simulation time.
pub const STEP_MS: u64 = 100;
/// Delay between the last spawn and the completion signal.
pub const COMPLETION_DELAY_MS: u64 = 10_000;

pub const DEFAULT_ROW_DELAY: u64 = 3;
pub const DEFAULT_ROW_OFFSET: f32 = 10.0;

/// A single authored spawn. `tick` counts timeline steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wave {
    pub tick: u64,
    pub lane: f32,
    pub speed: f32,
    pub direction: Direction,
    pub kind: EnemyKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WaveDirective {
    Single(Wave),
    /// `count` spawns; the i-th at `tick + i * delay`, `lane + i * offset`.
    /// `None` means the default; `Some(0)` is honoured as zero.
    Row {
        count: u32,
        wave: Wave,
        delay: Option<u64>,
        offset: Option<f32>,
    },
}

/// What to spawn; the factory is the `EnemySpawner`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub movement: MovementSpec,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineEvent {
    pub tick: u64,
    pub order: SpawnOrder,
}

impl Wave {
    fn event(&self, tick: u64, lane: f32) -> TimelineEvent {
        TimelineEvent {
            tick,
            order: SpawnOrder {
                kind: self.kind,
                movement: MovementSpec { direction: self.direction, lane, speed: self.speed },
            },
        }
    }
}

impl WaveDirective {
    /// Append this directive's events, in authored order.
    pub fn expand(&self, out: &mut Vec<TimelineEvent>) {
        match *self {
            WaveDirective::Single(wave) => out.push(wave.event(wave.tick, wave.lane)),
            WaveDirective::Row { count, wave, delay, offset } => {
                let delay = delay.unwrap_or(DEFAULT_ROW_DELAY);
                let offset = offset.unwrap_or(DEFAULT_ROW_OFFSET);
                out.extend((0..count).map(|i| {
                    wave.event(wave.tick + u64::from(i) * delay, wave.lane + i as f32 * offset)
                }));
            }
        }
    }
}

pub fn expand_all(directives: &[WaveDirective]) -> Vec<TimelineEvent> {
    let mut out = Vec::new();
    for d in directives {
        d.expand(&mut out);
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Queue still has events (or never had any).
    Pending,
    Armed(TaskHandle),
    Signalled,
}

/// Result of one drain.
#[derive(Debug, Default)]
pub struct Drain {
    pub orders: Vec<SpawnOrder>,
    /// This drain took the queue from non-empty to empty.
    pub exhausted: bool,
}

#[derive(Resource, Debug)]
pub struct EncounterTimeline {
    queue: VecDeque<TimelineEvent>,
    counter: u64,
    completion: Completion,
}

impl EncounterTimeline {
    pub fn new(events: Vec<TimelineEvent>) -> Self {
        for (i, pair) in events.windows(2).enumerate() {
            if pair[1].tick < pair[0].tick {
                warn!(
                    "timeline event {} at tick {} follows tick {}; it will wait in queue order",
                    i + 1,
                    pair[1].tick,
                    pair[0].tick
                );
            }
        }
        Self {
            queue: events.into(),
            counter: 0,
            completion: Completion::Pending,
        }
    }

    pub fn from_directives(directives: &[WaveDirective]) -> Self {
        Self::new(expand_all(directives))
    }

    #[inline]
    pub fn counter(&self) -> u64 {
        self.counter
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// Advance the counter by one and drain.
    pub fn step(&mut self) -> Drain {
        self.counter += 1;
        self.drain_due()
    }

    /// Pop every head due at the current counter. Calling it again without a
    /// step yields nothing.
    pub fn drain_due(&mut self) -> Drain {
        let had_events = !self.queue.is_empty();
        let mut orders = Vec::new();

        while self.queue.front().is_some_and(|e| e.tick <= self.counter) {
            if let Some(ev) = self.queue.pop_front() {
                orders.push(ev.order);
            }
        }

        Drain {
            orders,
            exhausted: had_events && self.queue.is_empty(),
        }
    }

    pub fn arm_completion(&mut self, handle: TaskHandle) {
        if self.completion == Completion::Pending {
            self.completion = Completion::Armed(handle);
        }
    }

    /// Returns `true` only for the first signal of an armed timeline.
    pub fn signal_completion(&mut self) -> bool {
        match self.completion {
            Completion::Armed(_) => {
                self.completion = Completion::Signalled;
                true
            }
            Completion::Pending | Completion::Signalled => false,
        }
    }
}

impl Default for EncounterTimeline {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// The scripted encounter has run its course.
#[derive(Message, Clone, Copy, Debug)]
pub struct EncounterComplete;

pub fn plugin(app: &mut App) {
    app.insert_resource(EncounterTimeline::default());
    app.add_message::<EncounterComplete>();

    app.add_systems(OnEnter(GameState::InGame), start_encounter);

    app.add_systems(
        FixedUpdate,
        (drain_timeline, signal_completion, finish_run)
            .chain()
            .in_set(SimSet::Spawn)
            .run_if(in_state(GameState::InGame)),
    );
}

fn start_encounter(
    mut commands: Commands,
    screen: Res<ScreenBounds>,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<TickScheduler>,
) {
    let timeline = EncounterTimeline::from_directives(&script::encounter(&screen));
    info!("encounter start: {} spawns queued", timeline.remaining());
    commands.insert_resource(timeline);

    scheduler.every(tunables.ticks(STEP_MS), Task::TimelineStep);
}

pub fn drain_timeline(
    tunables: Res<Tunables>,
    mut timeline: ResMut<EncounterTimeline>,
    mut spawner: EnemySpawner,
) {
    let steps = spawner
        .scheduler
        .take_fired(|t| matches!(t, Task::TimelineStep))
        .len();

    for _ in 0..steps {
        let drain = timeline.step();
        for order in drain.orders {
            spawner.spawn(order.kind, order.movement);
        }

        if drain.exhausted {
            let delay = tunables.ticks(COMPLETION_DELAY_MS);
            let handle = spawner.scheduler.after(delay, Task::EncounterComplete);
            timeline.arm_completion(handle);
            info!("timeline exhausted at step {}; completion in {delay} ticks", timeline.counter());
        }
    }
}

pub fn signal_completion(
    mut scheduler: ResMut<TickScheduler>,
    mut timeline: ResMut<EncounterTimeline>,
    mut done: MessageWriter<EncounterComplete>,
) {
    let fired = scheduler.take_fired(|t| matches!(t, Task::EncounterComplete));
    for _ in fired {
        if timeline.signal_completion() {
            done.write(EncounterComplete);
        }
    }
}

fn finish_run(mut done: MessageReader<EncounterComplete>, mut next: ResMut<NextState<GameState>>) {
    if done.read().count() > 0 {
        info!("encounter complete");
        next.set(GameState::Victory);
    }
}

#[cfg(test)]
mod tests;
