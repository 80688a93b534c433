//! Tick driver: fixed-interval and one-shot tasks counted in simulation ticks.
//!
//! ---------------------------
//! HOW THIS IS DESIGNED
//! ---------------------------
//! Tasks are plain records in an arena, addressed by a generational `TaskHandle`.
//! A task never captures its owner; it carries a small `Copy` payload (for enemy
//! volleys, the owning actor's registry id). Cancelling is "look up the slot and
//! clear it", so there is nothing left that could fire afterwards.
//!
//! Every tick, `advance` bumps the counter and collects the due payloads into a
//! `fired` list. Consumer systems later in the same tick take the payloads they
//! own with `take_fired`. Cancelling also strikes an entry from `fired`, so a
//! task cancelled between collection and consumption still never runs. In the
//! game pipeline volleys are taken in `SimSet::Behaviour` before combat, so that
//! window only matters for consumers scheduled after a cancelling system.
//!
//! Periodic tasks registered at tick `r` with interval `I` fire at `r + I`,
//! `r + 2I`, ... One-shot tasks fire once at `r + delay` and free their slot.

use bevy::prelude::*;

use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::plugins::enemies::registry::ActorId;
use crate::plugins::powerups::PowerupKind;

/// Generational index into the task arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct TaskRecord<T> {
    payload: T,
    next_fire: u64,
    /// `None` for one-shot tasks.
    interval: Option<u64>,
    seq: u64,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    record: Option<TaskRecord<T>>,
}

#[derive(Resource, Debug, Clone)]
pub struct Scheduler<T: Copy + Send + Sync + 'static> {
    tick: u64,
    next_seq: u64,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    fired: Vec<(TaskHandle, T)>,
}

impl<T: Copy + Send + Sync + 'static> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tick: 0,
            next_seq: 0,
            slots: Vec::new(),
            free: Vec::new(),
            fired: Vec::new(),
        }
    }
}

impl<T: Copy + Send + Sync + 'static> Scheduler<T> {
    /// Ticks advanced since the session started.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Register a repeating task. An interval of 0 is treated as 1.
    pub fn every(&mut self, interval: u64, payload: T) -> TaskHandle {
        let interval = interval.max(1);
        self.insert(TaskRecord {
            payload,
            next_fire: self.tick + interval,
            interval: Some(interval),
            seq: 0,
        })
    }

    /// Register a one-shot task. A delay of 0 fires on the next tick.
    pub fn after(&mut self, delay: u64, payload: T) -> TaskHandle {
        self.insert(TaskRecord {
            payload,
            next_fire: self.tick + delay.max(1),
            interval: None,
            seq: 0,
        })
    }

    fn insert(&mut self, mut record: TaskRecord<T>) -> TaskHandle {
        record.seq = self.next_seq;
        self.next_seq += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.record = Some(record);
            TaskHandle { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, record: Some(record) });
            TaskHandle { index, generation: 0 }
        }
    }

    fn release_slot(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.record = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
    }

    /// Cancel a task. Returns `true` only the first time for a live handle;
    /// stale handles are ignored.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.fired.retain(|(h, _)| *h != handle);

        let live = self.is_live(handle);
        if live {
            self.release_slot(handle.index);
        }
        live
    }

    pub fn is_live(&self, handle: TaskHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|s| s.generation == handle.generation && s.record.is_some())
    }

    /// Number of registered (not yet cancelled or expired) tasks.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.record.is_some()).count()
    }

    /// Advance one tick and collect due tasks, in registration order.
    ///
    /// Anything fired on the previous tick and not taken is discarded.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.fired.clear();

        let now = self.tick;
        let mut due: Vec<(u64, TaskHandle, T)> = Vec::new();
        let mut expired: Vec<u32> = Vec::new();

        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(rec) = slot.record.as_mut() else { continue };
            if rec.next_fire > now {
                continue;
            }
            due.push((
                rec.seq,
                TaskHandle { index: i as u32, generation: slot.generation },
                rec.payload,
            ));
            match rec.interval {
                Some(interval) => rec.next_fire += interval,
                None => expired.push(i as u32),
            }
        }

        for index in expired {
            self.release_slot(index);
        }

        due.sort_unstable_by_key(|(seq, _, _)| *seq);
        self.fired.extend(due.into_iter().map(|(_, h, p)| (h, p)));
    }

    /// Remove and return the fired tasks whose payload matches `pick`.
    pub fn take_fired(&mut self, mut pick: impl FnMut(&T) -> bool) -> Vec<(TaskHandle, T)> {
        let mut taken = Vec::new();
        self.fired.retain(|(h, p)| {
            if pick(p) {
                taken.push((*h, *p));
                false
            } else {
                true
            }
        });
        taken
    }
}

/// Everything the game schedules on the tick driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// One step of the encounter timeline.
    TimelineStep,
    /// The delayed "run complete" signal after the timeline emptied.
    EncounterComplete,
    /// A periodic volley from the actor with this registry id.
    EnemyVolley(ActorId),
    PlayerAutoFire,
    PowerupRoll(PowerupKind),
    PowerupHide(PowerupKind),
}

pub type TickScheduler = Scheduler<Task>;

pub fn plugin(app: &mut App) {
    app.insert_resource(TickScheduler::default());

    app.add_systems(
        FixedUpdate,
        advance_clock
            .in_set(SimSet::Clock)
            .run_if(in_state(GameState::InGame)),
    );
}

fn advance_clock(mut scheduler: ResMut<TickScheduler>) {
    scheduler.advance();
}
