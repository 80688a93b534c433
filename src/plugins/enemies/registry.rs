//! Visual identity -> actor.
//!
//! Actors live in a slot arena and are addressed two ways:
//! - by `Entity` (what overlap messages carry), through `by_entity`;
//! - by `ActorId` (what scheduled tasks carry), a generational slot index.
//!
//! Removing an actor bumps its slot generation, so both kinds of lookup for a
//! removed actor answer `None` for the rest of the session, even after the slot
//! is reused.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use super::actor::Actor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct ActorSlot {
    generation: u32,
    actor: Option<Actor>,
}

#[derive(Resource, Debug, Default)]
pub struct EnemyRegistry {
    slots: Vec<ActorSlot>,
    free: Vec<u32>,
    by_entity: HashMap<Entity, ActorId>,
}

impl EnemyRegistry {
    /// Record a freshly spawned actor under its entity.
    ///
    /// An entity is registered once; registering it again replaces the old entry.
    pub fn spawn(&mut self, actor: Actor) -> ActorId {
        let entity = actor.entity;
        if self.by_entity.contains_key(&entity) {
            warn!("entity {entity:?} registered twice; replacing the previous actor");
            self.remove(entity);
        }

        let id = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.actor = Some(actor);
            ActorId { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(ActorSlot { generation: 0, actor: Some(actor) });
            ActorId { index, generation: 0 }
        };

        self.by_entity.insert(entity, id);
        id
    }

    pub fn id_of(&self, entity: Entity) -> Option<ActorId> {
        self.by_entity.get(&entity).copied()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.actor.as_ref())
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.actor.as_mut())
    }

    pub fn lookup(&self, entity: Entity) -> Option<&Actor> {
        self.get(self.id_of(entity)?)
    }

    pub fn lookup_mut(&mut self, entity: Entity) -> Option<&mut Actor> {
        let id = self.id_of(entity)?;
        self.get_mut(id)
    }

    /// Remove the entry for `entity`. Only the first call returns the actor.
    pub fn remove(&mut self, entity: Entity) -> Option<Actor> {
        let id = self.by_entity.remove(&entity)?;
        let slot = &mut self.slots[id.index as usize];
        let actor = slot.actor.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        actor
    }

    pub fn len(&self) -> usize {
        self.by_entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }

    /// Entities of every registered actor, in slot order.
    pub fn entities(&self) -> Vec<Entity> {
        self.slots
            .iter()
            .filter_map(|s| s.actor.as_ref().map(|a| a.entity))
            .collect()
    }
}
