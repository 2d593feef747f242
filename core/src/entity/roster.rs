//! Entity directory.

use hashbrown::HashMap;

use super::{Entity, EntityId};
use crate::effects::EffectError;

/// Owning directory of live entities, keyed by external id.
#[derive(Debug, Default)]
pub struct Roster {
    entities: HashMap<EntityId, Entity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, returning any previous holder of the same id.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id(), entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Lookup that surfaces a miss as a caller error.
    pub fn lookup(&self, id: EntityId) -> Result<&Entity, EffectError> {
        self.entities.get(&id).ok_or(EffectError::UnknownEntity(id))
    }

    pub fn lookup_mut(&mut self, id: EntityId) -> Result<&mut Entity, EffectError> {
        self.entities
            .get_mut(&id)
            .ok_or(EffectError::UnknownEntity(id))
    }

    /// Remove an entity, handing it back to the caller.
    pub fn discard(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Snapshot of every live id, for teardown loops that mutate the roster.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }
}
