//! Entities and their attribute stores.
//!
//! An entity is whatever the host calls a player: a stable id, a class tag,
//! a bag of named attributes, and the bookkeeping the engine hangs off it.
//! Attribute access goes through [`AttributeStore`] so the same engine can
//! drive the in-memory simulator, tests, or a bridge to a real game server.

mod restrictions;
mod roster;

pub use restrictions::RestrictionSet;
pub use roster::Roster;

use std::fmt;

use hashbrown::HashMap;
use sigil_types::AttrValue;

use crate::effects::{EffectRegistry, EffectScope};

/// Stable external identifier for an entity.
pub type EntityId = i64;

/// Attribute access for one entity.
///
/// Reads and writes on a live entity never fail: a missing attribute reads
/// as `None` and comes into existence on first write.
pub trait AttributeStore: Send + Sync {
    fn attribute(&self, name: &str) -> Option<AttrValue>;
    fn set_attribute(&mut self, name: &str, value: AttrValue);
}

/// HashMap-backed store used by the simulator and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAttributes {
    values: HashMap<String, AttrValue>,
}

impl MemoryAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a starting attribute, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl AttributeStore for MemoryAttributes {
    fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.values.get(name).copied()
    }

    fn set_attribute(&mut self, name: &str, value: AttrValue) {
        self.values.insert(name.to_string(), value);
    }
}

/// A live game object the engine can act on.
pub struct Entity {
    id: EntityId,
    class: String,
    attrs: Box<dyn AttributeStore>,
    effects: EffectRegistry,
    restrictions: RestrictionSet,
}

impl Entity {
    pub fn new(id: EntityId, class: impl Into<String>, attrs: impl AttributeStore + 'static) -> Self {
        Self {
            id,
            class: class.into(),
            attrs: Box::new(attrs),
            effects: EffectRegistry::new(),
            restrictions: RestrictionSet::new(),
        }
    }

    /// Entity of the default `"player"` class.
    pub fn player(id: EntityId, attrs: impl AttributeStore + 'static) -> Self {
        Self::new(id, "player", attrs)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.attrs.attribute(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: AttrValue) {
        self.attrs.set_attribute(name, value);
    }

    /// Outstanding effect registrations on this entity.
    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub(crate) fn effects_mut(&mut self) -> &mut EffectRegistry {
        &mut self.effects
    }

    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    pub fn restrictions_mut(&mut self) -> &mut RestrictionSet {
        &mut self.restrictions
    }

    /// Split view handed to effect actions: mutable attributes plus a
    /// read-only look at what is engaged.
    pub(crate) fn effect_scope(&mut self) -> EffectScope<'_> {
        EffectScope::new(&mut *self.attrs, &self.effects)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("effects", &self.effects)
            .field("restrictions", &self.restrictions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trips() {
        let mut store = MemoryAttributes::new().with("health", 100i64);
        assert_eq!(store.attribute("health"), Some(AttrValue::Int(100)));
        assert_eq!(store.attribute("gravity"), None);

        store.set_attribute("gravity", AttrValue::Float(1.0));
        assert_eq!(store.attribute("gravity"), Some(AttrValue::Float(1.0)));
    }

    #[test]
    fn test_entity_exposes_its_store() {
        let mut entity = Entity::player(7, MemoryAttributes::new().with("health", 100i64));
        assert_eq!(entity.id(), 7);
        assert_eq!(entity.class(), "player");

        entity.set_attribute("health", AttrValue::Int(55));
        assert_eq!(entity.attribute("health"), Some(AttrValue::Int(55)));
    }
}
