//! Per-class attribute resets.

use sigil_types::{AttrValue, attr};

use crate::entity::Entity;

/// Attributes restored to stock values when an entity of a class dies.
///
/// Entries apply in insertion order, so a later entry for the same
/// attribute wins.
#[derive(Debug, Clone, Default)]
pub struct ResetList {
    entries: Vec<(String, AttrValue)>,
}

impl ResetList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.push(attribute, value);
        self
    }

    pub fn push(&mut self, attribute: impl Into<String>, value: impl Into<AttrValue>) {
        self.entries.push((attribute.into(), value.into()));
    }

    pub fn entries(&self) -> &[(String, AttrValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every entry onto the entity.
    pub fn apply_to(&self, entity: &mut Entity) {
        for (attribute, value) in &self.entries {
            entity.set_attribute(attribute, *value);
        }
    }

    /// Stock resets for the player class.
    pub fn standard_player() -> Self {
        Self::new().with(attr::GRAVITY, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MemoryAttributes;

    #[test]
    fn test_later_entries_for_the_same_attribute_win() {
        let mut entity = Entity::player(1, MemoryAttributes::new());
        let list = ResetList::new().with(attr::GRAVITY, 0.5).with(attr::GRAVITY, 1.0);

        list.apply_to(&mut entity);
        assert_eq!(entity.attribute(attr::GRAVITY), Some(AttrValue::Float(1.0)));
    }

    #[test]
    fn test_the_player_list_restores_gravity() {
        let mut entity = Entity::player(1, MemoryAttributes::new().with(attr::GRAVITY, 0.25));

        ResetList::standard_player().apply_to(&mut entity);
        assert_eq!(entity.attribute(attr::GRAVITY), Some(AttrValue::Float(1.0)));
    }
}
