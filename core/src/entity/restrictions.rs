//! Item restriction sets.

use std::collections::HashSet;

/// Item names an entity may not use, pick up, or buy.
///
/// Names are stored without the `weapon_` classname prefix, so
/// `restrict("knife")` and `restrict("weapon_knife")` name the same entry.
/// The host consults [`RestrictionSet::is_restricted`] from its pickup and
/// purchase hooks; the set itself enforces nothing.
#[derive(Debug, Clone, Default)]
pub struct RestrictionSet {
    names: HashSet<String>,
}

impl RestrictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. Returns `false` if it was already restricted.
    pub fn restrict(&mut self, name: &str) -> bool {
        self.names.insert(normalize(name).to_string())
    }

    /// Remove a name. Returns `false` if it was not restricted.
    pub fn unrestrict(&mut self, name: &str) -> bool {
        self.names.remove(normalize(name))
    }

    pub fn is_restricted(&self, name: &str) -> bool {
        self.names.contains(normalize(name))
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Strip the engine classname prefix.
fn normalize(name: &str) -> &str {
    name.strip_prefix("weapon_").unwrap_or(name)
}
