//! Typed views of the mode attributes.
//!
//! Movement, damage, and collision modes are stored as `Int` attributes so
//! that any attribute backend can hold them; these enums give engine and
//! host code a typed vocabulary over those integers.

use crate::value::AttrValue;

/// How an entity moves. Stored in the [`crate::attr::MOVE_MODE`] attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    #[default]
    Walk = 0,
    Fly = 1,
    Frozen = 2,
    Noclip = 3,
}

impl MoveMode {
    pub fn as_attr(self) -> AttrValue {
        AttrValue::Int(self as i64)
    }

    /// Decode from an attribute value. Unknown or non-integer values fall
    /// back to `Walk`.
    pub fn from_attr(value: AttrValue) -> MoveMode {
        match value.as_i64() {
            Some(1) => MoveMode::Fly,
            Some(2) => MoveMode::Frozen,
            Some(3) => MoveMode::Noclip,
            _ => MoveMode::Walk,
        }
    }
}

impl std::fmt::Display for MoveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MoveMode::Walk => "walk",
            MoveMode::Fly => "fly",
            MoveMode::Frozen => "frozen",
            MoveMode::Noclip => "noclip",
        };
        write!(f, "{name}")
    }
}

/// Whether an entity takes damage. Stored in [`crate::attr::DAMAGE_MODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DamageMode {
    #[default]
    Vulnerable = 0,
    Immune = 1,
}

impl DamageMode {
    pub fn as_attr(self) -> AttrValue {
        AttrValue::Int(self as i64)
    }

    pub fn from_attr(value: AttrValue) -> DamageMode {
        match value.as_i64() {
            Some(1) => DamageMode::Immune,
            _ => DamageMode::Vulnerable,
        }
    }
}

impl std::fmt::Display for DamageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DamageMode::Vulnerable => "vulnerable",
            DamageMode::Immune => "immune",
        };
        write!(f, "{name}")
    }
}

/// Whether other entities collide with this one. Stored in
/// [`crate::attr::COLLISION_MODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionMode {
    #[default]
    Solid = 0,
    Passable = 1,
}

impl CollisionMode {
    pub fn as_attr(self) -> AttrValue {
        AttrValue::Int(self as i64)
    }

    pub fn from_attr(value: AttrValue) -> CollisionMode {
        match value.as_i64() {
            Some(1) => CollisionMode::Passable,
            _ => CollisionMode::Solid,
        }
    }
}

impl std::fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CollisionMode::Solid => "solid",
            CollisionMode::Passable => "passable",
        };
        write!(f, "{name}")
    }
}

/// Bit positions for the packed [`crate::attr::FLAGS`] attribute.
pub mod player_flags {
    /// Entity cannot act or be moved by its own input.
    pub const PARALYZED: i64 = 1 << 0;
}
