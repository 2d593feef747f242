//! Well-known attribute names.
//!
//! The built-in effect set writes these attributes; hosts that bridge a real
//! game engine map them onto whatever their entity representation exposes.

/// Movement mode, encoded per [`crate::modes::MoveMode`].
pub const MOVE_MODE: &str = "move_mode";

/// Damage mode, encoded per [`crate::modes::DamageMode`].
pub const DAMAGE_MODE: &str = "damage_mode";

/// Collision mode, encoded per [`crate::modes::CollisionMode`].
pub const COLLISION_MODE: &str = "collision_mode";

/// Seconds an entity stays alight. Zero extinguishes it.
pub const IGNITE_LIFETIME: &str = "ignite_lifetime";

/// Packed state bits, see [`crate::modes::player_flags`].
pub const FLAGS: &str = "flags";

/// Gravity scale. `1.0` is normal gravity.
pub const GRAVITY: &str = "gravity";

/// Hit points.
pub const HEALTH: &str = "health";
