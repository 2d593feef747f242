pub mod attr;
pub mod formatting;
pub mod modes;
pub mod value;

// Re-exports for convenience
pub use modes::{CollisionMode, DamageMode, MoveMode, player_flags};
pub use value::AttrValue;
