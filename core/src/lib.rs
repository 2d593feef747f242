pub mod config;
pub mod effects;
pub mod entity;
pub mod events;
pub mod resets;
pub mod scheduler;
pub mod world;

// Re-exports for convenience
pub use effects::{
    EffectBehavior, EffectCatalog, EffectEngine, EffectError, EffectHandle, EffectKind,
};
pub use entity::{AttributeStore, Entity, EntityId, MemoryAttributes};
pub use events::{GameEvent, PlayerNotice};
pub use world::World;
