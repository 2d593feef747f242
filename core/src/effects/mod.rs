//! Reference-counted effects over shared entities.
//!
//! Several actors can request the same effect on the same entity without
//! coordinating. Each request yields an [`EffectHandle`]; the attribute
//! changes behind the effect engage when the first handle of a kind
//! arrives and revert when the last one retires, however the retirements
//! interleave.
//!
//! # Lifecycle
//!
//! ```text
//!                      ┌───────────────────────────────────┐
//!  apply ──validate──► │ EffectRegistry (handles per kind) │
//!                      └───────────────────────────────────┘
//!                         │ first of kind      │ additive
//!                         ▼                    ▼
//!                       engage            adjust(+amount)
//!
//!  release / cancel / expiry ──► unregister
//!                         │ last of kind       │ additive
//!                         ▼                    ▼
//!                      disengage          adjust(-amount)
//! ```
//!
//! [`EffectEngine`] drives the lifecycle, [`EffectCatalog`] maps kinds to
//! [`EffectBehavior`]s, and each entity carries an [`EffectRegistry`] of
//! its outstanding handles.

mod catalog;
mod engine;
mod handle;
mod registry;

#[cfg(test)]
mod engine_tests;

pub use catalog::{EffectBehavior, EffectCatalog, EffectKind, EffectScope};
pub use engine::EffectEngine;
pub use handle::{EffectHandle, HandleId};
pub use registry::{EffectRegistry, Removal};

use thiserror::Error;

use crate::entity::EntityId;

/// Why an apply or registration call was rejected.
///
/// Only the operations that create state fail, and they fail before any
/// state changes. Release, cancel and expiry never report errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EffectError {
    /// The kind is in no catalog this engine knows about.
    #[error("unknown effect type `{0}`")]
    UnknownEffectType(EffectKind),

    /// A behavior for this kind already exists.
    #[error("effect type `{0}` is already registered")]
    DuplicateEffectType(EffectKind),

    /// The amount is missing, zero or non-finite for an additive kind,
    /// or present for a boolean one.
    #[error("invalid amount for effect type `{kind}`: {reason}")]
    InvalidAmount {
        kind: EffectKind,
        reason: &'static str,
    },

    /// The duration is negative or non-finite.
    #[error("invalid duration {duration}s: durations must be positive and finite")]
    InvalidDuration { duration: f32 },

    /// No entity with this id is in the roster.
    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),
}
