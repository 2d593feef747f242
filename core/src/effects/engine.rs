//! Lifecycle driver for effect handles.

use chrono::{NaiveDateTime, TimeDelta};

use crate::entity::{Entity, EntityId, Roster};
use crate::scheduler::{DelayId, Scheduler};

use super::EffectError;
use super::catalog::{EffectBehavior, EffectCatalog, EffectKind};
use super::handle::{EffectHandle, HandleId};

/// Why a handle is being retired, for the log line.
#[derive(Debug, Clone, Copy)]
enum Retire {
    Cancelled,
    Expired,
}

impl Retire {
    fn as_str(self) -> &'static str {
        match self {
            Retire::Cancelled => "cancelled",
            Retire::Expired => "expired",
        }
    }
}

/// Applies, retires and expires effect handles against a roster.
///
/// The engine owns the catalog and the expiry scheduler; the handles it
/// issues are recorded on the entities themselves, so an entity leaving
/// the roster takes its outstanding effects with it.
pub struct EffectEngine {
    catalog: EffectCatalog,
    scheduler: Scheduler,
    next_handle: u64,
}

impl EffectEngine {
    pub fn new(catalog: EffectCatalog, start: NaiveDateTime) -> Self {
        Self {
            catalog,
            scheduler: Scheduler::new(start),
            next_handle: 0,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.scheduler.now()
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    /// Adds a kind to the catalog. See [`EffectCatalog::register`].
    pub fn register(
        &mut self,
        kind: EffectKind,
        behavior: EffectBehavior,
    ) -> Result<(), EffectError> {
        self.catalog.register(kind, behavior)
    }

    /// Number of expiries still waiting to fire.
    pub fn pending_expiries(&self) -> usize {
        self.scheduler.pending()
    }

    pub(crate) fn cancel_delay(&mut self, delay: DelayId) {
        self.scheduler.cancel(delay);
    }

    /// Requests an effect on an entity and returns the handle for it.
    ///
    /// Validation is synchronous and complete before any state changes:
    /// the kind must be known, additive kinds need a non-zero finite
    /// amount while boolean kinds take none, and a duration must be
    /// positive and finite. A missing or zero duration means the handle
    /// lasts until released.
    pub fn apply(
        &mut self,
        entity: &mut Entity,
        kind: EffectKind,
        duration: Option<f32>,
        amount: Option<f64>,
    ) -> Result<EffectHandle, EffectError> {
        let additive = self.catalog.is_additive(&kind)?;

        if additive {
            match amount {
                Some(value) if value.is_finite() && value != 0.0 => {}
                _ => {
                    return Err(EffectError::InvalidAmount {
                        kind,
                        reason: "additive effects need a non-zero finite amount",
                    });
                }
            }
        } else if amount.is_some() {
            return Err(EffectError::InvalidAmount {
                kind,
                reason: "boolean effects do not take an amount",
            });
        }

        let expiry = match duration {
            None => None,
            Some(secs) if secs == 0.0 => None,
            Some(secs) if secs > 0.0 && secs.is_finite() => {
                Some(TimeDelta::milliseconds((f64::from(secs) * 1000.0).round() as i64))
            }
            Some(secs) => return Err(EffectError::InvalidDuration { duration: secs }),
        };

        self.next_handle += 1;
        let id = HandleId::new(self.next_handle);
        let mut handle = EffectHandle::new(id, entity.id(), kind.clone(), amount);

        let first = entity.effects_mut().register(kind.clone(), id, amount, None);
        if let Some(value) = amount {
            self.catalog.adjust(&kind, &mut entity.effect_scope(), value);
        } else if first {
            self.catalog.engage(&kind, &mut entity.effect_scope());
        }

        if let Some(delta) = expiry {
            let delay = self.scheduler.schedule(delta, handle.clone());
            handle.set_delay(delay);
            entity.effects_mut().set_delay(&kind, id, delay);
        }

        tracing::debug!(
            "applied {kind} to entity {} as handle {id}{}",
            entity.id(),
            if expiry.is_some() { " (timed)" } else { "" },
        );
        Ok(handle)
    }

    /// Retires one handle, reverting its share of the effect.
    ///
    /// Never fails: a handle that already retired, or whose entity is
    /// gone, is simply a no-op.
    pub fn release(&mut self, roster: &mut Roster, handle: &EffectHandle) {
        self.retire(roster, handle, Retire::Cancelled);
    }

    /// Same as [`release`](Self::release); reads better at call sites
    /// that abort an effect rather than finish with it.
    pub fn cancel(&mut self, roster: &mut Roster, handle: &EffectHandle) {
        self.retire(roster, handle, Retire::Cancelled);
    }

    /// Retires every outstanding handle on one entity.
    pub fn cancel_all(&mut self, roster: &mut Roster, entity_id: EntityId) {
        let Some(entity) = roster.get(entity_id) else {
            return;
        };
        for (kind, id) in entity.effects().handles() {
            let handle = EffectHandle::new(id, entity_id, kind, None);
            self.retire(roster, &handle, Retire::Cancelled);
        }
    }

    /// Advances the clock and expires every handle that came due.
    pub fn tick(&mut self, roster: &mut Roster, now: NaiveDateTime) {
        for handle in self.scheduler.advance_to(now) {
            self.retire(roster, &handle, Retire::Expired);
        }
    }

    /// True while the handle is still outstanding on a live entity.
    pub fn is_active(&self, roster: &Roster, handle: &EffectHandle) -> bool {
        roster
            .get(handle.entity())
            .is_some_and(|entity| entity.effects().contains(handle.kind(), handle.id()))
    }

    fn retire(&mut self, roster: &mut Roster, handle: &EffectHandle, cause: Retire) {
        let Some(entity) = roster.get_mut(handle.entity()) else {
            tracing::debug!(
                "handle {} outlived entity {}; {} without it",
                handle.id(),
                handle.entity(),
                cause.as_str(),
            );
            return;
        };
        let Some(removal) = entity
            .effects_mut()
            .unregister(handle.kind(), handle.id())
        else {
            // Already retired; double release and cancel-after-expiry land here.
            return;
        };

        if let Some(delay) = removal.delay {
            self.scheduler.cancel(delay);
        }

        if let Some(amount) = removal.amount {
            self.catalog
                .adjust(handle.kind(), &mut entity.effect_scope(), -amount);
        } else if removal.last {
            self.catalog
                .disengage(handle.kind(), &mut entity.effect_scope());
        }

        tracing::debug!(
            "handle {} ({}) on entity {} {}",
            handle.id(),
            handle.kind(),
            handle.entity(),
            cause.as_str(),
        );
    }
}
