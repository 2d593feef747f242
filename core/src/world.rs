//! The world facade.
//!
//! A [`World`] owns the roster, the effect engine and the per-class reset
//! lists, and is the single entry point hosts drive: spawn and remove
//! entities, apply and retire effects, feed raw events in, advance time,
//! and drain the per-player notices that fall out.

use chrono::NaiveDateTime;
use hashbrown::HashMap;

use crate::config::DefinitionFile;
use crate::effects::{
    EffectBehavior, EffectCatalog, EffectEngine, EffectError, EffectHandle, EffectKind,
};
use crate::entity::{Entity, EntityId, Roster};
use crate::events::{GameEvent, PlayerNotice, expand};
use crate::resets::ResetList;

pub struct World {
    roster: Roster,
    engine: EffectEngine,
    resets: HashMap<String, ResetList>,
    notices: Vec<PlayerNotice>,
}

impl World {
    /// A world with the built-in effect set and stock player resets.
    pub fn new(start: NaiveDateTime) -> Self {
        let mut world = Self::with_catalog(EffectCatalog::standard(), start);
        world.set_reset_list("player", ResetList::standard_player());
        world
    }

    /// A world over a caller-supplied catalog, with no reset lists.
    pub fn with_catalog(catalog: EffectCatalog, start: NaiveDateTime) -> Self {
        Self {
            roster: Roster::new(),
            engine: EffectEngine::new(catalog, start),
            resets: HashMap::new(),
            notices: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────
    // Roster
    // ─────────────────────────────────────────────────────────────────

    /// Adds an entity. An entity already holding this id is removed
    /// first, pending expiries included.
    pub fn add_entity(&mut self, entity: Entity) {
        let id = entity.id();
        if self.roster.contains(id) {
            self.remove_entity(id);
        }
        tracing::debug!("entity {id} joined as class `{}`", entity.class());
        self.roster.insert(entity);
    }

    /// Removes an entity outright: its pending expiries are cancelled
    /// and its outstanding handles vanish with it, attributes untouched.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.roster.discard(id) else {
            return false;
        };
        for delay in entity.effects().pending_delays() {
            self.engine.cancel_delay(delay);
        }
        tracing::debug!(
            "entity {id} removed with {} outstanding handles",
            entity.effects().len(),
        );
        true
    }

    /// Removes every entity the way [`remove_entity`](Self::remove_entity)
    /// does, one roster-wide sweep.
    pub fn clear_entities(&mut self) {
        for entity in self.roster.iter() {
            for delay in entity.effects().pending_delays() {
                self.engine.cancel_delay(delay);
            }
        }
        tracing::debug!("discarding all {} entities", self.roster.len());
        self.roster.clear();
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.roster.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.roster.get_mut(id)
    }

    /// Like [`entity`](Self::entity), but a missing id is the caller's
    /// error rather than an empty result.
    pub fn lookup(&self, id: EntityId) -> Result<&Entity, EffectError> {
        self.roster.lookup(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.roster.iter()
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.roster.ids()
    }

    pub fn entity_count(&self) -> usize {
        self.roster.len()
    }

    // ─────────────────────────────────────────────────────────────────
    // Effects
    // ─────────────────────────────────────────────────────────────────

    /// Requests an effect on an entity. See [`EffectEngine::apply`].
    pub fn apply(
        &mut self,
        id: EntityId,
        kind: EffectKind,
        duration: Option<f32>,
        amount: Option<f64>,
    ) -> Result<EffectHandle, EffectError> {
        let entity = self.roster.lookup_mut(id)?;
        self.engine.apply(entity, kind, duration, amount)
    }

    /// Requests a signed offset on one attribute of an entity.
    pub fn shift(
        &mut self,
        id: EntityId,
        attribute: impl Into<String>,
        duration: Option<f32>,
        amount: f64,
    ) -> Result<EffectHandle, EffectError> {
        self.apply(id, EffectKind::Shift(attribute.into()), duration, Some(amount))
    }

    /// Retires one handle. Never fails.
    pub fn release(&mut self, handle: &EffectHandle) {
        self.engine.release(&mut self.roster, handle);
    }

    /// Same as [`release`](Self::release), for call sites that abort.
    pub fn cancel(&mut self, handle: &EffectHandle) {
        self.engine.cancel(&mut self.roster, handle);
    }

    /// Retires every outstanding handle on one entity.
    pub fn cancel_all(&mut self, id: EntityId) {
        self.engine.cancel_all(&mut self.roster, id);
    }

    pub fn is_active(&self, handle: &EffectHandle) -> bool {
        self.engine.is_active(&self.roster, handle)
    }

    /// Net signed offset currently applied to one attribute.
    pub fn active_shift(&self, id: EntityId, attribute: &str) -> f64 {
        self.roster
            .get(id)
            .map_or(0.0, |entity| entity.effects().active_shift(attribute))
    }

    /// Adds a kind to the catalog. See [`EffectCatalog::register`].
    pub fn register_effect(
        &mut self,
        kind: EffectKind,
        behavior: EffectBehavior,
    ) -> Result<(), EffectError> {
        self.engine.register(kind, behavior)
    }

    pub fn catalog(&self) -> &EffectCatalog {
        self.engine.catalog()
    }

    // ─────────────────────────────────────────────────────────────────
    // Time
    // ─────────────────────────────────────────────────────────────────

    pub fn now(&self) -> NaiveDateTime {
        self.engine.now()
    }

    pub fn pending_expiries(&self) -> usize {
        self.engine.pending_expiries()
    }

    /// Advances the clock, expiring every handle that came due.
    pub fn tick(&mut self, now: NaiveDateTime) {
        self.engine.tick(&mut self.roster, now);
    }

    // ─────────────────────────────────────────────────────────────────
    // Resets and definitions
    // ─────────────────────────────────────────────────────────────────

    pub fn set_reset_list(&mut self, class: impl Into<String>, list: ResetList) {
        self.resets.insert(class.into(), list);
    }

    pub fn reset_list(&self, class: &str) -> Option<&ResetList> {
        self.resets.get(class)
    }

    /// Folds a definition file into the running world.
    ///
    /// Effect entries become catalog kinds; entries whose tag collides
    /// with a registered kind are skipped and reported back. Reset
    /// entries append to their class list, creating it if needed.
    pub fn adopt_definitions(&mut self, file: &DefinitionFile) -> Vec<String> {
        let mut duplicates = Vec::new();
        for def in &file.effects {
            let kind = EffectKind::parse(&def.tag);
            let behavior = EffectBehavior::set_attribute(&def.attribute, def.engaged, def.released);
            if let Err(e) = self.engine.register(kind, behavior) {
                tracing::warn!("skipping definition `{}`: {e}", def.tag);
                duplicates.push(def.tag.clone());
            }
        }
        for def in &file.resets {
            self.resets
                .entry(def.class.clone())
                .or_default()
                .push(&def.attribute, def.value);
        }
        if !file.effects.is_empty() || !file.resets.is_empty() {
            tracing::info!(
                "adopted {} effect and {} reset definitions",
                file.effects.len() - duplicates.len(),
                file.resets.len(),
            );
        }
        duplicates
    }

    // ─────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────

    /// Feeds one raw event through expansion and world policy.
    ///
    /// The resulting per-player notices queue up until
    /// [`take_notices`](Self::take_notices) drains them.
    pub fn dispatch(&mut self, event: &GameEvent) {
        for notice in expand(event) {
            self.apply_policy(&notice);
            self.notices.push(notice);
        }
    }

    /// Drains the queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<PlayerNotice> {
        std::mem::take(&mut self.notices)
    }

    fn apply_policy(&mut self, notice: &PlayerNotice) {
        match *notice {
            // Death retires the player's effects first, so their reverts
            // cannot clobber the stock values the reset list writes next.
            PlayerNotice::Death { player, .. } => {
                self.engine.cancel_all(&mut self.roster, player);
                if let Some(entity) = self.roster.get_mut(player) {
                    entity.restrictions_mut().clear();
                    if let Some(list) = self.resets.get(entity.class()) {
                        list.apply_to(entity);
                    }
                }
            }
            PlayerNotice::Disconnect { player, .. } => {
                self.engine.cancel_all(&mut self.roster, player);
                self.remove_entity(player);
            }
            PlayerNotice::LevelShutdown { .. } => self.clear_entities(),
            _ => {}
        }
    }
}
