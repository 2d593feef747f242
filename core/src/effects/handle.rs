//! Effect handles.

use crate::entity::EntityId;
use crate::scheduler::DelayId;

use super::catalog::EffectKind;

/// Identifier of one outstanding effect request, unique per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One outstanding request for an effect on one entity.
///
/// Returned by apply; passed back to release or cancel. Cloning does not
/// create a second request: every clone names the same registration, and
/// the registration itself lives on the entity, so a handle whose entity
/// is gone is simply inert.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectHandle {
    id: HandleId,
    entity: EntityId,
    kind: EffectKind,
    amount: Option<f64>,
    delay: Option<DelayId>,
}

impl EffectHandle {
    pub(crate) fn new(
        id: HandleId,
        entity: EntityId,
        kind: EffectKind,
        amount: Option<f64>,
    ) -> Self {
        Self {
            id,
            entity,
            kind,
            amount,
            delay: None,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn kind(&self) -> &EffectKind {
        &self.kind
    }

    /// Signed contribution for additive kinds, `None` for boolean kinds.
    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    /// Expiry token, present only on timed handles.
    pub fn delay(&self) -> Option<DelayId> {
        self.delay
    }

    pub(crate) fn set_delay(&mut self, delay: DelayId) {
        self.delay = Some(delay);
    }
}
