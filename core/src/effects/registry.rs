//! Per-entity bookkeeping of outstanding effect handles.

use hashbrown::HashMap;

use crate::scheduler::DelayId;

use super::catalog::EffectKind;
use super::handle::HandleId;

#[derive(Debug, Clone, Copy)]
struct HandleRecord {
    amount: Option<f64>,
    delay: Option<DelayId>,
}

/// What `unregister` found, so the caller can revert exactly once.
#[derive(Debug, Clone, Copy)]
pub struct Removal {
    /// True when this was the final outstanding handle of its kind.
    pub last: bool,
    /// The contribution this handle added, for additive kinds.
    pub amount: Option<f64>,
    /// The expiry token still pending on this handle, if any.
    pub delay: Option<DelayId>,
}

/// Live handle records for one entity, grouped by effect kind.
///
/// The registry is pure bookkeeping: it answers "is this kind engaged",
/// "was this the last handle", and "what did this handle contribute",
/// and never touches attributes itself.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    slots: HashMap<EffectKind, HashMap<HandleId, HandleRecord>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a handle. Returns true when this is the first outstanding
    /// handle of its kind, which is the zero to one transition.
    pub(crate) fn register(
        &mut self,
        kind: EffectKind,
        id: HandleId,
        amount: Option<f64>,
        delay: Option<DelayId>,
    ) -> bool {
        let slot = self.slots.entry(kind).or_default();
        let first = slot.is_empty();
        slot.insert(id, HandleRecord { amount, delay });
        first
    }

    /// Removes a handle record. Returns `None` when the handle is not
    /// outstanding, which makes release and cancel idempotent.
    pub(crate) fn unregister(&mut self, kind: &EffectKind, id: HandleId) -> Option<Removal> {
        let slot = self.slots.get_mut(kind)?;
        let record = slot.remove(&id)?;
        let last = slot.is_empty();
        if last {
            self.slots.remove(kind);
        }
        Some(Removal {
            last,
            amount: record.amount,
            delay: record.delay,
        })
    }

    pub(crate) fn set_delay(&mut self, kind: &EffectKind, id: HandleId, delay: DelayId) {
        if let Some(slot) = self.slots.get_mut(kind)
            && let Some(record) = slot.get_mut(&id)
        {
            record.delay = Some(delay);
        }
    }

    /// True while at least one handle of this kind is outstanding.
    pub fn is_engaged(&self, kind: &EffectKind) -> bool {
        self.slots.contains_key(kind)
    }

    pub fn contains(&self, kind: &EffectKind, id: HandleId) -> bool {
        self.slots
            .get(kind)
            .is_some_and(|slot| slot.contains_key(&id))
    }

    /// Number of outstanding handles of this kind.
    pub fn outstanding(&self, kind: &EffectKind) -> usize {
        self.slots.get(kind).map_or(0, HashMap::len)
    }

    /// Net signed offset currently applied to the named attribute.
    pub fn active_shift(&self, attribute: &str) -> f64 {
        self.slots
            .iter()
            .filter(|(kind, _)| matches!(kind, EffectKind::Shift(a) if a == attribute))
            .flat_map(|(_, slot)| slot.values())
            .filter_map(|record| record.amount)
            .sum()
    }

    pub fn engaged_kinds(&self) -> impl Iterator<Item = &EffectKind> {
        self.slots.keys()
    }

    /// Snapshot of every outstanding handle, for mass cancellation.
    pub(crate) fn handles(&self) -> Vec<(EffectKind, HandleId)> {
        self.slots
            .iter()
            .flat_map(|(kind, slot)| slot.keys().map(|id| (kind.clone(), *id)))
            .collect()
    }

    /// Every expiry token still pending across all handles.
    pub(crate) fn pending_delays(&self) -> Vec<DelayId> {
        self.slots
            .values()
            .flat_map(HashMap::values)
            .filter_map(|record| record.delay)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
