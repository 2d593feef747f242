//! Delay scheduling over game time.
//!
//! The scheduler is a passive ordered queue: it never wakes itself. Whoever
//! drives the simulation calls [`Scheduler::advance_to`] with the current
//! game time and dispatches whatever came due. Entries fire in (due time,
//! insertion) order and never early.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use hashbrown::HashMap;

use crate::effects::EffectHandle;

/// Cancellation token for one pending delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelayId(u64);

impl DelayId {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for DelayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered queue of pending effect expiries.
#[derive(Debug)]
pub struct Scheduler {
    /// Current game time; only moves forward.
    now: NaiveDateTime,

    /// Pending entries keyed by (due time, sequence) so same-instant
    /// entries keep insertion order.
    queue: BTreeMap<(NaiveDateTime, u64), EffectHandle>,

    /// Token -> queue key, for cancellation without a scan.
    index: HashMap<DelayId, (NaiveDateTime, u64)>,

    next_seq: u64,
}

impl Scheduler {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: start,
            queue: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }

    /// The scheduler's current game time.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Number of pending entries.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue `handle` to come due no earlier than `now + delay`.
    ///
    /// Oversized delays clamp to the end of representable time rather
    /// than wrapping.
    pub fn schedule(&mut self, delay: TimeDelta, handle: EffectHandle) -> DelayId {
        let due = self.now.checked_add_signed(delay).unwrap_or(NaiveDateTime::MAX);
        let seq = self.next_seq;
        self.next_seq += 1;

        let id = DelayId::new(seq);
        self.queue.insert((due, seq), handle);
        self.index.insert(id, (due, seq));
        id
    }

    /// Drop a pending entry. Cancelling an entry that already fired, or was
    /// already cancelled, does nothing.
    pub fn cancel(&mut self, id: DelayId) {
        if let Some(key) = self.index.remove(&id) {
            self.queue.remove(&key);
        }
    }

    /// Whether the token still refers to a pending entry.
    pub fn is_pending(&self, id: DelayId) -> bool {
        self.index.contains_key(&id)
    }

    /// Move time forward and take everything that came due.
    ///
    /// Time never moves backward: a stale `now` returns due entries for the
    /// latest time seen so far.
    pub fn advance_to(&mut self, now: NaiveDateTime) -> Vec<EffectHandle> {
        if now > self.now {
            self.now = now;
        }

        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > self.now {
                break;
            }
            let ((_, seq), handle) = entry.remove_entry();
            self.index.remove(&DelayId::new(seq));
            due.push(handle);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectKind, HandleId};
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn handle(n: u64) -> EffectHandle {
        EffectHandle::new(HandleId::new(n), 1, EffectKind::Burn, None)
    }

    #[test]
    fn test_fires_in_due_then_insertion_order() {
        let mut sched = Scheduler::new(start());
        sched.schedule(TimeDelta::seconds(10), handle(1));
        sched.schedule(TimeDelta::seconds(5), handle(2));
        sched.schedule(TimeDelta::seconds(5), handle(3));

        let due = sched.advance_to(start() + TimeDelta::seconds(10));
        let ids: Vec<_> = due.iter().map(|h| h.id()).collect();
        assert_eq!(
            ids,
            vec![HandleId::new(2), HandleId::new(3), HandleId::new(1)],
            "same-instant entries must keep insertion order"
        );
    }

    #[test]
    fn test_never_fires_early() {
        let mut sched = Scheduler::new(start());
        sched.schedule(TimeDelta::seconds(5), handle(1));

        assert!(sched.advance_to(start() + TimeDelta::seconds(4)).is_empty());
        assert_eq!(sched.pending(), 1);

        let due = sched.advance_to(start() + TimeDelta::seconds(5));
        assert_eq!(due.len(), 1, "entry due exactly now must fire");
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut sched = Scheduler::new(start());
        let id = sched.schedule(TimeDelta::seconds(5), handle(1));

        sched.cancel(id);
        assert!(!sched.is_pending(id));
        sched.cancel(id);

        assert!(sched.advance_to(start() + TimeDelta::seconds(60)).is_empty());
    }

    #[test]
    fn test_cancel_after_fire_is_a_no_op() {
        let mut sched = Scheduler::new(start());
        let id = sched.schedule(TimeDelta::seconds(1), handle(1));

        assert_eq!(sched.advance_to(start() + TimeDelta::seconds(2)).len(), 1);
        sched.cancel(id);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_time_never_moves_backward() {
        let mut sched = Scheduler::new(start());
        sched.advance_to(start() + TimeDelta::seconds(30));
        sched.schedule(TimeDelta::seconds(1), handle(1));

        // A stale timestamp must not hide entries already due.
        let due = sched.advance_to(start() + TimeDelta::seconds(31));
        assert_eq!(due.len(), 1);
        assert_eq!(sched.now(), start() + TimeDelta::seconds(31));

        sched.advance_to(start());
        assert_eq!(sched.now(), start() + TimeDelta::seconds(31));
    }

    #[test]
    fn test_oversized_delays_clamp_instead_of_firing() {
        let mut sched = Scheduler::new(start());
        sched.schedule(TimeDelta::MAX, handle(1));

        assert!(sched.advance_to(start() + TimeDelta::days(365)).is_empty());
        assert_eq!(sched.pending(), 1);
    }
}
