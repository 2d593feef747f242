//! Lifecycle tests for the effect engine.
//!
//! Exercises refcounted engagement, timed expiry, additive stacking and
//! the ways handles outlive their entities.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use sigil_types::{AttrValue, DamageMode, MoveMode, attr};

use crate::entity::{Entity, EntityId, MemoryAttributes};
use crate::world::World;

use super::{EffectBehavior, EffectError, EffectKind};

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 4)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn after(secs: f64) -> NaiveDateTime {
    start() + TimeDelta::milliseconds((secs * 1000.0) as i64)
}

fn make_world() -> World {
    World::new(start())
}

fn spawn_player(world: &mut World, id: EntityId) {
    world.add_entity(Entity::player(
        id,
        MemoryAttributes::new()
            .with(attr::GRAVITY, 1.0)
            .with(attr::HEALTH, 100_i64),
    ));
}

fn attribute(world: &World, id: EntityId, name: &str) -> Option<AttrValue> {
    world.entity(id).unwrap().attribute(name)
}

/// Registers a kind whose edges count into attributes, so a double
/// engage or disengage shows up as a count of two.
fn register_counter(world: &mut World) -> EffectKind {
    let kind = EffectKind::Custom("counted".into());
    world
        .register_effect(
            kind.clone(),
            EffectBehavior::toggle(
                |scope| {
                    let n = scope
                        .attribute("engaged_edges")
                        .and_then(|v| v.as_i64())
                        .unwrap_or(0);
                    scope.set_attribute("engaged_edges", AttrValue::Int(n + 1));
                },
                |scope| {
                    let n = scope
                        .attribute("released_edges")
                        .and_then(|v| v.as_i64())
                        .unwrap_or(0);
                    scope.set_attribute("released_edges", AttrValue::Int(n + 1));
                },
            ),
        )
        .unwrap();
    kind
}

// ─────────────────────────────────────────────────────────────────────────────
// Refcounted engagement
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_overlapping_requests_engage_exactly_once() {
    let mut world = make_world();
    spawn_player(&mut world, 1);
    let kind = register_counter(&mut world);

    let a = world.apply(1, kind.clone(), None, None).unwrap();
    let b = world.apply(1, kind.clone(), None, None).unwrap();
    let c = world.apply(1, kind, None, None).unwrap();
    assert_eq!(
        attribute(&world, 1, "engaged_edges"),
        Some(AttrValue::Int(1)),
        "three requests, one engagement"
    );

    world.release(&b);
    world.release(&a);
    assert_eq!(
        attribute(&world, 1, "released_edges"),
        None,
        "two of three released, nothing disengages"
    );

    world.release(&c);
    assert_eq!(attribute(&world, 1, "released_edges"), Some(AttrValue::Int(1)));
    assert_eq!(attribute(&world, 1, "engaged_edges"), Some(AttrValue::Int(1)));
}

#[test]
fn test_godmode_holds_until_the_last_release() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let a = world.apply(1, EffectKind::GodMode, None, None).unwrap();
    let b = world.apply(1, EffectKind::GodMode, None, None).unwrap();
    assert_eq!(
        attribute(&world, 1, attr::DAMAGE_MODE),
        Some(DamageMode::Immune.as_attr()),
    );

    world.release(&a);
    assert_eq!(
        attribute(&world, 1, attr::DAMAGE_MODE),
        Some(DamageMode::Immune.as_attr()),
        "one handle still outstanding"
    );

    world.release(&b);
    assert_eq!(
        attribute(&world, 1, attr::DAMAGE_MODE),
        Some(DamageMode::Vulnerable.as_attr()),
    );
}

#[test]
fn test_double_release_is_a_no_op() {
    let mut world = make_world();
    spawn_player(&mut world, 1);
    let kind = register_counter(&mut world);

    let a = world.apply(1, kind.clone(), None, None).unwrap();
    let b = world.apply(1, kind, None, None).unwrap();

    world.release(&a);
    world.release(&a);
    assert_eq!(
        attribute(&world, 1, "released_edges"),
        None,
        "releasing a retired handle must not disengage the survivor"
    );
    assert!(world.is_active(&b));
}

#[test]
fn test_a_kind_re_engages_after_full_release() {
    let mut world = make_world();
    spawn_player(&mut world, 1);
    let kind = register_counter(&mut world);

    let first = world.apply(1, kind.clone(), None, None).unwrap();
    world.release(&first);
    world.apply(1, kind, None, None).unwrap();

    assert_eq!(attribute(&world, 1, "engaged_edges"), Some(AttrValue::Int(2)));
    assert_eq!(attribute(&world, 1, "released_edges"), Some(AttrValue::Int(1)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Timed expiry
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_timed_effect_expires_on_tick() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    world.apply(1, EffectKind::Burn, Some(30.0), None).unwrap();
    assert_eq!(
        attribute(&world, 1, attr::IGNITE_LIFETIME),
        Some(AttrValue::Int(3600)),
    );

    world.tick(after(29.0));
    assert_eq!(
        attribute(&world, 1, attr::IGNITE_LIFETIME),
        Some(AttrValue::Int(3600)),
        "not due yet"
    );

    world.tick(after(30.0));
    assert_eq!(attribute(&world, 1, attr::IGNITE_LIFETIME), Some(AttrValue::Int(0)));
    assert!(world.entity(1).unwrap().effects().is_empty());
    assert_eq!(world.pending_expiries(), 0);
}

#[test]
fn test_a_timed_handle_expiring_under_a_permanent_one_changes_nothing() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let held = world.apply(1, EffectKind::Freeze, None, None).unwrap();
    let timed = world.apply(1, EffectKind::Freeze, Some(5.0), None).unwrap();

    world.tick(after(5.0));
    assert!(!world.is_active(&timed));
    assert_eq!(
        attribute(&world, 1, attr::MOVE_MODE),
        Some(MoveMode::Frozen.as_attr()),
        "the permanent handle keeps the freeze engaged"
    );

    world.release(&held);
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Walk.as_attr()));
}

#[test]
fn test_cancelled_expiry_cannot_retire_a_later_handle() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let first = world.apply(1, EffectKind::Freeze, Some(60.0), None).unwrap();
    world.tick(after(10.0));
    world.cancel(&first);
    assert_eq!(
        attribute(&world, 1, attr::MOVE_MODE),
        Some(MoveMode::Walk.as_attr()),
    );

    let second = world.apply(1, EffectKind::Freeze, None, None).unwrap();
    world.tick(after(120.0));

    assert!(world.is_active(&second), "the cancelled timer must not fire");
    assert_eq!(
        attribute(&world, 1, attr::MOVE_MODE),
        Some(MoveMode::Frozen.as_attr()),
    );
}

#[test]
fn test_expiry_after_release_is_a_no_op() {
    let mut world = make_world();
    spawn_player(&mut world, 1);
    let kind = register_counter(&mut world);

    let handle = world.apply(1, kind, Some(30.0), None).unwrap();
    world.release(&handle);
    world.tick(after(31.0));

    assert_eq!(attribute(&world, 1, "engaged_edges"), Some(AttrValue::Int(1)));
    assert_eq!(
        attribute(&world, 1, "released_edges"),
        Some(AttrValue::Int(1)),
        "expiry of a released handle must not disengage again"
    );
}

#[test]
fn test_zero_or_missing_duration_means_permanent() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let explicit = world.apply(1, EffectKind::Burn, Some(0.0), None).unwrap();
    let implicit = world.apply(1, EffectKind::GodMode, None, None).unwrap();
    assert_eq!(world.pending_expiries(), 0);
    assert!(explicit.delay().is_none());

    world.tick(after(1_000_000.0));
    assert!(world.is_active(&explicit));
    assert!(world.is_active(&implicit));
}

// ─────────────────────────────────────────────────────────────────────────────
// Additive shifts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_shifts_accumulate_and_revert_piecewise() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let big = world.shift(1, attr::GRAVITY, None, 50.0).unwrap();
    let small = world.shift(1, attr::GRAVITY, None, 30.0).unwrap();
    assert_eq!(attribute(&world, 1, attr::GRAVITY), Some(AttrValue::Float(81.0)));
    assert_eq!(world.active_shift(1, attr::GRAVITY), 80.0);

    world.release(&big);
    assert_eq!(attribute(&world, 1, attr::GRAVITY), Some(AttrValue::Float(31.0)));

    world.release(&small);
    assert_eq!(
        attribute(&world, 1, attr::GRAVITY),
        Some(AttrValue::Float(1.0)),
        "baseline restored exactly"
    );
    assert_eq!(world.active_shift(1, attr::GRAVITY), 0.0);
}

#[test]
fn test_timed_shift_reverts_on_expiry() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    world.shift(1, "speed", Some(10.0), 25.0).unwrap();
    assert_eq!(attribute(&world, 1, "speed"), Some(AttrValue::Float(25.0)));

    world.tick(after(10.0));
    assert_eq!(attribute(&world, 1, "speed"), Some(AttrValue::Float(0.0)));
}

#[test]
fn test_integer_attributes_shift_and_restore() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let handle = world.shift(1, attr::HEALTH, None, -30.0).unwrap();
    assert_eq!(attribute(&world, 1, attr::HEALTH), Some(AttrValue::Int(70)));

    world.release(&handle);
    assert_eq!(attribute(&world, 1, attr::HEALTH), Some(AttrValue::Int(100)));
}

#[test]
fn test_a_huge_shift_saturates_instead_of_overflowing() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    // 1e19 is finite and non-zero, so validation lets it through.
    let handle = world.shift(1, attr::HEALTH, None, 1.0e19).unwrap();
    assert_eq!(
        attribute(&world, 1, attr::HEALTH),
        Some(AttrValue::Int(i64::MAX)),
        "the shift pins the value to the rail"
    );

    world.release(&handle);
    assert!(world.entity(1).unwrap().effects().is_empty());
    assert_eq!(
        attribute(&world, 1, attr::HEALTH),
        Some(AttrValue::Int(-1)),
        "reverting a saturated shift cannot restore the baseline"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_amount_validation() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    for amount in [None, Some(0.0), Some(f64::NAN), Some(f64::INFINITY)] {
        let err = world
            .apply(1, EffectKind::Shift(attr::GRAVITY.into()), None, amount)
            .unwrap_err();
        assert!(
            matches!(err, EffectError::InvalidAmount { .. }),
            "amount {amount:?} must be rejected"
        );
    }

    let err = world.apply(1, EffectKind::GodMode, None, Some(2.0)).unwrap_err();
    assert!(matches!(err, EffectError::InvalidAmount { .. }));
    assert_eq!(
        attribute(&world, 1, attr::DAMAGE_MODE),
        None,
        "rejected requests leave no trace"
    );
}

#[test]
fn test_duration_validation() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    for duration in [-1.0_f32, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let err = world
            .apply(1, EffectKind::Burn, Some(duration), None)
            .unwrap_err();
        assert!(
            matches!(err, EffectError::InvalidDuration { .. }),
            "duration {duration} must be rejected"
        );
    }
    assert!(world.entity(1).unwrap().effects().is_empty());
}

#[test]
fn test_unknown_kind_and_entity_are_rejected() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let err = world
        .apply(1, EffectKind::Custom("nosuch".into()), None, None)
        .unwrap_err();
    assert_eq!(
        err,
        EffectError::UnknownEffectType(EffectKind::Custom("nosuch".into())),
    );

    let err = world.apply(99, EffectKind::Burn, None, None).unwrap_err();
    assert_eq!(err, EffectError::UnknownEntity(99));
}

// ─────────────────────────────────────────────────────────────────────────────
// Entities leaving
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_handles_outlive_their_entity_silently() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let timed = world.apply(1, EffectKind::Burn, Some(30.0), None).unwrap();
    let held = world.apply(1, EffectKind::Freeze, None, None).unwrap();
    assert_eq!(world.pending_expiries(), 1);

    world.remove_entity(1);
    assert_eq!(world.pending_expiries(), 0, "removal cancels pending expiries");

    world.tick(after(60.0));
    world.release(&held);
    world.release(&timed);
    assert!(!world.is_active(&held));
    assert!(!world.is_active(&timed));
}

#[test]
fn test_cancel_all_retires_everything_at_once() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    world.apply(1, EffectKind::Freeze, None, None).unwrap();
    world.apply(1, EffectKind::GodMode, Some(120.0), None).unwrap();
    world.shift(1, attr::GRAVITY, None, 0.5).unwrap();
    world.shift(1, attr::GRAVITY, None, 0.25).unwrap();

    world.cancel_all(1);

    let entity = world.entity(1).unwrap();
    assert!(entity.effects().is_empty());
    assert_eq!(entity.attribute(attr::MOVE_MODE), Some(MoveMode::Walk.as_attr()));
    assert_eq!(
        entity.attribute(attr::DAMAGE_MODE),
        Some(DamageMode::Vulnerable.as_attr()),
    );
    assert_eq!(entity.attribute(attr::GRAVITY), Some(AttrValue::Float(1.0)));
    assert_eq!(world.pending_expiries(), 0);
}

#[test]
fn test_respawning_an_id_drops_the_old_entitys_state() {
    let mut world = make_world();
    spawn_player(&mut world, 1);
    world.apply(1, EffectKind::Burn, Some(30.0), None).unwrap();

    spawn_player(&mut world, 1);
    assert_eq!(world.pending_expiries(), 0);
    assert!(world.entity(1).unwrap().effects().is_empty());
    assert_eq!(attribute(&world, 1, attr::IGNITE_LIFETIME), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Arbitration and introspection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_overlapping_movement_effects_pick_the_strongest() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let fly = world.apply(1, EffectKind::Fly, None, None).unwrap();
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Fly.as_attr()));

    let freeze = world.apply(1, EffectKind::Freeze, None, None).unwrap();
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Frozen.as_attr()));

    let noclip = world.apply(1, EffectKind::Noclip, None, None).unwrap();
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Noclip.as_attr()));

    world.release(&noclip);
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Frozen.as_attr()));
    world.release(&freeze);
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Fly.as_attr()));
    world.release(&fly);
    assert_eq!(attribute(&world, 1, attr::MOVE_MODE), Some(MoveMode::Walk.as_attr()));
}

#[test]
fn test_is_active_tracks_the_whole_lifecycle() {
    let mut world = make_world();
    spawn_player(&mut world, 1);

    let held = world.apply(1, EffectKind::GodMode, None, None).unwrap();
    let timed = world.apply(1, EffectKind::Burn, Some(5.0), None).unwrap();
    assert!(world.is_active(&held));
    assert!(world.is_active(&timed));

    world.tick(after(5.0));
    assert!(!world.is_active(&timed), "expired");
    assert!(world.is_active(&held));

    world.release(&held);
    assert!(!world.is_active(&held), "released");
}
