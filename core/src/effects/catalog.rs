//! Effect kinds and the behavior table behind them.

use hashbrown::HashMap;

use sigil_types::{AttrValue, CollisionMode, DamageMode, MoveMode, attr, player_flags};

use crate::entity::AttributeStore;

use super::EffectError;
use super::registry::EffectRegistry;

/// Seconds an ignited entity stays alight if nothing extinguishes it first.
const BURN_LIFETIME_SECS: i64 = 3600;

// ─────────────────────────────────────────────────────────────────────────
// Kinds
// ─────────────────────────────────────────────────────────────────────────

/// The kinds of effect the engine arbitrates.
///
/// Built-in kinds carry fixed semantics. `Shift` is additive over the named
/// attribute and exists for every attribute without registration. `Custom`
/// covers kinds adopted at runtime from definition files or host code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Burn,
    Freeze,
    Noclip,
    Fly,
    Paralyze,
    GodMode,
    NoBlock,
    /// Signed offset accumulated on the named attribute.
    Shift(String),
    /// Runtime-registered kind, keyed by its tag.
    Custom(String),
}

impl EffectKind {
    /// Resolves a textual tag to its kind.
    ///
    /// Built-in names map to their variants, so a definition file that
    /// names its effect `"burn"` collides with the built-in instead of
    /// silently shadowing it. `"shift:attr"` selects the additive kind
    /// over `attr`; everything else is a custom tag.
    pub fn parse(tag: &str) -> EffectKind {
        if let Some(attribute) = tag.strip_prefix("shift:")
            && !attribute.is_empty()
        {
            return EffectKind::Shift(attribute.to_owned());
        }
        match tag {
            "burn" => EffectKind::Burn,
            "freeze" => EffectKind::Freeze,
            "noclip" => EffectKind::Noclip,
            "fly" => EffectKind::Fly,
            "paralyze" => EffectKind::Paralyze,
            "godmode" => EffectKind::GodMode,
            "noblock" => EffectKind::NoBlock,
            _ => EffectKind::Custom(tag.to_owned()),
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::Burn => f.write_str("burn"),
            EffectKind::Freeze => f.write_str("freeze"),
            EffectKind::Noclip => f.write_str("noclip"),
            EffectKind::Fly => f.write_str("fly"),
            EffectKind::Paralyze => f.write_str("paralyze"),
            EffectKind::GodMode => f.write_str("godmode"),
            EffectKind::NoBlock => f.write_str("noblock"),
            EffectKind::Shift(attribute) => write!(f, "shift:{attribute}"),
            EffectKind::Custom(tag) => f.write_str(tag),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Scope
// ─────────────────────────────────────────────────────────────────────────

/// Mutable attribute access plus a read-only view of what is engaged.
///
/// Behaviors run against a scope rather than a bare attribute store so
/// that kinds competing for one attribute (movement, most notably) can
/// consult the registry while writing the outcome.
pub struct EffectScope<'a> {
    attrs: &'a mut dyn AttributeStore,
    active: &'a EffectRegistry,
}

impl<'a> EffectScope<'a> {
    pub(crate) fn new(attrs: &'a mut dyn AttributeStore, active: &'a EffectRegistry) -> Self {
        Self { attrs, active }
    }

    pub fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.attrs.attribute(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: AttrValue) {
        self.attrs.set_attribute(name, value);
    }

    /// True while at least one handle of this kind is outstanding.
    pub fn is_engaged(&self, kind: &EffectKind) -> bool {
        self.active.is_engaged(kind)
    }

    /// Offsets a numeric attribute in place. A missing attribute starts
    /// at `0.0`, so shifts can target attributes the store never set.
    pub fn shift_attribute(&mut self, name: &str, delta: f64) {
        let current = self.attrs.attribute(name).unwrap_or(AttrValue::Float(0.0));
        self.attrs.set_attribute(name, current.offset(delta));
    }

    /// Sets or clears one bit in the packed flags attribute.
    pub fn set_flag(&mut self, bit: i64, on: bool) {
        let flags = self
            .attrs
            .attribute(attr::FLAGS)
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        let flags = if on { flags | bit } else { flags & !bit };
        self.attrs.set_attribute(attr::FLAGS, AttrValue::Int(flags));
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Behaviors
// ─────────────────────────────────────────────────────────────────────────

type ToggleFn = Box<dyn Fn(&mut EffectScope<'_>) + Send + Sync>;
type AdjustFn = Box<dyn Fn(&mut EffectScope<'_>, f64) + Send + Sync>;

/// How a kind touches entity attributes.
pub enum EffectBehavior {
    /// Engages on the first outstanding handle and disengages on the
    /// last, regardless of how many pile up in between.
    Toggle { engage: ToggleFn, disengage: ToggleFn },
    /// Applies each handle's signed amount as it arrives and reverts it
    /// piecewise as handles retire.
    Accumulate { adjust: AdjustFn },
}

impl EffectBehavior {
    pub fn toggle(
        engage: impl Fn(&mut EffectScope<'_>) + Send + Sync + 'static,
        disengage: impl Fn(&mut EffectScope<'_>) + Send + Sync + 'static,
    ) -> Self {
        EffectBehavior::Toggle {
            engage: Box::new(engage),
            disengage: Box::new(disengage),
        }
    }

    pub fn accumulate(adjust: impl Fn(&mut EffectScope<'_>, f64) + Send + Sync + 'static) -> Self {
        EffectBehavior::Accumulate {
            adjust: Box::new(adjust),
        }
    }

    /// Toggle that writes one attribute to a fixed value on each edge.
    pub fn set_attribute(attribute: &str, engaged: AttrValue, released: AttrValue) -> Self {
        let on_name = attribute.to_owned();
        let off_name = on_name.clone();
        Self::toggle(
            move |scope| scope.set_attribute(&on_name, engaged),
            move |scope| scope.set_attribute(&off_name, released),
        )
    }

    pub fn is_additive(&self) -> bool {
        matches!(self, EffectBehavior::Accumulate { .. })
    }
}

impl std::fmt::Debug for EffectBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectBehavior::Toggle { .. } => f.write_str("Toggle"),
            EffectBehavior::Accumulate { .. } => f.write_str("Accumulate"),
        }
    }
}

/// Writes the movement mode that wins among the engaged movement kinds.
///
/// Noclip beats freeze beats fly; with none engaged the entity walks.
/// Both edges of every movement kind run this same resolution, so
/// overlapping handles can never strand a stale mode.
fn resolve_move_mode(scope: &mut EffectScope<'_>) {
    let mode = if scope.is_engaged(&EffectKind::Noclip) {
        MoveMode::Noclip
    } else if scope.is_engaged(&EffectKind::Freeze) {
        MoveMode::Frozen
    } else if scope.is_engaged(&EffectKind::Fly) {
        MoveMode::Fly
    } else {
        MoveMode::Walk
    };
    scope.set_attribute(attr::MOVE_MODE, mode.as_attr());
}

fn movement_behavior() -> EffectBehavior {
    EffectBehavior::toggle(resolve_move_mode, resolve_move_mode)
}

// ─────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────

/// Behavior table shared by every entity in a world.
///
/// `Shift` kinds are structural and never live in the table; every other
/// kind must be present before a handle of it can be applied.
#[derive(Debug, Default)]
pub struct EffectCatalog {
    behaviors: HashMap<EffectKind, EffectBehavior>,
}

impl EffectCatalog {
    /// A catalog with no kinds at all, for hosts that define their own set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in effect set.
    pub fn standard() -> Self {
        let mut behaviors = HashMap::new();
        behaviors.insert(
            EffectKind::Burn,
            EffectBehavior::set_attribute(
                attr::IGNITE_LIFETIME,
                AttrValue::Int(BURN_LIFETIME_SECS),
                AttrValue::Int(0),
            ),
        );
        behaviors.insert(EffectKind::Freeze, movement_behavior());
        behaviors.insert(EffectKind::Noclip, movement_behavior());
        behaviors.insert(EffectKind::Fly, movement_behavior());
        behaviors.insert(
            EffectKind::Paralyze,
            EffectBehavior::toggle(
                |scope| scope.set_flag(player_flags::PARALYZED, true),
                |scope| scope.set_flag(player_flags::PARALYZED, false),
            ),
        );
        behaviors.insert(
            EffectKind::GodMode,
            EffectBehavior::set_attribute(
                attr::DAMAGE_MODE,
                DamageMode::Immune.as_attr(),
                DamageMode::Vulnerable.as_attr(),
            ),
        );
        behaviors.insert(
            EffectKind::NoBlock,
            EffectBehavior::set_attribute(
                attr::COLLISION_MODE,
                CollisionMode::Passable.as_attr(),
                CollisionMode::Solid.as_attr(),
            ),
        );
        Self { behaviors }
    }

    /// Adds a kind to the catalog.
    ///
    /// Occupied kinds are rejected, as are `Shift` kinds, whose behavior
    /// is structural and already covers every attribute.
    pub fn register(
        &mut self,
        kind: EffectKind,
        behavior: EffectBehavior,
    ) -> Result<(), EffectError> {
        if matches!(kind, EffectKind::Shift(_)) || self.behaviors.contains_key(&kind) {
            return Err(EffectError::DuplicateEffectType(kind));
        }
        self.behaviors.insert(kind, behavior);
        Ok(())
    }

    pub fn contains(&self, kind: &EffectKind) -> bool {
        matches!(kind, EffectKind::Shift(_)) || self.behaviors.contains_key(kind)
    }

    /// Whether handles of this kind carry amounts that accumulate.
    pub fn is_additive(&self, kind: &EffectKind) -> Result<bool, EffectError> {
        if matches!(kind, EffectKind::Shift(_)) {
            return Ok(true);
        }
        self.behaviors
            .get(kind)
            .map(EffectBehavior::is_additive)
            .ok_or_else(|| EffectError::UnknownEffectType(kind.clone()))
    }

    pub(crate) fn engage(&self, kind: &EffectKind, scope: &mut EffectScope<'_>) {
        if let Some(EffectBehavior::Toggle { engage, .. }) = self.behaviors.get(kind) {
            engage(scope);
        }
    }

    pub(crate) fn disengage(&self, kind: &EffectKind, scope: &mut EffectScope<'_>) {
        if let Some(EffectBehavior::Toggle { disengage, .. }) = self.behaviors.get(kind) {
            disengage(scope);
        }
    }

    pub(crate) fn adjust(&self, kind: &EffectKind, scope: &mut EffectScope<'_>, delta: f64) {
        match kind {
            EffectKind::Shift(attribute) => scope.shift_attribute(attribute, delta),
            _ => {
                if let Some(EffectBehavior::Accumulate { adjust }) = self.behaviors.get(kind) {
                    adjust(scope, delta);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}
