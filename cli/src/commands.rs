use crate::state::CliState;
use sigil_core::config;
use sigil_core::{EffectKind, Entity, EntityId, GameEvent, MemoryAttributes, World};
use sigil_types::attr;
use sigil_types::formatting::format_signed;
use sigil_types::modes::{CollisionMode, DamageMode, MoveMode};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Load effect and reset definitions from the per-user directory plus any
/// extra directory named in the settings.
pub async fn adopt_definitions(state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;

    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(dir) = config::default_user_dir() {
        dirs.push(dir);
    }
    if let Some(extra) = &s.settings.definitions_dir {
        dirs.push(PathBuf::from(extra));
    }

    for dir in dirs {
        if !dir.exists() {
            continue;
        }
        match config::load_dir(&dir) {
            Ok(files) => {
                let count = files.len();
                for file in &files {
                    for tag in s.world.adopt_definitions(file) {
                        println!("duplicate definition `{tag}` skipped");
                    }
                }
                if count > 0 {
                    println!("adopted {count} definition files from {}", dir.display());
                }
            }
            Err(e) => println!("{e}"),
        }
    }
}

pub async fn spawn(id: EntityId, class: &Option<String>, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    let attrs = MemoryAttributes::new()
        .with(attr::GRAVITY, 1.0)
        .with(attr::HEALTH, 100_i64);
    let entity = match class {
        Some(class) => Entity::new(id, class.as_str(), attrs),
        None => Entity::player(id, attrs),
    };
    let class = entity.class().to_string();
    s.world.add_entity(entity);
    println!("spawned entity {id} ({class})");
}

pub async fn despawn(id: EntityId, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    if s.world.remove_entity(id) {
        s.handles.retain(|_, handle| handle.entity() != id);
        println!("despawned entity {id}");
    } else {
        println!("no entity {id}");
    }
}

pub async fn apply(
    id: EntityId,
    effect: &str,
    duration: Option<f32>,
    amount: Option<f64>,
    state: Arc<RwLock<CliState>>,
) {
    let mut s = state.write().await;
    let kind = EffectKind::parse(effect);
    match s.world.apply(id, kind.clone(), duration, amount) {
        Ok(handle) => {
            let tag = s.track(handle);
            println!("handle {tag}: {kind} on entity {id}");
        }
        Err(e) => println!("error: {e}"),
    }
}

pub async fn shift(
    id: EntityId,
    attribute: &str,
    amount: f64,
    duration: Option<f32>,
    state: Arc<RwLock<CliState>>,
) {
    let mut s = state.write().await;
    match s.world.shift(id, attribute, duration, amount) {
        Ok(handle) => {
            let tag = s.track(handle);
            println!(
                "handle {tag}: shift:{attribute} {} on entity {id}",
                format_signed(amount)
            );
        }
        Err(e) => println!("error: {e}"),
    }
}

pub async fn cancel(handle_id: u64, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    match s.handles.remove(&handle_id) {
        Some(handle) => {
            s.world.cancel(&handle);
            println!("cancelled handle {handle_id}");
        }
        None => println!("no handle {handle_id}"),
    }
}

pub async fn cancel_all(id: EntityId, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    if s.world.entity(id).is_none() {
        println!("no entity {id}");
        return;
    }
    s.world.cancel_all(id);
    let before = s.handles.len();
    s.handles.retain(|_, handle| handle.entity() != id);
    println!(
        "cancelled {} handles on entity {id}",
        before - s.handles.len()
    );
}

/// Print one entity, or the roster when no id is given.
pub async fn show(id: Option<EntityId>, state: Arc<RwLock<CliState>>) {
    let s = state.read().await;
    match id {
        Some(id) => match s.world.entity(id) {
            Some(entity) => print_entity(entity),
            None => println!("no entity {id}"),
        },
        None => {
            let mut ids = s.world.entity_ids();
            ids.sort_unstable();
            println!("{} entities", ids.len());
            for id in ids {
                if let Some(entity) = s.world.entity(id) {
                    println!("  {id} ({})", entity.class());
                }
            }
        }
    }
}

pub async fn restrict(id: EntityId, action: &str, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    match s.world.entity_mut(id) {
        Some(entity) => {
            if entity.restrictions_mut().restrict(action) {
                println!("restricted `{action}` on entity {id}");
            } else {
                println!("entity {id} already restricts `{action}`");
            }
        }
        None => println!("no entity {id}"),
    }
}

pub async fn unrestrict(id: EntityId, action: &str, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    match s.world.entity_mut(id) {
        Some(entity) => {
            if entity.restrictions_mut().unrestrict(action) {
                println!("lifted `{action}` on entity {id}");
            } else {
                println!("entity {id} does not restrict `{action}`");
            }
        }
        None => println!("no entity {id}"),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Host event simulation
// ─────────────────────────────────────────────────────────────────────

pub async fn event_spawn(player: EntityId, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::PlayerSpawn {
        user_id: player,
        timestamp,
    });
    print_notices(&mut s.world);
}

pub async fn event_jump(player: EntityId, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::PlayerJump {
        user_id: player,
        timestamp,
    });
    print_notices(&mut s.world);
}

pub async fn event_disconnect(player: EntityId, state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::PlayerDisconnect {
        user_id: player,
        timestamp,
    });
    s.handles.retain(|_, handle| handle.entity() != player);
    print_notices(&mut s.world);
}

pub async fn event_hurt(
    victim: EntityId,
    damage: i64,
    attacker: Option<EntityId>,
    state: Arc<RwLock<CliState>>,
) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::PlayerHurt {
        attacker,
        victim,
        damage,
        timestamp,
    });
    print_notices(&mut s.world);
}

pub async fn event_death(
    victim: EntityId,
    attacker: Option<EntityId>,
    state: Arc<RwLock<CliState>>,
) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::PlayerDeath {
        attacker,
        victim,
        timestamp,
    });
    s.handles.retain(|_, handle| handle.entity() != victim);
    print_notices(&mut s.world);
}

pub async fn event_blind(
    victim: EntityId,
    duration: f32,
    attacker: Option<EntityId>,
    state: Arc<RwLock<CliState>>,
) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::PlayerBlind {
        attacker,
        victim,
        duration,
        timestamp,
    });
    print_notices(&mut s.world);
}

pub async fn event_shutdown(state: Arc<RwLock<CliState>>) {
    let mut s = state.write().await;
    let timestamp = s.world.now();
    s.world.dispatch(&GameEvent::LevelShutdown { timestamp });
    s.handles.clear();
    print_notices(&mut s.world);
}

pub async fn show_time(state: Arc<RwLock<CliState>>) {
    let s = state.read().await;
    println!("world clock {}", s.world.now().format("%Y-%m-%d %H:%M:%S"));
    println!(
        "{} entities, {} pending expiries",
        s.world.entity_count(),
        s.world.pending_expiries()
    );
}

pub fn quit() {
    println!("quitting...");
}

fn print_notices(world: &mut World) {
    for notice in world.take_notices() {
        println!("[{}] {notice}", notice.timestamp().format("%H:%M:%S"));
    }
}

fn print_entity(entity: &Entity) {
    println!("entity {} ({})", entity.id(), entity.class());

    let named = [
        attr::HEALTH,
        attr::GRAVITY,
        attr::MOVE_MODE,
        attr::DAMAGE_MODE,
        attr::COLLISION_MODE,
        attr::FLAGS,
        attr::IGNITE_LIFETIME,
    ];
    for name in named {
        let Some(value) = entity.attribute(name) else {
            continue;
        };
        match name {
            attr::MOVE_MODE => println!("  {name} = {}", MoveMode::from_attr(value)),
            attr::DAMAGE_MODE => println!("  {name} = {}", DamageMode::from_attr(value)),
            attr::COLLISION_MODE => println!("  {name} = {}", CollisionMode::from_attr(value)),
            _ => println!("  {name} = {value}"),
        }
    }

    let effects = entity.effects();
    let mut lines: Vec<String> = effects
        .engaged_kinds()
        .map(|kind| match kind {
            EffectKind::Shift(attribute) => format!(
                "{kind} {} x{}",
                format_signed(effects.active_shift(attribute)),
                effects.outstanding(kind)
            ),
            _ => format!("{kind} x{}", effects.outstanding(kind)),
        })
        .collect();
    lines.sort();
    for line in lines {
        println!("  active: {line}");
    }

    let mut restricted: Vec<&str> = entity.restrictions().iter().collect();
    restricted.sort_unstable();
    if !restricted.is_empty() {
        println!("  restricted: {}", restricted.join(", "));
    }
}
