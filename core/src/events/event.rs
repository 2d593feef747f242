use chrono::NaiveDateTime;

use crate::entity::EntityId;

/// Raw events as a host reports them.
///
/// These carry whoever the host knows about: an environmental kill has no
/// attacker, a suicide names the same player on both sides. The expansion
/// in [`super::expand`] turns each one into per-player notices.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // Presence
    PlayerSpawn {
        user_id: EntityId,
        timestamp: NaiveDateTime,
    },
    PlayerJump {
        user_id: EntityId,
        timestamp: NaiveDateTime,
    },
    PlayerDisconnect {
        user_id: EntityId,
        timestamp: NaiveDateTime,
    },

    // Combat
    PlayerHurt {
        attacker: Option<EntityId>,
        victim: EntityId,
        damage: i64,
        timestamp: NaiveDateTime,
    },
    PlayerDeath {
        attacker: Option<EntityId>,
        victim: EntityId,
        timestamp: NaiveDateTime,
    },
    PlayerBlind {
        attacker: Option<EntityId>,
        victim: EntityId,
        duration: f32,
        timestamp: NaiveDateTime,
    },

    // World lifecycle
    LevelShutdown {
        timestamp: NaiveDateTime,
    },
}
