use chrono::NaiveDateTime;

use sigil_types::formatting::format_remaining;

use crate::entity::EntityId;

use super::event::GameEvent;

/// One player's view of something that happened.
///
/// Every notice names exactly one player, so consumers can route them
/// without re-deriving who was involved on which side.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerNotice {
    // Presence
    Spawn {
        player: EntityId,
        timestamp: NaiveDateTime,
    },
    Jump {
        player: EntityId,
        timestamp: NaiveDateTime,
    },
    Disconnect {
        player: EntityId,
        timestamp: NaiveDateTime,
    },

    // Dealing damage
    Attack {
        player: EntityId,
        victim: EntityId,
        damage: i64,
        timestamp: NaiveDateTime,
    },
    Kill {
        player: EntityId,
        victim: EntityId,
        timestamp: NaiveDateTime,
    },
    Blind {
        player: EntityId,
        victim: EntityId,
        duration: f32,
        timestamp: NaiveDateTime,
    },

    // Taking damage
    Victim {
        player: EntityId,
        attacker: Option<EntityId>,
        damage: i64,
        timestamp: NaiveDateTime,
    },
    Death {
        player: EntityId,
        killer: Option<EntityId>,
        timestamp: NaiveDateTime,
    },
    GoBlind {
        player: EntityId,
        attacker: Option<EntityId>,
        duration: f32,
        timestamp: NaiveDateTime,
    },

    // World lifecycle
    LevelShutdown {
        timestamp: NaiveDateTime,
    },
}

impl PlayerNotice {
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            PlayerNotice::Spawn { timestamp, .. }
            | PlayerNotice::Jump { timestamp, .. }
            | PlayerNotice::Disconnect { timestamp, .. }
            | PlayerNotice::Attack { timestamp, .. }
            | PlayerNotice::Kill { timestamp, .. }
            | PlayerNotice::Blind { timestamp, .. }
            | PlayerNotice::Victim { timestamp, .. }
            | PlayerNotice::Death { timestamp, .. }
            | PlayerNotice::GoBlind { timestamp, .. }
            | PlayerNotice::LevelShutdown { timestamp } => *timestamp,
        }
    }
}

impl std::fmt::Display for PlayerNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerNotice::Spawn { player, .. } => write!(f, "player {player} spawned"),
            PlayerNotice::Jump { player, .. } => write!(f, "player {player} jumped"),
            PlayerNotice::Disconnect { player, .. } => {
                write!(f, "player {player} disconnected")
            }
            PlayerNotice::Attack {
                player,
                victim,
                damage,
                ..
            } => write!(f, "player {player} hit player {victim} for {damage}"),
            PlayerNotice::Kill { player, victim, .. } => {
                write!(f, "player {player} killed player {victim}")
            }
            PlayerNotice::Blind {
                player,
                victim,
                duration,
                ..
            } => write!(
                f,
                "player {player} blinded player {victim} for {}",
                format_remaining(*duration),
            ),
            PlayerNotice::Victim {
                player,
                attacker: Some(attacker),
                damage,
                ..
            } => write!(f, "player {player} took {damage} from player {attacker}"),
            PlayerNotice::Victim {
                player, damage, ..
            } => write!(f, "player {player} took {damage}"),
            PlayerNotice::Death {
                player,
                killer: Some(killer),
                ..
            } => write!(f, "player {player} died to player {killer}"),
            PlayerNotice::Death { player, .. } => write!(f, "player {player} died"),
            PlayerNotice::GoBlind {
                player, duration, ..
            } => write!(
                f,
                "player {player} went blind for {}",
                format_remaining(*duration),
            ),
            PlayerNotice::LevelShutdown { .. } => f.write_str("level shutting down"),
        }
    }
}

/// Expands a raw event into per-player notices.
///
/// Two-sided events yield the subject's notice first, then the acting
/// player's. An event whose attacker is unknown yields only the subject
/// side. A suicide names the same player on both sides and still yields
/// both notices.
pub fn expand(event: &GameEvent) -> Vec<PlayerNotice> {
    match *event {
        GameEvent::PlayerSpawn { user_id, timestamp } => vec![PlayerNotice::Spawn {
            player: user_id,
            timestamp,
        }],
        GameEvent::PlayerJump { user_id, timestamp } => vec![PlayerNotice::Jump {
            player: user_id,
            timestamp,
        }],
        GameEvent::PlayerDisconnect { user_id, timestamp } => vec![PlayerNotice::Disconnect {
            player: user_id,
            timestamp,
        }],
        GameEvent::PlayerHurt {
            attacker,
            victim,
            damage,
            timestamp,
        } => {
            let mut notices = Vec::with_capacity(2);
            notices.push(PlayerNotice::Victim {
                player: victim,
                attacker,
                damage,
                timestamp,
            });
            if let Some(attacker) = attacker {
                notices.push(PlayerNotice::Attack {
                    player: attacker,
                    victim,
                    damage,
                    timestamp,
                });
            }
            notices
        }
        GameEvent::PlayerDeath {
            attacker,
            victim,
            timestamp,
        } => {
            let mut notices = Vec::with_capacity(2);
            notices.push(PlayerNotice::Death {
                player: victim,
                killer: attacker,
                timestamp,
            });
            if let Some(attacker) = attacker {
                notices.push(PlayerNotice::Kill {
                    player: attacker,
                    victim,
                    timestamp,
                });
            }
            notices
        }
        GameEvent::PlayerBlind {
            attacker,
            victim,
            duration,
            timestamp,
        } => {
            let mut notices = Vec::with_capacity(2);
            notices.push(PlayerNotice::GoBlind {
                player: victim,
                attacker,
                duration,
                timestamp,
            });
            if let Some(attacker) = attacker {
                notices.push(PlayerNotice::Blind {
                    player: attacker,
                    victim,
                    duration,
                    timestamp,
                });
            }
            notices
        }
        GameEvent::LevelShutdown { timestamp } => {
            vec![PlayerNotice::LevelShutdown { timestamp }]
        }
    }
}
