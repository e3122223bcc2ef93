// Wire DTOs for the external streaming layer.
// Transport framing is owned outside this crate; these only fix the JSON shape.

use crate::domain::{Change, Direction, EntityId};
use crate::use_cases::Action;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Messages the server sends to connected observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    // A state mutation that already happened.
    Change(Change),
    // Current points per player, highest first.
    Scoreboard(Vec<ScoreEntryDto>),
}

/// Messages a client sends; identity is bound by the session, never trusted from the wire.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    Connect { name: String },
    Move { direction: Direction },
    Fire { direction: Direction },
    Disconnect,
}

impl ClientMessage {
    /// Binds the message to the session's player identity.
    pub fn into_action(self, player_id: EntityId) -> Action {
        match self {
            ClientMessage::Connect { name } => Action::Connect { player_id, name },
            ClientMessage::Move { direction } => Action::Move {
                entity_id: player_id,
                direction,
            },
            ClientMessage::Fire { direction } => Action::Fire {
                player_id,
                direction,
            },
            ClientMessage::Disconnect => Action::Disconnect { player_id },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntryDto {
    pub player_id: EntityId,
    pub score: u32,
}

/// Orders scores highest first, ties by id so the board is stable.
pub fn scoreboard(scores: HashMap<EntityId, u32>) -> Vec<ScoreEntryDto> {
    let mut entries: Vec<ScoreEntryDto> = scores
        .into_iter()
        .map(|(player_id, score)| ScoreEntryDto { player_id, score })
        .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.player_id.cmp(&b.player_id)));
    entries
}
