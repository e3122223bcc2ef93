// Notifications describing mutations that already happened.

use super::entity::{Entity, Player};
use super::geometry::{Coordinate, Direction};
use serde::{Deserialize, Serialize};

/// Ephemeral change notification. Never stored; delivery is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Change {
    Move {
        entity: Entity,
        direction: Direction,
        position: Coordinate,
    },
    AddEntity {
        entity: Entity,
    },
    RemoveEntity {
        entity: Entity,
    },
    PlayerRespawn {
        player: Player,
    },
}
