// World entities and the capabilities they expose.

use super::geometry::{Coordinate, Direction};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Globally unique entity identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Allocates a fresh process-wide unique identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub trait Identifiable {
    fn id(&self) -> EntityId;
}

pub trait Positioned {
    fn position(&self) -> Coordinate;
}

pub trait Movable {
    fn move_to(&mut self, position: Coordinate);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    pub position: Coordinate,
    /// Number of times this player has been sent back to the origin.
    pub respawns: u32,
}

impl Player {
    pub fn new(id: EntityId, name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            respawns: 0,
        }
    }

    /// Sends the player back to the origin and counts the respawn.
    pub fn respawn(&mut self) {
        self.position = Coordinate::ORIGIN;
        self.respawns = self.respawns.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Laser {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub position: Coordinate,
    pub direction: Direction,
    /// Cells left to travel before the laser burns out.
    pub range_left: u32,
}

impl Laser {
    pub fn new(
        owner_id: EntityId,
        position: Coordinate,
        direction: Direction,
        range_left: u32,
    ) -> Self {
        Self {
            id: EntityId::new(),
            owner_id,
            position,
            direction,
            range_left,
        }
    }
}

impl Identifiable for Player {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Positioned for Player {
    fn position(&self) -> Coordinate {
        self.position
    }
}

impl Movable for Player {
    fn move_to(&mut self, position: Coordinate) {
        self.position = position;
    }
}

impl Identifiable for Laser {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl Positioned for Laser {
    fn position(&self) -> Coordinate {
        self.position
    }
}

impl Movable for Laser {
    fn move_to(&mut self, position: Coordinate) {
        self.position = position;
    }
}

/// Anything stored in the world. Capabilities are looked up per variant and
/// come back as `Option` so callers handle a missing capability explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Entity {
    Player(Player),
    Laser(Laser),
}

impl Entity {
    pub fn as_positioned(&self) -> Option<&dyn Positioned> {
        match self {
            Entity::Player(player) => Some(player),
            Entity::Laser(laser) => Some(laser),
        }
    }

    pub fn as_movable_mut(&mut self) -> Option<&mut dyn Movable> {
        match self {
            Entity::Player(player) => Some(player),
            Entity::Laser(laser) => Some(laser),
        }
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.as_positioned().map(|positioned| positioned.position())
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_laser(&self) -> Option<&Laser> {
        match self {
            Entity::Laser(laser) => Some(laser),
            _ => None,
        }
    }
}

impl Identifiable for Entity {
    fn id(&self) -> EntityId {
        match self {
            Entity::Player(player) => player.id(),
            Entity::Laser(laser) => laser.id(),
        }
    }
}

impl From<Player> for Entity {
    fn from(player: Player) -> Self {
        Entity::Player(player)
    }
}

impl From<Laser> for Entity {
    fn from(laser: Laser) -> Self {
        Entity::Laser(laser)
    }
}
