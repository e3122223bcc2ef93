// Player-issued requests and their effect on the game.
//
// Every action follows the same contract: look up the target, consult the
// throttle table, apply the effect, publish a change (best-effort) and record
// the throttle timestamp. Unknown targets and throttled requests are dropped
// silently.

use super::game::Game;
use crate::domain::{
    ActionKind, Change, Coordinate, Direction, Entity, EntityId, Laser, Player, ThrottleKey,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, trace};

/// A request already bound to an entity identity by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Action {
    Connect { player_id: EntityId, name: String },
    Move { entity_id: EntityId, direction: Direction },
    Fire { player_id: EntityId, direction: Direction },
    Disconnect { player_id: EntityId },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Connect { .. } => ActionKind::Connect,
            Action::Move { .. } => ActionKind::Move,
            Action::Fire { .. } => ActionKind::Fire,
            Action::Disconnect { .. } => ActionKind::Disconnect,
        }
    }

    /// Identity the action is bound to.
    pub fn target(&self) -> EntityId {
        match self {
            Action::Connect { player_id, .. }
            | Action::Fire { player_id, .. }
            | Action::Disconnect { player_id } => *player_id,
            Action::Move { entity_id, .. } => *entity_id,
        }
    }

    pub fn throttle_key(&self) -> ThrottleKey {
        ThrottleKey::new(self.kind(), self.target())
    }

    pub async fn apply(self, game: &Game) {
        match self {
            Action::Connect { player_id, name } => connect(game, player_id, name).await,
            Action::Move {
                entity_id,
                direction,
            } => move_entity(game, entity_id, direction).await,
            Action::Fire {
                player_id,
                direction,
            } => fire(game, player_id, direction).await,
            Action::Disconnect { player_id } => disconnect(game, player_id).await,
        }
    }
}

async fn throttled(game: &Game, key: &ThrottleKey, interval: Duration) -> bool {
    if game.throttle_allows(key, interval).await {
        return false;
    }
    trace!(entity_id = %key.entity, kind = ?key.kind, "action throttled");
    true
}

async fn connect(game: &Game, player_id: EntityId, name: String) {
    // Replayed handshakes for a live player are ignored.
    if game.get_entity(player_id).await.is_some() {
        return;
    }
    let key = ThrottleKey::new(ActionKind::Connect, player_id);
    if throttled(game, &key, game.tuning().connect_interval).await {
        return;
    }

    let player = Player::new(player_id, name, Coordinate::ORIGIN);
    game.add_entity(player.clone().into()).await;
    info!(%player_id, name = %player.name, "player connected");

    game.emit(Change::AddEntity {
        entity: player.into(),
    });
    game.record_throttle(key).await;
}

async fn move_entity(game: &Game, entity_id: EntityId, direction: Direction) {
    let Some(entity) = game.get_entity(entity_id).await else {
        return;
    };
    let key = ThrottleKey::new(ActionKind::Move, entity_id);
    if throttled(game, &key, game.tuning().move_interval).await {
        return;
    }
    let Some(current) = entity.position() else {
        return;
    };

    let position = current.step(direction);
    let moved = match game.move_entity(entity_id, position).await {
        Ok(moved) => moved,
        Err(error) => {
            // Removed by the collision loop between lookup and move.
            debug!(%error, "move target vanished");
            return;
        }
    };

    game.emit(Change::Move {
        entity: moved,
        direction,
        position,
    });
    game.record_throttle(key).await;
}

async fn fire(game: &Game, player_id: EntityId, direction: Direction) {
    let Some(Entity::Player(shooter)) = game.get_entity(player_id).await else {
        return;
    };
    if direction == Direction::Stop {
        return;
    }
    let key = ThrottleKey::new(ActionKind::Fire, player_id);
    if throttled(game, &key, game.tuning().fire_interval).await {
        return;
    }

    // Spawn one cell ahead so the shot never lands on the shooter.
    let laser = Laser::new(
        shooter.id,
        shooter.position.step(direction),
        direction,
        game.tuning().laser_range,
    );
    game.add_entity(laser.clone().into()).await;
    debug!(%player_id, laser_id = %laser.id, ?direction, "laser fired");

    game.emit(Change::AddEntity {
        entity: laser.into(),
    });
    game.record_throttle(key).await;
}

async fn disconnect(game: &Game, player_id: EntityId) {
    let Some(Entity::Player(_)) = game.get_entity(player_id).await else {
        return;
    };
    let key = ThrottleKey::new(ActionKind::Disconnect, player_id);
    if throttled(game, &key, game.tuning().disconnect_interval).await {
        return;
    }

    let Some(removed) = game.remove_entity(player_id).await else {
        return;
    };
    info!(%player_id, "player disconnected");

    game.emit(Change::RemoveEntity { entity: removed });
    // The player is gone, so drop its throttle history instead of extending it.
    game.forget_throttles(player_id).await;
}
