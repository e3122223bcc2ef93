// Shared fixtures for integration tests against the public game API.
#![allow(dead_code)]

use arena_server::domain::{Coordinate, Entity, EntityId, Identifiable};
use arena_server::use_cases::{Game, GameSettings};

// Settings for a replica: intake runs, collision loop never starts.
pub fn replica_settings() -> GameSettings {
    GameSettings {
        authoritative: false,
        ..GameSettings::default()
    }
}

// Every entity as (id, position), sorted so two stores can be compared.
pub async fn positions(game: &Game) -> Vec<(EntityId, Option<Coordinate>)> {
    let mut positions: Vec<(EntityId, Option<Coordinate>)> = game
        .entities()
        .await
        .iter()
        .map(|entity| (entity.id(), entity.position()))
        .collect();
    positions.sort_by_key(|(id, _)| *id);
    positions
}

// Full sorted snapshot of a store.
pub async fn snapshot(game: &Game) -> Vec<Entity> {
    let mut entities = game.entities().await;
    entities.sort_by_key(|entity| entity.id());
    entities
}
