// Mirroring of externally delivered changes on non-authoritative instances.

use super::game::Game;
use crate::domain::{Change, Identifiable};
use tracing::trace;

impl Game {
    /// Applies a change computed elsewhere to the local store.
    ///
    /// Moves upsert the carried entity so a replica that missed the matching
    /// add (the feed is lossy) still converges. Nothing is re-published and
    /// scores and throttles are left alone.
    pub async fn apply_remote_change(&self, change: Change) {
        let mut world = self.world.write().await;
        match change {
            Change::AddEntity { entity } => {
                world.insert(entity);
            }
            Change::RemoveEntity { entity } => {
                world.remove(&entity.id());
            }
            Change::Move {
                mut entity,
                position,
                ..
            } => {
                if let Some(movable) = entity.as_movable_mut() {
                    movable.move_to(position);
                }
                world.insert(entity);
            }
            Change::PlayerRespawn { player } => {
                trace!(player_id = %player.id, "mirroring respawn");
                world.insert(player.into());
            }
        }
    }
}
