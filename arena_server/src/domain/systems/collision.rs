use crate::domain::entity::{Entity, EntityId, Laser, Player};
use crate::domain::geometry::Coordinate;
use std::collections::HashMap;

/// A cell where at least one laser met at least one other entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub at: Coordinate,
    /// Owner of the laser credited with the hit.
    pub credited_owner: EntityId,
    pub lasers: Vec<Laser>,
    pub players: Vec<Player>,
}

impl Hit {
    /// Players whose respawn earns the credited owner a point.
    pub fn scoring_players(&self) -> impl Iterator<Item = &Player> {
        self.players
            .iter()
            .filter(|player| player.id != self.credited_owner)
    }
}

/// Groups positioned entities by cell, preserving the iteration order of `entities`.
pub fn bucket_by_position<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
) -> HashMap<Coordinate, Vec<Entity>> {
    let mut buckets: HashMap<Coordinate, Vec<Entity>> = HashMap::new();
    for entity in entities {
        let Some(position) = entity.position() else {
            continue;
        };
        buckets.entry(position).or_default().push(entity.clone());
    }
    buckets
}

/// Finds every shared cell that contains a laser.
///
/// The first laser in a bucket takes the credit. Bucket order follows store
/// iteration order, which is unspecified, so simultaneous shots on the same
/// cell break ties arbitrarily.
pub fn find_hits(buckets: HashMap<Coordinate, Vec<Entity>>) -> Vec<Hit> {
    let mut hits = Vec::new();
    for (at, occupants) in buckets {
        if occupants.len() <= 1 {
            continue;
        }
        let Some(credited_owner) = occupants
            .iter()
            .find_map(Entity::as_laser)
            .map(|laser| laser.owner_id)
        else {
            // Players overlapping without a laser is not a collision.
            continue;
        };

        let mut lasers = Vec::new();
        let mut players = Vec::new();
        for occupant in occupants {
            match occupant {
                Entity::Laser(laser) => lasers.push(laser),
                Entity::Player(player) => players.push(player),
            }
        }
        hits.push(Hit {
            at,
            credited_owner,
            lasers,
            players,
        });
    }
    hits
}
