// Shared world state: entity store, scores and throttle table.
//
// `World` itself is not synchronized. `use_cases::game::Game` keeps it behind a
// single reader/writer lock so every mutation here is mutually exclusive.

use super::entity::{Entity, EntityId, Identifiable, Laser, Player};
use super::errors::StoreError;
use super::geometry::{Coordinate, Direction};
use super::throttle::ThrottleTable;
use std::collections::HashMap;

/// Outcome of advancing one laser by a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaserStep {
    Moved(Laser),
    /// Range exhausted; the laser was removed from the store.
    Expired(Laser),
    /// `Stop` lasers hold their cell.
    Stationary,
}

#[derive(Debug, Default)]
pub struct World {
    entities: HashMap<EntityId, Entity>,
    scores: HashMap<EntityId, u32>,
    pub throttle: ThrottleTable,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entity` under its own identity, replacing any previous value.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id(), entity)
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    pub fn move_entity(
        &mut self,
        id: &EntityId,
        position: Coordinate,
    ) -> Result<Entity, StoreError> {
        let entity = self.entities.get_mut(id).ok_or(StoreError::NotFound(*id))?;
        entity
            .as_movable_mut()
            .ok_or(StoreError::NotMovable(*id))?
            .move_to(position);
        Ok(entity.clone())
    }

    /// Sends a player to the origin, returning the updated player.
    pub fn respawn_player(&mut self, id: &EntityId) -> Result<Player, StoreError> {
        match self.entities.get_mut(id) {
            Some(Entity::Player(player)) => {
                player.respawn();
                Ok(player.clone())
            }
            Some(_) => Err(StoreError::NotMovable(*id)),
            None => Err(StoreError::NotFound(*id)),
        }
    }

    /// Advances a laser one cell along its direction, or removes it once its
    /// range is spent.
    pub fn step_laser(&mut self, id: &EntityId) -> Result<LaserStep, StoreError> {
        let laser = match self.entities.get_mut(id) {
            Some(Entity::Laser(laser)) => laser,
            Some(_) => return Err(StoreError::NotMovable(*id)),
            None => return Err(StoreError::NotFound(*id)),
        };

        if laser.direction == Direction::Stop {
            return Ok(LaserStep::Stationary);
        }
        if laser.range_left == 0 {
            return match self.entities.remove(id) {
                Some(Entity::Laser(laser)) => Ok(LaserStep::Expired(laser)),
                _ => Err(StoreError::NotFound(*id)),
            };
        }

        laser.position = laser.position.step(laser.direction);
        laser.range_left -= 1;
        Ok(LaserStep::Moved(laser.clone()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn score(&self, id: &EntityId) -> u32 {
        self.scores.get(id).copied().unwrap_or(0)
    }

    pub fn scores(&self) -> &HashMap<EntityId, u32> {
        &self.scores
    }

    /// Awards one point to the owner of a laser that hit another player.
    pub fn credit_hit(&mut self, owner: EntityId) -> u32 {
        let score = self.scores.entry(owner).or_insert(0);
        *score = score.saturating_add(1);
        *score
    }
}
