// Authoritative physics: laser travel and collision resolution on a fixed tick.

use super::game::Game;
use crate::domain::systems::collision::{bucket_by_position, find_hits};
use crate::domain::{Change, Entity, EntityId, LaserStep};
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// What one tick did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub lasers_advanced: usize,
    pub lasers_expired: usize,
    pub hits: usize,
}

/// Drives [`Game::simulate_tick`] at the configured tick rate. Only started on
/// authoritative games.
pub async fn simulation_task(game: Arc<Game>) {
    let mut interval = tokio::time::interval(game.settings().tick_interval);
    // A slow tick pushes the schedule back instead of bursting to catch up.
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!("simulation loop started");

    loop {
        interval.tick().await;
        let report = game.simulate_tick().await;
        if report.hits > 0 {
            debug!(hits = report.hits, "collisions resolved");
        }
    }
}

impl Game {
    /// Runs one tick: resolve every shared cell, advance lasers, then resolve
    /// again so a laser stepping onto a player hits within the same tick.
    ///
    /// Each mutation takes the write lock on its own, so readers between two
    /// mutations can observe a partially resolved collision. Replicas skip the
    /// tick entirely and return an empty report.
    pub async fn simulate_tick(&self) -> TickReport {
        let mut report = TickReport::default();
        if !self.is_authoritative() {
            return report;
        }
        // Lasers already sharing a cell (fired point-blank, or walked into)
        // must hit before they step away.
        self.resolve_collisions(&mut report).await;
        self.advance_lasers(&mut report).await;
        self.resolve_collisions(&mut report).await;
        report
    }

    async fn advance_lasers(&self, report: &mut TickReport) {
        let laser_ids: Vec<EntityId> = {
            let world = self.world.read().await;
            world
                .entities()
                .filter_map(Entity::as_laser)
                .map(|laser| laser.id)
                .collect()
        };

        for id in laser_ids {
            let step = self.world.write().await.step_laser(&id);
            match step {
                Ok(LaserStep::Moved(laser)) => {
                    report.lasers_advanced += 1;
                    self.emit(Change::Move {
                        direction: laser.direction,
                        position: laser.position,
                        entity: laser.into(),
                    });
                }
                Ok(LaserStep::Expired(laser)) => {
                    report.lasers_expired += 1;
                    self.emit(Change::RemoveEntity {
                        entity: laser.into(),
                    });
                }
                // Stationary, or removed since the snapshot.
                Ok(LaserStep::Stationary) | Err(_) => {}
            }
        }
    }

    async fn resolve_collisions(&self, report: &mut TickReport) {
        let buckets = {
            let world = self.world.read().await;
            bucket_by_position(world.entities())
        };

        for hit in find_hits(buckets) {
            report.hits += 1;

            for laser in &hit.lasers {
                if let Some(removed) = self.remove_entity(laser.id).await {
                    self.emit(Change::RemoveEntity { entity: removed });
                }
            }

            for player in &hit.players {
                let respawned = self.world.write().await.respawn_player(&player.id);
                let Ok(respawned) = respawned else {
                    continue;
                };
                self.emit(Change::PlayerRespawn { player: respawned });

                if player.id == hit.credited_owner {
                    debug!(player_id = %player.id, "self hit");
                    continue;
                }
                let score = self.world.write().await.credit_hit(hit.credited_owner);
                info!(
                    victim_id = %player.id,
                    shooter_id = %hit.credited_owner,
                    x = hit.at.x,
                    y = hit.at.y,
                    score,
                    "player hit"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Direction, Identifiable, Laser, Player};
    use crate::use_cases::actions::Action;
    use crate::use_cases::feed::{self, ChangeReceiver};
    use crate::use_cases::game::GameSettings;
    use std::time::Duration;

    fn game(authoritative: bool) -> (Arc<Game>, ChangeReceiver) {
        let (feed, changes) = feed::channel();
        let settings = GameSettings {
            authoritative,
            ..GameSettings::default()
        };
        (Arc::new(Game::new(settings, feed)), changes)
    }

    async fn place_player(game: &Game, at: Coordinate) -> EntityId {
        let player = Player::new(EntityId::new(), "Pilot", at);
        let id = player.id;
        game.add_entity(player.into()).await;
        id
    }

    async fn place_laser(game: &Game, owner: EntityId, at: Coordinate) -> EntityId {
        place_moving_laser(game, owner, at, Direction::Stop, 0).await
    }

    async fn place_moving_laser(
        game: &Game,
        owner: EntityId,
        at: Coordinate,
        direction: Direction,
        range: u32,
    ) -> EntityId {
        let laser = Laser::new(owner, at, direction, range);
        let id = laser.id;
        game.add_entity(laser.into()).await;
        id
    }

    async fn position_of(game: &Game, id: EntityId) -> Option<Coordinate> {
        game.get_entity(id).await.and_then(|e| e.position())
    }

    #[tokio::test]
    async fn hit_removes_laser_respawns_victim_and_credits_owner() {
        let (game, mut changes) = game(true);
        let cell = Coordinate::new(3, 3);
        let shooter = place_player(&game, Coordinate::new(9, 9)).await;
        let victim = place_player(&game, cell).await;
        let laser = place_laser(&game, shooter, cell).await;

        let report = game.simulate_tick().await;

        assert_eq!(report.hits, 1);
        assert!(game.get_entity(laser).await.is_none());
        let victim_now = game
            .get_entity(victim)
            .await
            .expect("victim stays in the store");
        assert_eq!(victim_now.position(), Some(Coordinate::ORIGIN));
        assert_eq!(victim_now.as_player().map(|p| p.respawns), Some(1));
        assert_eq!(game.score(shooter).await, 1);
        assert_eq!(game.score(victim).await, 0);
        // Lasers are removed before players respawn; the respawn is dropped
        // because nobody read the first change.
        assert!(matches!(
            changes.try_recv(),
            Some(Change::RemoveEntity { entity }) if entity.id() == laser
        ));
        assert_eq!(changes.try_recv(), None);
    }

    #[tokio::test]
    async fn moving_laser_on_a_player_hits_before_it_steps_away() {
        let (game, _changes) = game(true);
        let cell = Coordinate::new(3, 3);
        let shooter = place_player(&game, Coordinate::new(9, 9)).await;
        let victim = place_player(&game, cell).await;
        let laser = place_moving_laser(&game, shooter, cell, Direction::Right, 24).await;

        let report = game.simulate_tick().await;

        assert_eq!(report.hits, 1);
        assert_eq!(report.lasers_advanced, 0);
        assert!(game.get_entity(laser).await.is_none());
        assert_eq!(position_of(&game, victim).await, Some(Coordinate::ORIGIN));
        assert_eq!(game.score(shooter).await, 1);
    }

    #[tokio::test]
    async fn self_hit_respawns_without_scoring() {
        let (game, mut changes) = game(true);
        let cell = Coordinate::new(-4, 1);
        let me = place_player(&game, cell).await;
        place_laser(&game, me, cell).await;

        game.simulate_tick().await;
        changes.try_recv();

        assert_eq!(position_of(&game, me).await, Some(Coordinate::ORIGIN));
        assert_eq!(game.score(me).await, 0);
        assert!(game.scores().await.is_empty());
    }

    #[tokio::test]
    async fn every_player_on_the_cell_respawns_and_scores() {
        let (game, _changes) = game(true);
        let cell = Coordinate::new(6, 0);
        let shooter = place_player(&game, Coordinate::new(0, 6)).await;
        let first = place_player(&game, cell).await;
        let second = place_player(&game, cell).await;
        place_laser(&game, shooter, cell).await;

        game.simulate_tick().await;

        assert_eq!(game.score(shooter).await, 2);
        for id in [first, second] {
            assert_eq!(position_of(&game, id).await, Some(Coordinate::ORIGIN));
        }
    }

    #[tokio::test]
    async fn overlapping_players_without_a_laser_are_left_alone() {
        let (game, mut changes) = game(true);
        let cell = Coordinate::new(2, 8);
        let a = place_player(&game, cell).await;
        let b = place_player(&game, cell).await;

        let report = game.simulate_tick().await;

        assert_eq!(report, TickReport::default());
        for id in [a, b] {
            assert_eq!(position_of(&game, id).await, Some(cell));
        }
        assert_eq!(changes.try_recv(), None);
    }

    #[tokio::test]
    async fn travelling_laser_advances_then_hits() {
        let (game, _changes) = game(true);
        let shooter = place_player(&game, Coordinate::new(0, 0)).await;
        let victim = place_player(&game, Coordinate::new(2, 5)).await;
        place_moving_laser(&game, shooter, Coordinate::new(1, 5), Direction::Right, 10).await;

        let report = game.simulate_tick().await;

        assert_eq!(report.lasers_advanced, 1);
        assert_eq!(report.hits, 1);
        assert_eq!(game.score(shooter).await, 1);
        assert_eq!(position_of(&game, victim).await, Some(Coordinate::ORIGIN));
    }

    #[tokio::test]
    async fn last_step_of_a_laser_still_lands_its_hit() {
        let (game, _changes) = game(true);
        let shooter = place_player(&game, Coordinate::new(-5, -5)).await;
        let victim = place_player(&game, Coordinate::new(4, 1)).await;
        let laser =
            place_moving_laser(&game, shooter, Coordinate::new(4, 0), Direction::Down, 1).await;

        let report = game.simulate_tick().await;

        assert_eq!(report.lasers_advanced, 1);
        assert_eq!(report.lasers_expired, 0);
        assert_eq!(report.hits, 1);
        assert!(game.get_entity(laser).await.is_none());
        assert_eq!(game.score(shooter).await, 1);
        assert_eq!(position_of(&game, victim).await, Some(Coordinate::ORIGIN));
    }

    #[tokio::test]
    async fn spent_laser_burns_out_instead_of_reaching_the_next_cell() {
        let (game, _changes) = game(true);
        let shooter = place_player(&game, Coordinate::new(-5, -5)).await;
        let bystander = place_player(&game, Coordinate::new(4, 1)).await;
        place_moving_laser(&game, shooter, Coordinate::new(4, 0), Direction::Down, 0).await;

        let report = game.simulate_tick().await;

        assert_eq!(report.lasers_expired, 1);
        assert_eq!(report.hits, 0);
        assert_eq!(position_of(&game, bystander).await, Some(Coordinate::new(4, 1)));
        assert_eq!(game.score(shooter).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn point_blank_shot_hits_the_adjacent_player() {
        let (game, _changes) = game(true);
        let shooter = place_player(&game, Coordinate::new(0, 0)).await;
        let target = place_player(&game, Coordinate::new(1, 0)).await;

        game.apply(Action::Fire {
            player_id: shooter,
            direction: Direction::Right,
        })
        .await;
        game.simulate_tick().await;

        assert_eq!(game.score(shooter).await, 1);
        assert_eq!(position_of(&game, target).await, Some(Coordinate::ORIGIN));
        assert_eq!(game.entities().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn player_walking_onto_a_laser_is_hit() {
        let (game, _changes) = game(true);
        let shooter = place_player(&game, Coordinate::new(-8, 0)).await;
        let walker = place_player(&game, Coordinate::new(0, 2)).await;
        // Travelling away from the walker, so only the walker's move can meet it.
        place_moving_laser(&game, shooter, Coordinate::new(0, 3), Direction::Down, 24).await;

        game.apply(Action::Move {
            entity_id: walker,
            direction: Direction::Down,
        })
        .await;
        game.simulate_tick().await;

        assert_eq!(game.score(shooter).await, 1);
        assert_eq!(position_of(&game, walker).await, Some(Coordinate::ORIGIN));
    }

    #[tokio::test]
    async fn laser_burns_out_after_its_range() {
        let (game, mut changes) = game(true);
        let laser = Laser::new(EntityId::new(), Coordinate::new(10, 10), Direction::Down, 2);
        let id = laser.id;
        game.add_entity(laser.into()).await;

        for _ in 0..2 {
            game.simulate_tick().await;
            changes.try_recv();
        }
        assert_eq!(position_of(&game, id).await, Some(Coordinate::new(10, 12)));

        let report = game.simulate_tick().await;

        assert_eq!(report.lasers_expired, 1);
        assert!(game.get_entity(id).await.is_none());
        assert!(matches!(
            changes.try_recv(),
            Some(Change::RemoveEntity { entity }) if entity.id() == id
        ));
    }

    #[tokio::test]
    async fn replicas_never_resolve_collisions() {
        let (game, mut changes) = game(false);
        let cell = Coordinate::new(1, 1);
        let shooter = place_player(&game, Coordinate::new(5, 5)).await;
        let victim = place_player(&game, cell).await;
        place_laser(&game, shooter, cell).await;

        let report = game.simulate_tick().await;

        assert_eq!(report, TickReport::default());
        assert_eq!(game.entities().await.len(), 3);
        assert_eq!(position_of(&game, victim).await, Some(cell));
        assert!(game.scores().await.is_empty());
        assert_eq!(changes.try_recv(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_resolves_hits_within_one_tick() {
        let (game, _changes) = game(true);
        let cell = Coordinate::new(4, 4);
        let shooter = place_player(&game, Coordinate::new(0, 9)).await;
        place_player(&game, cell).await;
        place_laser(&game, shooter, cell).await;

        let task = tokio::spawn(simulation_task(game.clone()));
        tokio::time::sleep(Duration::from_millis(25)).await;
        task.abort();

        assert_eq!(game.score(shooter).await, 1);
    }
}
