// The game aggregate: locked world state plus its two background loops.

use super::actions::Action;
use super::feed::{self, ChangeFeed, ChangeReceiver, Delivery};
use super::intake::{self, ActionReceiver, ActionSender, intake_task};
use super::simulation::simulation_task;
use crate::domain::tuning::ActionTuning;
use crate::domain::{Change, Coordinate, Entity, EntityId, StoreError, ThrottleKey, World};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;

/// Construction-time settings for a game instance.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// True only on the server; replicas never run their own physics.
    pub authoritative: bool,
    /// Fixed period of the collision loop.
    pub tick_interval: Duration,
    /// Throttle intervals and laser range.
    pub tuning: ActionTuning,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            authoritative: true,
            tick_interval: Duration::from_millis(20),
            tuning: ActionTuning::default(),
        }
    }
}

/// Shared game state. Every store, score and throttle access goes through one
/// reader/writer lock, and no guard is ever held across an `.await` on
/// anything other than the lock itself.
#[derive(Debug)]
pub struct Game {
    pub(crate) world: RwLock<World>,
    feed: ChangeFeed,
    settings: GameSettings,
}

/// Join handles for the loops started by [`Game::start`].
#[derive(Debug)]
pub struct GameTasks {
    pub intake: JoinHandle<()>,
    /// `None` on non-authoritative instances.
    pub simulation: Option<JoinHandle<()>>,
}

impl GameTasks {
    /// Stops scheduling both loops.
    pub fn shutdown(self) {
        self.intake.abort();
        if let Some(simulation) = self.simulation {
            simulation.abort();
        }
    }
}

/// A started game with both public contracts wired up.
#[derive(Debug)]
pub struct GameRuntime {
    pub game: Arc<Game>,
    pub actions: ActionSender,
    pub changes: ChangeReceiver,
    pub tasks: GameTasks,
}

/// Builds a game, its intake queue and change feed, and starts its loops.
pub fn spawn_game(settings: GameSettings) -> GameRuntime {
    let (feed, changes) = feed::channel();
    let (actions, action_rx) = intake::channel();
    let game = Arc::new(Game::new(settings, feed));
    let tasks = game.clone().start(action_rx);
    GameRuntime {
        game,
        actions,
        changes,
        tasks,
    }
}

impl Game {
    pub fn new(settings: GameSettings, feed: ChangeFeed) -> Self {
        Self {
            world: RwLock::new(World::new()),
            feed,
            settings,
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.settings.authoritative
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn tuning(&self) -> &ActionTuning {
        &self.settings.tuning
    }

    /// Spawns the action intake loop, plus the collision loop when authoritative.
    pub fn start(self: Arc<Self>, actions: ActionReceiver) -> GameTasks {
        let simulation = if self.is_authoritative() {
            Some(tokio::spawn(simulation_task(self.clone())))
        } else {
            None
        };
        info!(
            authoritative = self.is_authoritative(),
            tick_ms = self.settings.tick_interval.as_millis() as u64,
            "game started"
        );
        let intake = tokio::spawn(intake_task(self, actions));
        GameTasks { intake, simulation }
    }

    /// Applies one action immediately, bypassing the intake queue.
    pub async fn apply(&self, action: Action) {
        action.apply(self).await;
    }

    pub async fn add_entity(&self, entity: Entity) {
        self.world.write().await.insert(entity);
    }

    /// Replaces the stored entity with the same identity, inserting it if absent.
    pub async fn update_entity(&self, entity: Entity) -> Option<Entity> {
        self.world.write().await.insert(entity)
    }

    pub async fn get_entity(&self, id: EntityId) -> Option<Entity> {
        self.world.read().await.get(&id).cloned()
    }

    /// Removes and returns the entity; absent ids are a no-op.
    pub async fn remove_entity(&self, id: EntityId) -> Option<Entity> {
        self.world.write().await.remove(&id)
    }

    pub async fn move_entity(
        &self,
        id: EntityId,
        position: Coordinate,
    ) -> Result<Entity, StoreError> {
        self.world.write().await.move_entity(&id, position)
    }

    /// Snapshot of every entity, in unspecified order.
    pub async fn entities(&self) -> Vec<Entity> {
        self.world.read().await.entities().cloned().collect()
    }

    pub async fn score(&self, id: EntityId) -> u32 {
        self.world.read().await.score(&id)
    }

    pub async fn scores(&self) -> HashMap<EntityId, u32> {
        self.world.read().await.scores().clone()
    }

    pub(crate) async fn throttle_allows(&self, key: &ThrottleKey, interval: Duration) -> bool {
        let now = Instant::now();
        self.world.read().await.throttle.allows(key, interval, now)
    }

    pub(crate) async fn record_throttle(&self, key: ThrottleKey) {
        let now = Instant::now();
        self.world.write().await.throttle.record(key, now);
    }

    pub(crate) async fn forget_throttles(&self, id: EntityId) {
        self.world.write().await.throttle.forget(id);
    }

    /// Publishes a change on the best-effort feed.
    pub(crate) fn emit(&self, change: Change) -> Delivery {
        self.feed.publish(change)
    }
}
