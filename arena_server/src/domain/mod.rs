// Domain layer: core simulation types and rules.

pub mod change;
pub mod entity;
pub mod errors;
pub mod geometry;
pub mod systems;
pub mod throttle;
pub mod tuning;
pub mod world;

pub use change::Change;
pub use entity::{Entity, EntityId, Identifiable, Laser, Movable, Player, Positioned};
pub use errors::StoreError;
pub use geometry::{Coordinate, Direction};
pub use throttle::{ActionKind, ThrottleKey, ThrottleTable};
pub use world::{LaserStep, World};
