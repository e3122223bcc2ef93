// Use cases layer: the locked game, its loops and the public contracts.

pub mod actions;
pub mod feed;
pub mod game;
pub mod intake;
pub mod replica;
pub mod simulation;

pub use actions::Action;
pub use feed::{ChangeFeed, ChangeReceiver, Delivery};
pub use game::{Game, GameRuntime, GameSettings, GameTasks, spawn_game};
pub use intake::{ActionReceiver, ActionSender, SubmitError};
pub use simulation::TickReport;
