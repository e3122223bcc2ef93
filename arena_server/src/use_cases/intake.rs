// Inbound action queue and the loop that drains it.

use super::actions::Action;
use super::game::Game;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One action in flight at a time; producers wait for the slot to free up.
pub const INTAKE_CAPACITY: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("action intake is closed")]
    Closed,
}

/// Producer handle given to the session layer.
#[derive(Debug, Clone)]
pub struct ActionSender {
    tx: mpsc::Sender<Action>,
}

#[derive(Debug)]
pub struct ActionReceiver {
    rx: mpsc::Receiver<Action>,
}

pub fn channel() -> (ActionSender, ActionReceiver) {
    let (tx, rx) = mpsc::channel::<Action>(INTAKE_CAPACITY);
    (ActionSender { tx }, ActionReceiver { rx })
}

impl ActionSender {
    /// Queues `action`, waiting while another action occupies the slot.
    pub async fn submit(&self, action: Action) -> Result<(), SubmitError> {
        self.tx.send(action).await.map_err(|_| SubmitError::Closed)
    }
}

/// Applies actions strictly one after another in submission order.
pub async fn intake_task(game: Arc<Game>, mut actions: ActionReceiver) {
    debug!("action intake started");
    while let Some(action) = actions.rx.recv().await {
        game.apply(action).await;
    }
    info!("action intake closed; intake loop exiting");
}
