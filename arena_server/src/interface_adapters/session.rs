// One connected player's view of the intake queue.

use super::protocol::ClientMessage;
use crate::domain::EntityId;
use crate::use_cases::{Action, ActionSender, SubmitError};
use tracing::{debug, warn};

/// Binds a freshly allocated identity to every message from one client.
#[derive(Debug)]
pub struct Session {
    player_id: EntityId,
    actions: ActionSender,
    connected: bool,
}

impl Session {
    /// Allocates an identity and queues the Connect for it.
    pub async fn open(actions: ActionSender, name: impl Into<String>) -> Result<Self, SubmitError> {
        let player_id = EntityId::new();
        actions
            .submit(Action::Connect {
                player_id,
                name: name.into(),
            })
            .await?;
        debug!(%player_id, "session opened");
        Ok(Self {
            player_id,
            actions,
            connected: true,
        })
    }

    pub fn player_id(&self) -> EntityId {
        self.player_id
    }

    /// Forwards one client message. Connect after open is ignored.
    pub async fn handle(&mut self, msg: ClientMessage) -> Result<(), SubmitError> {
        if !self.connected {
            return Ok(());
        }
        match msg {
            ClientMessage::Connect { .. } => {
                warn!(player_id = %self.player_id, "duplicate connect ignored");
                Ok(())
            }
            ClientMessage::Disconnect => self.close().await,
            other => self.actions.submit(other.into_action(self.player_id)).await,
        }
    }

    /// Queues the Disconnect; further messages are ignored.
    pub async fn close(&mut self) -> Result<(), SubmitError> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.actions
            .submit(Action::Disconnect {
                player_id: self.player_id,
            })
            .await
    }
}
