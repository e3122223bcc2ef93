// Fans the single-slot change feed and the scoreboard out to every observer.

use super::protocol::{ServerMessage, scoreboard};
use crate::domain::EntityId;
use crate::use_cases::{ChangeReceiver, Game};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

/// Serializes each change once and broadcasts the shared JSON text.
///
/// Observers that fall behind lose messages on the broadcast side as well;
/// they should re-read the store to resync. Exits when the feed closes.
pub async fn change_relay(mut changes: ChangeReceiver, observers: broadcast::Sender<Arc<str>>) {
    while let Some(change) = changes.recv().await {
        let msg = ServerMessage::Change(change);
        let txt = match serde_json::to_string(&msg) {
            Ok(txt) => txt,
            Err(e) => {
                error!(error = ?e, "failed to serialize change");
                continue;
            }
        };
        // No subscribers is not an error; the change is simply unobserved.
        let _ = observers.send(Arc::from(txt));
    }
    debug!("change feed closed; relay exiting");
}

/// Publishes the scoreboard every `period`, but only when scores changed.
///
/// Hits are announced on the lossy feed as removals and respawns; the score
/// itself is only observable through this task. Runs until aborted.
pub async fn scoreboard_relay(
    game: Arc<Game>,
    observers: broadcast::Sender<Arc<str>>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_published: HashMap<EntityId, u32> = HashMap::new();

    loop {
        interval.tick().await;
        let scores = game.scores().await;
        if scores == last_published {
            continue;
        }

        let msg = ServerMessage::Scoreboard(scoreboard(scores.clone()));
        match serde_json::to_string(&msg) {
            Ok(txt) => {
                let _ = observers.send(Arc::from(txt));
                last_published = scores;
            }
            Err(e) => error!(error = ?e, "failed to serialize scoreboard"),
        }
    }
}
