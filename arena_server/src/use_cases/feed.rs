// Best-effort change mailbox between the simulation and the transport layer.
//
// The feed holds at most one undelivered change. Publishing while that slot is
// occupied drops the *new* change; the pending one is left untouched and
// nothing queues behind it. Producers never wait on a slow or absent consumer,
// so subscribers must treat the feed as a hint and re-read the store to resync.

use crate::domain::Change;
use tokio::sync::mpsc;

/// Number of undelivered changes the mailbox can hold.
pub const FEED_CAPACITY: usize = 1;

/// Result of publishing one change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Slot occupied or receiver gone; the change was discarded.
    Dropped,
}

/// Producer half of the mailbox. Cheap to clone; never blocks.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    tx: mpsc::Sender<Change>,
}

/// Consumer half of the mailbox.
#[derive(Debug)]
pub struct ChangeReceiver {
    rx: mpsc::Receiver<Change>,
}

pub fn channel() -> (ChangeFeed, ChangeReceiver) {
    let (tx, rx) = mpsc::channel::<Change>(FEED_CAPACITY);
    (ChangeFeed { tx }, ChangeReceiver { rx })
}

impl ChangeFeed {
    pub fn publish(&self, change: Change) -> Delivery {
        match self.tx.try_send(change) {
            Ok(()) => Delivery::Delivered,
            Err(_) => Delivery::Dropped,
        }
    }
}

impl ChangeReceiver {
    /// Waits for the next change; `None` once every feed handle is gone.
    pub async fn recv(&mut self) -> Option<Change> {
        self.rx.recv().await
    }

    /// Takes the pending change, if any, without waiting.
    pub fn try_recv(&mut self) -> Option<Change> {
        self.rx.try_recv().ok()
    }
}
