//! Cancellable celebration expiry.

use std::time::Duration;

use shared::protocol::GameEvent;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::debug;

/// Seam between the controller and whatever clock drives celebration expiry.
pub trait CelebrationScheduler {
    /// Cancels any pending expiry, then arms a new one for `generation`.
    fn schedule(&mut self, generation: u64, after: Duration);
    fn cancel(&mut self);
}

/// Delivers `GameEvent::CelebrationExpired` back into the event loop after a sleep.
///
/// Must be used from inside a tokio runtime.
pub struct TokioCelebrationTimer {
    events: UnboundedSender<GameEvent>,
    pending: Option<JoinHandle<()>>,
}

impl TokioCelebrationTimer {
    pub fn new(events: UnboundedSender<GameEvent>) -> Self {
        Self {
            events,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl CelebrationScheduler for TokioCelebrationTimer {
    fn schedule(&mut self, generation: u64, after: Duration) {
        self.cancel();

        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if events
                .send(GameEvent::CelebrationExpired { generation })
                .is_err()
            {
                debug!(generation, "event loop closed before celebration expired");
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioCelebrationTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
