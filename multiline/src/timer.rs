//! Deferred hide for the tooltip overlay.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedSender, WeakUnboundedSender};
use tokio::task::JoinHandle;

use crate::message::ChartEvent;

/// Identifies one armed hide timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Schedules one-shot hide timers.
///
/// An armed timer must eventually deliver [`ChartEvent::HideElapsed`] with its
/// token unless it is disarmed first.
pub trait HideTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration);

    /// Cancel a timer. Unknown or already-fired tokens are ignored.
    fn disarm(&mut self, token: TimerToken);
}

/// Hide timer backed by tokio tasks posting into the orchestrator's event channel.
///
/// The timer only holds a weak handle on the channel, so it never keeps the
/// event loop alive on its own.
#[derive(Debug)]
pub struct TokioHideTimer {
    events: WeakUnboundedSender<ChartEvent>,
    pending: HashMap<TimerToken, JoinHandle<()>>,
}

impl TokioHideTimer {
    pub fn new(events: &UnboundedSender<ChartEvent>) -> Self {
        Self {
            events: events.downgrade(),
            pending: HashMap::new(),
        }
    }

    /// Number of timers armed and not yet disarmed.
    pub fn pending(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }
}

impl HideTimer for TokioHideTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration) {
        self.pending.retain(|_, handle| !handle.is_finished());

        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let delivered = events
                .upgrade()
                .is_some_and(|tx| tx.send(ChartEvent::HideElapsed(token)).is_ok());
            if !delivered {
                tracing::debug!(token = token.id(), "Hide timer fired after event loop closed");
            }
        });
        self.pending.insert(token, handle);
    }

    fn disarm(&mut self, token: TimerToken) {
        if let Some(handle) = self.pending.remove(&token) {
            handle.abort();
        }
    }
}

impl Drop for TokioHideTimer {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}
