//! Per-room idle timers.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::LifecycleEvent;

/// Owns the idle countdown for every empty room.
///
/// Timer identity is an explicit `name → AbortHandle` table, not a
/// closure capturing room state: a timer task only sleeps and then sends
/// [`LifecycleEvent::TimerExpired`] back into the dispatcher channel,
/// where the room is re-validated against the registry. A fire for a
/// room that was torn down through another path is therefore a no-op,
/// never a use-after-free of stale context.
#[derive(Debug)]
pub struct Reaper {
    timeout: Duration,
    events: mpsc::Sender<LifecycleEvent>,
    timers: HashMap<String, AbortHandle>,
}

impl Reaper {
    /// Creates a reaper that arms single-shot timers of `timeout` and
    /// delivers expirations into `events`.
    pub fn new(timeout: Duration, events: mpsc::Sender<LifecycleEvent>) -> Self {
        Self {
            timeout,
            events,
            timers: HashMap::new(),
        }
    }

    /// The configured idle timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Arms the idle countdown for a room.
    ///
    /// The occupancy state machine never arms an already-armed room —
    /// if it happens anyway the old timer is replaced and the condition
    /// logged as a bug.
    pub fn arm(&mut self, name: &str) {
        if let Some(old) = self.timers.remove(name) {
            warn!(room = name, "timer armed while already armed — replacing (bug)");
            old.abort();
        }

        let events = self.events.clone();
        let timeout = self.timeout;
        let room = name.to_string();
        let task = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // Service gone — nothing left to tear down.
            let _ = events.send(LifecycleEvent::TimerExpired { name: room }).await;
        });

        debug!(room = name, timeout_secs = timeout.as_secs(), "idle timer armed");
        self.timers.insert(name.to_string(), task.abort_handle());
    }

    /// Cancels a room's countdown. Returns `false` (and does nothing) if
    /// no timer was armed — safe to call unconditionally.
    pub fn cancel(&mut self, name: &str) -> bool {
        match self.timers.remove(name) {
            Some(handle) => {
                handle.abort();
                debug!(room = name, "idle timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Drops a fired timer's table entry without aborting (the task has
    /// already completed by sending its expiry event).
    pub fn clear_fired(&mut self, name: &str) {
        self.timers.remove(name);
    }

    /// Whether the room currently has an armed timer.
    pub fn is_armed(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    /// Number of outstanding timers.
    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Aborts every outstanding timer. Called on service shutdown.
    pub fn abort_all(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
    }
}

impl Drop for Reaper {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaper(timeout: Duration) -> (Reaper, mpsc::Receiver<LifecycleEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (Reaper::new(timeout, tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_timer_delivers_expiry() {
        let (mut reaper, mut rx) = reaper(Duration::from_secs(300));
        reaper.arm("game_room_1");
        assert!(reaper.is_armed("game_room_1"));

        let event = rx.recv().await.unwrap();
        match event {
            LifecycleEvent::TimerExpired { name } => assert_eq!(name, "game_room_1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_expiry() {
        let (mut reaper, mut rx) = reaper(Duration::from_secs(300));
        reaper.arm("game_room_1");
        assert!(reaper.cancel("game_room_1"));
        assert!(!reaper.is_armed("game_room_1"));

        // Wait past the deadline — nothing may arrive.
        let result =
            tokio::time::timeout(Duration::from_secs(600), rx.recv()).await;
        assert!(result.is_err(), "cancelled timer must not fire");
    }

    #[tokio::test]
    async fn test_cancel_without_timer_is_noop() {
        let (mut reaper, _rx) = reaper(Duration::from_secs(300));
        assert!(!reaper.cancel("game_room_1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_does_not_disturb_other_timers() {
        let (mut reaper, mut rx) = reaper(Duration::from_secs(300));
        reaper.arm("game_room_1");
        reaper.arm("game_room_2");
        reaper.cancel("game_room_1");
        assert_eq!(reaper.armed_count(), 1);

        let event = rx.recv().await.unwrap();
        match event {
            LifecycleEvent::TimerExpired { name } => assert_eq!(name, "game_room_2"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearming_replaces_the_old_timer() {
        let (mut reaper, mut rx) = reaper(Duration::from_secs(300));
        reaper.arm("game_room_1");
        reaper.arm("game_room_1");
        assert_eq!(reaper.armed_count(), 1);

        // Only one expiry arrives.
        rx.recv().await.unwrap();
        let extra = tokio::time::timeout(Duration::from_secs(600), rx.recv()).await;
        assert!(extra.is_err(), "replaced timer must not fire twice");
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_all_clears_everything() {
        let (mut reaper, mut rx) = reaper(Duration::from_secs(300));
        reaper.arm("game_room_1");
        reaper.arm("game_room_2");
        reaper.abort_all();
        assert_eq!(reaper.armed_count(), 0);

        let result = tokio::time::timeout(Duration::from_secs(600), rx.recv()).await;
        assert!(result.is_err());
    }
}
