//! Keyed registry of cancellable delayed tasks.
//!
//! Models flows like "remind this user in N minutes, unless superseded":
//! scheduling on an occupied key cancels the previous timer, and terminal
//! states cancel explicitly. Fired timers remove their own entry; nothing
//! waits for drop order to clean up.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::debug;

/// Composite key identifying one timer: a dashboard instance plus a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimerKey {
    pub instance_id: String,
    pub user_id: u64,
}

impl TimerKey {
    pub fn new(instance_id: impl Into<String>, user_id: u64) -> Self {
        Self {
            instance_id: instance_id.into(),
            user_id,
        }
    }
}

struct TimerEntry {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Registry owning every pending timer.
#[derive(Default)]
pub struct TimerRegistry {
    inner: Mutex<TimerState>,
}

#[derive(Default)]
struct TimerState {
    entries: HashMap<TimerKey, TimerEntry>,
    next_generation: u64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `on_fire` to run after `delay`, replacing (and cancelling)
    /// any timer already pending on the same key.
    pub fn schedule<F>(self: &Arc<Self>, key: TimerKey, delay: Duration, on_fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let registry = Arc::clone(self);
        let task_key = key.clone();

        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let generation = state.next_generation;
        state.next_generation += 1;

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            on_fire.await;
            registry.finish(&task_key, generation);
        });

        if let Some(previous) = state.entries.insert(key, TimerEntry { generation, handle }) {
            debug!(generation = previous.generation, "replacing pending timer");
            previous.handle.abort();
        }
    }

    /// Cancel a pending timer. Returns whether one was pending.
    pub fn cancel(&self, key: &TimerKey) -> bool {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        match state.entries.remove(key) {
            Some(entry) => {
                entry.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer for one instance (instance reached a
    /// terminal state).
    pub fn cancel_instance(&self, instance_id: &str) -> usize {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let keys: Vec<TimerKey> = state
            .entries
            .keys()
            .filter(|key| key.instance_id == instance_id)
            .cloned()
            .collect();
        for key in &keys {
            if let Some(entry) = state.entries.remove(key) {
                entry.handle.abort();
            }
        }
        keys.len()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a fired timer's own entry, unless the key was re-scheduled in
    /// the meantime (the newer generation owns the slot).
    fn finish(&self, key: &TimerKey, generation: u64) {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if state
            .entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
        {
            state.entries.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    async fn settle() {
        // Let spawned timer tasks run to completion under the paused clock.
        sleep(Duration::from_millis(1)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_the_delay_and_removes_itself() {
        let registry = Arc::new(TimerRegistry::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        registry.schedule(
            TimerKey::new("inst", 1),
            Duration::from_secs(60),
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        assert_eq!(registry.len(), 1);

        sleep(Duration::from_secs(61)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_cancels_the_previous_timer() {
        let registry = Arc::new(TimerRegistry::new());
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let counter = Arc::clone(&fired);
            registry.schedule(
                TimerKey::new("inst", 1),
                Duration::from_secs(60),
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            );
        }
        assert_eq!(registry.len(), 1);

        sleep(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let registry = Arc::new(TimerRegistry::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        let key = TimerKey::new("inst", 1);
        registry.schedule(key.clone(), Duration::from_secs(60), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.cancel(&key));
        assert!(!registry.cancel(&key));

        sleep(Duration::from_secs(120)).await;
        settle().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_instance_clears_only_that_instance() {
        let registry = Arc::new(TimerRegistry::new());

        for user_id in 1..=3 {
            registry.schedule(
                TimerKey::new("inst-a", user_id),
                Duration::from_secs(60),
                async {},
            );
        }
        registry.schedule(TimerKey::new("inst-b", 1), Duration::from_secs(60), async {});

        assert_eq!(registry.cancel_instance("inst-a"), 3);
        assert_eq!(registry.len(), 1);
    }
}
