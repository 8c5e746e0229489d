use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Handed out for every upsell signal. Only the newest ticket of a key may fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
    issued: Instant,
}

/// Trailing debounce of upsell signals per chat: a burst of signals inside the
/// delay window produces a single prompt.
pub struct UpsellDebouncer<K> {
    delay: Duration,
    pending: Mutex<Pending<K>>,
}

struct Pending<K> {
    next: u64,
    latest: HashMap<K, u64>,
}

impl<K: Clone + Eq + Hash> UpsellDebouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(Pending {
                next: 0,
                latest: HashMap::new(),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a signal for `key`, superseding any ticket still waiting.
    pub fn signal(&self, key: K) -> Ticket<K> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let generation = pending.next;
        pending.next = pending.next.wrapping_add(1);
        pending.latest.insert(key.clone(), generation);
        Ticket {
            key,
            generation,
            issued: Instant::now(),
        }
    }

    /// Drops the waiting ticket of `key`, if any, so it never fires.
    pub fn cancel(&self, key: &K) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.latest.remove(key);
    }

    /// `true` exactly once, for the newest ticket of its key.
    pub fn fire(&self, ticket: &Ticket<K>) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.latest.get(&ticket.key) == Some(&ticket.generation) {
            pending.latest.remove(&ticket.key);
            true
        } else {
            false
        }
    }

    /// Waits out the delay counted from the signal, then fires the ticket.
    pub async fn wait(&self, ticket: &Ticket<K>) -> bool {
        sleep_until(ticket.issued + self.delay).await;
        self.fire(ticket)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn debouncer() -> UpsellDebouncer<i64> {
        UpsellDebouncer::new(Duration::from_millis(1500))
    }

    #[test]
    fn test_single_signal_fires_once() {
        let gate = debouncer();
        let ticket = gate.signal(1);
        assert!(gate.fire(&ticket));
        assert!(!gate.fire(&ticket));
    }

    #[test]
    fn test_burst_fires_only_latest() {
        let gate = debouncer();
        let first = gate.signal(1);
        let second = gate.signal(1);
        let third = gate.signal(1);
        assert!(!gate.fire(&first));
        assert!(!gate.fire(&second));
        assert!(gate.fire(&third));
    }

    #[test]
    fn test_keys_are_independent() {
        let gate = debouncer();
        let a = gate.signal(1);
        let b = gate.signal(2);
        assert!(gate.fire(&a));
        assert!(gate.fire(&b));
    }

    #[test]
    fn test_new_burst_after_fire() {
        let gate = debouncer();
        let first = gate.signal(1);
        assert!(gate.fire(&first));
        let next = gate.signal(1);
        assert!(!gate.fire(&first));
        assert!(gate.fire(&next));
        assert_eq!(gate.delay(), Duration::from_millis(1500));
    }

    #[test]
    fn test_cancel_drops_waiting_ticket() {
        let gate = debouncer();
        let ticket = gate.signal(1);
        let other = gate.signal(2);
        gate.cancel(&1);
        assert!(!gate.fire(&ticket));
        assert!(gate.fire(&other));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_prompts_once_after_delay() {
        let gate = Arc::new(debouncer());
        let fired = Arc::new(AtomicUsize::new(0));

        let handles = (0..3)
            .map(|_| {
                let ticket = gate.signal(1);
                let gate = gate.clone();
                let fired = fired.clone();
                tokio::spawn(async move {
                    if gate.wait(&ticket).await {
                        fired.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect::<Vec<_>>();

        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_millis(600)).await;
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_ticket_never_prompts() {
        let gate = debouncer();
        let ticket = gate.signal(1);
        gate.cancel(&1);
        assert!(!gate.wait(&ticket).await);
    }
}
