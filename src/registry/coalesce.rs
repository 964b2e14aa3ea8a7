//! Per-document in-flight coalescing.
//!
//! At most one refresh runs per document. A request that arrives while one is running does not start a second
//! pass; it waits for the running one and receives a clone of its result.
//!
//! ## Notes
//!
//! - There is no cancellation. If the leading request's future is dropped before it finishes, its followers see
//!   `None` and the slot is cleared, so the next request starts afresh.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

type Slot<T> = Option<watch::Receiver<Option<T>>>;

enum Role<T> {
    Lead(watch::Sender<Option<T>>),
    Follow(watch::Receiver<Option<T>>),
}

/// A single in-flight operation slot.
#[derive(Debug)]
pub struct InFlight<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Default for InFlight<T> {
    fn default() -> Self {
        Self { slot: Mutex::new(None) }
    }
}

impl<T: Clone> InFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an operation is currently running.
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `operation`, or join the one already running.
    ///
    /// ## Returns
    /// The operation's result, or `None` if the operation this call joined was abandoned.
    pub async fn run<F, Fut>(&self, operation: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let role = {
            let mut slot = self.lock();
            match slot.as_ref() {
                Some(receiver) => Role::Follow(receiver.clone()),
                None => {
                    let (sender, receiver) = watch::channel(None);
                    *slot = Some(receiver);
                    Role::Lead(sender)
                }
            }
        };
        let sender = match role {
            Role::Lead(sender) => sender,
            Role::Follow(receiver) => {
                tracing::debug!("joining in-flight operation");
                return wait(receiver).await;
            }
        };
        let _lead = Lead { slot: &self.slot };
        let result = operation().await;
        sender.send_replace(Some(result.clone()));
        Some(result)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn wait<T: Clone>(mut receiver: watch::Receiver<Option<T>>) -> Option<T> {
    loop {
        if let Some(result) = receiver.borrow_and_update().clone() {
            return Some(result);
        }
        if receiver.changed().await.is_err() {
            return receiver.borrow().clone();
        }
    }
}

/// Clears the slot when the leading request finishes or is dropped.
struct Lead<'a, T> {
    slot: &'a Mutex<Slot<T>>,
}

impl<T> Drop for Lead<'_, T> {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::Notify;

    use super::*;

    #[tokio::test]
    async fn concurrent_requests_share_one_run() {
        let in_flight = InFlight::<usize>::new();
        let runs = AtomicUsize::new(0);
        let release = Notify::new();

        let (leader, follower, ()) = tokio::join!(
            in_flight.run(|| async {
                release.notified().await;
                runs.fetch_add(1, Ordering::SeqCst) + 10
            }),
            in_flight.run(|| async { runs.fetch_add(1, Ordering::SeqCst) + 100 }),
            async { release.notify_one() },
        );

        assert_eq!(leader, Some(10));
        assert_eq!(follower, Some(10));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!in_flight.is_running());
    }

    #[tokio::test]
    async fn sequential_requests_run_again() {
        let in_flight = InFlight::new();
        assert_eq!(in_flight.run(|| async { 1 }).await, Some(1));
        assert_eq!(in_flight.run(|| async { 2 }).await, Some(2));
    }

    #[tokio::test]
    async fn abandoned_leader_releases_the_slot() {
        let in_flight = Arc::new(InFlight::<u8>::new());
        let leader = {
            let in_flight = in_flight.clone();
            tokio::spawn(async move { in_flight.run(std::future::pending::<u8>).await })
        };
        while !in_flight.is_running() {
            tokio::task::yield_now().await;
        }
        leader.abort();
        let _ = leader.await;
        assert!(!in_flight.is_running());
        assert_eq!(in_flight.run(|| async { 7 }).await, Some(7));
    }
}
