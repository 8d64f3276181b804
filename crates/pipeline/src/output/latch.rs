//! One-shot completion latch

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Resolves exactly once; every later `fire` is a no-op
///
/// Cloned into each resolution source (engine events, fallback timer).
pub struct CompletionLatch<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for CompletionLatch<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> CompletionLatch<T> {
    /// Create a latch and the receiver that observes its single value
    pub fn new() -> (Self, oneshot::Receiver<T>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                slot: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Commit `value` if nothing has been committed yet
    ///
    /// Returns true when this call won.
    pub fn fire(&self, value: T) -> bool {
        match self.slot.lock().take() {
            Some(tx) => {
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    pub fn is_fired(&self) -> bool {
        self.slot.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_fire_wins() {
        let (latch, rx) = CompletionLatch::new();
        let other = latch.clone();

        assert!(latch.fire("engine"));
        assert!(!other.fire("timer"));
        assert!(other.is_fired());
        assert_eq!(rx.await.unwrap(), "engine");
    }

    #[tokio::test]
    async fn test_fire_after_receiver_dropped() {
        let (latch, rx) = CompletionLatch::<u8>::new();
        drop(rx);
        assert!(latch.fire(1));
        assert!(!latch.fire(2));
    }
}
