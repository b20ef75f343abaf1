//! Release latch used by the mock adapters to hold calls in flight.

use std::sync::Arc;

use tokio::sync::watch;

/// Holds mock calls open until released.
///
/// Once released it stays released.
#[derive(Clone, Debug)]
pub struct Gate {
    released: Arc<watch::Sender<bool>>,
}

impl Gate {
    pub fn new() -> Self {
        let (released, _) = watch::channel(false);
        Self {
            released: Arc::new(released),
        }
    }

    /// Lets every held call, and every later one, proceed.
    pub fn release(&self) {
        self.released.send_replace(true);
    }

    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }

    /// Waits until the gate is released.
    pub async fn wait(&self) {
        let mut rx = self.released.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_returns_after_release() {
        let gate = Gate::new();
        let waiter = gate.clone();
        let task = tokio::spawn(async move { waiter.wait().await });

        tokio::task::yield_now().await;
        assert!(!task.is_finished());
        gate.release();

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn released_gate_does_not_block() {
        let gate = Gate::new();
        gate.release();
        assert!(gate.is_released());
        tokio::time::timeout(Duration::from_secs(1), gate.wait())
            .await
            .unwrap();
    }
}
