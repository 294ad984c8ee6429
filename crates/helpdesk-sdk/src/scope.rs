//! View scopes
//!
//! A scope ties in-flight requests to the view that issued them. Once the
//! scope is cancelled or dropped, requests run through it resolve to
//! [`Error::Cancelled`] instead of handing stale data to a view that is gone.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::{Error, Result};

#[derive(Debug)]
pub struct ViewScope {
    cancelled: Arc<watch::Sender<bool>>,
}

/// Cancels a [`ViewScope`] from elsewhere, e.g. a Ctrl-C handler.
#[derive(Debug, Clone)]
pub struct Canceller {
    cancelled: Arc<watch::Sender<bool>>,
}

impl Canceller {
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            cancelled: Arc::new(tx),
        }
    }

    pub fn canceller(&self) -> Canceller {
        Canceller {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Drive `request` unless the scope is cancelled first.
    pub async fn run<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let mut signal = self.cancelled.subscribe();
        if *signal.borrow_and_update() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = signal.wait_for(|cancelled| *cancelled) => {
                tracing::debug!("request dropped by cancelled view");
                Err(Error::Cancelled)
            }
            result = request => result,
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancelled.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completes_when_live() {
        let scope = ViewScope::new();
        let value = scope.run(async { Ok::<_, Error>(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_request() {
        let scope = ViewScope::new();
        let canceller = scope.canceller();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = scope
            .run(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, Error>(())
            })
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_scope_rejects_new_requests() {
        let scope = ViewScope::new();
        scope.cancel();
        assert!(scope.is_cancelled());
        let result = scope.run(async { Ok::<_, Error>(1) }).await;
        assert!(result.unwrap_err().is_cancelled());
    }

    #[test]
    fn test_drop_cancels() {
        let scope = ViewScope::new();
        let canceller = scope.canceller();
        assert!(!canceller.is_cancelled());
        drop(scope);
        assert!(canceller.is_cancelled());
    }
}
