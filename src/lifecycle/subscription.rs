//! Cancelable subscription handles.

/// A handle to a cancelable registration (a listener, a buffering session,
/// a registered provider).
///
/// Canceling runs the underlying canceler at most once. Dropping the handle
/// cancels it as well, so a subscription stays alive exactly as long as the
/// handle does unless it is explicitly [`detach`](Self::detach)ed.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Create a subscription from a canceler closure.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Create an already-canceled subscription.
    ///
    /// Useful as a placeholder where a registration did not take place.
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Cancel the subscription.
    ///
    /// Idempotent: the second and later calls are no-ops.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Whether the subscription has not been canceled yet.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Consume the handle without canceling.
    ///
    /// The registration then lives as long as whatever it is registered on.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_cancel_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut sub = Subscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(sub.is_active());
        sub.cancel();
        sub.cancel();
        drop(sub);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        drop(sub);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_detach_skips_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = Subscription::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        sub.detach();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_is_inactive() {
        let mut sub = Subscription::empty();
        assert!(!sub.is_active());
        sub.cancel();
    }
}
