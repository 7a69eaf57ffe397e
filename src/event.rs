//! Callback event emitter with cancelable listener handles.
//!
//! Implements the "subscribe with a callback, get a cancelable handle back"
//! pattern. Listeners are invoked synchronously on the firing thread, in
//! subscription order.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::lifecycle::Subscription;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Listeners<T> {
    by_id: BTreeMap<u64, Listener<T>>,
    next_id: u64,
}

/// An event source that multiple listeners can subscribe to.
///
/// Cloning the emitter yields another handle to the same listener set, so a
/// component can keep one handle for firing and hand out another for
/// subscribing.
pub struct Emitter<T> {
    listeners: Arc<Mutex<Listeners<T>>>,
}

impl<T> Emitter<T> {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Listeners {
                by_id: BTreeMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Subscribe a listener; canceling the returned handle unsubscribes it.
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription
    where
        T: 'static,
    {
        let id = {
            let mut listeners = self.listeners.lock().unwrap();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.by_id.insert(id, Arc::new(listener));
            id
        };

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners.lock().unwrap().by_id.remove(&id);
        })
    }

    /// Fire the event, invoking every current listener with a reference to
    /// the value.
    ///
    /// Listeners subscribed during the call are first invoked on the next
    /// fire; listeners removed during the call are skipped.
    pub fn fire(&self, value: T) {
        // Snapshot ids so a listener removing itself does not invalidate
        // the iteration. The lock is released before each invocation so a
        // listener may subscribe or unsubscribe from within its callback.
        let ids: Vec<u64> = self.listeners.lock().unwrap().by_id.keys().copied().collect();
        for id in ids {
            let listener = self.listeners.lock().unwrap().by_id.get(&id).map(Arc::clone);
            if let Some(listener) = listener {
                listener(&value);
            }
        }
    }

    /// Number of currently subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().by_id.len()
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_fire_reaches_all_listeners() {
        let emitter = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = count.clone();
        let _s1 = emitter.subscribe(move |v: &usize| {
            c1.fetch_add(*v, Ordering::SeqCst);
        });
        let c2 = count.clone();
        let _s2 = emitter.subscribe(move |v: &usize| {
            c2.fetch_add(*v, Ordering::SeqCst);
        });

        emitter.fire(10);
        assert_eq!(count.load(Ordering::SeqCst), 20);
        assert_eq!(emitter.listener_count(), 2);
    }

    #[test]
    fn test_cancel_removes_listener() {
        let emitter = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        let mut sub = emitter.subscribe(move |_: &()| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        emitter.fire(());
        sub.cancel();
        emitter.fire(());

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_dropped_handle_unsubscribes() {
        let emitter = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));

        {
            let c = count.clone();
            let _sub = emitter.subscribe(move |_: &()| {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }

        emitter.fire(());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_removing_itself_mid_fire() {
        let emitter: Emitter<()> = Emitter::new();
        let count = Arc::new(AtomicUsize::new(0));

        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot2 = Arc::clone(&slot);
        let c = count.clone();
        let sub = emitter.subscribe(move |_: &()| {
            c.fetch_add(1, Ordering::SeqCst);
            if let Some(mut s) = slot2.lock().unwrap().take() {
                s.cancel();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        emitter.fire(());
        emitter.fire(());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
