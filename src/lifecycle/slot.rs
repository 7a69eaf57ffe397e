//! Replaceable values with drop-based cleanup.

use std::ops::Deref;

/// Manages the lifecycle of a value that may be changed.
///
/// Setting a new value drops (and thereby disposes) the previously held one.
/// Once the slot itself has been disposed, it stays empty and silently
/// refuses further values, so a late `set` from an already-torn-down owner
/// cannot resurrect a resource.
#[derive(Debug)]
pub struct MutableSlot<T> {
    value: Option<T>,
    disposed: bool,
}

impl<T> Default for MutableSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MutableSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            value: None,
            disposed: false,
        }
    }

    /// The current value, or `None` when empty or disposed.
    pub fn value(&self) -> Option<&T> {
        if self.disposed {
            None
        } else {
            self.value.as_ref()
        }
    }

    /// Set the value, dropping the previous one.
    ///
    /// Ignored after [`dispose`](Self::dispose): the new value is dropped
    /// immediately instead of being stored.
    pub fn set(&mut self, value: T) {
        if self.disposed {
            return;
        }
        self.value = Some(value);
    }

    /// Replace the value without dropping the old one, returning it.
    ///
    /// Unlike [`set`](Self::set) this hands the previous value back to the
    /// caller, who becomes responsible for disposing it.
    pub fn replace(&mut self, value: Option<T>) -> Option<T> {
        if self.disposed {
            return value;
        }
        std::mem::replace(&mut self.value, value)
    }

    /// Drop the current value, leaving the slot empty but usable.
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Dispose the slot: drop the current value and ignore future `set`s.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.value = None;
    }

    /// Whether the slot has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

/// A reference to a value bundled with cleanup that runs when the reference
/// is dropped or explicitly disposed.
///
/// The value stays accessible through `Deref` for the whole lifetime of the
/// reference; the cleanup closure runs at most once.
pub struct DisposableRef<T> {
    object: T,
    on_dispose: Option<Box<dyn FnOnce() + Send>>,
}

impl<T> DisposableRef<T> {
    /// Wrap a value with a cleanup closure.
    pub fn new(object: T, on_dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            object,
            on_dispose: Some(Box::new(on_dispose)),
        }
    }

    /// Wrap a value with no cleanup.
    pub fn without_cleanup(object: T) -> Self {
        Self {
            object,
            on_dispose: None,
        }
    }

    /// Run the cleanup now (at most once) while keeping the value alive.
    pub fn dispose(&mut self) {
        if let Some(on_dispose) = self.on_dispose.take() {
            on_dispose();
        }
    }

    /// A shared reference to the wrapped value.
    pub fn object(&self) -> &T {
        &self.object
    }
}

impl<T> Deref for DisposableRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

impl<T> Drop for DisposableRef<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Test value that counts drops.
    struct DropCounter(Arc<AtomicUsize>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_set_drops_previous() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut slot = MutableSlot::new();

        slot.set(DropCounter(drops.clone()));
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        slot.set(DropCounter(drops.clone()));
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        slot.clear();
        assert_eq!(drops.load(Ordering::SeqCst), 2);
        assert!(slot.value().is_none());
    }

    #[test]
    fn test_replace_returns_previous() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut slot = MutableSlot::new();

        slot.set(DropCounter(drops.clone()));
        let old = slot.replace(Some(DropCounter(drops.clone())));
        assert!(old.is_some());
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        drop(old);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disposed_slot_ignores_set() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut slot = MutableSlot::new();

        slot.set(DropCounter(drops.clone()));
        slot.dispose();
        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(slot.is_disposed());

        // Dropped immediately, never stored.
        slot.set(DropCounter(drops.clone()));
        assert_eq!(drops.load(Ordering::SeqCst), 2);
        assert!(slot.value().is_none());
    }

    #[test]
    fn test_disposable_ref_cleanup_on_drop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let r = DisposableRef::new(42, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(*r, 42);
        drop(r);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disposable_ref_explicit_dispose_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let mut r = DisposableRef::new("value", move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        r.dispose();
        assert_eq!(*r.object(), "value");
        drop(r);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
