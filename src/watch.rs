//! Explicit observer registration
//!
//! [`Watchers`] is the notification primitive behind prop validity tracking,
//! prop mirroring and the state manager. Callbacks are registered up front
//! and invoked synchronously, in registration order, whenever the owner
//! reports a change.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use tidewater::watch::Watchers;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut watchers = Watchers::new();
//!
//! let sink = Arc::clone(&seen);
//! let id = watchers.subscribe(move |value: &i32| sink.lock().unwrap().push(*value));
//!
//! watchers.notify(&1);
//! watchers.unsubscribe(id);
//! watchers.notify(&2);
//!
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! ```

use std::fmt;

/// Handle returned by [`Watchers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// An ordered set of change callbacks for values of type `T`.
pub struct Watchers<T: ?Sized> {
    next_id: u64,
    callbacks: Vec<(WatchId, Callback<T>)>,
}

impl<T: ?Sized> Watchers<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Watchers {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }

    /// Register a callback.
    pub fn subscribe<F>(&mut self, callback: F) -> WatchId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: WatchId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Invoke every callback with `value`.
    pub fn notify(&self, value: &T) {
        tracing::trace!(watchers = self.callbacks.len(), "notifying watchers");
        for (_, callback) in &self.callbacks {
            callback(value);
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<T: ?Sized> Default for Watchers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Watchers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchers")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn notifies_in_registration_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut watchers = Watchers::<str>::new();

        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            watchers.subscribe(move |value: &str| {
                order.lock().unwrap().push(format!("{tag}:{value}"));
            });
        }

        watchers.notify("x");
        assert_eq!(*order.lock().unwrap(), vec!["first:x", "second:x"]);
    }

    #[test]
    fn unsubscribe_twice_reports_false() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut watchers = Watchers::<u8>::new();
        let counter = Arc::clone(&calls);
        let id = watchers.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(watchers.unsubscribe(id));
        assert!(!watchers.unsubscribe(id));
        watchers.notify(&7);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(watchers.is_empty());
    }
}
