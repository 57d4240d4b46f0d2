//! Two-way binding for one-way props
//!
//! A [`MirrorProp`] keeps a local shadow of a prop. The owner edits the
//! shadow freely; every change is announced to listeners (usually the parent,
//! which feeds the value back in as the prop). Incoming prop updates
//! overwrite the shadow. Only real changes are announced, so a value
//! bouncing back from the parent stops after one round.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use tidewater::mirror::MirrorProp;
//!
//! let emitted = Arc::new(Mutex::new(Vec::new()));
//! let mut open = MirrorProp::new("open", None, false);
//!
//! let sink = Arc::clone(&emitted);
//! open.on_change(move |name, value: &bool| sink.lock().unwrap().push((name.to_string(), *value)));
//!
//! open.set(true);
//! open.sync_from_prop(true);
//!
//! assert_eq!(*emitted.lock().unwrap(), vec![("open".to_string(), true)]);
//! ```

use std::fmt;

use crate::watch::{WatchId, Watchers};

/// Shadow copy of a prop that announces its changes.
pub struct MirrorProp<T> {
    name: String,
    value: T,
    watchers: Watchers<T>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> MirrorProp<T> {
    /// Start from the prop's value if it has one, else from `default`.
    pub fn new(name: impl Into<String>, prop: Option<T>, default: T) -> Self {
        MirrorProp {
            name: name.into(),
            value: prop.unwrap_or(default),
            watchers: Watchers::new(),
        }
    }

    /// The prop's name, used as the event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current shadow value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Change the shadow locally. Returns whether it changed.
    pub fn set(&mut self, value: T) -> bool {
        self.assign(value)
    }

    /// The prop changed upstream. Returns whether the shadow changed.
    pub fn sync_from_prop(&mut self, value: T) -> bool {
        self.assign(value)
    }

    /// Listen for changes as `(name, new_value)`.
    pub fn on_change<F>(&mut self, callback: F) -> WatchId
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
    {
        let name = self.name.clone();
        self.watchers.subscribe(move |value| callback(&name, value))
    }

    /// Stop listening.
    pub fn off_change(&mut self, id: WatchId) -> bool {
        self.watchers.unsubscribe(id)
    }

    fn assign(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        tracing::trace!(prop = %self.name, "mirrored prop changed");
        self.watchers.notify(&self.value);
        true
    }
}

impl<T: fmt::Debug> fmt::Debug for MirrorProp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MirrorProp")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("watchers", &self.watchers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn starts_from_prop_or_default() {
        let from_prop = MirrorProp::new("page", Some(3), 1);
        let from_default = MirrorProp::new("page", None, 1);
        assert_eq!(*from_prop.get(), 3);
        assert_eq!(*from_default.get(), 1);
    }

    #[test]
    fn prop_updates_are_announced() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut query = MirrorProp::new("query", None, String::new());
        let sink = Arc::clone(&seen);
        query.on_change(move |_, value: &String| sink.lock().unwrap().push(value.clone()));

        assert!(query.sync_from_prop("rust".to_string()));
        assert!(query.set("rust lang".to_string()));
        assert_eq!(*seen.lock().unwrap(), vec!["rust", "rust lang"]);
    }

    #[test]
    fn unchanged_values_are_silent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut page = MirrorProp::new("page", Some(2), 1);
        let counter = Arc::clone(&calls);
        let id = page.on_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!page.set(2));
        assert!(!page.sync_from_prop(2));
        assert!(page.set(5));
        assert!(page.off_change(id));
        assert!(page.set(6));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn parent_echo_settles() {
        // The parent writes every emitted value back into the prop.
        let echoes = Arc::new(Mutex::new(Vec::new()));
        let mut flag = MirrorProp::new("checked", None, false);
        let sink = Arc::clone(&echoes);
        flag.on_change(move |_, value: &bool| sink.lock().unwrap().push(*value));

        flag.set(true);
        let pending: Vec<bool> = echoes.lock().unwrap().clone();
        for value in pending {
            assert!(!flag.sync_from_prop(value));
        }
        assert_eq!(*echoes.lock().unwrap(), vec![true]);
    }
}
