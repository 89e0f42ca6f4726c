#![forbid(unsafe_code)]

//! Version-tracked observable values and their subscription guards.
//!
//! # Usage
//!
//! ```
//! use bindery_runtime::reactive::Observable;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let enabled = Observable::new(true);
//! let seen = Rc::new(Cell::new(true));
//!
//! let s = Rc::clone(&seen);
//! let _sub = enabled.subscribe(move |v| s.set(*v));
//!
//! enabled.set(false);
//! assert!(!seen.get());
//! assert_eq!(enabled.version(), 1);
//! ```
//!
//! # Failure Modes
//!
//! - Callback panic: propagates to the caller of `set()`; the observable's
//!   value has already been updated.
//! - Re-entrant `set()` from a callback: allowed. The nested notification runs
//!   to completion before the outer cycle continues.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

/// Ordered list of weakly held subscriber callbacks.
///
/// Shared by [`Observable`] and [`Signal`](super::Signal). Notification takes
/// a snapshot of the weak pointers and upgrades each one right before calling
/// it, so no `RefCell` borrow is held while user code runs.
pub(crate) struct SubscriberList<T: ?Sized + 'static> {
    entries: RefCell<Vec<Weak<Callback<T>>>>,
}

impl<T: ?Sized + 'static> SubscriberList<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn add(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        let mut entries = self.entries.borrow_mut();
        // A dead `Weak` still pins its callback's allocation; sources that
        // rarely notify would otherwise grow with every dropped guard.
        entries.retain(|w| w.strong_count() > 0);
        entries.push(Rc::downgrade(&strong));
        Subscription::new(strong)
    }

    pub(crate) fn notify(&self, value: &T) {
        let snapshot = self.entries.borrow().clone();
        for weak in &snapshot {
            // Upgrade late: a subscription dropped by an earlier callback in
            // this cycle must not fire.
            if let Some(callback) = weak.upgrade() {
                callback(value);
            }
        }
        self.entries.borrow_mut().retain(|w| w.strong_count() > 0);
    }

    #[cfg(test)]
    pub(crate) fn stored_count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// RAII guard for a subscriber callback.
///
/// The guard owns the only strong reference to the callback; the source keeps
/// a `Weak`. Dropping the guard (or calling [`cancel`](Self::cancel))
/// disconnects it.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    guard: Option<Box<dyn Any>>,
}

impl Subscription {
    pub(crate) fn new<C: ?Sized + 'static>(callback: Rc<C>) -> Self {
        Self {
            guard: Some(Box::new(callback)),
        }
    }

    /// A subscription that is not attached to anything.
    pub fn empty() -> Self {
        Self { guard: None }
    }

    /// Whether this guard still holds its callback.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.guard.is_some()
    }

    /// Disconnect now. Calling this more than once is a no-op.
    pub fn cancel(&mut self) {
        self.guard = None;
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct ObservableState<T> {
    value: T,
    version: u64,
}

struct ObservableInner<T: 'static> {
    state: RefCell<ObservableState<T>>,
    subscribers: SubscriberList<T>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` produces another handle to the same value.
pub struct Observable<T: 'static> {
    inner: Rc<ObservableInner<T>>,
}

impl<T: 'static> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Observable")
            .field("value", &state.value)
            .field("version", &state.version)
            .field("subscribers", &self.inner.subscribers.live_count())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(ObservableInner {
                state: RefCell::new(ObservableState { value, version: 0 }),
                subscribers: SubscriberList::new(),
            }),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.state.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.state.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        let changed = {
            let mut state = self.inner.state.borrow_mut();
            if state.value == value {
                false
            } else {
                state.value = value;
                state.version += 1;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Mutate the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Number of changes applied since creation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.state.borrow().version
    }

    /// Subscribe to future changes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.inner.subscribers.add(callback)
    }

    /// Subscribe to future changes and deliver the current value to
    /// `callback` synchronously before returning.
    pub fn subscribe_with_replay(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        let forward = Rc::clone(&callback);
        let sub = self.inner.subscribers.add(move |v| forward(v));
        let current = self.get();
        callback(&current);
        sub
    }

    /// Number of subscriptions that are still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.live_count()
    }

    fn notify(&self) {
        let value = self.get();
        self.inner.subscribers.notify(&value);
    }
}
