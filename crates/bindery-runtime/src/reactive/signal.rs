#![forbid(unsafe_code)]

//! Stateless event sources.
//!
//! A [`Signal`] is the push-only sibling of [`Observable`](super::Observable):
//! it stores no value and does not deduplicate. Widgets expose their trigger
//! events (click, mouse-up, ...) as signals, and view models raise property
//! names through one.
//!
//! `T` may be unsized, so `Signal<str>` carries borrowed property names
//! without allocation.

use std::rc::Rc;

use super::observable::{SubscriberList, Subscription};

/// A multicast event source with weakly held subscribers.
pub struct Signal<T: ?Sized + 'static> {
    subscribers: Rc<SubscriberList<T>>,
}

impl<T: ?Sized + 'static> Signal<T> {
    /// Create a signal with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(SubscriberList::new()),
        }
    }

    /// Register `callback` for every future emission.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.subscribers.add(callback)
    }

    /// Deliver `value` synchronously to every live subscriber, in
    /// registration order.
    pub fn emit(&self, value: &T) {
        self.subscribers.notify(value);
    }

    /// Number of subscriptions that are still alive.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.live_count()
    }
}

impl<T: ?Sized + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<T: ?Sized + 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
