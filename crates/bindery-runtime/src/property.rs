#![forbid(unsafe_code)]

//! View-model change notification and property paths.
//!
//! A view model embeds a [`PropertyChanged`] notifier and raises the name of
//! each property it reassigns. A [`PropertyPath`] pairs that name with a
//! reader closure, so a binder can both read the property and filter the
//! notification stream down to it.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use bindery_runtime::property::{NotifyPropertyChanged, PropertyChanged, PropertyPath};
//!
//! #[derive(Default)]
//! struct Settings {
//!     changed: PropertyChanged,
//!     title: RefCell<String>,
//! }
//!
//! impl NotifyPropertyChanged for Settings {
//!     fn property_changed(&self) -> &PropertyChanged {
//!         &self.changed
//!     }
//! }
//!
//! let title = PropertyPath::new("title", |s: &Settings| s.title.borrow().clone());
//! let settings = Settings::default();
//! settings.changed.assign(&settings.title, "Untitled".to_string(), title.name());
//! assert_eq!(title.read(&settings), "Untitled");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::{Signal, Subscription};

/// Notifier raised by a view model whenever one of its properties changes.
#[derive(Clone, Debug, Default)]
pub struct PropertyChanged {
    signal: Signal<str>,
}

impl PropertyChanged {
    /// Create a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce that `property` changed.
    pub fn raise(&self, property: &str) {
        tracing::trace!(property, "property changed");
        self.signal.emit(property);
    }

    /// Observe every property change.
    pub fn subscribe(&self, callback: impl Fn(&str) + 'static) -> Subscription {
        self.signal.subscribe(callback)
    }

    /// Observe changes to `property` only.
    pub fn subscribe_to(
        &self,
        property: &'static str,
        callback: impl Fn() + 'static,
    ) -> Subscription {
        self.signal.subscribe(move |name| {
            if name == property {
                callback();
            }
        })
    }

    /// Store `value` in `slot`, then raise `property`.
    ///
    /// The slot borrow is released before subscribers run, so they may read
    /// the property back.
    pub fn assign<T>(&self, slot: &RefCell<T>, value: T, property: &str) {
        *slot.borrow_mut() = value;
        self.raise(property);
    }

    /// Like [`assign`](Self::assign) but skips the notification when the
    /// value is unchanged. Returns whether a change was raised.
    pub fn assign_if_changed<T: PartialEq>(
        &self,
        slot: &RefCell<T>,
        value: T,
        property: &str,
    ) -> bool {
        if *slot.borrow() == value {
            return false;
        }
        self.assign(slot, value, property);
        true
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.signal.subscriber_count()
    }
}

/// Implemented by view models that announce property changes.
pub trait NotifyPropertyChanged {
    /// The notifier the view model raises on.
    fn property_changed(&self) -> &PropertyChanged;
}

/// A named accessor from `S` to one of its properties.
///
/// The name must match what the owner passes to [`PropertyChanged::raise`].
pub struct PropertyPath<S: ?Sized, T> {
    name: &'static str,
    read: Rc<dyn Fn(&S) -> T>,
}

impl<S: ?Sized, T> PropertyPath<S, T> {
    /// Build a path from its property name and reader.
    pub fn new(name: &'static str, read: impl Fn(&S) -> T + 'static) -> Self {
        Self {
            name,
            read: Rc::new(read),
        }
    }

    /// The property name used for change filtering.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read the property's current value off `source`.
    pub fn read(&self, source: &S) -> T {
        (self.read)(source)
    }
}

impl<S: ?Sized, T> Clone for PropertyPath<S, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            read: Rc::clone(&self.read),
        }
    }
}

impl<S: ?Sized, T> std::fmt::Debug for PropertyPath<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyPath")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn subscribe_to_filters_by_name() {
        let changed = PropertyChanged::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = changed.subscribe_to("command1", move || h.set(h.get() + 1));

        changed.raise("command2");
        changed.raise("command1");
        changed.raise("command1");
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn assign_releases_borrow_before_notify() {
        let changed = PropertyChanged::new();
        let slot = Rc::new(RefCell::new(1));
        let read_back = Rc::new(Cell::new(0));

        let s = Rc::clone(&slot);
        let r = Rc::clone(&read_back);
        let _sub = changed.subscribe(move |_| r.set(*s.borrow()));

        changed.assign(&slot, 2, "value");
        assert_eq!(read_back.get(), 2);
    }

    #[test]
    fn assign_if_changed_skips_equal() {
        let changed = PropertyChanged::new();
        let slot = RefCell::new("a".to_string());
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = changed.subscribe(move |_| h.set(h.get() + 1));

        assert!(!changed.assign_if_changed(&slot, "a".to_string(), "name"));
        assert!(changed.assign_if_changed(&slot, "b".to_string(), "name"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn path_reads_current_value() {
        struct Vm {
            count: Cell<u32>,
        }
        let path = PropertyPath::new("count", |vm: &Vm| vm.count.get());
        let vm = Vm {
            count: Cell::new(3),
        };
        assert_eq!(path.read(&vm), 3);
        vm.count.set(4);
        assert_eq!(path.clone().read(&vm), 4);
        assert_eq!(path.name(), "count");
    }
}
