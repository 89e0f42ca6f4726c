#![forbid(unsafe_code)]

//! Reactive primitives for command bindings.
//!
//! This module provides the change-tracking building blocks the binders sit on:
//!
//! - [`Observable`]: A shared, version-tracked value wrapper with change
//!   notification via subscriber callbacks.
//! - [`Signal`]: A stateless event source; every `emit` reaches every live
//!   subscriber, with no deduplication.
//! - [`Subscription`]: RAII guard that automatically unsubscribes on drop.
//! - [`Binding`]: A lazily evaluated read of the latest value, used as the
//!   parameter source of a command binding.
//!
//! # Architecture
//!
//! `Observable<T>` and `Signal<T>` use `Rc<RefCell<..>>` for single-threaded
//! shared ownership. Subscribers are stored as `Weak` function pointers and
//! cleaned up lazily during notification. The strong side lives inside the
//! [`Subscription`], so dropping the guard is all it takes to disconnect.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification, including later callbacks of a cycle already in flight.
//! 5. A callback that is running when its subscription drops completes with
//!    the state it captured.

pub mod binding;
pub mod observable;
pub mod signal;

pub use binding::{Binding, bind_mapped, bind_observable};
pub use observable::{Observable, Subscription};
pub use signal::Signal;
