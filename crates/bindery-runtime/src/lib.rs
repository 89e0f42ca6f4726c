#![forbid(unsafe_code)]

//! Runtime collaborators for the Bindery command bridge.
//!
//! - [`reactive`]: single-threaded change-tracking primitives
//!   ([`Observable`](reactive::Observable), [`Signal`](reactive::Signal),
//!   [`Subscription`](reactive::Subscription), [`Binding`](reactive::Binding)).
//! - [`command`]: the [`Command`](command::Command) contract consumed by the
//!   binders and the concrete [`ReactiveCommand`](command::ReactiveCommand).
//! - [`property`]: view-model change notification and property paths.

pub mod command;
pub mod property;
pub mod reactive;

pub use command::{Command, ReactiveCommand};
pub use property::{NotifyPropertyChanged, PropertyChanged, PropertyPath};
pub use reactive::{Binding, Observable, Signal, Subscription};
