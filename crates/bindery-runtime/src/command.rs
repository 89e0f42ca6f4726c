#![forbid(unsafe_code)]

//! Reactive commands: an action paired with a can-execute signal.
//!
//! The binders only see the [`Command`] trait. [`ReactiveCommand`] is the
//! stock implementation view models hold.
//!
//! # Invariants
//!
//! 1. `subscribe_can_execute` delivers the current can-execute value to the
//!    new subscriber synchronously, before returning, and before any later
//!    change.
//! 2. `execute` never checks can-execute. Whether a disabled command may run is
//!    decided by whoever raises it (normally a disabled widget simply does not
//!    fire).
//! 3. `executed()` is raised after the action returns, once per `execute`.

use std::cell::Cell;
use std::rc::Rc;

use crate::reactive::{Observable, Signal, Subscription};

/// An invokable unit of work with an observable can-execute state.
pub trait Command<P> {
    /// Run the command with `parameter`.
    fn execute(&self, parameter: &P);

    /// The latest can-execute value.
    fn can_execute(&self) -> bool;

    /// Observe can-execute changes. The current value is replayed to
    /// `callback` before this returns.
    fn subscribe_can_execute(&self, callback: Box<dyn Fn(bool)>) -> Subscription;
}

/// Stock [`Command`] built from a closure.
///
/// # Example
///
/// ```
/// use bindery_runtime::command::{Command, ReactiveCommand};
/// use bindery_runtime::reactive::Observable;
///
/// let can_save = Observable::new(false);
/// let save = ReactiveCommand::with_can_execute(|doc: &String| assert!(!doc.is_empty()), &can_save);
///
/// assert!(!save.can_execute());
/// can_save.set(true);
/// assert!(save.can_execute());
///
/// save.execute(&"draft".to_string());
/// assert_eq!(save.execution_count(), 1);
/// ```
pub struct ReactiveCommand<P: 'static> {
    action: Box<dyn Fn(&P)>,
    can_execute: Observable<bool>,
    executed: Signal<P>,
    executions: Cell<u64>,
}

impl<P: 'static> ReactiveCommand<P> {
    /// A command that can always execute.
    pub fn new(action: impl Fn(&P) + 'static) -> Self {
        Self::with_can_execute(action, &Observable::new(true))
    }

    /// A command whose can-execute state follows `can_execute`.
    pub fn with_can_execute(action: impl Fn(&P) + 'static, can_execute: &Observable<bool>) -> Self {
        Self {
            action: Box::new(action),
            can_execute: can_execute.clone(),
            executed: Signal::new(),
            executions: Cell::new(0),
        }
    }

    /// A command that does nothing when executed.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Convenience for `Rc::new(Self::new(action))`.
    pub fn shared(action: impl Fn(&P) + 'static) -> Rc<Self> {
        Rc::new(Self::new(action))
    }

    /// Raised with the parameter after each execution.
    #[must_use]
    pub fn executed(&self) -> &Signal<P> {
        &self.executed
    }

    /// Number of completed executions.
    #[must_use]
    pub fn execution_count(&self) -> u64 {
        self.executions.get()
    }

    /// The observable driving can-execute.
    #[must_use]
    pub fn can_execute_source(&self) -> &Observable<bool> {
        &self.can_execute
    }
}

impl<P: 'static> Command<P> for ReactiveCommand<P> {
    fn execute(&self, parameter: &P) {
        (self.action)(parameter);
        self.executions.set(self.executions.get() + 1);
        tracing::trace!(executions = self.executions.get(), "command executed");
        self.executed.emit(parameter);
    }

    fn can_execute(&self) -> bool {
        self.can_execute.get()
    }

    fn subscribe_can_execute(&self, callback: Box<dyn Fn(bool)>) -> Subscription {
        self.can_execute
            .subscribe_with_replay(move |value| callback(*value))
    }
}

impl<P: 'static> std::fmt::Debug for ReactiveCommand<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveCommand")
            .field("can_execute", &self.can_execute.get())
            .field("executions", &self.executions.get())
            .finish()
    }
}
