#![forbid(unsafe_code)]

//! Command binding: wiring reactive commands to toolkit elements.
//!
//! A [`CommandBinder`] connects a [`Command`](bindery_runtime::Command) to
//! an element's trigger event and, when the element has one, its enabled
//! state. Neither side knows the other's concrete type: elements are passed
//! as [`BindingTarget`]s and their capabilities come from the
//! [`TargetRegistry`].
//!
//! # Architecture
//!
//! ```text
//! bind(command, target, parameter)
//!   ├─ StrategySet::resolve       highest affinity, first registered on ties
//!   ├─ resolve event              explicit name or strategy default
//!   ├─ subscribe trigger          fires command.execute(parameter.get())
//!   └─ subscribe can-execute      writes target enabled state (replayed now)
//!                 │
//!                 ▼
//!           BindingHandle         owns both subscriptions
//! ```
//!
//! Property-path binding ([`CommandBinder::bind_command`]) wraps the same
//! wiring in a slot that is rebuilt whenever the view model raises the
//! command property.
//!
//! # Invariants
//!
//! 1. A failed bind subscribes nothing and leaves the target's enabled state
//!    untouched.
//! 2. Each trigger firing invokes the command exactly once, with the
//!    parameter value current at firing time.
//! 3. The enabled state reflects the latest can-execute value and is applied
//!    synchronously during the bind call.
//! 4. A handle owns at most one trigger subscription and one can-execute
//!    subscription at a time.
//! 5. Disposal is idempotent and stops both invocation and enabled updates.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No compatible binder | Every strategy scores 0 | `BindError::NoCompatibleBinder` |
//! | Unknown event | Name not exposed by the type | `BindError::EventNotFound` |
//! | No enabled state | Component without one | Bind succeeds, sync skipped |
//! | Command dropped | Last strong `Rc` released | Firings and enabled updates become no-ops |
//! | Command property empty | View model holds `None` | Slot idle, `BindError::CommandAbsent` on the handle, `warn!` if it was live |
//! | Rebind fails | Should not happen after the first bind | Logged, slot left empty, error on the handle |

mod affinity;
mod binder;
mod config;
mod error;
mod handle;
mod property_path;
mod target;

pub use affinity::{
    AffinityScore, BindingStrategy, CONTROL_AFFINITY, EVENT_SOURCE_AFFINITY, EXACT_AFFINITY,
    GENERIC_DEFAULT_AFFINITY, GENERIC_EXPLICIT_AFFINITY, StrategySet,
};
pub use binder::{CommandBinder, DEFAULT_EVENT};
pub use config::BinderConfig;
#[cfg(feature = "policy-config")]
pub use error::ConfigError;
pub use error::BindError;
pub use handle::BindingHandle;
pub use property_path::control_path;
pub use target::{
    BindingTarget, DescriptorBuilder, ElementClass, EnabledAccess, TargetDescriptor,
    TargetRegistry,
};
