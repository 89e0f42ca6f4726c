//! Revocable binding handles.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_runtime::reactive::Subscription;

use super::BindError;
use super::affinity::{AffinityScore, BindingStrategy};

/// The rebindable half of a property-path binding, seen through a trait
/// object so the handle does not carry the command and parameter types.
pub(crate) trait InnerSlot {
    /// Dispose the current inner binding and refuse any later rebind.
    fn release(&self);
    /// Whether a command is currently wired.
    fn is_live(&self) -> bool;
    /// Whether the wired command drives the target's enabled state.
    fn syncs_enabled(&self) -> bool;
    /// Why the slot is idle, if it is.
    fn last_error(&self) -> Option<BindError>;
}

enum HandleState {
    Direct {
        trigger: Subscription,
        can_execute: Option<Subscription>,
    },
    PropertyPath {
        changes: Subscription,
        slot: Rc<dyn InnerSlot>,
    },
}

/// One active command binding.
///
/// Dropping the handle disposes it. [`dispose`](Self::dispose) may be called
/// any number of times, including from inside the bound command.
#[must_use = "dropping a BindingHandle disposes the binding"]
pub struct BindingHandle {
    state: RefCell<Option<HandleState>>,
    target_type: &'static str,
    event: &'static str,
    strategy: BindingStrategy,
    score: AffinityScore,
}

impl BindingHandle {
    pub(crate) fn direct(
        trigger: Subscription,
        can_execute: Option<Subscription>,
        target_type: &'static str,
        event: &'static str,
        strategy: BindingStrategy,
        score: AffinityScore,
    ) -> Self {
        Self {
            state: RefCell::new(Some(HandleState::Direct {
                trigger,
                can_execute,
            })),
            target_type,
            event,
            strategy,
            score,
        }
    }

    pub(crate) fn property_path(
        changes: Subscription,
        slot: Rc<dyn InnerSlot>,
        target_type: &'static str,
        event: &'static str,
        strategy: BindingStrategy,
        score: AffinityScore,
    ) -> Self {
        Self {
            state: RefCell::new(Some(HandleState::PropertyPath { changes, slot })),
            target_type,
            event,
            strategy,
            score,
        }
    }

    /// Cancel every subscription this handle owns.
    pub fn dispose(&self) {
        // Take the state first so nothing is borrowed while callbacks drop.
        let Some(state) = self.state.borrow_mut().take() else {
            return;
        };
        match state {
            HandleState::Direct {
                trigger,
                can_execute,
            } => {
                drop(trigger);
                drop(can_execute);
            }
            HandleState::PropertyPath { changes, slot } => {
                drop(changes);
                slot.release();
            }
        }
        tracing::debug!(
            target_type = self.target_type,
            event = self.event,
            "command binding disposed"
        );
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.state.borrow().is_none()
    }

    /// Whether a command is wired right now. A property-path binding whose
    /// command property is `None` is not disposed but also not live.
    #[must_use]
    pub fn is_live(&self) -> bool {
        match &*self.state.borrow() {
            Some(HandleState::Direct { .. }) => true,
            Some(HandleState::PropertyPath { slot, .. }) => slot.is_live(),
            None => false,
        }
    }

    /// Whether can-execute is being written to the target's enabled state.
    /// For a property-path binding this follows the current inner binding.
    #[must_use]
    pub fn syncs_enabled(&self) -> bool {
        match &*self.state.borrow() {
            Some(HandleState::Direct { can_execute, .. }) => can_execute.is_some(),
            Some(HandleState::PropertyPath { slot, .. }) => slot.syncs_enabled(),
            None => false,
        }
    }

    /// For a property-path binding that is not live, the reason: the command
    /// property is empty or the last rebind could not be wired. `None` for
    /// direct bindings, disposed handles and live bindings.
    #[must_use]
    pub fn rebind_error(&self) -> Option<BindError> {
        match &*self.state.borrow() {
            Some(HandleState::PropertyPath { slot, .. }) => slot.last_error(),
            _ => None,
        }
    }

    /// Registered name of the target's type.
    #[must_use]
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    /// The trigger event the command is bound to.
    #[must_use]
    pub fn event(&self) -> &'static str {
        self.event
    }

    /// The strategy that won affinity resolution.
    #[must_use]
    pub fn strategy(&self) -> BindingStrategy {
        self.strategy
    }

    #[must_use]
    pub fn score(&self) -> AffinityScore {
        self.score
    }
}

impl Drop for BindingHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for BindingHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingHandle")
            .field("target_type", &self.target_type)
            .field("event", &self.event)
            .field("strategy", &self.strategy)
            .field("score", &self.score)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindery_runtime::reactive::Signal;
    use std::cell::Cell;

    struct FakeSlot {
        released: Cell<u32>,
    }

    impl InnerSlot for FakeSlot {
        fn release(&self) {
            self.released.set(self.released.get() + 1);
        }

        fn is_live(&self) -> bool {
            self.released.get() == 0
        }

        fn syncs_enabled(&self) -> bool {
            self.is_live()
        }

        fn last_error(&self) -> Option<BindError> {
            (!self.is_live()).then(|| BindError::CommandAbsent {
                property: "save".into(),
            })
        }
    }

    #[test]
    fn dispose_is_idempotent() {
        let signal: Signal<()> = Signal::new();
        let handle = BindingHandle::direct(
            signal.subscribe(|_| {}),
            None,
            "Button",
            "click",
            BindingStrategy::Toolkit,
            10,
        );
        assert_eq!(signal.subscriber_count(), 1);
        assert!(handle.is_live());

        handle.dispose();
        handle.dispose();
        assert!(handle.is_disposed());
        assert!(!handle.is_live());
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn drop_disposes() {
        let signal: Signal<()> = Signal::new();
        {
            let _handle = BindingHandle::direct(
                signal.subscribe(|_| {}),
                Some(signal.subscribe(|_| {})),
                "Button",
                "click",
                BindingStrategy::Toolkit,
                10,
            );
            assert_eq!(signal.subscriber_count(), 2);
        }
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn property_path_handle_releases_slot_once() {
        let changes: Signal<str> = Signal::new();
        let slot = Rc::new(FakeSlot {
            released: Cell::new(0),
        });
        let handle = BindingHandle::property_path(
            changes.subscribe(|_| {}),
            Rc::clone(&slot) as Rc<dyn InnerSlot>,
            "Button",
            "click",
            BindingStrategy::Toolkit,
            10,
        );
        assert!(handle.is_live());
        assert!(handle.syncs_enabled());
        assert_eq!(handle.rebind_error(), None);

        handle.dispose();
        assert!(!handle.syncs_enabled());
        assert_eq!(handle.rebind_error(), None);
        drop(handle);
        assert_eq!(slot.released.get(), 1);
        assert_eq!(changes.subscriber_count(), 0);
    }
}
