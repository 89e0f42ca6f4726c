//! Declarative binding by view-model property path.
//!
//! The command is looked up through a [`PropertyPath`] on the view model and
//! re-read every time the view model raises that property's name. The
//! control is read once, and strategy and event are resolved once against
//! it, so every rebind wires the new command the same way.
//!
//! # Invariants
//!
//! 1. At most one inner binding is live; the previous one is disposed before
//!    the next is created.
//! 2. A change that yields the same command instance keeps the current
//!    binding.
//! 3. A `None` command leaves no live binding; assigning a command later
//!    resumes it.
//! 4. After the outer handle is disposed no rebind happens, even if a change
//!    notification is already in flight.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use bindery_runtime::command::Command;
use bindery_runtime::property::{NotifyPropertyChanged, PropertyPath};
use bindery_runtime::reactive::Binding;

use super::BindError;
use super::binder::{CommandBinder, DEFAULT_EVENT, WiringPlan};
use super::handle::{BindingHandle, InnerSlot};
use super::target::BindingTarget;

/// Path from a view to one of its elements, erased to a [`BindingTarget`].
///
/// ```
/// use std::rc::Rc;
/// use bindery_widgets::command_binding::control_path;
/// use bindery_widgets::controls::Button;
///
/// struct View {
///     ok: Rc<Button>,
/// }
///
/// let path = control_path("ok", |v: &View| Rc::clone(&v.ok));
/// let view = View { ok: Rc::new(Button::new("OK")) };
/// assert!(path.read(&view).downcast_ref::<Button>().is_some());
/// ```
pub fn control_path<V, T>(
    name: &'static str,
    read: impl Fn(&V) -> Rc<T> + 'static,
) -> PropertyPath<V, BindingTarget>
where
    V: ?Sized + 'static,
    T: Any,
{
    PropertyPath::new(name, move |view: &V| -> BindingTarget { read(view) })
}

impl CommandBinder {
    /// Bind the command found at `command_path` on `view_model` to the
    /// element found at `control_path` on `view`, passing `P::default()`.
    ///
    /// `event` names the trigger; `None` uses the default trigger. The
    /// binding follows the command property: whenever `view_model` raises
    /// its name, the old command is unbound and the new one bound.
    ///
    /// # Errors
    ///
    /// [`BindError::NoCompatibleBinder`] or [`BindError::EventNotFound`] for
    /// the control, raised even when the command property is currently
    /// `None`.
    pub fn bind_command<VM, V, P, C>(
        &self,
        view_model: &Rc<VM>,
        view: &V,
        command_path: &PropertyPath<VM, Option<Rc<C>>>,
        control_path: &PropertyPath<V, BindingTarget>,
        event: Option<&str>,
    ) -> Result<BindingHandle, BindError>
    where
        VM: NotifyPropertyChanged + 'static,
        V: ?Sized,
        P: Default + 'static,
        C: Command<P> + ?Sized + 'static,
    {
        self.bind_command_with_parameter(
            view_model,
            view,
            command_path,
            control_path,
            Binding::default(),
            event,
        )
    }

    /// [`bind_command`](Self::bind_command) with an explicit parameter
    /// source, evaluated at each firing.
    ///
    /// # Errors
    ///
    /// As [`bind_command`](Self::bind_command).
    pub fn bind_command_with_parameter<VM, V, P, C>(
        &self,
        view_model: &Rc<VM>,
        view: &V,
        command_path: &PropertyPath<VM, Option<Rc<C>>>,
        control_path: &PropertyPath<V, BindingTarget>,
        parameter: Binding<P>,
        event: Option<&str>,
    ) -> Result<BindingHandle, BindError>
    where
        VM: NotifyPropertyChanged + 'static,
        V: ?Sized,
        P: 'static,
        C: Command<P> + ?Sized + 'static,
    {
        let _span = tracing::debug_span!(
            "command_bind",
            property = command_path.name(),
            control = control_path.name(),
            event = event.unwrap_or(DEFAULT_EVENT)
        )
        .entered();

        let target = control_path.read(view);
        let element: &dyn Any = target.as_ref();
        let plan = self.plan(element, event)?;
        let (target_type, trigger, strategy, score) =
            (plan.target_type(), plan.event(), plan.strategy(), plan.score());

        let slot = Rc::new(CommandSlot {
            plan,
            target,
            parameter,
            property: command_path.name(),
            command: RefCell::new(None),
            inner: RefCell::new(None),
            last_error: RefCell::new(Some(BindError::CommandAbsent {
                property: command_path.name().to_owned(),
            })),
            released: Cell::new(false),
        });
        slot.rebind(command_path.read(view_model))?;

        let weak_view_model = Rc::downgrade(view_model);
        let weak_slot = Rc::downgrade(&slot);
        let path = command_path.clone();
        let changes = view_model
            .property_changed()
            .subscribe_to(command_path.name(), move || {
                let (Some(view_model), Some(slot)) = (weak_view_model.upgrade(), weak_slot.upgrade())
                else {
                    return;
                };
                let next = path.read(&view_model);
                if let Err(err) = slot.rebind(next) {
                    tracing::warn!(property = path.name(), error = %err, "command rebind failed");
                }
            });

        Ok(BindingHandle::property_path(
            changes,
            slot,
            target_type,
            trigger,
            strategy,
            score,
        ))
    }
}

/// The current command of a property-path binding and its inner handle.
struct CommandSlot<P: 'static, C: ?Sized + 'static> {
    plan: WiringPlan,
    target: BindingTarget,
    parameter: Binding<P>,
    property: &'static str,
    command: RefCell<Option<Weak<C>>>,
    inner: RefCell<Option<BindingHandle>>,
    last_error: RefCell<Option<BindError>>,
    released: Cell<bool>,
}

impl<P, C> CommandSlot<P, C>
where
    P: 'static,
    C: Command<P> + ?Sized + 'static,
{
    fn rebind(&self, next: Option<Rc<C>>) -> Result<(), BindError> {
        if self.released.get() {
            return Ok(());
        }
        if self.is_current(next.as_ref()) {
            tracing::trace!(property = self.property, "command unchanged");
            return Ok(());
        }

        let previous = self.inner.borrow_mut().take();
        let was_live = previous.is_some();
        drop(previous);
        *self.command.borrow_mut() = next.as_ref().map(Rc::downgrade);

        let Some(command) = next else {
            if was_live {
                tracing::warn!(property = self.property, "command cleared, binding idle");
            } else {
                tracing::debug!(property = self.property, "command absent, binding idle");
            }
            *self.last_error.borrow_mut() = Some(BindError::CommandAbsent {
                property: self.property.to_owned(),
            });
            return Ok(());
        };
        let handle = match self.plan.attach(&command, &self.target, &self.parameter) {
            Ok(handle) => handle,
            Err(err) => {
                *self.last_error.borrow_mut() = Some(err.clone());
                return Err(err);
            }
        };
        if self.released.get() {
            return Ok(());
        }
        tracing::debug!(
            property = self.property,
            target_type = self.plan.target_type(),
            "command rebound"
        );
        *self.last_error.borrow_mut() = None;
        *self.inner.borrow_mut() = Some(handle);
        Ok(())
    }

    fn is_current(&self, next: Option<&Rc<C>>) -> bool {
        match (self.command.borrow().as_ref(), next) {
            (Some(current), Some(next)) => std::ptr::addr_eq(current.as_ptr(), Rc::as_ptr(next)),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<P, C> InnerSlot for CommandSlot<P, C>
where
    P: 'static,
    C: Command<P> + ?Sized + 'static,
{
    fn release(&self) {
        self.released.set(true);
        let inner = self.inner.borrow_mut().take();
        drop(inner);
        self.command.borrow_mut().take();
    }

    fn is_live(&self) -> bool {
        self.inner
            .borrow()
            .as_ref()
            .is_some_and(BindingHandle::is_live)
    }

    fn syncs_enabled(&self) -> bool {
        self.inner
            .borrow()
            .as_ref()
            .is_some_and(BindingHandle::syncs_enabled)
    }

    fn last_error(&self) -> Option<BindError> {
        if self.is_live() {
            None
        } else {
            self.last_error.borrow().clone()
        }
    }
}
