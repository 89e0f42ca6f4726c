//! Command-to-target wiring.

use std::any::{Any, TypeId};
use std::rc::Rc;

use bindery_runtime::command::Command;
use bindery_runtime::reactive::Binding;

use super::BindError;
use super::affinity::{AffinityScore, BindingStrategy, StrategySet};
use super::config::BinderConfig;
use super::handle::BindingHandle;
use super::target::{BindingTarget, TargetDescriptor, TargetRegistry, unregistered_name};
use crate::controls::EventArgs;

/// Event label reported when no default trigger could be resolved.
pub const DEFAULT_EVENT: &str = "<default>";

/// Binds commands to toolkit elements.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use bindery_runtime::command::ReactiveCommand;
/// use bindery_runtime::reactive::{Binding, Observable};
/// use bindery_widgets::command_binding::{BindingTarget, CommandBinder};
/// use bindery_widgets::controls::Button;
///
/// let binder = CommandBinder::with_toolkit();
/// let can_save = Observable::new(false);
/// let save = Rc::new(ReactiveCommand::with_can_execute(|_: &()| {}, &can_save));
/// let button = Rc::new(Button::new("Save"));
/// let target: BindingTarget = button.clone();
///
/// let handle = binder.bind(&save, &target, Binding::default()).unwrap();
/// assert!(!button.is_enabled());
///
/// can_save.set(true);
/// assert!(button.perform_click());
/// assert_eq!(save.execution_count(), 1);
/// handle.dispose();
/// ```
#[derive(Debug, Default)]
pub struct CommandBinder {
    registry: TargetRegistry,
    strategies: StrategySet,
    config: BinderConfig,
}

impl CommandBinder {
    /// A binder over `registry` with the standard strategies and default
    /// config.
    #[must_use]
    pub fn new(registry: TargetRegistry) -> Self {
        Self {
            registry,
            strategies: StrategySet::standard(),
            config: BinderConfig::default(),
        }
    }

    /// A binder that knows every element in [`controls`](crate::controls).
    #[must_use]
    pub fn with_toolkit() -> Self {
        Self::new(TargetRegistry::with_toolkit())
    }

    #[must_use]
    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategySet) -> Self {
        self.strategies = strategies;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Register additional element types.
    pub fn registry_mut(&mut self) -> &mut TargetRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    #[must_use]
    pub fn strategies(&self) -> &StrategySet {
        &self.strategies
    }

    /// Best affinity any strategy has for `type_id`. Zero means it cannot be
    /// bound.
    #[must_use]
    pub fn affinity(&self, type_id: TypeId, explicit_event: bool) -> AffinityScore {
        self.strategies.affinity(
            self.registry.descriptor_for(type_id),
            explicit_event,
            &self.config,
        )
    }

    /// [`affinity`](Self::affinity) for a static type.
    #[must_use]
    pub fn affinity_for<T: Any>(&self, explicit_event: bool) -> AffinityScore {
        self.affinity(TypeId::of::<T>(), explicit_event)
    }

    /// Bind `command` to the default trigger of `target`.
    ///
    /// `parameter` is evaluated each time the trigger fires. When the target
    /// has an enabled state, it follows the command's can-execute value from
    /// this call on.
    ///
    /// # Errors
    ///
    /// - [`BindError::NoCompatibleBinder`] if no strategy can bind the target.
    /// - [`BindError::EventNotFound`] if no default trigger resolves.
    ///
    /// On error nothing is subscribed and the target is left untouched.
    pub fn bind<P, C>(
        &self,
        command: &Rc<C>,
        target: &BindingTarget,
        parameter: Binding<P>,
    ) -> Result<BindingHandle, BindError>
    where
        P: 'static,
        C: Command<P> + ?Sized + 'static,
    {
        self.bind_with(command, target, &parameter, None)
    }

    /// Bind `command` to the trigger named `event`.
    ///
    /// # Errors
    ///
    /// As [`bind`](Self::bind); [`BindError::EventNotFound`] names `event`.
    pub fn bind_to_event<P, C>(
        &self,
        command: &Rc<C>,
        target: &BindingTarget,
        parameter: Binding<P>,
        event: &str,
    ) -> Result<BindingHandle, BindError>
    where
        P: 'static,
        C: Command<P> + ?Sized + 'static,
    {
        self.bind_with(command, target, &parameter, Some(event))
    }

    fn bind_with<P, C>(
        &self,
        command: &Rc<C>,
        target: &BindingTarget,
        parameter: &Binding<P>,
        event: Option<&str>,
    ) -> Result<BindingHandle, BindError>
    where
        P: 'static,
        C: Command<P> + ?Sized + 'static,
    {
        let _span =
            tracing::debug_span!("command_bind", event = event.unwrap_or(DEFAULT_EVENT)).entered();
        let element: &dyn Any = target.as_ref();
        self.plan(element, event)?.attach(command, target, parameter)
    }

    /// Resolve strategy and event for `element` without touching it.
    pub(crate) fn plan(
        &self,
        element: &dyn Any,
        event: Option<&str>,
    ) -> Result<WiringPlan, BindError> {
        let descriptor = self.registry.descriptor_of(element);
        let resolved = self
            .strategies
            .resolve(descriptor, event.is_some(), &self.config);
        let (Some(descriptor), Some((strategy, score))) = (descriptor, resolved) else {
            let target_type =
                descriptor.map_or_else(|| unregistered_name(element), |d| d.type_name().to_owned());
            tracing::debug!(target_type = %target_type, "no compatible command binder");
            return Err(BindError::NoCompatibleBinder { target_type });
        };

        let trigger = match event {
            Some(name) => descriptor.event_name(name),
            None => strategy.default_event(descriptor, &self.config),
        };
        let Some(trigger) = trigger else {
            return Err(BindError::EventNotFound {
                target_type: descriptor.type_name().to_owned(),
                event: event.unwrap_or(DEFAULT_EVENT).to_owned(),
            });
        };

        Ok(WiringPlan {
            descriptor: descriptor.clone(),
            strategy,
            score,
            event: trigger,
            sync_enabled: self.config.sync_enabled,
        })
    }
}

/// A resolved strategy and trigger for one target type, ready to wire any
/// number of commands.
pub(crate) struct WiringPlan {
    descriptor: TargetDescriptor,
    strategy: BindingStrategy,
    score: AffinityScore,
    event: &'static str,
    sync_enabled: bool,
}

impl WiringPlan {
    pub(crate) fn target_type(&self) -> &'static str {
        self.descriptor.type_name()
    }

    pub(crate) fn event(&self) -> &'static str {
        self.event
    }

    pub(crate) fn strategy(&self) -> BindingStrategy {
        self.strategy
    }

    pub(crate) fn score(&self) -> AffinityScore {
        self.score
    }

    /// Subscribe the trigger, then sync enabled state from can-execute.
    pub(crate) fn attach<P, C>(
        &self,
        command: &Rc<C>,
        target: &BindingTarget,
        parameter: &Binding<P>,
    ) -> Result<BindingHandle, BindError>
    where
        P: 'static,
        C: Command<P> + ?Sized + 'static,
    {
        let element: &dyn Any = target.as_ref();
        let weak_command = Rc::downgrade(command);
        let parameter = parameter.clone();
        let event = self.event;
        let trigger = self
            .descriptor
            .subscribe(
                element,
                event,
                Rc::new(move |_: &EventArgs| {
                    let Some(command) = weak_command.upgrade() else {
                        tracing::trace!(event, "trigger fired after command was dropped");
                        return;
                    };
                    tracing::trace!(event, "trigger fired");
                    command.execute(&parameter.get());
                }),
            )
            .ok_or_else(|| BindError::EventNotFound {
                target_type: self.target_type().to_owned(),
                event: event.to_owned(),
            })?;

        let can_execute = match self.descriptor.enabled_access() {
            Some(access) if self.sync_enabled => {
                let access = access.clone();
                let weak_target = Rc::downgrade(target);
                let weak_command = Rc::downgrade(command);
                let target_type = self.target_type();
                Some(command.subscribe_can_execute(Box::new(move |enabled| {
                    // The can-execute source may be shared and outlive the
                    // command. Stop following it once the command is gone.
                    if weak_command.strong_count() == 0 {
                        tracing::trace!(target_type, "can-execute after command was dropped");
                        return;
                    }
                    if let Some(target) = weak_target.upgrade() {
                        tracing::trace!(target_type, enabled, "enabled state synced");
                        let element: &dyn Any = target.as_ref();
                        access.set(element, enabled);
                    }
                })))
            }
            _ => None,
        };

        tracing::debug!(
            target_type = self.target_type(),
            event,
            strategy = self.strategy.name(),
            score = self.score,
            sync_enabled = can_execute.is_some(),
            "command bound"
        );
        Ok(BindingHandle::direct(
            trigger,
            can_execute,
            self.target_type(),
            event,
            self.strategy,
            self.score,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{Button, ClickableComponent, Control, CustomControl, TextBlock, events};
    use bindery_runtime::command::ReactiveCommand;
    use bindery_runtime::reactive::Observable;
    use std::cell::Cell;
    use tracing_test::traced_test;

    fn target<T: Any>(element: T) -> (Rc<T>, BindingTarget) {
        let rc = Rc::new(element);
        let target: BindingTarget = rc.clone();
        (rc, target)
    }

    #[test]
    fn bind_to_default_trigger() {
        let binder = CommandBinder::with_toolkit();
        let (button, target) = target(Button::new("Go"));
        let command = ReactiveCommand::<()>::shared(|_| {});

        let handle = binder.bind(&command, &target, Binding::default()).unwrap();
        assert_eq!(handle.event(), "click");
        assert_eq!(handle.strategy(), BindingStrategy::Toolkit);
        assert!(handle.syncs_enabled());

        button.perform_click();
        button.perform_click();
        assert_eq!(command.execution_count(), 2);
    }

    #[test]
    fn parameter_is_read_at_firing_time() {
        let binder = CommandBinder::with_toolkit();
        let (button, target) = target(Button::new("Go"));
        let seen = Rc::new(Cell::new(0));
        let s = Rc::clone(&seen);
        let command = ReactiveCommand::shared(move |v: &i32| s.set(*v));
        let source = Observable::new(1);

        let _handle = binder
            .bind(&command, &target, bindery_runtime::reactive::bind_observable(&source))
            .unwrap();
        source.set(7);
        button.perform_click();
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn custom_control_uses_fallback_event() {
        let binder = CommandBinder::with_toolkit();
        let (_control, target) = target(CustomControl::new());
        let command = ReactiveCommand::<()>::shared(|_| {});
        let handle = binder.bind(&command, &target, Binding::default()).unwrap();
        assert_eq!(handle.event(), events::CLICK);

        let binder = CommandBinder::with_toolkit()
            .with_config(BinderConfig::default().with_fallback_events(["mouse_up"]));
        let handle = binder.bind(&command, &target, Binding::default()).unwrap();
        assert_eq!(handle.event(), events::MOUSE_UP);
    }

    #[test]
    fn unknown_explicit_event_fails_without_subscribing() {
        let binder = CommandBinder::with_toolkit();
        let (button, target) = target(Button::new("Go"));
        let command = ReactiveCommand::<()>::shared(|_| {});
        let err = binder
            .bind_to_event(&command, &target, Binding::default(), "hover")
            .unwrap_err();
        assert_eq!(
            err,
            BindError::EventNotFound {
                target_type: "Button".into(),
                event: "hover".into(),
            }
        );
        assert_eq!(button.base().click().subscriber_count(), 0);
    }

    #[test]
    fn no_resolvable_default_is_incompatible() {
        let binder = CommandBinder::with_toolkit()
            .with_config(BinderConfig::default().with_fallback_events(["hover"]));
        let command = ReactiveCommand::<()>::shared(|_| {});

        let (component, component_target) = target(ClickableComponent::new());
        let err = binder
            .bind(&command, &component_target, Binding::default())
            .unwrap_err();
        assert!(matches!(err, BindError::NoCompatibleBinder { .. }));
        assert_eq!(component.click().subscriber_count(), 0);

        // Naming the event explicitly still works.
        let handle = binder
            .bind_to_event(&command, &component_target, Binding::default(), events::CLICK)
            .unwrap();
        assert_eq!(handle.score(), 6);
    }

    #[test]
    fn text_block_is_rejected() {
        let binder = CommandBinder::with_toolkit();
        let (_text, target) = target(TextBlock::new("label"));
        let command = ReactiveCommand::<()>::shared(|_| {});
        let err = binder.bind(&command, &target, Binding::default()).unwrap_err();
        assert_eq!(
            err,
            BindError::NoCompatibleBinder {
                target_type: "TextBlock".into(),
            }
        );
        assert_eq!(binder.affinity_for::<TextBlock>(false), 0);
    }

    #[test]
    fn sync_can_be_turned_off() {
        let binder =
            CommandBinder::with_toolkit().with_config(BinderConfig::default().with_sync_enabled(false));
        let (button, target) = target(Button::new("Go"));
        let gate = Observable::new(false);
        let command = Rc::new(ReactiveCommand::with_can_execute(|_: &()| {}, &gate));
        let handle = binder.bind(&command, &target, Binding::default()).unwrap();
        assert!(!handle.syncs_enabled());
        assert!(button.is_enabled());
        assert_eq!(gate.subscriber_count(), 0);
    }

    #[test]
    fn dropped_command_makes_firing_a_no_op() {
        let binder = CommandBinder::with_toolkit();
        let (button, target) = target(Button::new("Go"));
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let command = ReactiveCommand::<()>::shared(move |_| h.set(h.get() + 1));
        let _handle = binder.bind(&command, &target, Binding::default()).unwrap();

        drop(command);
        assert!(button.perform_click());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn works_with_trait_object_commands() {
        let binder = CommandBinder::with_toolkit();
        let (button, target) = target(Button::new("Go"));
        let concrete = ReactiveCommand::<u8>::shared(|_| {});
        let command: Rc<dyn Command<u8>> = concrete.clone();
        let _handle = binder
            .bind(&command, &target, Binding::constant(3u8))
            .unwrap();
        button.perform_click();
        assert_eq!(concrete.execution_count(), 1);
    }

    #[test]
    #[traced_test]
    fn bind_emits_structured_event() {
        let binder = CommandBinder::with_toolkit();
        let (_button, target) = target(Button::new("Go"));
        let command = ReactiveCommand::<()>::shared(|_| {});
        let _handle = binder.bind(&command, &target, Binding::default()).unwrap();
        assert!(logs_contain("command bound"));
        assert!(logs_contain("toolkit"));
    }
}
