//! Capability table for bindable element types.
//!
//! Element types share no common trait for "the thing that can be clicked"
//! or "the thing that can be enabled". Instead each type registers a
//! [`TargetDescriptor`] keyed by its `TypeId`: a table of named trigger
//! events (each a type-erased subscribe function) plus an optional enabled
//! accessor. Lookups by event name happen at bind time; the concrete type is
//! recovered with a downcast inside the erased function.
//!
//! # Invariants
//!
//! 1. At most one descriptor per `TypeId`; registering again replaces it.
//! 2. Event names are unique within a descriptor; re-declaring a name
//!    replaces the earlier accessor.
//! 3. A descriptor's declared default event is only used if it is also in
//!    its event table.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unregistered type | No descriptor for `TypeId` | Affinity 0, `NoCompatibleBinder` |
//! | Unknown event name | Name not in table | `EventNotFound` |
//! | No enabled accessor | Component without enabled state | Sync skipped, not an error |

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::rc::Rc;

use ahash::AHashMap;
use bindery_runtime::reactive::Subscription;

use super::BindError;
use crate::controls::{
    Button, ClickableComponent, Control, CustomControl, EventArgs, TextBlock, Toggle, ToolButton,
    TriggerEvent, events,
};

/// A runtime-typed reference to a bindable element.
pub type BindingTarget = Rc<dyn Any>;

pub(crate) type TriggerCallback = Rc<dyn Fn(&EventArgs)>;
type SubscribeFn = Rc<dyn Fn(&dyn Any, TriggerCallback) -> Option<Subscription>>;

/// Coarse position of an element type in the toolkit hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    /// Built on [`ControlBase`](crate::controls::ControlBase).
    Control,
    /// A non-control element that declares its own events.
    Component,
    /// Anything else.
    Other,
}

#[derive(Clone)]
struct EventEntry {
    name: &'static str,
    subscribe: SubscribeFn,
}

/// Type-erased getter/setter pair for an element's enabled state.
#[derive(Clone)]
pub struct EnabledAccess {
    get: Rc<dyn Fn(&dyn Any) -> Option<bool>>,
    set: Rc<dyn Fn(&dyn Any, bool) -> bool>,
}

impl EnabledAccess {
    /// Read the enabled state, or `None` if `target` is not the described type.
    #[must_use]
    pub fn get(&self, target: &dyn Any) -> Option<bool> {
        (self.get)(target)
    }

    /// Write the enabled state. Returns `false` if `target` is not the
    /// described type.
    pub fn set(&self, target: &dyn Any, enabled: bool) -> bool {
        (self.set)(target, enabled)
    }
}

impl std::fmt::Debug for EnabledAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnabledAccess").finish_non_exhaustive()
    }
}

/// Capabilities of one concrete element type.
#[derive(Clone)]
pub struct TargetDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    class: ElementClass,
    default_event: Option<&'static str>,
    events: Vec<EventEntry>,
    enabled: Option<EnabledAccess>,
}

impl TargetDescriptor {
    /// Start describing `T`.
    pub fn builder<T: Any>(type_name: &'static str, class: ElementClass) -> DescriptorBuilder<T> {
        DescriptorBuilder {
            descriptor: Self {
                type_id: TypeId::of::<T>(),
                type_name,
                class,
                default_event: None,
                events: Vec::new(),
                enabled: None,
            },
            _marker: PhantomData,
        }
    }

    /// Start describing a [`Control`]: the base events (`click`,
    /// `mouse_click`, `mouse_up`) and the enabled flag are pre-registered.
    pub fn control<T: Control>(type_name: &'static str) -> DescriptorBuilder<T> {
        Self::builder::<T>(type_name, ElementClass::Control)
            .event(events::CLICK, |c: &T| c.base().click())
            .event(events::MOUSE_CLICK, |c: &T| c.base().mouse_click())
            .event(events::MOUSE_UP, |c: &T| c.base().mouse_up())
            .enabled(|c: &T| c.base().is_enabled(), |c: &T, v| c.base().set_enabled(v))
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn class(&self) -> ElementClass {
        self.class
    }

    /// The declared default trigger, if it is a known event.
    #[must_use]
    pub fn declared_default(&self) -> Option<&'static str> {
        self.default_event.and_then(|name| self.event_name(name))
    }

    /// Canonical name of `event` if the type exposes it.
    #[must_use]
    pub fn event_name(&self, event: &str) -> Option<&'static str> {
        self.events
            .iter()
            .find(|entry| entry.name == event)
            .map(|entry| entry.name)
    }

    /// First entry of `candidates` the type exposes.
    #[must_use]
    pub fn first_event_of(&self, candidates: &[String]) -> Option<&'static str> {
        candidates.iter().find_map(|name| self.event_name(name))
    }

    /// Registered event names, in declaration order.
    pub fn event_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.events.iter().map(|entry| entry.name)
    }

    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    #[must_use]
    pub fn is_enabled_capable(&self) -> bool {
        self.enabled.is_some()
    }

    #[must_use]
    pub fn enabled_access(&self) -> Option<&EnabledAccess> {
        self.enabled.as_ref()
    }

    pub(crate) fn subscribe(
        &self,
        target: &dyn Any,
        event: &str,
        callback: TriggerCallback,
    ) -> Option<Subscription> {
        let entry = self.events.iter().find(|entry| entry.name == event)?;
        (entry.subscribe)(target, callback)
    }
}

impl std::fmt::Debug for TargetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetDescriptor")
            .field("type_name", &self.type_name)
            .field("class", &self.class)
            .field("default_event", &self.default_event)
            .field("events", &self.event_names().collect::<Vec<_>>())
            .field("enabled", &self.enabled.is_some())
            .finish()
    }
}

/// Typed builder for a [`TargetDescriptor`].
#[must_use = "call build() and register the descriptor"]
pub struct DescriptorBuilder<T> {
    descriptor: TargetDescriptor,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any> DescriptorBuilder<T> {
    /// Expose the trigger event returned by `accessor` under `name`.
    pub fn event(mut self, name: &'static str, accessor: fn(&T) -> &TriggerEvent) -> Self {
        let subscribe: SubscribeFn = Rc::new(move |target: &dyn Any, callback: TriggerCallback| {
            target
                .downcast_ref::<T>()
                .map(|element| accessor(element).subscribe(move |args| callback(args)))
        });
        self.descriptor.events.retain(|entry| entry.name != name);
        self.descriptor.events.push(EventEntry { name, subscribe });
        self
    }

    /// Expose an enabled property.
    pub fn enabled(mut self, get: fn(&T) -> bool, set: fn(&T, bool)) -> Self {
        self.descriptor.enabled = Some(EnabledAccess {
            get: Rc::new(move |target: &dyn Any| target.downcast_ref::<T>().map(get)),
            set: Rc::new(move |target: &dyn Any, enabled: bool| {
                target
                    .downcast_ref::<T>()
                    .map(|element| set(element, enabled))
                    .is_some()
            }),
        });
        self
    }

    /// Declare which event an implicit binding uses.
    pub fn default_event(mut self, name: &'static str) -> Self {
        self.descriptor.default_event = Some(name);
        self
    }

    pub fn build(self) -> TargetDescriptor {
        self.descriptor
    }
}

/// Lookup table from concrete element type to its capabilities.
#[derive(Default)]
pub struct TargetRegistry {
    descriptors: AHashMap<TypeId, TargetDescriptor>,
}

impl TargetRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every element in
    /// [`controls`](crate::controls).
    #[must_use]
    pub fn with_toolkit() -> Self {
        let mut registry = Self::new();
        registry.register(
            TargetDescriptor::control::<Button>("Button")
                .default_event(events::CLICK)
                .build(),
        );
        registry.register(
            TargetDescriptor::control::<Toggle>("Toggle")
                .event(events::CHECKED_CHANGED, Toggle::checked_changed)
                .default_event(events::CLICK)
                .build(),
        );
        registry.register(TargetDescriptor::control::<CustomControl>("CustomControl").build());
        registry.register(
            TargetDescriptor::builder::<ToolButton>("ToolButton", ElementClass::Component)
                .event(events::CLICK, ToolButton::click)
                .enabled(ToolButton::is_enabled, ToolButton::set_enabled)
                .default_event(events::CLICK)
                .build(),
        );
        registry.register(
            TargetDescriptor::builder::<ClickableComponent>(
                "ClickableComponent",
                ElementClass::Component,
            )
            .event(events::CLICK, ClickableComponent::click)
            .build(),
        );
        registry.register(
            TargetDescriptor::builder::<TextBlock>("TextBlock", ElementClass::Other).build(),
        );
        registry
    }

    /// Add or replace the descriptor for its type. Returns the replaced one.
    pub fn register(&mut self, descriptor: TargetDescriptor) -> Option<TargetDescriptor> {
        tracing::debug!(
            type_name = descriptor.type_name,
            events = descriptor.events.len(),
            enabled = descriptor.is_enabled_capable(),
            "registered bindable type"
        );
        self.descriptors.insert(descriptor.type_id, descriptor)
    }

    #[must_use]
    pub fn descriptor_for(&self, type_id: TypeId) -> Option<&TargetDescriptor> {
        self.descriptors.get(&type_id)
    }

    /// Descriptor of the concrete type behind `target`.
    #[must_use]
    pub fn descriptor_of(&self, target: &dyn Any) -> Option<&TargetDescriptor> {
        self.descriptor_for(target.type_id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Subscribe `callback` to `event` on `target`.
    ///
    /// # Errors
    ///
    /// - [`BindError::NoCompatibleBinder`] if the target type is unregistered.
    /// - [`BindError::EventNotFound`] if the type has no event called `event`.
    pub fn subscribe_trigger(
        &self,
        target: &BindingTarget,
        event: &str,
        callback: impl Fn(&EventArgs) + 'static,
    ) -> Result<Subscription, BindError> {
        let element: &dyn Any = target.as_ref();
        let descriptor = self
            .descriptor_of(element)
            .ok_or_else(|| BindError::NoCompatibleBinder {
                target_type: unregistered_name(element),
            })?;
        descriptor
            .subscribe(element, event, Rc::new(callback))
            .ok_or_else(|| BindError::EventNotFound {
                target_type: descriptor.type_name.to_owned(),
                event: event.to_owned(),
            })
    }

    /// Current enabled state, or `None` when the target has none.
    #[must_use]
    pub fn enabled(&self, target: &BindingTarget) -> Option<bool> {
        let element: &dyn Any = target.as_ref();
        self.descriptor_of(element)?.enabled.as_ref()?.get(element)
    }

    /// Write the enabled state. Returns `false` when unsupported.
    pub fn set_enabled(&self, target: &BindingTarget, enabled: bool) -> bool {
        let element: &dyn Any = target.as_ref();
        self.descriptor_of(element)
            .and_then(|descriptor| descriptor.enabled.as_ref())
            .is_some_and(|access| access.set(element, enabled))
    }
}

impl std::fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.descriptors.values().map(|d| d.type_name).collect();
        names.sort_unstable();
        f.debug_struct("TargetRegistry").field("types", &names).finish()
    }
}

pub(crate) fn unregistered_name(element: &dyn Any) -> String {
    format!("<unregistered {:?}>", element.type_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn target<T: Any>(element: T) -> (Rc<T>, BindingTarget) {
        let rc = Rc::new(element);
        let target: BindingTarget = rc.clone();
        (rc, target)
    }

    #[test]
    fn toolkit_registers_every_element() {
        let registry = TargetRegistry::with_toolkit();
        assert_eq!(registry.len(), 6);
        let button = registry.descriptor_for(TypeId::of::<Button>()).unwrap();
        assert_eq!(button.class(), ElementClass::Control);
        assert_eq!(button.declared_default(), Some("click"));
        assert!(button.is_enabled_capable());
    }

    #[test]
    fn descriptor_of_sees_through_rc() {
        let registry = TargetRegistry::with_toolkit();
        let (_button, target) = target(Button::new("OK"));
        let descriptor = registry.descriptor_of(target.as_ref()).unwrap();
        assert_eq!(descriptor.type_name(), "Button");
    }

    #[test]
    fn subscribe_named_event() {
        let registry = TargetRegistry::with_toolkit();
        let (control, target) = target(CustomControl::new());
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = registry
            .subscribe_trigger(&target, events::MOUSE_UP, move |_| h.set(h.get() + 1))
            .unwrap();

        control.perform_click();
        assert_eq!(hits.get(), 0);
        control.raise_mouse_up(EventArgs::empty());
        assert_eq!(hits.get(), 1);

        drop(sub);
        control.raise_mouse_up(EventArgs::empty());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unknown_event_is_reported() {
        let registry = TargetRegistry::with_toolkit();
        let (_tool, target) = target(ToolButton::new("Cut"));
        let err = registry
            .subscribe_trigger(&target, events::MOUSE_UP, |_| {})
            .unwrap_err();
        assert_eq!(
            err,
            BindError::EventNotFound {
                target_type: "ToolButton".into(),
                event: "mouse_up".into(),
            }
        );
    }

    #[test]
    fn unregistered_type_is_reported() {
        let registry = TargetRegistry::with_toolkit();
        let (_s, target) = target(String::from("not a widget"));
        let err = registry
            .subscribe_trigger(&target, events::CLICK, |_| {})
            .unwrap_err();
        assert!(matches!(err, BindError::NoCompatibleBinder { .. }));
    }

    #[test]
    fn enabled_access_round_trip() {
        let registry = TargetRegistry::with_toolkit();
        let (tool, target) = target(ToolButton::new("Paste"));
        assert_eq!(registry.enabled(&target), Some(true));
        assert!(registry.set_enabled(&target, false));
        assert!(!tool.is_enabled());
    }

    #[test]
    fn missing_enabled_is_unsupported_not_error() {
        let registry = TargetRegistry::with_toolkit();
        let (_c, target) = target(ClickableComponent::new());
        assert_eq!(registry.enabled(&target), None);
        assert!(!registry.set_enabled(&target, false));
    }

    #[test]
    fn redeclared_event_replaces_accessor() {
        let descriptor = TargetDescriptor::control::<Toggle>("Toggle")
            .event(events::CLICK, Toggle::checked_changed)
            .build();
        assert_eq!(descriptor.event_names().filter(|n| *n == "click").count(), 1);
    }

    #[test]
    fn declared_default_must_be_known() {
        let descriptor = TargetDescriptor::builder::<TextBlock>("TextBlock", ElementClass::Other)
            .default_event(events::CLICK)
            .build();
        assert_eq!(descriptor.declared_default(), None);
    }

    #[test]
    fn first_event_of_honors_order() {
        let registry = TargetRegistry::with_toolkit();
        let control = registry.descriptor_for(TypeId::of::<CustomControl>()).unwrap();
        let order = vec!["hover".to_string(), "mouse_up".to_string(), "click".to_string()];
        assert_eq!(control.first_event_of(&order), Some("mouse_up"));
    }
}
