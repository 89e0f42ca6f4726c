#![forbid(unsafe_code)]

//! Bindable toolkit elements.
//!
//! Elements fall into two families, mirroring classic desktop toolkits:
//!
//! - **Controls** embed a [`ControlBase`] (enabled flag plus `click`,
//!   `mouse_click` and `mouse_up` events) and implement [`Control`].
//! - **Components** are lightweight elements that are not controls; each
//!   declares whichever events and properties it has on its own.
//!
//! Elements use interior mutability (`Cell`, `RefCell`) because they are
//! shared through `Rc` between a view and its bindings. A disabled element
//! never raises its trigger events.

use std::cell::{Cell, RefCell};

use bindery_runtime::reactive::Signal;

/// Canonical event names understood by the target registry.
pub mod events {
    /// Primary activation (pointer click, keyboard activation).
    pub const CLICK: &str = "click";
    /// Pointer click carrying button and position.
    pub const MOUSE_CLICK: &str = "mouse_click";
    /// Pointer button released over the element.
    pub const MOUSE_UP: &str = "mouse_up";
    /// A toggle's checked state flipped.
    pub const CHECKED_CHANGED: &str = "checked_changed";
}

/// Pointer button carried by mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Payload of a trigger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventArgs {
    /// Pointer button, for mouse-originated events.
    pub button: Option<MouseButton>,
    /// Click count (1 = single click).
    pub clicks: u8,
    /// Pointer column relative to the element.
    pub x: i32,
    /// Pointer row relative to the element.
    pub y: i32,
}

impl EventArgs {
    /// Arguments for a non-pointer activation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            button: None,
            clicks: 0,
            x: 0,
            y: 0,
        }
    }

    /// Arguments for a pointer event.
    #[must_use]
    pub const fn mouse(button: MouseButton, clicks: u8, x: i32, y: i32) -> Self {
        Self {
            button: Some(button),
            clicks,
            x,
            y,
        }
    }
}

/// A named trigger on an element.
pub type TriggerEvent = Signal<EventArgs>;

/// State shared by every control: enabled flag and standard pointer events.
#[derive(Debug)]
pub struct ControlBase {
    enabled: Cell<bool>,
    click: TriggerEvent,
    mouse_click: TriggerEvent,
    mouse_up: TriggerEvent,
}

impl Default for ControlBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlBase {
    /// A control base that starts enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: Cell::new(true),
            click: TriggerEvent::new(),
            mouse_click: TriggerEvent::new(),
            mouse_up: TriggerEvent::new(),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    #[must_use]
    pub fn click(&self) -> &TriggerEvent {
        &self.click
    }

    #[must_use]
    pub fn mouse_click(&self) -> &TriggerEvent {
        &self.mouse_click
    }

    #[must_use]
    pub fn mouse_up(&self) -> &TriggerEvent {
        &self.mouse_up
    }

    /// Emit `event` unless the control is disabled. Returns whether it fired.
    pub fn raise(&self, event: &TriggerEvent, args: EventArgs) -> bool {
        if !self.is_enabled() {
            return false;
        }
        event.emit(&args);
        true
    }
}

/// Implemented by every element built on [`ControlBase`].
pub trait Control: 'static {
    fn base(&self) -> &ControlBase;
}

/// Push button. Default trigger: `click`.
#[derive(Debug, Default)]
pub struct Button {
    base: ControlBase,
    text: RefCell<String>,
}

impl Button {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ControlBase::new(),
            text: RefCell::new(text.into()),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    /// Simulate an activation. Returns whether `click` fired.
    pub fn perform_click(&self) -> bool {
        self.base.raise(self.base.click(), EventArgs::empty())
    }
}

impl Control for Button {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

/// Two-state toggle (check box style). Default trigger: `click`.
#[derive(Debug, Default)]
pub struct Toggle {
    base: ControlBase,
    checked: Cell<bool>,
    checked_changed: TriggerEvent,
}

impl Toggle {
    #[must_use]
    pub fn new(checked: bool) -> Self {
        Self {
            base: ControlBase::new(),
            checked: Cell::new(checked),
            checked_changed: TriggerEvent::new(),
        }
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    #[must_use]
    pub fn checked_changed(&self) -> &TriggerEvent {
        &self.checked_changed
    }

    /// Flip the checked state, then raise `checked_changed` and `click`.
    /// Does nothing while disabled.
    pub fn perform_click(&self) -> bool {
        if !self.base.is_enabled() {
            return false;
        }
        self.checked.set(!self.checked.get());
        self.checked_changed.emit(&EventArgs::empty());
        self.base.click().emit(&EventArgs::empty());
        true
    }
}

impl Control for Toggle {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

/// An application-defined control that only has the base events and does
/// not declare a default trigger of its own.
#[derive(Debug, Default)]
pub struct CustomControl {
    base: ControlBase,
}

impl CustomControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.base.set_enabled(enabled);
    }

    pub fn perform_click(&self) -> bool {
        self.base.raise(self.base.click(), EventArgs::empty())
    }

    pub fn raise_mouse_click(&self, args: EventArgs) -> bool {
        self.base.raise(self.base.mouse_click(), args)
    }

    pub fn raise_mouse_up(&self, args: EventArgs) -> bool {
        self.base.raise(self.base.mouse_up(), args)
    }
}

impl Control for CustomControl {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

/// Toolbar button. A component, not a control, but it has its own `click`
/// event and enabled flag.
#[derive(Debug)]
pub struct ToolButton {
    enabled: Cell<bool>,
    click: TriggerEvent,
    text: RefCell<String>,
}

impl Default for ToolButton {
    fn default() -> Self {
        Self::new("")
    }
}

impl ToolButton {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            enabled: Cell::new(true),
            click: TriggerEvent::new(),
            text: RefCell::new(text.into()),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    #[must_use]
    pub fn click(&self) -> &TriggerEvent {
        &self.click
    }

    pub fn perform_click(&self) -> bool {
        if !self.enabled.get() {
            return false;
        }
        self.click.emit(&EventArgs::empty());
        true
    }
}

/// A component with a `click` event and no enabled state.
#[derive(Debug, Default)]
pub struct ClickableComponent {
    click: TriggerEvent,
}

impl ClickableComponent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn click(&self) -> &TriggerEvent {
        &self.click
    }

    pub fn perform_click(&self) {
        self.click.emit(&EventArgs::empty());
    }
}

/// Static text. Has neither trigger events nor an enabled state.
#[derive(Debug, Default)]
pub struct TextBlock {
    text: RefCell<String>,
}

impl TextBlock {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}
