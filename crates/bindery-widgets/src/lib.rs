#![forbid(unsafe_code)]

//! Bindable elements and the command-binding engine for Bindery.

pub mod command_binding;
pub mod controls;

pub use command_binding::{
    BindError, BinderConfig, BindingHandle, BindingStrategy, BindingTarget, CommandBinder,
    StrategySet, TargetDescriptor, TargetRegistry, control_path,
};
pub use controls::{
    Button, ClickableComponent, Control, ControlBase, CustomControl, EventArgs, MouseButton,
    TextBlock, Toggle, ToolButton,
};
