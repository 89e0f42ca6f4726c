#![forbid(unsafe_code)]

//! Bindery public facade.
//!
//! Wires reactive commands to UI elements: the trigger event invokes the
//! command, the command's can-execute value drives the element's enabled
//! state, and property-path bindings follow the view model when it swaps
//! the command out.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use bindery::prelude::*;
//!
//! #[derive(Default)]
//! struct Editor {
//!     changed: PropertyChanged,
//!     save: RefCell<Option<Rc<ReactiveCommand<()>>>>,
//! }
//!
//! impl NotifyPropertyChanged for Editor {
//!     fn property_changed(&self) -> &PropertyChanged {
//!         &self.changed
//!     }
//! }
//!
//! struct EditorView {
//!     save: Rc<Button>,
//! }
//!
//! let editor = Rc::new(Editor::default());
//! let view = EditorView { save: Rc::new(Button::new("Save")) };
//! let binder = CommandBinder::with_toolkit();
//!
//! let _handle = binder
//!     .bind_command(
//!         &editor,
//!         &view,
//!         &PropertyPath::new("save", |e: &Editor| e.save.borrow().clone()),
//!         &control_path("save", |v: &EditorView| Rc::clone(&v.save)),
//!         None,
//!     )
//!     .unwrap();
//!
//! let save = ReactiveCommand::<()>::shared(|_| {});
//! editor.changed.assign(&editor.save, Some(Rc::clone(&save)), "save");
//! view.save.perform_click();
//! assert_eq!(save.execution_count(), 1);
//! ```

pub use bindery_runtime as runtime;
pub use bindery_widgets as widgets;

pub use bindery_runtime::{
    Binding, Command, NotifyPropertyChanged, Observable, PropertyChanged, PropertyPath,
    ReactiveCommand, Signal, Subscription,
};
pub use bindery_widgets::command_binding::{
    AffinityScore, BindError, BinderConfig, BindingHandle, BindingStrategy, BindingTarget,
    CommandBinder, DescriptorBuilder, ElementClass, StrategySet, TargetDescriptor, TargetRegistry,
    control_path,
};
#[cfg(feature = "policy-config")]
pub use bindery_widgets::command_binding::ConfigError;
pub use bindery_widgets::controls;

/// Everything needed to declare view models and bind them.
pub mod prelude {
    pub use crate::controls::{
        Button, ClickableComponent, Control, CustomControl, EventArgs, TextBlock, Toggle,
        ToolButton, events,
    };
    pub use crate::{
        BindError, BinderConfig, Binding, BindingHandle, BindingTarget, Command, CommandBinder,
        NotifyPropertyChanged, Observable, PropertyChanged, PropertyPath, ReactiveCommand,
        control_path,
    };
}
