#![forbid(unsafe_code)]

//! Parameter sources.
//!
//! A [`Binding<T>`] is a cheap, cloneable "read it now" handle. The command
//! binders store one per wiring and call [`Binding::get`] on every trigger
//! firing, so the command sees whatever the source holds at that moment
//! rather than the value at bind time.
//!
//! ```
//! use bindery_runtime::reactive::{Binding, Observable, bind_mapped, bind_observable};
//!
//! let row = Observable::new(3);
//! let index = bind_observable(&row);
//! let caption = bind_mapped(&row, |r| format!("row {r}"));
//! let fixed = Binding::constant('x');
//!
//! row.set(7);
//! assert_eq!(index.get(), 7);
//! assert_eq!(caption.get(), "row 7");
//! assert_eq!(fixed.get(), 'x');
//! ```
//!
//! # Invariants
//!
//! 1. `get()` evaluates the source on every call; nothing is cached.
//! 2. Clones read the same source.
//! 3. A binding keeps its source alive; dropping the original observable
//!    handle does not break it.
//!
//! A panic inside the source closure propagates to the caller of `get()`,
//! which for a command binding is the code that raised the trigger.

use std::rc::Rc;

use super::observable::Observable;

type Source<T> = Rc<dyn Fn() -> T>;

/// A lazily evaluated, read-only value.
pub struct Binding<T> {
    source: Source<T>,
}

impl<T: 'static> Binding<T> {
    /// Read through `source` on every [`get`](Self::get).
    pub fn new(source: impl Fn() -> T + 'static) -> Self {
        Self {
            source: Rc::new(source),
        }
    }

    /// Evaluate the source now.
    #[must_use]
    pub fn get(&self) -> T {
        (self.source)()
    }

    /// Chain a conversion applied after each read.
    #[must_use]
    pub fn then<U: 'static>(self, convert: impl Fn(T) -> U + 'static) -> Binding<U> {
        let inner = self.source;
        Binding::new(move || convert(inner()))
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// Always yields a clone of `value`.
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone())
    }
}

impl<T: Default + 'static> Default for Binding<T> {
    /// Always yields `T::default()`; the parameter of a command bound
    /// without one.
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}

/// Read `source`'s current value on each `get`.
pub fn bind_observable<T: Clone + PartialEq + 'static>(source: &Observable<T>) -> Binding<T> {
    let observable = source.clone();
    Binding::new(move || observable.get())
}

/// Read `source` through `project` on each `get`, without cloning the value.
pub fn bind_mapped<S, T>(source: &Observable<S>, project: impl Fn(&S) -> T + 'static) -> Binding<T>
where
    S: Clone + PartialEq + 'static,
    T: 'static,
{
    let observable = source.clone();
    Binding::new(move || observable.with(&project))
}

/// Shorthand for [`bind_observable`].
///
/// ```
/// use bindery_runtime::{bind, reactive::Observable};
///
/// let zoom = Observable::new(100);
/// let param = bind!(zoom);
/// zoom.set(125);
/// assert_eq!(param.get(), 125);
/// ```
#[macro_export]
macro_rules! bind {
    ($observable:expr) => {
        $crate::reactive::binding::bind_observable(&$observable)
    };
}

/// Shorthand for [`bind_mapped`].
///
/// ```
/// use bindery_runtime::{bind_map, reactive::Observable};
///
/// let path = Observable::new(String::from("notes.txt"));
/// let len = bind_map!(path, |p: &String| p.len());
/// assert_eq!(len.get(), 9);
/// ```
#[macro_export]
macro_rules! bind_map {
    ($observable:expr, $project:expr) => {
        $crate::reactive::binding::bind_mapped(&$observable, $project)
    };
}
