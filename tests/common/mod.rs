//! Shared helpers for breakpoint integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use floem_breakpoint::Breakpoint;

/// Records lifecycle callbacks across breakpoints.
///
/// Every callback pushes `"<name>:<kind>"` onto a shared log, so tests can
/// assert both which callbacks ran and in what order.
///
/// # Example
///
/// ```rust,ignore
/// let tracker = CallTracker::new();
/// registry.register(tracker.track("a", Breakpoint::new(|| true)));
/// assert_eq!(tracker.calls(), vec!["a:first", "a:enter"]);
/// ```
#[derive(Clone, Default)]
pub struct CallTracker {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CallTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `on_first_enter`, `on_enter` and `on_exit` recorders.
    pub fn track(&self, name: &str, breakpoint: Breakpoint) -> Breakpoint {
        breakpoint
            .on_first_enter(self.recorder(name, "first"))
            .on_enter(self.recorder(name, "enter"))
            .on_exit(self.recorder(name, "exit"))
    }

    /// Attach only `on_enter` and `on_exit` recorders.
    pub fn track_repeating(&self, name: &str, breakpoint: Breakpoint) -> Breakpoint {
        breakpoint
            .on_enter(self.recorder(name, "enter"))
            .on_exit(self.recorder(name, "exit"))
    }

    pub fn recorder(&self, name: &str, kind: &str) -> impl FnMut() + use<> {
        let calls = self.calls.clone();
        let entry = format!("{name}:{kind}");
        move || calls.borrow_mut().push(entry.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Return the recorded calls and start over.
    pub fn take(&self) -> Vec<String> {
        self.calls.take()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == entry).count()
    }
}

/// A boolean a condition can read, flipped by the test.
#[derive(Clone, Default)]
pub struct Switch(Rc<Cell<bool>>);

impl Switch {
    pub fn new(on: bool) -> Self {
        Self(Rc::new(Cell::new(on)))
    }

    pub fn set(&self, on: bool) {
        self.0.set(on);
    }

    pub fn condition(&self) -> impl Fn() -> bool + use<> {
        let on = self.0.clone();
        move || on.get()
    }
}
