//! Breakpoint descriptors and the registry's record of them.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::trace;

use crate::{
    callback::{Callback, FirstEnter, FirstEnterState, invoke_isolated},
    options::Options,
};

/// A stable identifier for a registered breakpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BreakpointId(u64);

impl BreakpointId {
    pub(crate) fn next() -> BreakpointId {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        BreakpointId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A condition plus the callbacks to run when it starts or stops holding.
///
/// ```rust
/// use floem_breakpoint::{Breakpoint, BreakpointRegistry, Viewport};
///
/// let viewport = Viewport::new(800.0, 600.0);
/// let registry = BreakpointRegistry::new(viewport.clone());
///
/// registry.register(
///     Breakpoint::new(viewport.max_width(600.0))
///         .named("compact")
///         .on_first_enter(|| println!("compact layout built"))
///         .on_enter(|| println!("compact"))
///         .on_exit(|| println!("wide")),
/// );
///
/// viewport.resize(500.0, 600.0);
/// ```
pub struct Breakpoint {
    name: Option<String>,
    condition: Box<dyn Fn() -> bool>,
    first_enter: FirstEnter,
    enter: Option<Callback>,
    exit: Option<Callback>,
}

impl Breakpoint {
    /// `condition` is re-run on every evaluation. It may read outside state
    /// such as the viewport width but must not touch the registry.
    pub fn new(condition: impl Fn() -> bool + 'static) -> Self {
        Self {
            name: None,
            condition: Box::new(condition),
            first_enter: FirstEnter::Absent,
            enter: None,
            exit: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Runs once, the first time the condition is seen to hold. It runs
    /// before [`on_enter`](Self::on_enter) on that transition.
    pub fn on_first_enter(mut self, f: impl FnOnce() + 'static) -> Self {
        self.first_enter = FirstEnter::Pending(Box::new(f));
        self
    }

    /// Runs on every false → true transition, the first one included.
    pub fn on_enter(mut self, f: impl FnMut() + 'static) -> Self {
        self.enter = Some(Callback::new(f));
        self
    }

    /// Runs on every true → false transition.
    pub fn on_exit(mut self, f: impl FnMut() + 'static) -> Self {
        self.exit = Some(Callback::new(f));
        self
    }
}

impl fmt::Debug for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breakpoint")
            .field("name", &self.name)
            .field("first_enter", &self.first_enter.state())
            .field("enter", &self.enter.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Transition {
    Enter,
    Exit,
}

/// A breakpoint as the registry holds it.
pub(crate) struct Entry {
    id: BreakpointId,
    name: Option<String>,
    condition: Box<dyn Fn() -> bool>,
    is_active: Cell<Option<bool>>,
    first_enter: RefCell<FirstEnter>,
    enter: RefCell<Option<Callback>>,
    exit: RefCell<Option<Callback>>,
    has_enter: bool,
    has_exit: bool,
    options: Options,
}

impl Entry {
    pub(crate) fn new(id: BreakpointId, breakpoint: Breakpoint, options: Options) -> Self {
        let Breakpoint {
            name,
            condition,
            first_enter,
            enter,
            exit,
        } = breakpoint;
        Self {
            id,
            name,
            condition,
            is_active: Cell::new(None),
            first_enter: RefCell::new(first_enter),
            has_enter: enter.is_some(),
            has_exit: exit.is_some(),
            enter: RefCell::new(enter),
            exit: RefCell::new(exit),
            options,
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn is_active(&self) -> Option<bool> {
        self.is_active.get()
    }

    /// Check the one transition the cached state allows.
    pub(crate) fn evaluate(&self) -> Option<Transition> {
        if self.is_active.get() == Some(true) {
            self.check_exit()
        } else {
            self.check_enter()
        }
    }

    /// Active → inactive.
    pub(crate) fn check_exit(&self) -> Option<Transition> {
        if (self.condition)() {
            return None;
        }

        if let Some(exit) = self.exit.borrow_mut().as_mut() {
            exit.call();
        }
        self.is_active.set(Some(false));
        trace!(id = ?self.id, name = ?self.name, "breakpoint exited");
        Some(Transition::Exit)
    }

    /// Inactive (or never evaluated) → active.
    pub(crate) fn check_enter(&self) -> Option<Transition> {
        if !(self.condition)() {
            self.is_active.set(Some(false));
            return None;
        }

        // Taken out before running so the slot reads as consumed from inside
        // the callback.
        let first_enter = self.first_enter.borrow_mut().consume();
        if let Some(f) = first_enter {
            invoke_isolated(f);
        }
        if let Some(enter) = self.enter.borrow_mut().as_mut() {
            enter.call();
        }
        self.is_active.set(Some(true));
        trace!(id = ?self.id, name = ?self.name, "breakpoint entered");
        Some(Transition::Enter)
    }
}

/// Read-only view of a registered breakpoint.
#[derive(Clone)]
pub struct RegisteredBreakpoint {
    entry: Rc<Entry>,
}

impl RegisteredBreakpoint {
    pub(crate) fn new(entry: Rc<Entry>) -> Self {
        Self { entry }
    }

    pub fn id(&self) -> BreakpointId {
        self.entry.id
    }

    pub fn name(&self) -> Option<&str> {
        self.entry.name()
    }

    /// The condition's value at the last evaluation, or `None` if the
    /// breakpoint has not been evaluated yet.
    pub fn is_active(&self) -> Option<bool> {
        self.entry.is_active()
    }

    pub fn first_enter(&self) -> FirstEnterState {
        self.entry
            .first_enter
            .try_borrow()
            .map(|slot| slot.state())
            .unwrap_or(FirstEnterState::Consumed)
    }

    pub fn has_enter(&self) -> bool {
        self.entry.has_enter
    }

    pub fn has_exit(&self) -> bool {
        self.entry.has_exit
    }

    /// Registry defaults merged with the options given at registration.
    pub fn options(&self) -> &Options {
        &self.entry.options
    }
}

impl fmt::Debug for RegisteredBreakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredBreakpoint")
            .field("id", &self.id())
            .field("name", &self.entry.name)
            .field("is_active", &self.is_active())
            .field("first_enter", &self.first_enter())
            .finish()
    }
}
