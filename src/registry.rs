use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    breakpoint::{Breakpoint, BreakpointId, Entry, RegisteredBreakpoint},
    error::BreakpointError,
    options::Options,
    viewport::{ViewportEvent, ViewportSource},
};

/// Owns the registered breakpoints and runs their transitions.
///
/// The registry is a cheap handle: clones share the same breakpoints. It is
/// single-threaded and every evaluation runs synchronously to completion.
///
/// Callbacks may call back into the registry. Evaluations requested while one
/// is already running (a [`check`](Self::check), an
/// [`evaluate_all`](Self::evaluate_all), or the first evaluation of a
/// breakpoint registered from a callback) are queued and run in order right
/// after the running one, so no breakpoint is ever evaluated from inside its
/// own callback.
#[derive(Clone)]
pub struct BreakpointRegistry {
    state: Rc<RegistryState>,
}

struct RegistryState {
    entries: RefCell<IndexMap<BreakpointId, Rc<Entry>, FxBuildHasher>>,
    source: RefCell<Option<Box<dyn ViewportSource>>>,
    listening: Cell<bool>,
    defaults: RefCell<Options>,
    evaluating: Cell<bool>,
    deferred: RefCell<SmallVec<[Work; 4]>>,
}

#[derive(Clone, Copy, Debug)]
enum Work {
    Check(BreakpointId),
    Pass,
}

impl Default for BreakpointRegistry {
    fn default() -> Self {
        Self::detached()
    }
}

impl BreakpointRegistry {
    /// A registry driven by `source`.
    ///
    /// Nothing is subscribed until the first breakpoint is registered. From
    /// then on every event the source delivers runs
    /// [`evaluate_all`](Self::evaluate_all).
    pub fn new(source: impl ViewportSource + 'static) -> Self {
        Self::with_source(Some(Box::new(source)))
    }

    /// A registry with no event source. The caller runs
    /// [`evaluate_all`](Self::evaluate_all) itself.
    pub fn detached() -> Self {
        Self::with_source(None)
    }

    fn with_source(source: Option<Box<dyn ViewportSource>>) -> Self {
        Self {
            state: Rc::new(RegistryState {
                entries: RefCell::new(IndexMap::default()),
                source: RefCell::new(source),
                listening: Cell::new(false),
                defaults: RefCell::new(Options::new()),
                evaluating: Cell::new(false),
                deferred: RefCell::new(SmallVec::new()),
            }),
        }
    }

    /// Register `breakpoint` with the default options and evaluate it once.
    pub fn register(&self, breakpoint: Breakpoint) -> BreakpointId {
        self.register_with(breakpoint, Options::new())
    }

    /// Register `breakpoint` and evaluate it once.
    ///
    /// `options` is deep-merged over the registry defaults and stored with the
    /// breakpoint. The first registration subscribes the registry to its
    /// event source.
    pub fn register_with(&self, breakpoint: Breakpoint, options: Options) -> BreakpointId {
        let options = self.state.defaults.borrow().clone().merged(&options);
        let id = BreakpointId::next();
        let entry = Rc::new(Entry::new(id, breakpoint, options));
        trace!(?id, name = ?entry.name(), "registering breakpoint");
        self.state.entries.borrow_mut().insert(id, entry);

        self.listen();
        self.state.run(Work::Check(id));
        id
    }

    /// Evaluate one breakpoint now, outside of any viewport event.
    pub fn check(&self, id: BreakpointId) -> Result<(), BreakpointError> {
        if !self.state.entries.borrow().contains_key(&id) {
            return Err(BreakpointError::UnknownBreakpoint(id));
        }
        self.state.run(Work::Check(id));
        Ok(())
    }

    /// Run one evaluation pass over every breakpoint.
    ///
    /// Breakpoints that are active when the pass starts are checked for exit
    /// first, then the rest are checked for enter. Each breakpoint is
    /// evaluated exactly once per pass.
    pub fn evaluate_all(&self) {
        self.state.run(Work::Pass);
    }

    /// The cached state of `id`. `None` if it is unknown or not evaluated yet.
    pub fn is_active(&self, id: BreakpointId) -> Option<bool> {
        self.state.entries.borrow().get(&id)?.is_active()
    }

    pub fn get(&self, id: BreakpointId) -> Option<RegisteredBreakpoint> {
        self.state
            .entries
            .borrow()
            .get(&id)
            .map(|entry| RegisteredBreakpoint::new(entry.clone()))
    }

    /// Every registered breakpoint, in registration order.
    pub fn breakpoints(&self) -> Vec<RegisteredBreakpoint> {
        self.state
            .entries
            .borrow()
            .values()
            .map(|entry| RegisteredBreakpoint::new(entry.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.borrow().is_empty()
    }

    /// Whether the registry has subscribed to its event source.
    pub fn is_listening(&self) -> bool {
        self.state.listening.get()
    }

    /// The options every new registration starts from.
    pub fn defaults(&self) -> Options {
        self.state.defaults.borrow().clone()
    }

    /// Replace the defaults. Already registered breakpoints keep the options
    /// they were registered with.
    pub fn set_defaults(&self, defaults: Options) {
        *self.state.defaults.borrow_mut() = defaults;
    }

    pub fn update_defaults(&self, f: impl FnOnce(&mut Options)) {
        f(&mut self.state.defaults.borrow_mut());
    }

    fn listen(&self) {
        if self.state.listening.get() {
            return;
        }
        let Some(mut source) = self.state.source.borrow_mut().take() else {
            return;
        };
        self.state.listening.set(true);

        let state = Rc::downgrade(&self.state);
        source.subscribe(Box::new(move |event: &ViewportEvent| {
            if let Some(state) = state.upgrade() {
                trace!(?event, "viewport changed");
                state.run(Work::Pass);
            }
        }));
        *self.state.source.borrow_mut() = Some(source);
        debug!("breakpoint registry listening for viewport changes");
    }
}

impl fmt::Debug for BreakpointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointRegistry")
            .field("breakpoints", &self.breakpoints())
            .field("listening", &self.is_listening())
            .field("defaults", &*self.state.defaults.borrow())
            .finish()
    }
}

impl RegistryState {
    fn run(&self, work: Work) {
        if self.evaluating.replace(true) {
            trace!(?work, "evaluation in progress, deferring");
            self.deferred.borrow_mut().push(work);
            return;
        }
        let _evaluating = EvaluatingGuard(self);

        self.perform(work);
        loop {
            let batch = self.deferred.take();
            if batch.is_empty() {
                break;
            }
            for work in batch {
                self.perform(work);
            }
        }
    }

    fn perform(&self, work: Work) {
        match work {
            Work::Check(id) => {
                let entry = self.entries.borrow().get(&id).cloned();
                if let Some(entry) = entry {
                    entry.evaluate();
                }
            }
            Work::Pass => self.evaluate_pass(),
        }
    }

    fn evaluate_pass(&self) {
        // Membership is fixed here: a breakpoint that enters during this pass
        // is not checked for exit until the next one, and vice versa.
        let (active, inactive): (SmallVec<[Rc<Entry>; 16]>, SmallVec<[Rc<Entry>; 16]>) = self
            .entries
            .borrow()
            .values()
            .cloned()
            .partition(|entry| entry.is_active() == Some(true));
        trace!(
            active = active.len(),
            inactive = inactive.len(),
            "evaluating breakpoints"
        );

        for entry in &active {
            entry.check_exit();
        }
        for entry in &inactive {
            entry.check_enter();
        }
    }
}

/// Ends an evaluation. Work still queued when a condition unwinds is
/// dropped so a later call never runs it.
struct EvaluatingGuard<'a>(&'a RegistryState);

impl Drop for EvaluatingGuard<'_> {
    fn drop(&mut self) {
        self.0.deferred.borrow_mut().clear();
        self.0.evaluating.set(false);
    }
}
