//! Callback storage and the isolation boundary every callback is invoked through.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run `f`, containing any panic it raises.
///
/// Returns `true` if `f` ran to completion. A panic is caught and discarded:
/// nothing is logged or retried and the caller carries on as if `f` had
/// returned. The process panic hook still runs, and with `panic = "abort"`
/// there is nothing to catch.
///
/// All three lifecycle callbacks go through this function, so a failing
/// `on_enter` can neither skip the `is_active` update nor stop the rest of an
/// evaluation pass.
pub fn invoke_isolated(f: impl FnOnce()) -> bool {
    catch_unwind(AssertUnwindSafe(f)).is_ok()
}

/// A repeatable lifecycle callback (`on_enter` / `on_exit`).
pub(crate) struct Callback(Box<dyn FnMut()>);

impl Callback {
    pub(crate) fn new(f: impl FnMut() + 'static) -> Self {
        Self(Box::new(f))
    }

    pub(crate) fn call(&mut self) -> bool {
        invoke_isolated(|| (self.0)())
    }
}

/// The `on_first_enter` slot.
///
/// Keeps "never provided" apart from "already fired" so a consumed callback
/// cannot come back.
#[derive(Default)]
pub(crate) enum FirstEnter {
    Pending(Box<dyn FnOnce()>),
    Consumed,
    #[default]
    Absent,
}

/// Inspection view of a breakpoint's `on_first_enter` slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirstEnterState {
    /// Provided and still waiting for the first enter transition.
    Pending,
    /// Provided and already fired.
    Consumed,
    /// Never provided.
    Absent,
}

impl FirstEnter {
    /// Take the callback out if it is still pending, leaving the slot
    /// consumed. The slot is consumed before the callback ever runs, so a
    /// panicking callback cannot fire a second time.
    pub(crate) fn consume(&mut self) -> Option<Box<dyn FnOnce()>> {
        match std::mem::take(self) {
            FirstEnter::Pending(f) => {
                *self = FirstEnter::Consumed;
                Some(f)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    pub(crate) fn state(&self) -> FirstEnterState {
        match self {
            FirstEnter::Pending(_) => FirstEnterState::Pending,
            FirstEnter::Consumed => FirstEnterState::Consumed,
            FirstEnter::Absent => FirstEnterState::Absent,
        }
    }
}
