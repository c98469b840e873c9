//! Transition tests for the breakpoint registry.
//!
//! These drive a detached registry by hand: conditions read a `Switch` and
//! each `evaluate_all` call stands in for one viewport event.

mod common;

use common::{CallTracker, Switch};
use floem_breakpoint::{Breakpoint, BreakpointError, BreakpointRegistry, FirstEnterState};

// =============================================================================
// Registration
// =============================================================================

#[test]
fn true_at_registration_enters_immediately() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();

    let id = registry.register(tracker.track("a", Breakpoint::new(|| true)));

    assert_eq!(tracker.calls(), vec!["a:first", "a:enter"]);
    assert_eq!(registry.is_active(id), Some(true));
}

#[test]
fn false_at_registration_is_inactive_and_silent() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();

    let id = registry.register(tracker.track("a", Breakpoint::new(|| false)));

    assert!(tracker.calls().is_empty());
    assert_eq!(registry.is_active(id), Some(false));
}

#[test]
fn registration_order_is_kept() {
    let registry = BreakpointRegistry::detached();
    let ids: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| registry.register(Breakpoint::new(|| false).named(name)))
        .collect();

    let breakpoints = registry.breakpoints();
    assert_eq!(registry.len(), 3);
    assert_eq!(breakpoints.iter().map(|bp| bp.id()).collect::<Vec<_>>(), ids);
    assert_eq!(
        breakpoints.iter().map(|bp| bp.name()).collect::<Vec<_>>(),
        vec![Some("a"), Some("b"), Some("c")]
    );
}

#[test]
fn breakpoints_without_callbacks() {
    let registry = BreakpointRegistry::detached();
    let switch = Switch::new(true);
    let id = registry.register(Breakpoint::new(switch.condition()));

    let bp = registry.get(id).unwrap();
    assert!(!bp.has_enter());
    assert!(!bp.has_exit());
    assert_eq!(bp.first_enter(), FirstEnterState::Absent);
    assert_eq!(bp.is_active(), Some(true));

    switch.set(false);
    registry.evaluate_all();
    assert_eq!(bp.is_active(), Some(false));
}

// =============================================================================
// Transitions
// =============================================================================

#[test]
fn exit_fires_once_without_enter() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let switch = Switch::new(true);
    let id = registry.register(tracker.track("a", Breakpoint::new(switch.condition())));
    tracker.take();

    switch.set(false);
    registry.evaluate_all();

    assert_eq!(tracker.calls(), vec!["a:exit"]);
    assert_eq!(registry.is_active(id), Some(false));
}

#[test]
fn enter_fires_once_without_exit() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let switch = Switch::new(false);
    let id = registry.register(tracker.track("a", Breakpoint::new(switch.condition())));

    switch.set(true);
    registry.evaluate_all();

    assert_eq!(tracker.calls(), vec!["a:first", "a:enter"]);
    assert_eq!(registry.is_active(id), Some(true));
}

#[test]
fn first_enter_fires_at_most_once() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let switch = Switch::new(false);
    let id = registry.register(tracker.track("a", Breakpoint::new(switch.condition())));

    for _ in 0..5 {
        switch.set(true);
        registry.evaluate_all();
        switch.set(false);
        registry.evaluate_all();
    }

    assert_eq!(tracker.count("a:first"), 1);
    assert_eq!(tracker.count("a:enter"), 5);
    assert_eq!(tracker.count("a:exit"), 5);
    assert_eq!(registry.get(id).unwrap().first_enter(), FirstEnterState::Consumed);
}

#[test]
fn repeated_pass_without_change_is_silent() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let on = Switch::new(false);
    let off = Switch::new(true);
    registry.register(tracker.track("on", Breakpoint::new(on.condition())));
    registry.register(tracker.track("off", Breakpoint::new(off.condition())));
    assert_eq!(tracker.take(), vec!["off:first", "off:enter"]);

    on.set(true);
    off.set(false);
    registry.evaluate_all();
    let first = tracker.take();
    assert_eq!(first, vec!["off:exit", "on:first", "on:enter"]);

    registry.evaluate_all();
    assert!(tracker.calls().is_empty());
}

#[test]
fn active_breakpoints_are_checked_first() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let c = Switch::new(false);
    let b = Switch::new(true);

    // C is registered before B, but B is active so its exit runs first.
    registry.register(tracker.track_repeating("c", Breakpoint::new(c.condition())));
    registry.register(tracker.track_repeating("b", Breakpoint::new(b.condition())));
    tracker.take();

    b.set(false);
    c.set(true);
    registry.evaluate_all();

    assert_eq!(tracker.calls(), vec!["b:exit", "c:enter"]);
}

#[test]
fn order_within_a_group_follows_registration() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let switch = Switch::new(false);
    for name in ["x", "y", "z"] {
        registry.register(tracker.track_repeating(name, Breakpoint::new(switch.condition())));
    }

    switch.set(true);
    registry.evaluate_all();
    switch.set(false);
    registry.evaluate_all();

    assert_eq!(
        tracker.calls(),
        vec!["x:enter", "y:enter", "z:enter", "x:exit", "y:exit", "z:exit"]
    );
}

// =============================================================================
// Manual checks
// =============================================================================

#[test]
fn check_evaluates_a_single_breakpoint() {
    let registry = BreakpointRegistry::detached();
    let tracker = CallTracker::new();
    let switch = Switch::new(false);
    let a = registry.register(tracker.track_repeating("a", Breakpoint::new(switch.condition())));
    let b = registry.register(tracker.track_repeating("b", Breakpoint::new(switch.condition())));

    switch.set(true);
    registry.check(a).unwrap();

    assert_eq!(tracker.calls(), vec!["a:enter"]);
    assert_eq!(registry.is_active(a), Some(true));
    assert_eq!(registry.is_active(b), Some(false));

    // A second check sees no change.
    registry.check(a).unwrap();
    assert_eq!(tracker.calls(), vec!["a:enter"]);
}

#[test]
fn check_unknown_breakpoint() {
    let registry = BreakpointRegistry::detached();
    let other = BreakpointRegistry::detached();
    let id = other.register(Breakpoint::new(|| true));

    let err = registry.check(id).unwrap_err();
    assert!(matches!(err, BreakpointError::UnknownBreakpoint(unknown) if unknown == id));
    assert_eq!(registry.is_active(id), None);
}
