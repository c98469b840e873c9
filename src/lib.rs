//! # Floem Breakpoint
//! Breakpoints are named conditions on the viewport (or on anything else that
//! can answer yes or no) with callbacks that run when the condition starts or
//! stops holding.
//!
//! ## Example: Compact layout
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use floem_breakpoint::prelude::*;
//!
//! let viewport = Viewport::new(800.0, 600.0);
//! let registry = BreakpointRegistry::new(viewport.clone());
//!
//! let compact = Rc::new(Cell::new(false));
//! let id = registry.register(
//!     Breakpoint::new(viewport.max_width(600.0))
//!         .on_enter({
//!             let compact = compact.clone();
//!             move || compact.set(true)
//!         })
//!         .on_exit({
//!             let compact = compact.clone();
//!             move || compact.set(false)
//!         }),
//! );
//! assert_eq!(registry.is_active(id), Some(false));
//!
//! viewport.resize(500.0, 600.0);
//! assert!(compact.get());
//! assert_eq!(registry.is_active(id), Some(true));
//! ```
//!
//! ## Lifecycle
//!
//! Every breakpoint caches whether its condition held the last time it was
//! evaluated. An evaluation only looks for the transition away from that
//! cached state:
//!
//! - inactive → active runs `on_first_enter` (only ever once), then `on_enter`.
//! - active → inactive runs `on_exit`.
//!
//! Registering a breakpoint evaluates it once straight away. After that, each
//! viewport event runs one pass over all breakpoints: those active at the
//! start of the pass are checked for exit, then the others are checked for
//! enter. [`BreakpointRegistry::check`] re-evaluates a single breakpoint on
//! demand, for example after a layout change that did not resize the viewport.
//!
//! ## Callback isolation
//!
//! A panicking callback does not stop anything else. The panic is caught at
//! the callback boundary (see [`invoke_isolated`](callback::invoke_isolated)),
//! the breakpoint's state is still updated, and the rest of the pass runs.
//!
//! ## Viewports
//!
//! A registry subscribes to a [`ViewportSource`] when its first breakpoint is
//! registered. [`Viewport`] is an in-memory source. Hosts with their own event
//! loop pass a closure that keeps the listener and calls it on every resize
//! or orientation change.
//!
//! Width classes from [`responsive`] make grid-style conditions short:
//!
//! ```rust
//! use floem_breakpoint::prelude::*;
//! use floem_breakpoint::responsive::range;
//!
//! let viewport = Viewport::new(1280.0, 800.0);
//! let registry = BreakpointRegistry::new(viewport.clone());
//!
//! let desktop = registry.register(
//!     Breakpoint::new(viewport.when(range(ScreenSize::LG..))).named("desktop"),
//! );
//! assert_eq!(registry.is_active(desktop), Some(true));
//! ```

pub mod breakpoint;
pub mod callback;
pub mod error;
pub mod options;
pub mod registry;
pub mod responsive;
pub mod viewport;

pub use breakpoint::{Breakpoint, BreakpointId, RegisteredBreakpoint};
pub use callback::{FirstEnterState, invoke_isolated};
pub use error::BreakpointError;
pub use options::Options;
pub use peniko::kurbo;
pub use registry::BreakpointRegistry;
pub use responsive::{GridBreakpoints, ScreenSize};
pub use viewport::{Orientation, Viewport, ViewportEvent, ViewportListener, ViewportSource};

pub mod prelude {
    pub use crate::responsive::{GridBreakpoints, ScreenSize};
    pub use crate::viewport::{Viewport, ViewportEvent, ViewportSource};
    pub use crate::{Breakpoint, BreakpointId, BreakpointRegistry, Options};
}
