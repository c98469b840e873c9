//! The external trigger: viewport resize and orientation signals.
//!
//! A registry only ever sees a [`ViewportSource`]. Hosts with their own event
//! loop can pass a closure that stores the listener and calls it on every
//! resize. [`Viewport`] is an in-memory host for headless use and tests.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use peniko::kurbo::Size;

use crate::responsive::{GridBreakpoints, ScreenSize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Portrait when taller than wide. Square counts as landscape.
    pub fn of(size: Size) -> Self {
        if size.height > size.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    Resized(Size),
    OrientationChanged(Orientation),
}

pub type ViewportListener = Box<dyn FnMut(&ViewportEvent)>;

/// Something that delivers viewport events to a listener.
///
/// A registry calls [`subscribe`](ViewportSource::subscribe) at most once,
/// when its first breakpoint is registered.
pub trait ViewportSource {
    fn subscribe(&mut self, listener: ViewportListener);
}

impl<F> ViewportSource for F
where
    F: FnMut(ViewportListener),
{
    fn subscribe(&mut self, listener: ViewportListener) {
        self(listener)
    }
}

/// An in-memory viewport.
///
/// Cloning is cheap and every clone refers to the same viewport, so a clone
/// can be handed to a registry while others are captured by conditions.
///
/// Events are delivered one at a time. A resize requested from inside a
/// listener is queued and delivered after the current event has reached every
/// listener, and [`size`](Viewport::size) only changes when its event is
/// delivered. If a listener panics, the events still queued are discarded and
/// the viewport keeps every subscriber.
#[derive(Clone)]
pub struct Viewport {
    inner: Rc<ViewportState>,
}

struct ViewportState {
    size: Cell<Size>,
    requested: Cell<Size>,
    grid: Cell<GridBreakpoints>,
    listeners: RefCell<Vec<ViewportListener>>,
    queue: RefCell<VecDeque<(Size, ViewportEvent)>>,
    dispatching: Cell<bool>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        let size = Size::new(width, height);
        Self {
            inner: Rc::new(ViewportState {
                size: Cell::new(size),
                requested: Cell::new(size),
                grid: Cell::new(GridBreakpoints::default()),
                listeners: RefCell::new(Vec::new()),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    /// Use `grid` to classify widths from now on.
    pub fn with_grid(self, grid: GridBreakpoints) -> Self {
        self.inner.grid.set(grid);
        self
    }

    pub fn size(&self) -> Size {
        self.inner.size.get()
    }

    pub fn width(&self) -> f64 {
        self.size().width
    }

    pub fn height(&self) -> f64 {
        self.size().height
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.size())
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.inner.grid.get().screen_size(self.width())
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Resize the viewport.
    ///
    /// Emits [`ViewportEvent::Resized`], followed by
    /// [`ViewportEvent::OrientationChanged`] when the new size flips the
    /// orientation. The event is emitted even if the size did not change.
    pub fn resize(&self, width: f64, height: f64) {
        let size = Size::new(width, height);
        let previous = self.inner.requested.replace(size);

        self.enqueue(size, ViewportEvent::Resized(size));
        let orientation = Orientation::of(size);
        if orientation != Orientation::of(previous) {
            self.enqueue(size, ViewportEvent::OrientationChanged(orientation));
        }
        self.flush();
    }

    /// Swap width and height, as a device rotation does.
    pub fn rotate(&self) {
        let previous = self.inner.requested.get();
        let size = Size::new(previous.height, previous.width);
        self.inner.requested.set(size);

        let orientation = Orientation::of(size);
        if orientation != Orientation::of(previous) {
            self.enqueue(size, ViewportEvent::OrientationChanged(orientation));
        }
        self.enqueue(size, ViewportEvent::Resized(size));
        self.flush();
    }

    /// A condition that holds while the width class is one of `sizes`.
    pub fn when(&self, sizes: ScreenSize) -> impl Fn() -> bool + use<> {
        let viewport = self.clone();
        move || sizes.contains(viewport.screen_size())
    }

    /// A condition that holds while the width is at most `px`.
    pub fn max_width(&self, px: f64) -> impl Fn() -> bool + use<> {
        let viewport = self.clone();
        move || viewport.width() <= px
    }

    /// A condition that holds while the width is at least `px`.
    pub fn min_width(&self, px: f64) -> impl Fn() -> bool + use<> {
        let viewport = self.clone();
        move || viewport.width() >= px
    }

    fn enqueue(&self, size: Size, event: ViewportEvent) {
        self.inner.queue.borrow_mut().push_back((size, event));
    }

    fn flush(&self) {
        if self.inner.dispatching.replace(true) {
            return;
        }

        let mut dispatch = Dispatch {
            state: &self.inner,
            running: Vec::new(),
        };
        while let Some((size, event)) = self.next_event() {
            self.inner.size.set(size);

            // Listeners are moved out while they run so one of them may
            // subscribe another without a double borrow.
            dispatch.running = self.inner.listeners.take();
            for listener in dispatch.running.iter_mut() {
                listener(&event);
            }
            dispatch.restore();
        }
    }

    fn next_event(&self) -> Option<(Size, ViewportEvent)> {
        self.inner.queue.borrow_mut().pop_front()
    }
}

/// Puts the running listeners back and ends the delivery, also when a
/// listener unwinds.
struct Dispatch<'a> {
    state: &'a ViewportState,
    running: Vec<ViewportListener>,
}

impl Dispatch<'_> {
    fn restore(&mut self) {
        let mut listeners = std::mem::take(&mut self.running);
        let mut current = self.state.listeners.borrow_mut();
        listeners.append(&mut current);
        *current = listeners;
    }
}

impl Drop for Dispatch<'_> {
    fn drop(&mut self) {
        self.restore();
        if std::thread::panicking() {
            // Events queued behind the one that unwound are dropped.
            self.state.queue.borrow_mut().clear();
            self.state.requested.set(self.state.size.get());
        }
        self.state.dispatching.set(false);
    }
}

impl ViewportSource for Viewport {
    fn subscribe(&mut self, listener: ViewportListener) {
        self.inner.listeners.borrow_mut().push(listener);
    }
}
