//! Tick-source abstraction: monotonic timestamps plus schedule/cancel of the
//! single outstanding animation tick.
//!
//! The controller never blocks or sleeps; it asks its tick source for "now",
//! arms at most one pending tick, and the host delivers that tick by calling
//! [`MotionController::tick`](crate::MotionController::tick) with a timestamp
//! from the same source. Cancelling before a timing mutation is what keeps a
//! stale callback from re-entering with outdated parameters.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Identifies one scheduled tick. A handle is spent once the tick is
/// delivered or cancelled; delivering a cancelled handle is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle(u64);

/// Clock contract consumed by the controller.
pub trait TickSource {
    /// Current monotonic timestamp, as an offset from an arbitrary epoch.
    fn now(&self) -> Duration;
    /// Arm the next animation tick.
    fn schedule(&mut self) -> TickHandle;
    /// Disarm a previously scheduled tick.
    fn cancel(&mut self, handle: TickHandle);
}

#[derive(Debug)]
struct ArmedState {
    armed: Cell<Option<TickHandle>>,
    next_handle: Cell<u64>,
    scheduled: Cell<u64>,
    cancelled: Cell<u64>,
}

impl ArmedState {
    fn new() -> Self {
        Self {
            armed: Cell::new(None),
            next_handle: Cell::new(0),
            scheduled: Cell::new(0),
            cancelled: Cell::new(0),
        }
    }

    fn schedule(&self) -> TickHandle {
        let handle = TickHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.scheduled.set(self.scheduled.get() + 1);
        self.armed.set(Some(handle));
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        if self.armed.get() == Some(handle) {
            self.armed.set(None);
        }
        self.cancelled.set(self.cancelled.get() + 1);
    }
}

/// Wall-clock tick source for a live host loop.
///
/// Cloning yields a handle onto the same timeline, so the frame loop and the
/// controller read identical timestamps.
#[derive(Debug, Clone)]
pub struct SystemClock {
    anchor: Instant,
    state: Rc<ArmedState>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            state: Rc::new(ArmedState::new()),
        }
    }

    /// Whether a tick is currently armed.
    pub fn is_armed(&self) -> bool {
        self.state.armed.get().is_some()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemClock {
    fn now(&self) -> Duration {
        self.anchor.elapsed()
    }

    fn schedule(&mut self) -> TickHandle {
        self.state.schedule()
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.state.cancel(handle);
    }
}

/// Deterministic tick source for tests and the simulator.
///
/// Time only moves when the driver advances it. Clones share the timeline and
/// the schedule/cancel counters, so a test can hold one clone, move time on
/// it, and inspect what the controller did with the other.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    state: Rc<ArmedState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
            state: Rc::new(ArmedState::new()),
        }
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }

    pub fn is_armed(&self) -> bool {
        self.state.armed.get().is_some()
    }

    /// Total ticks scheduled so far.
    pub fn scheduled(&self) -> u64 {
        self.state.scheduled.get()
    }

    /// Total ticks cancelled so far.
    pub fn cancelled(&self) -> u64 {
        self.state.cancelled.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn schedule(&mut self) -> TickHandle {
        self.state.schedule()
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.state.cancel(handle);
    }
}
