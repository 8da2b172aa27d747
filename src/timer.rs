//! Clock capability and a manually driven implementation.
//!
//! The toaster never reads wall-clock time. It asks a [`Clock`] for the
//! current time and for delayed callbacks, which makes its behavior fully
//! deterministic under [`ManualClock`].

use alloc::boxed::Box;
use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use core::time::Duration;

use spin::Mutex;
use timer_list::{TimerEvent, TimerList};

pub use timer_list::TimeValue;

/// Deferred work scheduled through a [`Clock`].
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Token identifying a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub usize);

/// Time source and scheduler.
pub trait Clock: Send + Sync {
    /// Returns the current monotonic time.
    fn now(&self) -> TimeValue;

    /// Runs `callback` once `delay` has elapsed.
    ///
    /// The callback must not be invoked from within `after` itself.
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancels a timer. Cancelling an expired or unknown timer is a no-op.
    fn cancel(&self, handle: TimerHandle);
}

struct ClockEvent {
    token: usize,
    callback: TimerCallback,
}

impl TimerEvent for ClockEvent {
    fn callback(self, _now: TimeValue) {
        (self.callback)()
    }
}

/// Virtual clock driven by the host.
///
/// Time only moves when [`advance`](Self::advance) or
/// [`advance_to`](Self::advance_to) is called. Expired timers fire in
/// deadline order, each with the clock set to its own deadline, so a timer
/// scheduled from inside a callback behaves as it would on a real event loop.
pub struct ManualClock {
    timer_list: Mutex<TimerList<ClockEvent>>,
    now_nanos: AtomicU64,
    next_token: AtomicUsize,
}

impl ManualClock {
    /// Constructs a clock at time zero with no timers.
    pub fn new() -> Self {
        Self {
            timer_list: Mutex::new(TimerList::new()),
            now_nanos: AtomicU64::new(0),
            next_token: AtomicUsize::new(0),
        }
    }

    /// Moves time forward by `delta`, firing every timer that expires on the way.
    ///
    /// Returns the number of callbacks executed.
    pub fn advance(&self, delta: Duration) -> usize {
        self.advance_to(self.now().saturating_add(delta))
    }

    /// Moves time forward to `target`, firing every timer due by then.
    ///
    /// Moving backwards is ignored. Returns the number of callbacks executed.
    pub fn advance_to(&self, target: TimeValue) -> usize {
        let mut fired = 0;
        loop {
            // The list lock is released before the callback runs so that it
            // can schedule or cancel timers.
            let expired = self.timer_list.lock().expire_one(target);
            let Some((deadline, event)) = expired else {
                break;
            };
            self.set_now(deadline);
            trace!("timer {} fired at {:?}", event.token, deadline);
            event.callback(deadline);
            fired += 1;
        }
        self.set_now(target);
        fired
    }

    /// Fires at most one timer that is already due at the current time.
    ///
    /// Returns `true` if a callback ran.
    pub fn check_event(&self) -> bool {
        let now = self.now();
        let expired = self.timer_list.lock().expire_one(now);
        if let Some((deadline, event)) = expired {
            trace!("timer {} fired at {:?}", event.token, deadline);
            event.callback(now);
            true
        } else {
            false
        }
    }

    /// Returns the deadline of the earliest scheduled timer.
    pub fn next_deadline(&self) -> Option<TimeValue> {
        self.timer_list.lock().next_deadline()
    }

    /// Returns `true` if no timer is scheduled.
    pub fn is_idle(&self) -> bool {
        self.timer_list.lock().is_empty()
    }

    fn set_now(&self, time: TimeValue) {
        let nanos = u64::try_from(time.as_nanos()).unwrap_or(u64::MAX);
        self.now_nanos.fetch_max(nanos, Ordering::AcqRel);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeValue {
        TimeValue::from_nanos(self.now_nanos.load(Ordering::Acquire))
    }

    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let deadline = self.now().saturating_add(delay);
        self.timer_list
            .lock()
            .set(deadline, ClockEvent { token, callback });
        TimerHandle(token)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.timer_list
            .lock()
            .cancel(|event| event.token == handle.0);
    }
}

impl core::fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &self.now())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}
