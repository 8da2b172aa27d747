//! Toast admission and lifecycle manager.
//!
//! This module provides [`Toaster`], which owns every tracked toast, decides
//! when pending toasts become visible, and guarantees that each toast's
//! dismissal callback runs exactly once.

use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;

use axerrno::{ax_err, AxResult};
use spin::Mutex;

use crate::config::ToasterConfig;
use crate::keys::{KeyGenerator, SequentialKeys};
use crate::lifecycle::{HostLifecycle, ToasterLifecycle, ToasterState};
use crate::render::{RenderHints, Renderer};
use crate::timer::{Clock, TimeValue, TimerHandle};
use crate::toast::{Toast, ToastKey, ToastProps};

use super::entry::{Dismissal, Entry};
use super::store::{Slot, ToastQueue};

/// Bounded, time-gated toast queue.
///
/// `Toaster` is a cheap handle; clones share the same queue.
///
/// # Admission
///
/// New toasts enter a FIFO pending queue. The head of the queue is admitted
/// into the visible set as soon as at least `admission_delay` has passed since
/// the previous admission; otherwise a clock callback retries once the delay
/// elapses. When the visible set is at `max_toasts`, admitting a new toast
/// evicts the visible toast admitted longest ago.
///
/// # Callbacks
///
/// Dismissal callbacks and the renderer run after the internal lock is
/// released and may call back into the toaster. The callback of a dismissed
/// or expired toast runs before the freed slot is offered to the pending
/// queue; the renderer runs last.
#[derive(Clone)]
pub struct Toaster {
    inner: Arc<ToasterInner>,
}

struct ToasterInner {
    config: ToasterConfig,
    /// Queue and timer handles, guarded as one unit.
    state: Mutex<QueueState>,
    lifecycle: ToasterLifecycle,
    renderer: Arc<dyn Renderer>,
    clock: Arc<dyn Clock>,
    keys: Arc<dyn KeyGenerator>,
    /// Source of auto-dismiss timer generations.
    timer_generation: AtomicU64,
}

struct QueueState {
    queue: ToastQueue,
    /// Clock time of the most recent admission.
    last_admission: Option<TimeValue>,
    /// Outstanding delayed-admission timer.
    admission_timer: Option<TimerHandle>,
    /// Bumped whenever the admission timer is rescheduled.
    admission_generation: u64,
}

impl Toaster {
    /// Creates a toaster with the default key generator.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `config.max_toasts` is zero.
    /// - `BadState` if `host` is currently inside a render pass.
    pub fn create(
        config: ToasterConfig,
        host: &dyn HostLifecycle,
        renderer: Arc<dyn Renderer>,
        clock: Arc<dyn Clock>,
    ) -> AxResult<Self> {
        Self::create_with_keys(config, host, renderer, clock, Arc::new(SequentialKeys::new()))
    }

    /// Creates a toaster that names unkeyed toasts with `keys`.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn create_with_keys(
        config: ToasterConfig,
        host: &dyn HostLifecycle,
        renderer: Arc<dyn Renderer>,
        clock: Arc<dyn Clock>,
        keys: Arc<dyn KeyGenerator>,
    ) -> AxResult<Self> {
        config.validate()?;
        if host.is_rendering() {
            return ax_err!(BadState, "cannot create a toaster during a render pass");
        }

        debug!(
            "Creating toaster: max_toasts={:?}, admission_delay={:?}, default_timeout={:?}",
            config.max_toasts, config.admission_delay, config.default_timeout
        );

        let state = QueueState {
            queue: ToastQueue::new(config.max_toasts),
            last_admission: None,
            admission_timer: None,
            admission_generation: 0,
        };

        Ok(Self {
            inner: Arc::new(ToasterInner {
                config,
                state: Mutex::new(state),
                lifecycle: ToasterLifecycle::new(),
                renderer,
                clock,
                keys,
                timer_generation: AtomicU64::new(0),
            }),
        })
    }

    /// Shows a new toast under a generated key.
    ///
    /// Returns the key immediately; the toast may still be pending.
    pub fn show(&self, props: ToastProps) -> ToastKey {
        self.inner.show(props, None)
    }

    /// Shows a toast under `key`.
    ///
    /// If `key` is already tracked the toast is updated in place: its payload,
    /// timeout and callback are replaced, and if it is visible its timeout
    /// restarts and it moves to the front. An update never adds an entry and
    /// never evicts one.
    pub fn show_with_key(&self, props: ToastProps, key: impl Into<ToastKey>) -> ToastKey {
        self.inner.show(props, Some(key.into()))
    }

    /// Dismisses a toast, pending or visible.
    ///
    /// Dismissing an untracked key is a no-op.
    pub fn dismiss(&self, key: &str) {
        self.inner.dismiss(key);
    }

    /// Dismisses every toast, visible and pending.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Returns the visible toasts, newest-first.
    ///
    /// This is a snapshot; it never triggers admission.
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.state.lock().queue.snapshot()
    }

    /// Number of visible toasts.
    pub fn active_count(&self) -> usize {
        self.inner.state.lock().queue.active_len()
    }

    /// Number of toasts waiting for admission.
    pub fn pending_count(&self) -> usize {
        self.inner.state.lock().queue.pending_len()
    }

    /// Returns `true` if no toast is tracked.
    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().queue.is_empty()
    }

    /// The configuration this toaster was created with.
    pub fn config(&self) -> &ToasterConfig {
        &self.inner.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ToasterState {
        self.inner.lifecycle.state()
    }

    /// Returns `true` once [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        !self.inner.lifecycle.is_active()
    }

    /// Tears the toaster down.
    ///
    /// Every tracked toast is dismissed, all timers are cancelled and the
    /// renderer is unmounted. Later calls are ignored and return `false`.
    pub fn destroy(&self) -> bool {
        self.inner.destroy()
    }
}

impl core::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Toaster")
            .field("lifecycle", &self.inner.lifecycle)
            .field("active", &state.queue.active_len())
            .field("pending", &state.queue.pending_len())
            .field("last_admission", &state.last_admission)
            .finish()
    }
}

impl ToasterInner {
    fn hints(&self) -> RenderHints {
        RenderHints {
            auto_focus: self.config.auto_focus,
            position: self.config.position,
        }
    }

    fn show(self: &Arc<Self>, props: ToastProps, key: Option<ToastKey>) -> ToastKey {
        if !self.lifecycle.is_active() {
            let key = key.unwrap_or_else(|| self.keys.next_key());
            warn!("Ignoring toast {} shown on a destroyed toaster", key);
            return key;
        }

        let mut dismissed = Vec::new();
        let key = {
            let mut state = self.state.lock();
            let key = match key {
                Some(key) if state.queue.contains(&key) => {
                    self.update(&mut state, &key, props);
                    key
                }
                key => {
                    let key = match key {
                        Some(key) => key,
                        None => self.unique_key(&state.queue),
                    };
                    trace!("Queueing toast {}", key);
                    let entry = Entry::new(key.clone(), props, self.clock.now());
                    state.queue.push_pending(entry);
                    key
                }
            };
            self.admit(&mut state, &mut dismissed);
            key
        };

        self.publish(dismissed);
        key
    }

    fn update(self: &Arc<Self>, state: &mut QueueState, key: &str, props: ToastProps) {
        let Some((slot, entry)) = state.queue.update(key, props) else {
            return;
        };
        trace!("Updated toast {} in place ({:?})", key, slot);
        if slot == Slot::Active {
            self.start_timeout(entry);
        }
    }

    fn unique_key(&self, queue: &ToastQueue) -> ToastKey {
        loop {
            let key = self.keys.next_key();
            if !queue.contains(&key) {
                return key;
            }
            trace!("Generated key {} is already tracked, retrying", key);
        }
    }

    fn dismiss(self: &Arc<Self>, key: &str) {
        if !self.lifecycle.is_active() {
            return;
        }

        let (slot, dismissal) = {
            let mut state = self.state.lock();
            let Some((slot, mut entry)) = state.queue.remove(key) else {
                trace!("Dismiss of untracked toast {} ignored", key);
                return;
            };
            debug!("Dismissing toast {} ({:?})", key, slot);
            self.cancel_timeout(&mut entry);
            if state.queue.pending_len() == 0 {
                self.cancel_admission(&mut state);
            }
            (slot, entry.take_dismissal(false))
        };

        self.settle(dismissal, slot == Slot::Active);
    }

    /// Auto-dismiss timer callback.
    fn expire(self: &Arc<Self>, key: &str, generation: u64) {
        if !self.lifecycle.is_active() {
            return;
        }

        let dismissal = {
            let mut state = self.state.lock();
            let current = state
                .queue
                .active_entry(key)
                .is_some_and(|entry| entry.timer().is_some() && entry.generation() == generation);
            if !current {
                trace!("Stale timeout for toast {} ignored", key);
                return;
            }
            let Some((_, mut entry)) = state.queue.remove(key) else {
                return;
            };
            // The timer already fired, there is nothing left to cancel.
            entry.take_timer();
            debug!("Toast {} timed out", key);
            entry.take_dismissal(true)
        };

        self.settle(dismissal, true);
    }

    /// Notifies a removed entry, then refills the visible set if it lost one.
    fn settle(self: &Arc<Self>, dismissal: Option<Dismissal>, refill: bool) {
        if let Some(dismissal) = dismissal {
            dismissal.fire();
        }

        let mut dismissed = Vec::new();
        if refill && self.lifecycle.is_active() {
            let mut state = self.state.lock();
            self.admit(&mut state, &mut dismissed);
        }
        self.publish(dismissed);
    }

    fn clear(self: &Arc<Self>) {
        if !self.lifecycle.is_active() {
            return;
        }

        let dismissed = {
            let mut state = self.state.lock();
            self.drain(&mut state)
        };
        self.publish(dismissed);
    }

    fn destroy(self: &Arc<Self>) -> bool {
        if !self.lifecycle.begin_teardown() {
            return false;
        }

        let dismissed = {
            let mut state = self.state.lock();
            self.drain(&mut state)
        };
        for dismissal in dismissed {
            dismissal.fire();
        }

        self.lifecycle.complete_teardown();
        self.renderer.unmount();
        debug!("Toaster destroyed");
        true
    }

    /// Removes every entry and cancels every timer.
    fn drain(&self, state: &mut QueueState) -> Vec<Dismissal> {
        self.cancel_admission(state);
        state.last_admission = None;

        let entries = state.queue.drain();
        if !entries.is_empty() {
            debug!("Clearing {} toasts", entries.len());
        }

        let mut dismissed = Vec::with_capacity(entries.len());
        for mut entry in entries {
            self.cancel_timeout(&mut entry);
            dismissed.extend(entry.take_dismissal(false));
        }
        dismissed
    }

    /// Moves pending entries into the visible set while the admission delay
    /// allows, scheduling a retry otherwise.
    ///
    /// Returns `true` if at least one entry was admitted.
    fn admit(self: &Arc<Self>, state: &mut QueueState, dismissed: &mut Vec<Dismissal>) -> bool {
        let mut admitted = false;

        while state.queue.pending_len() > 0 {
            let now = self.clock.now();
            if let Some(last) = state.last_admission {
                let ready_at = last.saturating_add(self.config.admission_delay);
                if now < ready_at {
                    self.schedule_admission(state, ready_at - now);
                    break;
                }
            }

            if state.queue.is_full() {
                if let Some(mut evicted) = state.queue.evict_oldest() {
                    debug!("Evicting toast {} to make room", evicted.key());
                    self.cancel_timeout(&mut evicted);
                    dismissed.extend(evicted.take_dismissal(false));
                }
            }

            let Some(entry) = state.queue.admit_next() else {
                break;
            };
            debug!("Admitted toast {}", entry.key());
            self.start_timeout(entry);
            state.last_admission = Some(now);
            admitted = true;
        }

        admitted
    }

    fn schedule_admission(self: &Arc<Self>, state: &mut QueueState, delay: Duration) {
        self.cancel_admission(state);

        state.admission_generation = state.admission_generation.wrapping_add(1);
        let generation = state.admission_generation;
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = self.clock.after(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.on_admission_timer(generation);
                }
            }),
        );
        trace!("Scheduled admission in {:?} (timer {:?})", delay, handle);
        state.admission_timer = Some(handle);
    }

    fn cancel_admission(&self, state: &mut QueueState) {
        if let Some(handle) = state.admission_timer.take() {
            trace!("Cancelling admission timer {:?}", handle);
            self.clock.cancel(handle);
        }
    }

    /// Delayed-admission timer callback.
    fn on_admission_timer(self: &Arc<Self>, generation: u64) {
        if !self.lifecycle.is_active() {
            return;
        }

        let mut dismissed = Vec::new();
        let admitted = {
            let mut state = self.state.lock();
            if state.admission_generation == generation {
                state.admission_timer = None;
            }
            self.admit(&mut state, &mut dismissed)
        };

        if admitted || !dismissed.is_empty() {
            self.publish(dismissed);
        }
    }

    /// Starts, or restarts, the auto-dismiss timer of an active entry.
    fn start_timeout(self: &Arc<Self>, entry: &mut Entry) {
        self.cancel_timeout(entry);

        let Some(timeout) = entry.toast().timeout.resolve(self.config.default_timeout) else {
            return;
        };

        let generation = self.timer_generation.fetch_add(1, Ordering::Relaxed);
        let weak: Weak<Self> = Arc::downgrade(self);
        let key = entry.key().to_owned();
        let handle = self.clock.after(
            timeout,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.expire(&key, generation);
                }
            }),
        );
        trace!(
            "Toast {} auto-dismisses in {:?} (timer {:?})",
            entry.key(),
            timeout,
            handle
        );
        entry.arm_timer(handle, generation);
    }

    fn cancel_timeout(&self, entry: &mut Entry) {
        if let Some(handle) = entry.take_timer() {
            trace!("Cancelling timer {:?} of toast {}", handle, entry.key());
            self.clock.cancel(handle);
        }
    }

    /// Runs dismissal callbacks, then renders the current visible set.
    fn publish(&self, dismissed: Vec<Dismissal>) {
        for dismissal in dismissed {
            dismissal.fire();
        }
        if !self.lifecycle.is_active() {
            return;
        }
        let visible = self.state.lock().queue.snapshot();
        self.renderer.render(&visible, self.hints());
    }
}

impl Drop for ToasterInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(handle) = state.admission_timer.take() {
            self.clock.cancel(handle);
        }
        for entry in state.queue.entries_mut() {
            if let Some(handle) = entry.take_timer() {
                self.clock.cancel(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::RenderPhase;
    use crate::timer::{ManualClock, TimerCallback};
    use crate::toast::Timeout;
    use core::sync::atomic::AtomicUsize;

    /// Clock whose timers cannot be cancelled, so every stale callback fires.
    struct LeakyClock(ManualClock);

    impl Clock for LeakyClock {
        fn now(&self) -> TimeValue {
            self.0.now()
        }

        fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
            self.0.after(delay, callback)
        }

        fn cancel(&self, _handle: TimerHandle) {}
    }

    /// Clock the host never pumps: time moves but no timer fires.
    #[derive(Default)]
    struct StalledClock {
        now_ms: AtomicU64,
        next_token: AtomicUsize,
    }

    impl Clock for StalledClock {
        fn now(&self) -> TimeValue {
            Duration::from_millis(self.now_ms.load(Ordering::Relaxed))
        }

        fn after(&self, _delay: Duration, _callback: TimerCallback) -> TimerHandle {
            TimerHandle(self.next_token.fetch_add(1, Ordering::Relaxed))
        }

        fn cancel(&self, _handle: TimerHandle) {}
    }

    #[derive(Default)]
    struct CountingRenderer {
        renders: AtomicUsize,
    }

    impl Renderer for CountingRenderer {
        fn render(&self, _visible: &[Toast], _hints: RenderHints) {
            self.renders.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn create_leaky_toaster(config: ToasterConfig) -> (Toaster, Arc<LeakyClock>) {
        let clock = Arc::new(LeakyClock(ManualClock::new()));
        let toaster = Toaster::create(
            config,
            &RenderPhase::new(),
            Arc::new(CountingRenderer::default()),
            clock.clone(),
        )
        .unwrap();
        (toaster, clock)
    }

    fn props(message: &str, timeout_ms: u64) -> ToastProps {
        ToastProps::new(message).with_timeout(Timeout::from_millis(timeout_ms))
    }

    #[test]
    fn test_stale_timeout_ignored_after_reshow() {
        let (toaster, clock) = create_leaky_toaster(ToasterConfig::new());
        let dismissed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&dismissed);

        toaster.show_with_key(props("v1", 100), "k");
        clock.0.advance(Duration::from_millis(60));
        toaster.dismiss("k");

        toaster.show_with_key(
            props("v2", 100).with_on_dismiss(move |timed_out| {
                assert!(timed_out);
                counter.fetch_add(1, Ordering::Relaxed);
            }),
            "k",
        );

        // The first timer (deadline 100) fires but belongs to the old entry.
        clock.0.advance(Duration::from_millis(50));
        assert_eq!(toaster.active_count(), 1);
        assert_eq!(dismissed.load(Ordering::Relaxed), 0);

        clock.0.advance(Duration::from_millis(50));
        assert!(toaster.is_empty());
        assert_eq!(dismissed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_stale_timeout_ignored_after_update() {
        let (toaster, clock) = create_leaky_toaster(ToasterConfig::new());

        toaster.show_with_key(props("v1", 100), "k");
        clock.0.advance(Duration::from_millis(80));
        toaster.show_with_key(props("v2", 100), "k");

        clock.0.advance(Duration::from_millis(40));
        assert_eq!(toaster.toasts()[0].message, "v2");

        clock.0.advance(Duration::from_millis(60));
        assert!(toaster.is_empty());
    }

    #[test]
    fn test_stale_admission_timer_is_harmless() {
        let (toaster, clock) = create_leaky_toaster(ToasterConfig::new());

        toaster.show(props("a", 0));
        toaster.show(props("b", 0));
        toaster.show(props("c", 0));

        clock.0.advance(Duration::from_millis(10));
        toaster.show(props("d", 0));

        // Spacing is preserved even though superseded timers still fire.
        clock.0.advance(Duration::from_millis(40));
        assert_eq!(toaster.active_count(), 2);
        clock.0.advance(Duration::from_millis(49));
        assert_eq!(toaster.active_count(), 2);
        clock.0.advance(Duration::from_millis(1));
        assert_eq!(toaster.active_count(), 3);
        clock.0.advance(Duration::from_millis(50));
        assert_eq!(toaster.active_count(), 4);
    }

    #[test]
    fn test_timers_ignored_after_destroy() {
        let (toaster, clock) = create_leaky_toaster(ToasterConfig::new());

        toaster.show(props("a", 100));
        toaster.show(props("b", 100));
        assert!(toaster.destroy());

        clock.0.advance(Duration::from_secs(1));
        assert!(toaster.is_empty());
        assert_eq!(toaster.state(), ToasterState::Destroyed);
    }

    #[test]
    fn test_debug_output() {
        let (toaster, _clock) = create_leaky_toaster(ToasterConfig::new().with_max_toasts(2));
        toaster.show(props("a", 0));
        toaster.show(props("b", 0));

        let text = alloc::format!("{:?}", toaster);
        assert!(text.contains("active: 1"));
        assert!(text.contains("pending: 1"));
    }

    #[test]
    fn test_dismiss_notifies_before_refill() {
        let clock = Arc::new(StalledClock::default());
        let toaster = Toaster::create(
            ToasterConfig::new(),
            &RenderPhase::new(),
            Arc::new(CountingRenderer::default()),
            clock.clone(),
        )
        .unwrap();
        let seen = Arc::new(Mutex::new(None));

        let handle = toaster.clone();
        let sink = Arc::clone(&seen);
        toaster.show_with_key(
            ToastProps::new("a").with_on_dismiss(move |_| {
                *sink.lock() = Some((handle.active_count(), handle.pending_count()));
            }),
            "a",
        );
        toaster.show_with_key(ToastProps::new("b"), "b");
        assert_eq!(toaster.pending_count(), 1);

        // The admission timer is overdue, dismissal is what frees the slot.
        clock.now_ms.store(60, Ordering::Relaxed);
        toaster.dismiss("a");

        assert_eq!(*seen.lock(), Some((0, 1)));
        assert_eq!(toaster.active_count(), 1);
        assert_eq!(toaster.pending_count(), 0);
        assert_eq!(toaster.toasts()[0].key, "b");
    }
}
