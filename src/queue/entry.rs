//! Tracked toast entries and their pending dismissal notifications.

use crate::timer::{TimeValue, TimerHandle};
use crate::toast::{DismissCallback, Toast, ToastKey, ToastProps};

/// A toast tracked by the toaster, pending or active.
pub(crate) struct Entry {
    toast: Toast,
    on_dismiss: Option<DismissCallback>,
    /// Set once the dismissal notification has been handed out.
    notified: bool,
    /// Outstanding auto-dismiss timer.
    timer: Option<TimerHandle>,
    /// Toaster-wide generation of the outstanding timer.
    generation: u64,
}

impl Entry {
    pub fn new(key: ToastKey, props: ToastProps, created_at: TimeValue) -> Self {
        let (toast, on_dismiss) = Toast::from_props(key, props, created_at);
        Self {
            toast,
            on_dismiss,
            notified: false,
            timer: None,
            generation: 0,
        }
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.toast.key
    }

    #[inline]
    pub fn toast(&self) -> &Toast {
        &self.toast
    }

    /// Replaces payload, timeout and callback. Key and creation time are kept.
    pub fn replace(&mut self, props: ToastProps) {
        let key = core::mem::take(&mut self.toast.key);
        let (toast, on_dismiss) = Toast::from_props(key, props, self.toast.created_at);
        self.toast = toast;
        self.on_dismiss = on_dismiss;
    }

    #[inline]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Takes the outstanding timer handle, if any, so the caller can cancel it.
    pub fn take_timer(&mut self) -> Option<TimerHandle> {
        self.timer.take()
    }

    /// Records a freshly started timer and the generation its callback carries.
    pub fn arm_timer(&mut self, handle: TimerHandle, generation: u64) {
        self.timer = Some(handle);
        self.generation = generation;
    }

    /// Produces the dismissal notification for this entry.
    ///
    /// Returns `None` if the entry has no callback or was already notified.
    pub fn take_dismissal(&mut self, timed_out: bool) -> Option<Dismissal> {
        if self.notified {
            return None;
        }
        self.notified = true;
        let callback = self.on_dismiss.take()?;
        Some(Dismissal {
            key: self.toast.key.clone(),
            callback,
            timed_out,
        })
    }
}

/// A dismissal callback ready to run once the toaster lock is released.
pub(crate) struct Dismissal {
    key: ToastKey,
    callback: DismissCallback,
    timed_out: bool,
}

impl Dismissal {
    pub fn fire(self) {
        trace!(
            "notifying dismissal of toast {} (timed out: {})",
            self.key, self.timed_out
        );
        (self.callback)(self.timed_out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use core::time::Duration;

    #[test]
    fn test_dismissal_taken_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let props = ToastProps::new("hello").with_on_dismiss(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let mut entry = Entry::new("k".into(), props, Duration::ZERO);

        let dismissal = entry.take_dismissal(true).unwrap();
        assert!(entry.take_dismissal(false).is_none());

        dismissal.fire();
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_entry_without_callback() {
        let mut entry = Entry::new("k".into(), ToastProps::new("hello"), Duration::ZERO);
        assert!(entry.take_dismissal(false).is_none());
    }

    #[test]
    fn test_replace_keeps_identity() {
        let mut entry = Entry::new(
            "k".into(),
            ToastProps::new("one"),
            Duration::from_millis(3),
        );
        entry.replace(ToastProps::new("two").with_on_dismiss(|_| {}));

        assert_eq!(entry.key(), "k");
        assert_eq!(entry.toast().message, "two");
        assert_eq!(entry.toast().created_at, Duration::from_millis(3));
        assert!(entry.take_dismissal(false).is_some());
    }

    #[test]
    fn test_timer_bookkeeping() {
        let mut entry = Entry::new("k".into(), ToastProps::new("one"), Duration::ZERO);
        entry.arm_timer(TimerHandle(7), 3);
        assert_eq!(entry.timer(), Some(TimerHandle(7)));
        assert_eq!(entry.generation(), 3);
        assert_eq!(entry.take_timer(), Some(TimerHandle(7)));
        assert_eq!(entry.timer(), None);
    }
}
