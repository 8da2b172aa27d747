//! Pending and active toast sequences.
//!
//! `pending` holds entries in arrival order; `active` holds the visible
//! entries newest-first (index 0 is the most recently admitted or updated).
//! A key lives in at most one of the two sequences.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::toast::{Toast, ToastProps};

use super::entry::Entry;

/// Which sequence an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Pending,
    Active,
}

/// Container of every entry tracked by a toaster.
pub(crate) struct ToastQueue {
    pending: VecDeque<Entry>,
    active: VecDeque<Entry>,
    /// Maximum length of `active`, `None` for unbounded.
    capacity: Option<usize>,
}

fn position(entries: &VecDeque<Entry>, key: &str) -> Option<usize> {
    entries.iter().position(|entry| entry.key() == key)
}

impl ToastQueue {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            pending: VecDeque::new(),
            active: VecDeque::new(),
            capacity,
        }
    }

    pub fn slot(&self, key: &str) -> Option<Slot> {
        if position(&self.active, key).is_some() {
            Some(Slot::Active)
        } else if position(&self.pending, key).is_some() {
            Some(Slot::Pending)
        } else {
            None
        }
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.slot(key).is_some()
    }

    /// Appends a new entry to the pending queue.
    pub fn push_pending(&mut self, entry: Entry) {
        debug_assert!(!self.contains(entry.key()));
        self.pending.push_back(entry);
    }

    /// Replaces the payload of a tracked entry in place.
    ///
    /// A pending entry keeps its queue position. An active entry moves to the
    /// front of `active`. Returns the entry and its slot, or `None` if `key`
    /// is not tracked.
    pub fn update(&mut self, key: &str, props: ToastProps) -> Option<(Slot, &mut Entry)> {
        if let Some(index) = position(&self.pending, key) {
            let entry = &mut self.pending[index];
            entry.replace(props);
            return Some((Slot::Pending, entry));
        }

        let index = position(&self.active, key)?;
        let mut entry = self.active.remove(index)?;
        entry.replace(props);
        self.active.push_front(entry);
        self.active.front_mut().map(|entry| (Slot::Active, entry))
    }

    /// Looks up an active entry.
    pub fn active_entry(&self, key: &str) -> Option<&Entry> {
        self.active.iter().find(|entry| entry.key() == key)
    }

    /// Removes an entry from whichever sequence holds it.
    pub fn remove(&mut self, key: &str) -> Option<(Slot, Entry)> {
        if let Some(index) = position(&self.active, key) {
            return self.active.remove(index).map(|entry| (Slot::Active, entry));
        }
        let index = position(&self.pending, key)?;
        self.pending.remove(index).map(|entry| (Slot::Pending, entry))
    }

    /// Returns `true` if admitting another entry requires an eviction.
    pub fn is_full(&self) -> bool {
        self.capacity
            .is_some_and(|capacity| self.active.len() >= capacity)
    }

    /// Removes the active entry admitted longest ago.
    pub fn evict_oldest(&mut self) -> Option<Entry> {
        self.active.pop_back()
    }

    /// Moves the oldest pending entry to the front of `active`.
    pub fn admit_next(&mut self) -> Option<&mut Entry> {
        let entry = self.pending.pop_front()?;
        self.active.push_front(entry);
        self.active.front_mut()
    }

    /// Removes every entry, active ones first (newest-first), then pending
    /// ones in arrival order.
    pub fn drain(&mut self) -> Vec<Entry> {
        self.active.drain(..).chain(self.pending.drain(..)).collect()
    }

    /// Copies the visible toasts, newest-first.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.active.iter().map(|entry| entry.toast().clone()).collect()
    }

    /// Iterates over every tracked entry.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.active.iter_mut().chain(self.pending.iter_mut())
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use core::time::Duration;

    fn entry(key: &str, message: &str) -> Entry {
        Entry::new(key.into(), ToastProps::new(message), Duration::ZERO)
    }

    fn visible(queue: &ToastQueue) -> Vec<String> {
        queue.snapshot().into_iter().map(|toast| toast.message).collect()
    }

    #[test]
    fn test_admit_is_fifo_and_newest_first() {
        let mut queue = ToastQueue::new(None);
        queue.push_pending(entry("a", "one"));
        queue.push_pending(entry("b", "two"));
        queue.push_pending(entry("c", "three"));

        assert_eq!(queue.admit_next().unwrap().key(), "a");
        assert_eq!(queue.admit_next().unwrap().key(), "b");
        assert_eq!(queue.admit_next().unwrap().key(), "c");
        assert!(queue.admit_next().is_none());

        assert_eq!(visible(&queue), vec!["three", "two", "one"]);
    }

    #[test]
    fn test_capacity_and_eviction() {
        let mut queue = ToastQueue::new(Some(2));
        queue.push_pending(entry("a", "one"));
        queue.push_pending(entry("b", "two"));
        queue.admit_next();
        assert!(!queue.is_full());
        queue.admit_next();
        assert!(queue.is_full());

        let evicted = queue.evict_oldest().unwrap();
        assert_eq!(evicted.key(), "a");
        assert!(!queue.is_full());
    }

    #[test]
    fn test_unbounded_is_never_full() {
        let mut queue = ToastQueue::new(None);
        for i in 0..16 {
            queue.push_pending(entry(&alloc::format!("k{i}"), "m"));
            queue.admit_next();
        }
        assert!(!queue.is_full());
        assert_eq!(queue.active_len(), 16);
    }

    #[test]
    fn test_update_pending_keeps_position() {
        let mut queue = ToastQueue::new(None);
        queue.push_pending(entry("a", "one"));
        queue.push_pending(entry("b", "two"));

        let (slot, updated) = queue.update("a", ToastProps::new("uno")).unwrap();
        assert_eq!(slot, Slot::Pending);
        assert_eq!(updated.toast().message, "uno");
        assert_eq!(queue.pending_len(), 2);

        assert_eq!(queue.admit_next().unwrap().toast().message, "uno");
    }

    #[test]
    fn test_update_active_moves_to_front() {
        let mut queue = ToastQueue::new(None);
        for (key, message) in [("a", "one"), ("b", "two"), ("c", "three")] {
            queue.push_pending(entry(key, message));
            queue.admit_next();
        }

        let (slot, _) = queue.update("a", ToastProps::new("one again")).unwrap();
        assert_eq!(slot, Slot::Active);
        assert_eq!(visible(&queue), vec!["one again", "three", "two"]);
        assert_eq!(queue.active_len(), 3);
    }

    #[test]
    fn test_update_unknown_key() {
        let mut queue = ToastQueue::new(None);
        assert!(queue.update("missing", ToastProps::new("x")).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_remove_from_either_slot() {
        let mut queue = ToastQueue::new(None);
        queue.push_pending(entry("a", "one"));
        queue.push_pending(entry("b", "two"));
        queue.admit_next();

        assert_eq!(queue.slot("a"), Some(Slot::Active));
        assert_eq!(queue.slot("b"), Some(Slot::Pending));

        let (slot, removed) = queue.remove("b").unwrap();
        assert_eq!((slot, removed.key()), (Slot::Pending, "b"));
        let (slot, removed) = queue.remove("a").unwrap();
        assert_eq!((slot, removed.key()), (Slot::Active, "a"));

        assert!(queue.remove("a").is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_order() {
        let mut queue = ToastQueue::new(None);
        for key in ["a", "b", "c", "d"] {
            queue.push_pending(entry(key, key));
        }
        queue.admit_next();
        queue.admit_next();

        let keys: Vec<String> = queue
            .drain()
            .iter()
            .map(|entry| String::from(entry.key()))
            .collect();
        assert_eq!(keys, vec!["b", "a", "c", "d"]);
        assert!(queue.is_empty());
    }
}
