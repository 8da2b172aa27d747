//! Key generation for toasts shown without an explicit key.

use alloc::format;
use alloc::string::String;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Produces identifiers for toasts the caller did not name.
///
/// Keys only need to be distinct from each other; the toaster additionally
/// skips any generated key that collides with a caller-supplied one.
pub trait KeyGenerator: Send + Sync {
    /// Returns the next key.
    fn next_key(&self) -> String;
}

/// Counter-based generator yielding `toast-0`, `toast-1`, ...
#[derive(Debug, Default)]
pub struct SequentialKeys {
    next_id: AtomicUsize,
}

impl SequentialKeys {
    /// Prefix of every generated key.
    pub const PREFIX: &'static str = "toast-";

    /// Creates a generator starting at zero.
    pub const fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
        }
    }
}

impl KeyGenerator for SequentialKeys {
    fn next_key(&self) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", Self::PREFIX, id)
    }
}
