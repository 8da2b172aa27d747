//! Toaster lifecycle and host render-pass tracking.
//!
//! # Toaster states
//!
//! ```text
//! ┌─────────┐  begin_teardown()  ┌────────────┐  complete_teardown()  ┌───────────┐
//! │ Active  │ ─────────────────> │ Destroying │ ────────────────────> │ Destroyed │
//! └─────────┘                    └────────────┘                       └───────────┘
//! ```
//!
//! Only `Active` accepts work. Timer callbacks that fire after teardown
//! started are dropped.
//!
//! # Host render passes
//!
//! A toaster mounts into a host component tree. Creating one while that tree
//! is in the middle of rendering is a lifecycle violation, so construction
//! consults a [`HostLifecycle`] first.

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Toaster lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ToasterState {
    /// Accepting operations.
    Active = 0,
    /// Teardown in progress, new work is rejected.
    Destroying = 1,
    /// Torn down; every timer has been cancelled.
    Destroyed = 2,
}

impl ToasterState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::Destroying,
            _ => Self::Destroyed,
        }
    }
}

/// Atomic holder of a [`ToasterState`].
pub struct ToasterLifecycle(AtomicU8);

impl ToasterLifecycle {
    /// Creates a lifecycle in the `Active` state.
    pub const fn new() -> Self {
        Self(AtomicU8::new(ToasterState::Active as u8))
    }

    /// Gets the current state.
    #[inline]
    pub fn state(&self) -> ToasterState {
        ToasterState::from_raw(self.0.load(Ordering::Acquire))
    }

    /// Returns `true` while the toaster accepts work.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state() == ToasterState::Active
    }

    /// Transitions `Active -> Destroying`.
    ///
    /// Returns `false` if teardown already started.
    pub fn begin_teardown(&self) -> bool {
        self.0
            .compare_exchange(
                ToasterState::Active as u8,
                ToasterState::Destroying as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Transitions to `Destroyed`.
    ///
    /// Should only be called after a successful [`begin_teardown`](Self::begin_teardown).
    pub fn complete_teardown(&self) {
        self.0
            .store(ToasterState::Destroyed as u8, Ordering::Release);
    }
}

impl Default for ToasterLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ToasterLifecycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ToasterLifecycle")
            .field(&self.state())
            .finish()
    }
}

/// The host a toaster mounts into.
pub trait HostLifecycle {
    /// Returns `true` while the host is inside a render pass.
    fn is_rendering(&self) -> bool;
}

/// Render-pass tracker for hosts without their own bookkeeping.
///
/// Passes may nest; the host is rendering while at least one
/// [`RenderPass`] guard is alive.
#[derive(Debug, Default)]
pub struct RenderPhase {
    depth: AtomicUsize,
}

impl RenderPhase {
    /// Creates a tracker outside of any render pass.
    pub const fn new() -> Self {
        Self {
            depth: AtomicUsize::new(0),
        }
    }

    /// Marks the start of a render pass, ending when the guard drops.
    pub fn enter(&self) -> RenderPass<'_> {
        self.depth.fetch_add(1, Ordering::AcqRel);
        RenderPass { phase: self }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }
}

impl HostLifecycle for RenderPhase {
    fn is_rendering(&self) -> bool {
        self.depth() > 0
    }
}

/// Guard returned by [`RenderPhase::enter`].
#[must_use = "the render pass ends when the guard is dropped"]
#[derive(Debug)]
pub struct RenderPass<'a> {
    phase: &'a RenderPhase,
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        self.phase.depth.fetch_sub(1, Ordering::AcqRel);
    }
}
