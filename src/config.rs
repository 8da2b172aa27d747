use core::time::Duration;

use axerrno::{ax_err, AxResult};

use crate::render::ToastPosition;

/// Minimum spacing between two admissions from the pending queue.
pub const ADMISSION_DELAY: Duration = Duration::from_millis(50);

/// Auto-dismiss timeout applied to toasts that do not pick their own.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Configuration of a [`Toaster`](crate::Toaster).
///
/// Only `max_toasts`, `admission_delay` and `default_timeout` affect queue
/// semantics. `auto_focus` and `position` are forwarded to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToasterConfig {
    /// Maximum number of simultaneously visible toasts, `None` for unbounded.
    pub max_toasts: Option<usize>,
    /// Whether the renderer should move focus to the toast container.
    pub auto_focus: bool,
    /// Where the renderer places the toast container.
    pub position: ToastPosition,
    /// Minimum spacing between two admissions.
    pub admission_delay: Duration,
    /// Timeout used by toasts created with [`Timeout::Default`](crate::Timeout::Default).
    pub default_timeout: Duration,
}

impl ToasterConfig {
    /// Creates an unbounded configuration with default timings.
    pub fn new() -> Self {
        Self {
            max_toasts: None,
            auto_focus: false,
            position: ToastPosition::default(),
            admission_delay: ADMISSION_DELAY,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Caps the number of visible toasts.
    pub fn with_max_toasts(mut self, max_toasts: usize) -> Self {
        self.max_toasts = Some(max_toasts);
        self
    }

    /// Sets the renderer focus hint.
    pub fn with_auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Sets the renderer position hint.
    pub fn with_position(mut self, position: ToastPosition) -> Self {
        self.position = position;
        self
    }

    /// Overrides the spacing between admissions.
    pub fn with_admission_delay(mut self, delay: Duration) -> Self {
        self.admission_delay = delay;
        self
    }

    /// Overrides the timeout used by [`Timeout::Default`](crate::Timeout::Default).
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `max_toasts` is zero.
    pub fn validate(&self) -> AxResult {
        if self.max_toasts == Some(0) {
            return ax_err!(InvalidInput, "max_toasts must be at least 1");
        }
        Ok(())
    }
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self::new()
    }
}
