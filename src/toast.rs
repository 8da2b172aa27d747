//! Toast payload types.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use core::time::Duration;

use crate::timer::TimeValue;

/// Stable identity of a tracked toast.
pub type ToastKey = String;

/// Callback invoked when a toast leaves the toaster.
///
/// The argument is `true` only when the toast was removed because its
/// auto-dismiss timeout expired.
pub type DismissCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Visual intent of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Intent {
    /// No particular intent (default).
    #[default]
    None,
    /// Primary, informational.
    Primary,
    /// Successful outcome.
    Success,
    /// Something needs attention.
    Warning,
    /// Something failed.
    Danger,
}

/// Action button shown next to the message.
///
/// The toaster only carries it; `id` lets the renderer route clicks back to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    /// Button label.
    pub text: String,
    /// Identifier reported when the action is invoked.
    pub id: String,
}

impl ToastAction {
    /// Creates an action with the given label and identifier.
    pub fn new(text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: id.into(),
        }
    }
}

/// Auto-dismiss behavior of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Use the toaster's configured default timeout.
    #[default]
    Default,
    /// Stay visible until dismissed explicitly.
    Never,
    /// Dismiss after the given duration. A zero duration means [`Timeout::Never`].
    After(Duration),
}

impl Timeout {
    /// Builds a timeout from milliseconds, `0` meaning "never".
    pub const fn from_millis(ms: u64) -> Self {
        if ms == 0 {
            Self::Never
        } else {
            Self::After(Duration::from_millis(ms))
        }
    }

    /// Resolves the timeout against the configured default.
    ///
    /// Returns `None` when the toast must not auto-dismiss.
    pub fn resolve(self, default: Duration) -> Option<Duration> {
        let duration = match self {
            Self::Default => default,
            Self::Never => return None,
            Self::After(duration) => duration,
        };
        (!duration.is_zero()).then_some(duration)
    }
}

/// A request to show a toast.
#[derive(Clone, Default)]
pub struct ToastProps {
    /// Message text.
    pub message: String,
    /// Visual intent.
    pub intent: Intent,
    /// Optional icon name.
    pub icon: Option<String>,
    /// Optional action button.
    pub action: Option<ToastAction>,
    /// Auto-dismiss behavior.
    pub timeout: Timeout,
    /// Invoked exactly once when the toast is removed.
    pub on_dismiss: Option<DismissCallback>,
}

impl ToastProps {
    /// Creates props for a plain message with the default timeout.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the intent.
    pub fn with_intent(mut self, intent: Intent) -> Self {
        self.intent = intent;
        self
    }

    /// Sets the icon name.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Attaches an action button.
    pub fn with_action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Sets the auto-dismiss behavior.
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers the dismissal callback.
    pub fn with_on_dismiss<F>(mut self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_dismiss = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for ToastProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastProps")
            .field("message", &self.message)
            .field("intent", &self.intent)
            .field("icon", &self.icon)
            .field("action", &self.action)
            .field("timeout", &self.timeout)
            .field("on_dismiss", &self.on_dismiss.is_some())
            .finish()
    }
}

/// Snapshot of a tracked toast, as handed to the renderer.
///
/// The dismissal callback is not part of the snapshot; it stays with the
/// toaster so that only the toaster can fire it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Stable identity.
    pub key: ToastKey,
    /// Message text.
    pub message: String,
    /// Visual intent.
    pub intent: Intent,
    /// Optional icon name.
    pub icon: Option<String>,
    /// Optional action button.
    pub action: Option<ToastAction>,
    /// Auto-dismiss behavior as requested.
    pub timeout: Timeout,
    /// Clock time of the first `show` for this key.
    pub created_at: TimeValue,
}

impl Toast {
    /// Splits `props` into a snapshot and its dismissal callback.
    pub(crate) fn from_props(
        key: ToastKey,
        props: ToastProps,
        created_at: TimeValue,
    ) -> (Self, Option<DismissCallback>) {
        let ToastProps {
            message,
            intent,
            icon,
            action,
            timeout,
            on_dismiss,
        } = props;
        let toast = Self {
            key,
            message,
            intent,
            icon,
            action,
            timeout,
            created_at,
        };
        (toast, on_dismiss)
    }
}
