//! Rendering capability consumed by the toaster.
//!
//! The toaster never draws anything itself. After every change to the visible
//! set it hands the renderer a newest-first snapshot; on teardown it asks the
//! renderer to unmount.

use crate::toast::Toast;

/// Screen placement of the toast container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastPosition {
    /// Top edge, horizontally centered (default).
    #[default]
    Top,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom edge, horizontally centered.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// Presentation hints taken from the toaster configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderHints {
    /// Move focus into the container when a toast appears.
    pub auto_focus: bool,
    /// Placement of the container.
    pub position: ToastPosition,
}

/// Presents the visible toasts.
///
/// Called synchronously and never while the toaster's internal lock is held,
/// so implementations may call back into the toaster.
pub trait Renderer: Send + Sync {
    /// Renders `visible`, most recently admitted or updated toast first.
    fn render(&self, visible: &[Toast], hints: RenderHints);

    /// Releases the render target. Called once when the toaster is destroyed.
    fn unmount(&self) {}
}
