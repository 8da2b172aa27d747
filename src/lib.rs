#![no_std]

//! # Toast Admission & Lifecycle Management
//!
//! This crate provides a bounded, time-gated notification queue. Given a
//! stream of "show a notification" requests it decides which toasts are
//! visible, in what order, and when new ones are admitted, updated in place,
//! evicted or auto-expired.
//! It is designed for `no_std` environments and uses the `alloc` crate for dynamic memory allocation.
//!
//! ## Architecture
//!
//! ### Core
//! - [`Toaster`]: Pending/active queues, admission timer, eviction and dismissal
//! - [`ToasterConfig`]: Capacity, admission delay, default timeout and renderer hints
//! - [`ToastProps`] / [`Toast`]: Requests and the snapshots handed to the renderer
//!
//! ### Collaborators
//! - [`Renderer`]: Presents the visible toasts, newest first
//! - [`Clock`]: Current time and delayed callbacks ([`ManualClock`] for hosts that pump timers)
//! - [`KeyGenerator`]: Names toasts shown without a key ([`SequentialKeys`])
//! - [`HostLifecycle`]: Reports render passes of the host ([`RenderPhase`])
//!
//! ## Features
//!
//! - **Capacity**: At most `max_toasts` visible, the oldest is evicted for a newcomer
//! - **Rate limiting**: Admissions are spaced by `admission_delay`
//! - **Update in place**: Re-showing a tracked key replaces its payload
//! - **Exactly-once dismissal**: Every removal runs the toast's callback once
//! - **Deterministic**: No wall-clock access, everything goes through [`Clock`]
//!
//! ## Examples
//!
//! ### Basic Usage
//!
//! ```rust,ignore
//! use axtoast::{ManualClock, RenderPhase, ToastProps, Toaster, ToasterConfig};
//!
//! let clock = Arc::new(ManualClock::new());
//! let host = RenderPhase::new();
//!
//! let toaster = Toaster::create(
//!     ToasterConfig::new().with_max_toasts(3),
//!     &host,
//!     Arc::new(MyRenderer::default()),
//!     clock.clone(),
//! )?;
//!
//! toaster.show(ToastProps::new("one"));
//! toaster.show(ToastProps::new("two"));
//! assert_eq!(toaster.toasts().len(), 1); // "two" waits for the admission delay
//!
//! clock.advance(Duration::from_millis(50));
//! assert_eq!(toaster.toasts().len(), 2);
//! ```
//!
//! ### Updating and Dismissing
//!
//! ```rust,ignore
//! let key = toaster.show_with_key(
//!     ToastProps::new("Uploading...").with_timeout(Timeout::Never),
//!     "upload",
//! );
//!
//! // Same key: replaced in place, no new toast.
//! toaster.show_with_key(
//!     ToastProps::new("Upload complete")
//!         .with_intent(Intent::Success)
//!         .with_on_dismiss(|timed_out| log::info!("gone, timed out: {timed_out}")),
//!     key.clone(),
//! );
//!
//! toaster.dismiss(&key);
//! ```
//!
//! ### Hosting
//!
//! ```rust,ignore
//! // Creating a toaster while the host renders is rejected.
//! let pass = host.enter();
//! assert_eq!(
//!     Toaster::create(config, &host, renderer, clock).unwrap_err(),
//!     AxError::BadState,
//! );
//! drop(pass);
//!
//! // Teardown dismisses everything, cancels timers and unmounts the renderer.
//! toaster.destroy();
//! ```

extern crate alloc;
#[macro_use]
extern crate log;

mod config;
mod keys;
mod lifecycle;
mod queue;
mod render;
mod timer;
mod toast;

pub use config::{ToasterConfig, ADMISSION_DELAY, DEFAULT_TIMEOUT};
pub use keys::{KeyGenerator, SequentialKeys};
pub use lifecycle::{HostLifecycle, RenderPass, RenderPhase, ToasterState};
pub use queue::Toaster;
pub use render::{RenderHints, Renderer, ToastPosition};
pub use timer::{Clock, ManualClock, TimeValue, TimerCallback, TimerHandle};
pub use toast::{DismissCallback, Intent, Timeout, Toast, ToastAction, ToastKey, ToastProps};
