//! Toast queue management.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Caller    │ show / dismiss / clear / toasts
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌────────────────────────┐        after(delay) ┌─────────┐
//! │ Toaster                │ ──────────────────> │  Clock  │
//! │  - pending (FIFO)      │ <────────────────── │         │
//! │  - active (newest 1st) │   admit / expire    └─────────┘
//! │  - timer handles       │
//! └──────┬─────────────────┘
//!        │ render(visible) after every change
//!        ▼
//! ┌─────────────┐
//! │  Renderer   │
//! └─────────────┘
//! ```
//!
//! # Guarantees
//!
//! 1. A key is tracked at most once, either pending or active.
//! 2. The visible set never exceeds `max_toasts`.
//! 3. Admissions are spaced by at least `admission_delay`.
//! 4. Every removed toast, whether dismissed, expired, evicted or cleared,
//!    has its dismissal callback run exactly once.
//! 5. The visible set is ordered most recently admitted or updated first.

mod entry;
mod manager;
mod store;

pub use manager::Toaster;
