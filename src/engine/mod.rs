//! Widget Engine Module
//!
//! Event handling and deferred reconciliation:
//! - Reconcile scheduler (fixed-delay, non-cancelable tasks)
//! - Book widget (single entry point for input events)

pub mod scheduler;
pub mod widget;

pub use scheduler::ReconcileScheduler;
pub use widget::{BookWidget, EventOutcome};
