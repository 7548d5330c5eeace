//! Adapter utilities for the `sectional` crate.
//!
//! The `sectional` crate is UI-agnostic and focuses on geometry, caching
//! and diffing. This crate provides small, framework-neutral helpers
//! commonly needed by widget adapters:
//!
//! - A deferred task queue with liveness guards (the "configure the inner
//!   grid soon, but not now" boundary)
//! - Center-snap targeting for horizontal strips
//! - A [`Controller`] wrapping a composition with the usual adapter
//!   workflows (viewport events, scroll/page recording, strip restoring)
//!
//! This crate is intentionally framework-agnostic (no concrete widget
//! bindings).
#![forbid(unsafe_code)]

mod controller;
mod defer;
mod snap;

#[cfg(test)]
mod tests;

pub use controller::{Controller, Restore};
pub use defer::{DeferQueue, Liveness};
pub use snap::{best_candidate, snap_target};
