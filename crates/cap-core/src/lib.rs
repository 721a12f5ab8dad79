//! Core types, trait definitions and the trend engine for CAP check-ins.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! selects windowed check-in and peer-evaluation events through the
//! [`store::EventStore`] abstraction, buckets them by calendar day, aligns
//! the resulting series on a shared date axis, and derives chart-ready
//! views. Nothing computed here is ever persisted.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod align;
pub mod calendar;
pub mod chart;
pub mod daily;
pub mod error;
pub mod event;
pub mod goal;
pub mod preview;
pub mod store;
pub mod summary;
pub mod trend;
pub mod window;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod test_helpers;
