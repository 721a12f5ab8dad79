//! JSON API exposing CAP trend charts to renderers.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`EventStore`] and [`GoalProvider`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cap_api::api_router(state))
//! ```

pub mod error;
pub mod trends;

use std::sync::Arc;

use axum::{Router, routing::get};
use cap_core::{
  calendar::Calendar,
  store::{EventStore, GoalProvider},
  window::Window,
};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:          Arc<S>,
  pub calendar:       Calendar,
  pub default_window: Window,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, calendar: Calendar::default(), default_window: Window::default() }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:          Arc::clone(&self.store),
      calendar:       self.calendar,
      default_window: self.default_window,
    }
  }
}

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: EventStore + GoalProvider + 'static,
{
  Router::new()
    .route("/goals/{id}/trend", get(trends::goal::<S>))
    .route("/goals/{id}/chart", get(trends::chart::<S>))
    .route("/users/{id}/dashboard", get(trends::user_dashboard::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
