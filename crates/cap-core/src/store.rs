//! The `EventStore` and `GoalProvider` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g. `cap-store-sqlite`).
//! The engine and the API layer depend on this abstraction, not on any
//! concrete backend. Both traits are read-only; writes belong to the
//! submission workflow.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  event::{Event, Source},
  goal::Goal,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`EventStore::fetch_events`].
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
  pub goal_id:         Uuid,
  /// Inclusive lower bound on `occurred_at`; `None` reaches back to the
  /// first recorded event.
  pub occurred_after:  Option<DateTime<Utc>>,
  /// Inclusive upper bound on `occurred_at`.
  pub occurred_before: DateTime<Utc>,
  pub actor_id:        Option<Uuid>,
  pub source:          Option<Source>,
}

impl EventQuery {
  /// Whether `event` satisfies every filter in this query.
  pub fn matches(&self, event: &Event) -> bool {
    event.goal_id == self.goal_id
      && self.occurred_after.is_none_or(|after| event.occurred_at >= after)
      && event.occurred_at <= self.occurred_before
      && self.actor_id.is_none_or(|a| a == event.actor_id)
      && self.source.is_none_or(|s| s == event.source)
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Read access to recorded check-in and peer-evaluation events.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return the events matching `query`, ascending by `occurred_at` with
  /// ties in insertion order.
  ///
  /// A connectivity failure must be an `Err`, never an empty vector.
  fn fetch_events<'a>(
    &'a self,
    query: &'a EventQuery,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + 'a;

  /// Return the most recent event matching `query`, or `None`. Ties on
  /// `occurred_at` resolve to the last inserted.
  fn latest_event<'a>(
    &'a self,
    query: &'a EventQuery,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + 'a;
}

/// Read access to goal configuration.
pub trait GoalProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a goal by UUID. Returns `None` if not found.
  fn get_goal(
    &self,
    goal_id: Uuid,
  ) -> impl Future<Output = Result<Option<Goal>, Self::Error>> + Send + '_;

  /// List all goals owned by `owner_id`, oldest first.
  fn list_goals(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Goal>, Self::Error>> + Send + '_;
}
