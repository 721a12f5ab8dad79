//! Fixtures and in-memory stores shared by the unit tests.

use std::convert::Infallible;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  daily::DailyPoint,
  event::{Event, Source},
  goal::{Goal, MetricType},
  store::{EventQuery, EventStore, GoalProvider},
};

pub(crate) fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub(crate) fn day(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

pub(crate) fn event_by(
  goal_id: Uuid,
  actor_id: Uuid,
  source: Source,
  occurred_at: DateTime<Utc>,
  value: f64,
) -> Event {
  Event { event_id: Uuid::new_v4(), goal_id, actor_id, value, occurred_at, source }
}

/// A self-evaluation on an arbitrary goal.
pub(crate) fn event(occurred_at: DateTime<Utc>, value: f64) -> Event {
  event_by(Uuid::nil(), Uuid::nil(), Source::SelfEval, occurred_at, value)
}

/// Single-sample daily points.
pub(crate) fn points(values: &[(NaiveDate, f64)]) -> Vec<DailyPoint> {
  values.iter().map(|&(d, v)| DailyPoint::single(d, v)).collect()
}

pub(crate) fn goal(owner_id: Uuid, metric_type: MetricType) -> Goal {
  Goal {
    goal_id: Uuid::new_v4(),
    owner_id,
    name: format!("{metric_type} goal"),
    metric_type,
    unit: None,
    created_at: at(2023, 12, 1, 0),
  }
}

// ─── Stores ──────────────────────────────────────────────────────────────────

/// Holds events in insertion order and filters them on read.
#[derive(Default)]
pub(crate) struct MemoryStore {
  goals:  Vec<Goal>,
  events: Vec<Event>,
}

impl MemoryStore {
  pub(crate) fn with_goals(mut self, goals: Vec<Goal>) -> Self {
    self.goals = goals;
    self
  }

  pub(crate) fn with_events(mut self, events: Vec<Event>) -> Self {
    self.events = events;
    self
  }
}

impl EventStore for MemoryStore {
  type Error = Infallible;

  async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>, Infallible> {
    Ok(self.events.iter().filter(|e| query.matches(e)).cloned().collect())
  }

  async fn latest_event(&self, query: &EventQuery) -> Result<Option<Event>, Infallible> {
    Ok(self.events.iter().filter(|e| query.matches(e)).max_by_key(|e| e.occurred_at).cloned())
  }
}

impl GoalProvider for MemoryStore {
  type Error = Infallible;

  async fn get_goal(&self, goal_id: Uuid) -> Result<Option<Goal>, Infallible> {
    Ok(self.goals.iter().find(|g| g.goal_id == goal_id).cloned())
  }

  async fn list_goals(&self, owner_id: Uuid) -> Result<Vec<Goal>, Infallible> {
    Ok(self.goals.iter().filter(|g| g.owner_id == owner_id).cloned().collect())
  }
}

#[derive(Debug, Error)]
#[error("connection refused")]
pub(crate) struct StoreDown;

/// Every read fails.
pub(crate) struct FailingStore;

impl EventStore for FailingStore {
  type Error = StoreDown;

  async fn fetch_events(&self, _query: &EventQuery) -> Result<Vec<Event>, StoreDown> {
    Err(StoreDown)
  }

  async fn latest_event(&self, _query: &EventQuery) -> Result<Option<Event>, StoreDown> {
    Err(StoreDown)
  }
}

impl GoalProvider for FailingStore {
  type Error = StoreDown;

  async fn get_goal(&self, _goal_id: Uuid) -> Result<Option<Goal>, StoreDown> { Err(StoreDown) }

  async fn list_goals(&self, _owner_id: Uuid) -> Result<Vec<Goal>, StoreDown> { Err(StoreDown) }
}
