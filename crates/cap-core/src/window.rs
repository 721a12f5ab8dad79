//! Windowed event selection.
//!
//! A [`Window`] is a trailing span of whole weeks ending at a reference
//! instant. [`select`] turns a [`Selection`] into an [`EventQuery`], reads it
//! from the store, and hands back the events in time order.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  event::{Event, Source},
  store::{EventQuery, EventStore},
};

/// Number of weeks shown when the caller does not ask for anything else.
pub const DEFAULT_WEEKS: u32 = 8;

/// A trailing window of `weeks` whole weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Window {
  weeks: u32,
}

impl Window {
  /// Reject non-positive week counts before anything touches the store.
  pub fn new(weeks: i64) -> Result<Self> {
    match u32::try_from(weeks) {
      Ok(w) if w > 0 => Ok(Self { weeks: w }),
      _ => Err(Error::InvalidWindow(weeks)),
    }
  }

  pub fn weeks(&self) -> u32 { self.weeks }

  pub fn span(&self) -> Duration { Duration::weeks(i64::from(self.weeks)) }

  /// `[now - weeks, now]`, both ends inclusive.
  pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (now - self.span(), now)
  }
}

impl Default for Window {
  fn default() -> Self { Self { weeks: DEFAULT_WEEKS } }
}

impl TryFrom<i64> for Window {
  type Error = Error;

  fn try_from(weeks: i64) -> Result<Self> { Self::new(weeks) }
}

impl From<Window> for i64 {
  fn from(w: Window) -> Self { i64::from(w.weeks) }
}

/// What to select: one goal, a window, and optional actor/source filters.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
  pub goal_id:  Uuid,
  pub window:   Window,
  pub actor_id: Option<Uuid>,
  pub source:   Option<Source>,
}

impl Selection {
  pub fn new(goal_id: Uuid, window: Window) -> Self {
    Self { goal_id, window, actor_id: None, source: None }
  }

  pub fn by_actor(mut self, actor_id: Uuid) -> Self {
    self.actor_id = Some(actor_id);
    self
  }

  pub fn from_source(mut self, source: Source) -> Self {
    self.source = Some(source);
    self
  }

  pub fn query(&self, now: DateTime<Utc>) -> EventQuery {
    let (occurred_after, occurred_before) = self.window.bounds(now);
    EventQuery {
      goal_id: self.goal_id,
      occurred_after: Some(occurred_after),
      occurred_before,
      actor_id: self.actor_id,
      source: self.source,
    }
  }
}

/// Fetch the events in `selection` relative to the reference instant `now`.
///
/// An empty result is a normal outcome. A store failure becomes
/// [`Error::DataUnavailable`].
pub async fn select<S>(
  store: &S,
  selection: &Selection,
  now: DateTime<Utc>,
) -> Result<Vec<Event>>
where
  S: EventStore,
{
  let query = selection.query(now);
  let mut events = store.fetch_events(&query).await.map_err(Error::unavailable)?;

  // Stable sort: equal timestamps keep the store's insertion order.
  events.retain(|e| query.matches(e));
  events.sort_by_key(|e| e.occurred_at);

  debug!(
    goal_id = %selection.goal_id,
    weeks = selection.window.weeks(),
    count = events.len(),
    "selected events"
  );
  Ok(events)
}

/// The most recent event matching `selection`'s goal, actor and source at or
/// before `now`. The window's lower bound does not apply: a check-in older
/// than the window is still the latest one.
pub async fn latest<S>(
  store: &S,
  selection: &Selection,
  now: DateTime<Utc>,
) -> Result<Option<Event>>
where
  S: EventStore,
{
  let query = EventQuery { occurred_after: None, ..selection.query(now) };
  let event = store.latest_event(&query).await.map_err(Error::unavailable)?;
  Ok(event.filter(|e| query.matches(e)))
}

/// [`select`] with the current time as the reference instant.
pub async fn select_now<S>(store: &S, selection: &Selection) -> Result<Vec<Event>>
where
  S: EventStore,
{
  select(store, selection, Utc::now()).await
}
