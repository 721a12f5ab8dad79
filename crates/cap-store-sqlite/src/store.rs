//! [`SqliteStore`] — the SQLite implementation of [`EventStore`] and
//! [`GoalProvider`].

use std::path::Path;

use cap_core::{
  event::{Event, NewEvent},
  goal::{Goal, NewGoal},
  store::{EventQuery, EventStore, GoalProvider},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawEvent, RawGoal, encode_dt, encode_metric_type, encode_source, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A CAP store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes (submission workflow) ──────────────────────────────────────────

  /// Create and persist a new goal.
  pub async fn add_goal(&self, input: NewGoal) -> Result<Goal> {
    let goal = Goal {
      goal_id:     Uuid::new_v4(),
      owner_id:    input.owner_id,
      name:        input.name,
      metric_type: input.metric_type,
      unit:        input.unit,
      created_at:  Utc::now(),
    };

    let id_str     = encode_uuid(goal.goal_id);
    let owner_str  = encode_uuid(goal.owner_id);
    let name       = goal.name.clone();
    let metric_str = encode_metric_type(goal.metric_type);
    let unit       = goal.unit.clone();
    let at_str     = encode_dt(goal.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO goals (goal_id, owner_id, name, metric_type, unit, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, owner_str, name, metric_str, unit, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(goal)
  }

  /// Record a check-in or peer evaluation.
  ///
  /// The value is checked against the goal's metric type first; events are
  /// append-only and cannot be corrected afterwards.
  pub async fn record_event(&self, input: NewEvent) -> Result<Event> {
    let goal = GoalProvider::get_goal(self, input.goal_id)
      .await?
      .ok_or(Error::GoalNotFound(input.goal_id))?;
    let value = goal.metric_type.validate(input.value)?;

    let event = Event {
      event_id:    Uuid::new_v4(),
      goal_id:     input.goal_id,
      actor_id:    input.actor_id,
      value,
      occurred_at: input.occurred_at.unwrap_or_else(Utc::now),
      source:      input.source,
    };

    let id_str     = encode_uuid(event.event_id);
    let goal_str   = encode_uuid(event.goal_id);
    let actor_str  = encode_uuid(event.actor_id);
    let at_str     = encode_dt(event.occurred_at);
    let source_str = encode_source(event.source);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (event_id, goal_id, actor_id, value, occurred_at, source)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, goal_str, actor_str, value, at_str, source_str],
        )?;
        Ok(())
      })
      .await?;

    debug!(event_id = %event.event_id, goal_id = %event.goal_id, "recorded event");
    Ok(event)
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
    let goal_str   = encode_uuid(query.goal_id);
    let after_str  = query.occurred_after.map(encode_dt);
    let before_str = encode_dt(query.occurred_before);
    let actor_str  = query.actor_id.map(encode_uuid);
    let source_str = query.source.map(encode_source);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {}
           FROM events
           WHERE goal_id = ?1
             AND (?2 IS NULL OR occurred_at >= ?2)
             AND occurred_at <= ?3
             AND (?4 IS NULL OR actor_id = ?4)
             AND (?5 IS NULL OR source = ?5)
           ORDER BY occurred_at ASC, seq ASC",
          RawEvent::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![goal_str, after_str, before_str, actor_str, source_str],
            RawEvent::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn latest_event(&self, query: &EventQuery) -> Result<Option<Event>> {
    let goal_str   = encode_uuid(query.goal_id);
    let after_str  = query.occurred_after.map(encode_dt);
    let before_str = encode_dt(query.occurred_before);
    let actor_str  = query.actor_id.map(encode_uuid);
    let source_str = query.source.map(encode_source);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {}
           FROM events
           WHERE goal_id = ?1
             AND (?2 IS NULL OR occurred_at >= ?2)
             AND occurred_at <= ?3
             AND (?4 IS NULL OR actor_id = ?4)
             AND (?5 IS NULL OR source = ?5)
           ORDER BY occurred_at DESC, seq DESC
           LIMIT 1",
          RawEvent::COLUMNS
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![goal_str, after_str, before_str, actor_str, source_str],
              RawEvent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }
}

// ─── GoalProvider impl ───────────────────────────────────────────────────────

impl GoalProvider for SqliteStore {
  type Error = Error;

  async fn get_goal(&self, goal_id: Uuid) -> Result<Option<Goal>> {
    let id_str = encode_uuid(goal_id);

    let raw: Option<RawGoal> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM goals WHERE goal_id = ?1", RawGoal::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawGoal::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawGoal::into_goal).transpose()
  }

  async fn list_goals(&self, owner_id: Uuid) -> Result<Vec<Goal>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawGoal> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM goals WHERE owner_id = ?1 ORDER BY created_at ASC, rowid ASC",
          RawGoal::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawGoal::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGoal::into_goal).collect()
  }
}
