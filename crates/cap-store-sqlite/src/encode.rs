//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed nanosecond
//! width, so lexicographic order in SQL equals chronological order. UUIDs are
//! stored as hyphenated lowercase strings.

use cap_core::{
  event::{Event, Source},
  goal::{Goal, MetricType},
};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Nanos, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_metric_type(m: MetricType) -> &'static str {
  match m {
    MetricType::Percentage => "percentage",
    MetricType::Scale5 => "scale_5",
    MetricType::Numeric => "numeric",
  }
}

pub fn encode_source(s: Source) -> &'static str {
  match s {
    Source::SelfEval => "self",
    Source::Peer => "peer",
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `goals` row as read from SQLite, before decoding.
pub struct RawGoal {
  pub goal_id:     String,
  pub owner_id:    String,
  pub name:        String,
  pub metric_type: String,
  pub unit:        Option<String>,
  pub created_at:  String,
}

impl RawGoal {
  pub const COLUMNS: &'static str = "goal_id, owner_id, name, metric_type, unit, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      goal_id:     row.get(0)?,
      owner_id:    row.get(1)?,
      name:        row.get(2)?,
      metric_type: row.get(3)?,
      unit:        row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_goal(self) -> Result<Goal> {
    Ok(Goal {
      goal_id:     decode_uuid(&self.goal_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      name:        self.name,
      metric_type: MetricType::parse(&self.metric_type)?,
      unit:        self.unit,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// An `events` row as read from SQLite, before decoding.
pub struct RawEvent {
  pub event_id:    String,
  pub goal_id:     String,
  pub actor_id:    String,
  pub value:       f64,
  pub occurred_at: String,
  pub source:      String,
}

impl RawEvent {
  pub const COLUMNS: &'static str = "event_id, goal_id, actor_id, value, occurred_at, source";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      goal_id:     row.get(1)?,
      actor_id:    row.get(2)?,
      value:       row.get(3)?,
      occurred_at: row.get(4)?,
      source:      row.get(5)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      event_id:    decode_uuid(&self.event_id)?,
      goal_id:     decode_uuid(&self.goal_id)?,
      actor_id:    decode_uuid(&self.actor_id)?,
      value:       self.value,
      occurred_at: decode_dt(&self.occurred_at)?,
      source:      Source::parse(&self.source)?,
    })
  }
}
