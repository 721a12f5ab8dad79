//! Event — one recorded value for a goal at a point in time.
//!
//! Events are immutable once created. The engine only ever reads them;
//! creation belongs to the submission workflow.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Who recorded an event relative to the goal owner.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
  strum::EnumString,
)]
pub enum Source {
  /// A check-in by the goal owner.
  #[serde(rename = "self")]
  #[strum(serialize = "self")]
  SelfEval,
  /// An evaluation by another team member.
  #[serde(rename = "peer")]
  #[strum(serialize = "peer")]
  Peer,
}

impl Source {
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownSource(s.to_owned()))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub event_id:    Uuid,
  pub goal_id:     Uuid,
  pub actor_id:    Uuid,
  pub value:       f64,
  pub occurred_at: DateTime<Utc>,
  pub source:      Source,
}

/// Input for recording an event. `occurred_at` defaults to the time of
/// recording when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
  pub goal_id:     Uuid,
  pub actor_id:    Uuid,
  pub value:       f64,
  pub source:      Source,
  pub occurred_at: Option<DateTime<Utc>>,
}

impl NewEvent {
  pub fn check_in(goal_id: Uuid, owner_id: Uuid, value: f64) -> Self {
    Self { goal_id, actor_id: owner_id, value, source: Source::SelfEval, occurred_at: None }
  }

  pub fn peer(goal_id: Uuid, peer_id: Uuid, value: f64) -> Self {
    Self { goal_id, actor_id: peer_id, value, source: Source::Peer, occurred_at: None }
  }

  pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
    self.occurred_at = Some(occurred_at);
    self
  }
}

/// Value of the most recent event, if any.
///
/// Expects `events` in ascending `occurred_at` order, as returned by
/// [`crate::window::select`].
pub fn latest_value(events: &[Event]) -> Option<f64> {
  events.last().map(|e| e.value)
}
