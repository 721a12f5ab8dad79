//! Goal — the metric definition a series of check-ins is recorded against.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// How a goal's values are measured and displayed.
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
pub enum MetricType {
  /// Display range 0..=100.
  #[serde(rename = "percentage")]
  #[strum(serialize = "percentage")]
  Percentage,
  /// Integer ratings 1..=5.
  #[serde(rename = "scale_5")]
  #[strum(serialize = "scale_5")]
  Scale5,
  /// Free-form number, optionally with a unit.
  #[serde(rename = "numeric")]
  #[strum(serialize = "numeric")]
  Numeric,
}

impl MetricType {
  /// Parse the stored discriminant (`"percentage"`, `"scale_5"`,
  /// `"numeric"`).
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownMetricType(s.to_owned()))
  }

  /// Check a submitted value against the range this metric type accepts.
  pub fn validate(self, value: f64) -> Result<f64> {
    let ok = value.is_finite()
      && match self {
        Self::Percentage => (0.0..=100.0).contains(&value),
        Self::Scale5 => value.fract() == 0.0 && (1.0..=5.0).contains(&value),
        Self::Numeric => true,
      };

    if ok {
      Ok(value)
    } else {
      Err(Error::ValueOutOfRange { value, metric_type: self })
    }
  }
}

/// A personal improvement goal owned by one team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
  pub goal_id:     Uuid,
  pub owner_id:    Uuid,
  pub name:        String,
  pub metric_type: MetricType,
  /// Only meaningful for [`MetricType::Numeric`].
  pub unit:        Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for creating a goal; ids and timestamps are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
  pub owner_id:    Uuid,
  pub name:        String,
  pub metric_type: MetricType,
  pub unit:        Option<String>,
}

impl NewGoal {
  pub fn new(owner_id: Uuid, name: impl Into<String>, metric_type: MetricType) -> Self {
    Self { owner_id, name: name.into(), metric_type, unit: None }
  }

  pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
    self.unit = Some(unit.into());
    self
  }
}
