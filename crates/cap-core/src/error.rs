//! Error types for `cap-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::goal::MetricType;

#[derive(Debug, Error)]
pub enum Error {
  /// The event store could not be read. Never folded into an empty series.
  #[error("event store unavailable: {0}")]
  DataUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("window must be a positive number of weeks, got {0}")]
  InvalidWindow(i64),

  #[error("goal not found: {0}")]
  GoalNotFound(Uuid),

  #[error("value {value} is out of range for a {metric_type} goal")]
  ValueOutOfRange { value: f64, metric_type: MetricType },

  #[error("unknown metric type: {0:?}")]
  UnknownMetricType(String),

  #[error("unknown event source: {0:?}")]
  UnknownSource(String),
}

impl Error {
  /// Wrap a store backend error.
  pub fn unavailable<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::DataUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
