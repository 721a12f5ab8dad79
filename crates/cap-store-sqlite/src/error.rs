//! Error type for `cap-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] cap_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An event was recorded against a goal that does not exist.
  #[error("goal not found: {0}")]
  GoalNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
