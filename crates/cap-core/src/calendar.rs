//! Calendar-day bucketing.
//!
//! Events are stored with UTC timestamps, but users think in local days. A
//! [`Calendar`] fixes the single UTC offset used both to bucket events and
//! to decide what "today" is, so the two never disagree.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset as _, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
  offset: FixedOffset,
}

impl Calendar {
  pub fn utc() -> Self {
    Self { offset: Utc.fix() }
  }

  /// Build a calendar `minutes` east of UTC. Returns `None` for offsets of a
  /// day or more.
  pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
    FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
  }

  pub fn offset(&self) -> FixedOffset { self.offset }

  /// The local calendar day containing `at`.
  pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&self.offset).date_naive()
  }
}

impl Default for Calendar {
  fn default() -> Self { Self::utc() }
}
