//! Cross-goal summary: one daily trend across all of a user's goals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::daily::DailyPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryPoint {
  pub date:       NaiveDate,
  /// Mean of the daily means of the goals with a point on `date`.
  pub mean:       f64,
  /// How many goals contributed to `mean`.
  pub goal_count: usize,
}

/// Daily mean-of-means across goals.
///
/// Each date present in any goal's series appears once, ascending. Goals
/// without a point on a date are left out of that date's mean rather than
/// counted as zero. Metric types are not consulted.
pub fn summarize<K, V, I>(per_goal: I) -> Vec<SummaryPoint>
where
  V: AsRef<[DailyPoint]>,
  I: IntoIterator<Item = (K, V)>,
{
  let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

  for (_goal, series) in per_goal {
    for point in series.as_ref() {
      let entry = days.entry(point.date).or_insert((0.0, 0));
      entry.0 += point.mean_value;
      entry.1 += 1;
    }
  }

  days
    .into_iter()
    .map(|(date, (sum, goal_count))| SummaryPoint {
      date,
      mean: sum / goal_count as f64,
      goal_count,
    })
    .collect()
}
