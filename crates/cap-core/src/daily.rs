//! Daily aggregation: collapse same-day events into one mean per day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{calendar::Calendar, event::Event};

/// The mean of all events recorded on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
  pub date:         NaiveDate,
  pub mean_value:   f64,
  pub sample_count: usize,
}

impl DailyPoint {
  /// A point backed by a single sample.
  pub fn single(date: NaiveDate, value: f64) -> Self {
    Self { date, mean_value: value, sample_count: 1 }
  }
}

/// Group `events` by local calendar day and reduce each group to its mean.
///
/// Days without events produce no point. The result is ascending by date.
pub fn aggregate(events: &[Event], calendar: &Calendar) -> Vec<DailyPoint> {
  let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

  for event in events {
    let entry = days.entry(calendar.day_of(event.occurred_at)).or_insert((0.0, 0));
    entry.0 += event.value;
    entry.1 += 1;
  }

  days
    .into_iter()
    .map(|(date, (sum, count))| DailyPoint {
      date,
      mean_value: sum / count as f64,
      sample_count: count,
    })
    .collect()
}

/// Mean of the most recent day, if any.
pub fn latest_daily_mean(points: &[DailyPoint]) -> Option<f64> {
  points.last().map(|p| p.mean_value)
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;
  use crate::test_helpers::{at, day, event};

  #[test]
  fn empty_input_yields_no_points() {
    assert!(aggregate(&[], &Calendar::utc()).is_empty());
  }

  #[test]
  fn same_day_events_collapse_to_mean() {
    let events = vec![
      event(at(2024, 1, 1, 8), 60.0),
      event(at(2024, 1, 1, 17), 75.0),
      event(at(2024, 1, 3, 9), 80.0),
    ];

    let points = aggregate(&events, &Calendar::utc());
    assert_eq!(points, vec![
      DailyPoint { date: day(2024, 1, 1), mean_value: 67.5, sample_count: 2 },
      DailyPoint { date: day(2024, 1, 3), mean_value: 80.0, sample_count: 1 },
    ]);
  }

  #[test]
  fn gaps_are_not_filled() {
    let events = vec![event(at(2024, 1, 1, 8), 1.0), event(at(2024, 1, 9, 8), 2.0)];
    let points = aggregate(&events, &Calendar::utc());
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| p.mean_value != 0.0));
  }

  #[test]
  fn keeps_full_precision() {
    let events = vec![
      event(at(2024, 1, 1, 8), 1.0),
      event(at(2024, 1, 1, 9), 1.0),
      event(at(2024, 1, 1, 10), 2.0),
    ];
    let points = aggregate(&events, &Calendar::utc());
    assert_eq!(points[0].mean_value, 4.0 / 3.0);
  }

  #[test]
  fn buckets_by_local_day() {
    // 16:00 UTC on Jan 1 is already Jan 2 at UTC+9.
    let events = vec![event(at(2024, 1, 1, 10), 3.0), event(at(2024, 1, 1, 16), 5.0)];

    let utc = aggregate(&events, &Calendar::utc());
    assert_eq!(utc.len(), 1);
    assert_eq!(utc[0].mean_value, 4.0);

    let tokyo = aggregate(&events, &Calendar::with_offset_minutes(540).unwrap());
    assert_eq!(tokyo.len(), 2);
    assert_eq!(tokyo[0].date, day(2024, 1, 1));
    assert_eq!(tokyo[1].date, day(2024, 1, 2));
  }

  #[test]
  fn counts_match_events_per_day() {
    let events = vec![
      event(at(2024, 2, 1, 1), 1.0),
      event(at(2024, 2, 3, 1), 2.0),
      event(at(2024, 2, 1, 2), 3.0),
      event(at(2024, 2, 1, 3), 4.0),
      event(at(2024, 2, 5, 1), 5.0),
    ];
    let cal = Calendar::utc();
    let points = aggregate(&events, &cal);

    let input_days: BTreeSet<_> = events.iter().map(|e| cal.day_of(e.occurred_at)).collect();
    for p in &points {
      assert!(input_days.contains(&p.date));
      let n = events.iter().filter(|e| cal.day_of(e.occurred_at) == p.date).count();
      assert_eq!(p.sample_count, n);
    }
    assert_eq!(points.iter().map(|p| p.sample_count).sum::<usize>(), events.len());
    assert!(points.windows(2).all(|w| w[0].date < w[1].date));
  }

  #[test]
  fn latest_daily_mean_uses_last_day() {
    let points = vec![DailyPoint::single(day(2024, 1, 1), 3.0), DailyPoint {
      date:         day(2024, 1, 2),
      mean_value:   4.5,
      sample_count: 2,
    }];
    assert_eq!(latest_daily_mean(&points), Some(4.5));
    assert_eq!(latest_daily_mean(&[]), None);
  }
}
