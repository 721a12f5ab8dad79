//! Series alignment.
//!
//! Independently sampled daily series rarely share dates. [`align`] puts
//! them on one ascending, de-duplicated date axis and marks every date a
//! series has no point for with `None`. Renderers rely on that marker to skip
//! the gap instead of drawing a line through zero.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::daily::DailyPoint;

/// Name of the owner's check-in series.
pub const SELF_SERIES: &str = "self";
/// Name of the peer-evaluation series.
pub const PEER_SERIES: &str = "peer";

/// One series' values, positionally aligned to [`AlignedSeries::dates`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
  pub name:   String,
  /// `None` means "no data on this date", never "measured zero".
  pub values: Vec<Option<f64>>,
}

/// Several series sharing one date axis.
///
/// Every [`NamedSeries::values`] has exactly `dates.len()` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
  pub dates:  Vec<NaiveDate>,
  pub series: Vec<NamedSeries>,
}

impl AlignedSeries {
  /// Values of the series called `name`.
  pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
    self
      .series
      .iter()
      .find(|s| s.name == name)
      .map(|s| s.values.as_slice())
  }

  pub fn len(&self) -> usize { self.dates.len() }

  pub fn is_empty(&self) -> bool { self.dates.is_empty() }
}

/// Merge `named_series` onto the sorted union of their dates.
///
/// Output series keep the input order. Series without points come back as
/// all-`None` and contribute no dates.
pub fn align<'a, N, I>(named_series: I) -> AlignedSeries
where
  N: Into<String>,
  I: IntoIterator<Item = (N, &'a [DailyPoint])>,
{
  let inputs: Vec<(String, &[DailyPoint])> = named_series
    .into_iter()
    .map(|(name, points)| (name.into(), points))
    .collect();

  let dates: Vec<NaiveDate> = inputs
    .iter()
    .flat_map(|(_, points)| points.iter().map(|p| p.date))
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect();

  let series = inputs
    .into_iter()
    .map(|(name, points)| {
      let by_date: BTreeMap<NaiveDate, f64> =
        points.iter().map(|p| (p.date, p.mean_value)).collect();
      let values = dates.iter().map(|d| by_date.get(d).copied()).collect();
      NamedSeries { name, values }
    })
    .collect();

  AlignedSeries { dates, series }
}
