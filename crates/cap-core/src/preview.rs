//! Preview injection.
//!
//! While composing a check-in, the user sees their history with the value
//! they are about to submit appended at the end. That value exists only as a
//! function argument: it is never read from or written to the store, and it
//! is labelled with [`Label::Preview`] so it can never be mistaken for a
//! dated point.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::{
  align::{AlignedSeries, NamedSeries},
  daily::DailyPoint,
};

const PREVIEW_LABEL: &str = "preview";

// ─── Labels ──────────────────────────────────────────────────────────────────

/// An x-axis position: a real calendar day or the preview sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
  Day(NaiveDate),
  Preview,
}

impl Label {
  pub fn is_preview(&self) -> bool { matches!(self, Self::Preview) }

  /// Short axis text: `MM/DD` for days, `preview` for the sentinel.
  pub fn display(&self) -> String {
    match self {
      Self::Day(d) => d.format("%m/%d").to_string(),
      Self::Preview => PREVIEW_LABEL.to_owned(),
    }
  }
}

impl fmt::Display for Label {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
      Self::Preview => f.write_str(PREVIEW_LABEL),
    }
  }
}

impl Serialize for Label {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Label {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    if s == PREVIEW_LABEL {
      return Ok(Self::Preview);
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
      .map(Self::Day)
      .map_err(serde::de::Error::custom)
  }
}

// ─── Labelled output ─────────────────────────────────────────────────────────

/// A single-series point on a labelled axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
  pub label: Label,
  pub value: f64,
}

/// Like [`AlignedSeries`], but the axis may end in [`Label::Preview`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
  pub labels: Vec<Label>,
  pub series: Vec<NamedSeries>,
}

impl LabeledSeries {
  pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
    self
      .series
      .iter()
      .find(|s| s.name == name)
      .map(|s| s.values.as_slice())
  }

  pub fn has_preview(&self) -> bool { self.labels.last().is_some_and(Label::is_preview) }
}

impl From<AlignedSeries> for LabeledSeries {
  fn from(aligned: AlignedSeries) -> Self {
    Self {
      labels: aligned.dates.into_iter().map(Label::Day).collect(),
      series: aligned.series,
    }
  }
}

// ─── Injection ───────────────────────────────────────────────────────────────

/// Parse raw form input into a usable preview value.
///
/// Blank, non-numeric and non-finite input all yield `None`.
pub fn parse_preview(raw: &str) -> Option<f64> {
  raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn usable(preview_value: Option<f64>) -> Option<f64> {
  match preview_value {
    Some(v) if v.is_finite() => Some(v),
    Some(v) => {
      debug!(value = v, "omitting non-finite preview value");
      None
    }
    None => None,
  }
}

/// Label `points` by day and append the preview point, if usable.
pub fn with_preview(points: &[DailyPoint], preview_value: Option<f64>) -> Vec<LabeledPoint> {
  let mut out: Vec<LabeledPoint> = points
    .iter()
    .map(|p| LabeledPoint { label: Label::Day(p.date), value: p.mean_value })
    .collect();

  if let Some(value) = usable(preview_value) {
    out.push(LabeledPoint { label: Label::Preview, value });
  }
  out
}

/// Extend `aligned` with a preview slot holding `preview_value` in the
/// series called `series_name`. Other series get `None` in that slot.
///
/// An unusable value, or a name matching no series, leaves the axis
/// without a preview slot.
pub fn with_aligned_preview(
  aligned: &AlignedSeries,
  series_name: &str,
  preview_value: Option<f64>,
) -> LabeledSeries {
  let mut labeled = LabeledSeries::from(aligned.clone());

  let Some(value) = usable(preview_value) else {
    return labeled;
  };
  if labeled.get(series_name).is_none() {
    debug!(series = series_name, "no series to attach preview to");
    return labeled;
  }

  labeled.labels.push(Label::Preview);
  for s in &mut labeled.series {
    s.values.push((s.name == series_name).then_some(value));
  }
  labeled
}
