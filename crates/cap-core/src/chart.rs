//! Chart descriptors: axis bounds, ticks and labels derived from a goal's
//! metric type. Drawing itself is the renderer's business.

use serde::{Deserialize, Serialize};

use crate::goal::{Goal, MetricType};

/// Rendering hints for one chart's value axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
  /// `None` means unbounded.
  pub min:          Option<f64>,
  pub max:          Option<f64>,
  /// Tick step; `None` leaves tick placement to the renderer.
  pub step:         Option<f64>,
  pub axis_label:   String,
  pub value_suffix: Option<String>,
}

impl ChartDescriptor {
  /// Format `value` for tooltips, e.g. `82.5%` or `70 kg`.
  pub fn format_value(&self, value: f64) -> String {
    match self.value_suffix.as_deref() {
      Some("%") => format!("{value}%"),
      Some(unit) => format!("{value} {unit}"),
      None => value.to_string(),
    }
  }
}

/// Map a metric type (and, for numeric goals, its unit) to a descriptor.
pub fn describe(metric_type: MetricType, unit: Option<&str>) -> ChartDescriptor {
  match metric_type {
    MetricType::Percentage => ChartDescriptor {
      min:          Some(0.0),
      max:          Some(100.0),
      step:         None,
      axis_label:   "Percentage (%)".to_owned(),
      value_suffix: Some("%".to_owned()),
    },
    MetricType::Scale5 => ChartDescriptor {
      min:          Some(1.0),
      max:          Some(5.0),
      step:         Some(1.0),
      axis_label:   "Rating (1-5)".to_owned(),
      value_suffix: None,
    },
    MetricType::Numeric => {
      let unit = unit.map(str::trim).filter(|u| !u.is_empty());
      ChartDescriptor {
        min:          None,
        max:          None,
        step:         None,
        axis_label:   unit.map_or_else(|| "Value".to_owned(), |u| format!("Value ({u})")),
        value_suffix: unit.map(str::to_owned),
      }
    }
  }
}

/// [`describe`] for a goal's own configuration.
pub fn describe_goal(goal: &Goal) -> ChartDescriptor {
  describe(goal.metric_type, goal.unit.as_deref())
}

/// Descriptor for the cross-goal summary chart.
///
/// Percentage scaling wins if any contributing goal is a percentage goal;
/// otherwise the axis is unbounded with no suffix.
pub fn describe_summary<I>(metric_types: I) -> ChartDescriptor
where
  I: IntoIterator<Item = MetricType>,
{
  if metric_types.into_iter().any(|m| m == MetricType::Percentage) {
    describe(MetricType::Percentage, None)
  } else {
    describe(MetricType::Numeric, None)
  }
}
