//! View builders that run the whole pipeline for one goal or one user.
//!
//! Every chart in the product (per-goal trend, check-in preview, dashboard)
//! goes through [`goal_trend`] or [`dashboard`], so selection, bucketing and
//! gap handling are the same everywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  align::{PEER_SERIES, SELF_SERIES, align},
  calendar::Calendar,
  chart::{ChartDescriptor, describe_goal, describe_summary},
  daily::{DailyPoint, aggregate, latest_daily_mean},
  event::Source,
  goal::Goal,
  preview::{LabeledSeries, with_aligned_preview},
  store::{EventStore, GoalProvider},
  summary::{SummaryPoint, summarize},
  window::{Selection, Window, latest, select},
};

/// Window, calendar and reference instant shared by one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendOptions {
  pub window:   Window,
  pub calendar: Calendar,
  pub now:      DateTime<Utc>,
}

impl TrendOptions {
  /// Options anchored at the current time.
  pub fn new(window: Window, calendar: Calendar) -> Self {
    Self { window, calendar, now: Utc::now() }
  }

  pub fn at(mut self, now: DateTime<Utc>) -> Self {
    self.now = now;
    self
  }
}

impl Default for TrendOptions {
  fn default() -> Self { Self::new(Window::default(), Calendar::default()) }
}

/// Everything a renderer needs to draw one goal's chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTrend {
  pub goal:        Goal,
  pub descriptor:  ChartDescriptor,
  /// `self` and `peer` series on one axis, possibly ending in a preview.
  pub series:      LabeledSeries,
  /// Most recent check-in value, including check-ins older than the window.
  pub latest_self: Option<f64>,
  /// Mean of the most recent day of peer evaluations in the window.
  pub latest_peer: Option<f64>,
}

impl GoalTrend {
  /// Whether any real (non-preview) point exists.
  pub fn has_history(&self) -> bool { self.series.labels.iter().any(|l| !l.is_preview()) }
}

/// A user's goals plus the cross-goal summary trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub owner_id:           Uuid,
  pub goals:              Vec<GoalTrend>,
  pub summary:            Vec<SummaryPoint>,
  pub summary_descriptor: ChartDescriptor,
}

/// Build the trend for `goal_id`, optionally with a preview value appended
/// to the owner's series.
pub async fn goal_trend<S>(
  store: &S,
  goal_id: Uuid,
  options: &TrendOptions,
  preview: Option<f64>,
) -> Result<GoalTrend>
where
  S: EventStore + GoalProvider,
{
  let goal = GoalProvider::get_goal(store, goal_id)
    .await
    .map_err(Error::unavailable)?
    .ok_or(Error::GoalNotFound(goal_id))?;

  let (trend, _) = build(store, goal, options, preview).await?;
  Ok(trend)
}

/// Build every goal's trend for `owner_id` and the summary across them.
///
/// A user without goals, or without any history, gets an empty summary.
pub async fn dashboard<S>(store: &S, owner_id: Uuid, options: &TrendOptions) -> Result<Dashboard>
where
  S: EventStore + GoalProvider,
{
  let goals = GoalProvider::list_goals(store, owner_id)
    .await
    .map_err(Error::unavailable)?;

  let mut trends = Vec::with_capacity(goals.len());
  let mut per_goal = Vec::with_capacity(goals.len());
  for goal in goals {
    let (trend, own_daily) = build(store, goal, options, None).await?;
    per_goal.push((trend.goal.goal_id, own_daily));
    trends.push(trend);
  }

  let summary = summarize(per_goal.iter().map(|(id, pts)| (*id, pts.as_slice())));
  let summary_descriptor = describe_summary(
    trends
      .iter()
      .zip(&per_goal)
      .filter(|(_, (_, pts))| !pts.is_empty())
      .map(|(t, _)| t.goal.metric_type),
  );

  Ok(Dashboard { owner_id, goals: trends, summary, summary_descriptor })
}

async fn build<S>(
  store: &S,
  goal: Goal,
  options: &TrendOptions,
  preview: Option<f64>,
) -> Result<(GoalTrend, Vec<DailyPoint>)>
where
  S: EventStore,
{
  let own = Selection::new(goal.goal_id, options.window)
    .by_actor(goal.owner_id)
    .from_source(Source::SelfEval);
  let peers = Selection::new(goal.goal_id, options.window).from_source(Source::Peer);

  let own_events = select(store, &own, options.now).await?;
  let mut peer_events = select(store, &peers, options.now).await?;
  // An owner cannot evaluate their own goal as a peer.
  peer_events.retain(|e| e.actor_id != goal.owner_id);
  let last_check_in = latest(store, &own, options.now).await?;

  let own_daily = aggregate(&own_events, &options.calendar);
  let peer_daily = aggregate(&peer_events, &options.calendar);

  let aligned = align([
    (SELF_SERIES, own_daily.as_slice()),
    (PEER_SERIES, peer_daily.as_slice()),
  ]);

  let trend = GoalTrend {
    descriptor: describe_goal(&goal),
    series: with_aligned_preview(&aligned, SELF_SERIES, preview),
    latest_self: last_check_in.map(|e| e.value),
    latest_peer: latest_daily_mean(&peer_daily),
    goal,
  };
  Ok((trend, own_daily))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    goal::MetricType,
    preview::Label,
    test_helpers::{FailingStore, MemoryStore, at, day, event_by, goal},
  };

  fn options() -> TrendOptions {
    TrendOptions::new(Window::default(), Calendar::utc()).at(at(2024, 1, 10, 12))
  }

  #[tokio::test]
  async fn goal_trend_aligns_self_and_peer() {
    let owner = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let g = goal(owner, MetricType::Percentage);
    let store = MemoryStore::default().with_goals(vec![g.clone()]).with_events(vec![
      event_by(g.goal_id, owner, Source::SelfEval, at(2024, 1, 1, 9), 70.0),
      event_by(g.goal_id, owner, Source::SelfEval, at(2024, 1, 8, 9), 75.0),
      event_by(g.goal_id, peer, Source::Peer, at(2024, 1, 8, 10), 78.0),
      event_by(g.goal_id, Uuid::new_v4(), Source::Peer, at(2024, 1, 8, 11), 82.0),
    ]);

    let trend = goal_trend(&store, g.goal_id, &options(), None).await.unwrap();

    assert_eq!(trend.series.labels, vec![
      Label::Day(day(2024, 1, 1)),
      Label::Day(day(2024, 1, 8))
    ]);
    assert_eq!(trend.series.get(SELF_SERIES).unwrap(), &[Some(70.0), Some(75.0)]);
    assert_eq!(trend.series.get(PEER_SERIES).unwrap(), &[None, Some(80.0)]);
    assert_eq!(trend.latest_self, Some(75.0));
    assert_eq!(trend.latest_peer, Some(80.0));
    assert_eq!(trend.descriptor.max, Some(100.0));
    assert!(trend.has_history());
  }

  #[tokio::test]
  async fn latest_self_survives_an_empty_window() {
    let owner = Uuid::new_v4();
    let g = goal(owner, MetricType::Percentage);
    let store = MemoryStore::default().with_goals(vec![g.clone()]).with_events(vec![
      event_by(g.goal_id, owner, Source::SelfEval, at(2024, 1, 1, 9), 42.0),
    ]);
    let nine_weeks_on = options().at(at(2024, 3, 4, 9));

    let trend = goal_trend(&store, g.goal_id, &nine_weeks_on, None).await.unwrap();
    assert!(!trend.has_history());
    assert_eq!(trend.latest_self, Some(42.0));
    assert_eq!(trend.latest_peer, None);

    let dash = dashboard(&store, owner, &nine_weeks_on).await.unwrap();
    assert_eq!(dash.goals[0].latest_self, Some(42.0));
    assert!(dash.summary.is_empty());
  }

  #[tokio::test]
  async fn owner_peer_events_stay_out_of_peer_series() {
    let owner = Uuid::new_v4();
    let g = goal(owner, MetricType::Scale5);
    let store = MemoryStore::default().with_goals(vec![g.clone()]).with_events(vec![
      event_by(g.goal_id, owner, Source::Peer, at(2024, 1, 3, 9), 5.0),
      event_by(g.goal_id, Uuid::new_v4(), Source::Peer, at(2024, 1, 4, 9), 2.0),
    ]);

    let trend = goal_trend(&store, g.goal_id, &options(), None).await.unwrap();
    assert_eq!(trend.series.labels, vec![Label::Day(day(2024, 1, 4))]);
    assert_eq!(trend.series.get(PEER_SERIES).unwrap(), &[Some(2.0)]);
    assert_eq!(trend.series.get(SELF_SERIES).unwrap(), &[None]);
    assert_eq!(trend.latest_peer, Some(2.0));
  }

  #[tokio::test]
  async fn goal_trend_ignores_self_events_from_other_actors() {
    let owner = Uuid::new_v4();
    let g = goal(owner, MetricType::Numeric);
    let store = MemoryStore::default().with_goals(vec![g.clone()]).with_events(vec![
      event_by(g.goal_id, owner, Source::SelfEval, at(2024, 1, 2, 9), 1.0),
      event_by(g.goal_id, Uuid::new_v4(), Source::SelfEval, at(2024, 1, 3, 9), 9.0),
    ]);

    let trend = goal_trend(&store, g.goal_id, &options(), None).await.unwrap();
    assert_eq!(trend.series.get(SELF_SERIES).unwrap(), &[Some(1.0)]);
  }

  #[tokio::test]
  async fn goal_trend_with_preview() {
    let owner = Uuid::new_v4();
    let g = goal(owner, MetricType::Scale5);
    let store = MemoryStore::default().with_goals(vec![g.clone()]).with_events(vec![
      event_by(g.goal_id, owner, Source::SelfEval, at(2024, 1, 2, 9), 3.0),
    ]);

    let trend = goal_trend(&store, g.goal_id, &options(), Some(4.0)).await.unwrap();
    assert!(trend.series.has_preview());
    assert_eq!(trend.series.get(SELF_SERIES).unwrap(), &[Some(3.0), Some(4.0)]);
    assert_eq!(trend.series.get(PEER_SERIES).unwrap(), &[None, None]);
    // The preview is not a check-in.
    assert_eq!(trend.latest_self, Some(3.0));
  }

  #[tokio::test]
  async fn preview_alone_is_not_history() {
    let g = goal(Uuid::new_v4(), MetricType::Numeric);
    let store = MemoryStore::default().with_goals(vec![g.clone()]);

    let trend = goal_trend(&store, g.goal_id, &options(), Some(10.0)).await.unwrap();
    assert!(!trend.has_history());
    assert_eq!(trend.series.labels, vec![Label::Preview]);
  }

  #[tokio::test]
  async fn missing_goal_is_reported() {
    let store = MemoryStore::default();
    let id = Uuid::new_v4();
    let err = goal_trend(&store, id, &options(), None).await.unwrap_err();
    assert!(matches!(err, Error::GoalNotFound(g) if g == id));
  }

  #[tokio::test]
  async fn store_failure_is_not_an_empty_chart() {
    let err = goal_trend(&FailingStore, Uuid::new_v4(), &options(), None)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::DataUnavailable(_)));

    let err = dashboard(&FailingStore, Uuid::new_v4(), &options()).await.unwrap_err();
    assert!(matches!(err, Error::DataUnavailable(_)));
  }

  #[tokio::test]
  async fn dashboard_summarizes_across_goals() {
    let owner = Uuid::new_v4();
    let a = goal(owner, MetricType::Percentage);
    let b = goal(owner, MetricType::Scale5);
    let c = goal(owner, MetricType::Numeric);
    let store = MemoryStore::default()
      .with_goals(vec![a.clone(), b.clone(), c.clone(), goal(Uuid::new_v4(), MetricType::Numeric)])
      .with_events(vec![
        event_by(a.goal_id, owner, Source::SelfEval, at(2024, 1, 1, 9), 50.0),
        event_by(a.goal_id, owner, Source::SelfEval, at(2024, 1, 2, 9), 60.0),
        event_by(b.goal_id, owner, Source::SelfEval, at(2024, 1, 1, 9), 70.0),
        // Peer values never feed the summary.
        event_by(c.goal_id, Uuid::new_v4(), Source::Peer, at(2024, 1, 1, 9), 1000.0),
      ]);

    let dash = dashboard(&store, owner, &options()).await.unwrap();

    assert_eq!(dash.goals.len(), 3);
    assert_eq!(dash.summary, vec![
      SummaryPoint { date: day(2024, 1, 1), mean: 60.0, goal_count: 2 },
      SummaryPoint { date: day(2024, 1, 2), mean: 60.0, goal_count: 1 },
    ]);
    assert_eq!(dash.summary_descriptor.max, Some(100.0));
    assert!(dash.goals.iter().all(|t| !t.series.has_preview()));
  }

  #[tokio::test]
  async fn dashboard_without_goals_is_empty() {
    let store = MemoryStore::default();
    let dash = dashboard(&store, Uuid::new_v4(), &options()).await.unwrap();
    assert!(dash.goals.is_empty());
    assert!(dash.summary.is_empty());
    assert_eq!(dash.summary_descriptor.max, None);
  }
}
