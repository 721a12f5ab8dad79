//! Handlers for the chart endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/goals/{id}/trend` | optional `weeks`, `preview` (raw form input) |
//! | `GET`  | `/goals/{id}/chart` | chart descriptor only |
//! | `GET`  | `/users/{id}/dashboard` | optional `weeks` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use cap_core::{
  chart::{ChartDescriptor, describe_goal},
  preview::parse_preview,
  store::{EventStore, GoalProvider},
  trend::{Dashboard, GoalTrend, TrendOptions, dashboard, goal_trend},
  window::Window,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
  /// Window length in weeks; the server default when absent.
  pub weeks:   Option<i64>,
  /// Uncommitted value to append to the owner's series. Unparseable input
  /// is ignored rather than rejected.
  pub preview: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  pub weeks: Option<i64>,
}

fn options<S>(state: &AppState<S>, weeks: Option<i64>) -> Result<TrendOptions, ApiError> {
  let window = match weeks {
    Some(w) => Window::new(w)?,
    None => state.default_window,
  };
  Ok(TrendOptions::new(window, state.calendar))
}

/// `GET /goals/{id}/trend[?weeks=N][&preview=V]`
pub async fn goal<S>(
  State(state): State<AppState<S>>,
  Path(goal_id): Path<Uuid>,
  Query(params): Query<TrendParams>,
) -> Result<Json<GoalTrend>, ApiError>
where
  S: EventStore + GoalProvider,
{
  let options = options(&state, params.weeks)?;
  let preview = params.preview.as_deref().and_then(parse_preview);
  debug!(%goal_id, weeks = options.window.weeks(), preview, "goal trend");

  let trend = goal_trend(state.store.as_ref(), goal_id, &options, preview).await?;
  Ok(Json(trend))
}

/// `GET /goals/{id}/chart`
pub async fn chart<S>(
  State(state): State<AppState<S>>,
  Path(goal_id): Path<Uuid>,
) -> Result<Json<ChartDescriptor>, ApiError>
where
  S: GoalProvider,
{
  let goal = state
    .store
    .get_goal(goal_id)
    .await
    .map_err(|e| ApiError::Unavailable(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("goal {goal_id} not found")))?;
  Ok(Json(describe_goal(&goal)))
}

/// `GET /users/{id}/dashboard[?weeks=N]`
pub async fn user_dashboard<S>(
  State(state): State<AppState<S>>,
  Path(owner_id): Path<Uuid>,
  Query(params): Query<DashboardParams>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: EventStore + GoalProvider,
{
  let options = options(&state, params.weeks)?;
  let dash = dashboard(state.store.as_ref(), owner_id, &options).await?;
  Ok(Json(dash))
}
