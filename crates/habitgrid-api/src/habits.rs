use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::Local;
use tracing::debug;

use habitgrid_types::api::{
    CreateHabitRequest, RenameHabitRequest, StreakQuery, StreakResponse, ToggleEntryRequest,
};
use habitgrid_types::calendar::parse_calendar_day;
use habitgrid_types::models::{Habit, HabitEntry, HabitWithEntries};

use crate::error::ApiError;
use crate::state::{AppState, today};

/// GET /api/habits: every habit with its entries attached.
pub async fn list_habits(
    State(state): State<AppState>,
) -> Result<Json<Vec<HabitWithEntries>>, ApiError> {
    let habits = tokio::task::spawn_blocking(move || state.habits.list()).await??;
    Ok(Json(habits))
}

/// POST /api/habits: returns the created habit with 201.
pub async fn create_habit(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateHabitRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let habit: Habit =
        tokio::task::spawn_blocking(move || state.habits.create(&req.name, &req.emoji)).await??;
    Ok((StatusCode::CREATED, Json(habit)))
}

/// PATCH /api/habits/{id}: rename only.
pub async fn rename_habit(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<RenameHabitRequest>, ApiError>,
) -> Result<Json<Habit>, ApiError> {
    let habit = tokio::task::spawn_blocking(move || state.habits.rename(id, &req.name)).await??;
    Ok(Json(habit))
}

/// DELETE /api/habits/{id}: 204 whether or not the habit existed.
pub async fn delete_habit(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<StatusCode, ApiError> {
    tokio::task::spawn_blocking(move || state.habits.delete(id)).await??;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/habits/{id}/toggle: returns the entry after the flip.
pub async fn toggle_entry(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<ToggleEntryRequest>, ApiError>,
) -> Result<Json<HabitEntry>, ApiError> {
    let date = parse_calendar_day(&req.date, &Local)?;

    let entry = tokio::task::spawn_blocking(move || state.habits.toggle(id, date)).await??;
    debug!("Habit {} on {} is now completed={}", id, entry.date, entry.completed);
    Ok(Json(entry))
}

/// GET /api/habits/{id}/streak?asOf=YYYY-MM-DD: defaults to today.
pub async fn habit_streak(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<StreakQuery>, ApiError>,
) -> Result<Json<StreakResponse>, ApiError> {
    let as_of = match query.as_of.as_deref() {
        Some(raw) => parse_calendar_day(raw, &Local)?,
        None => today(),
    };

    let streak = tokio::task::spawn_blocking(move || state.habits.streak(id, as_of)).await??;
    Ok(Json(StreakResponse {
        habit_id: id,
        as_of,
        streak,
    }))
}
