use axum::{Json, extract::Query};
use axum_extra::extract::WithRejection;
use chrono::Local;

use habitgrid_types::api::{EmojiQuery, EmojiSuggestion, WeekQuery, WeekResponse};
use habitgrid_types::calendar::{CalendarError, parse_calendar_day, week_dates};
use habitgrid_types::emoji::suggest_emoji;

use crate::error::ApiError;
use crate::state::today;

/// GET /api/week?anchor=YYYY-MM-DD: Monday..Sunday around the anchor (default today).
pub async fn week_view(
    WithRejection(Query(query), _): WithRejection<Query<WeekQuery>, ApiError>,
) -> Result<Json<WeekResponse>, ApiError> {
    let anchor = match query.anchor.as_deref() {
        Some(raw) => parse_calendar_day(raw, &Local)?,
        None => today(),
    };

    Ok(Json(WeekResponse {
        anchor,
        dates: week_dates(anchor)
            .ok_or(CalendarError::OutOfRange(anchor))?
            .to_vec(),
    }))
}

/// GET /api/emoji/suggest?name=...
pub async fn suggest(
    WithRejection(Query(query), _): WithRejection<Query<EmojiQuery>, ApiError>,
) -> Json<EmojiSuggestion> {
    let emoji = suggest_emoji(&query.name).to_string();
    Json(EmojiSuggestion {
        name: query.name,
        emoji,
    })
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
