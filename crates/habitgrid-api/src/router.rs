use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::calendar;
use crate::habits;
use crate::middleware::legacy_error_status;
use crate::state::AppState;

/// Build the full HTTP surface.
///
/// With `legacy_errors` set, every failing `/api` route answers 500 instead of
/// 400/404, matching the original API byte for byte.
pub fn router(state: AppState, legacy_errors: bool) -> Router {
    let mut api = Router::new()
        .route("/api/habits", get(habits::list_habits).post(habits::create_habit))
        .route(
            "/api/habits/{id}",
            patch(habits::rename_habit).delete(habits::delete_habit),
        )
        .route("/api/habits/{id}/toggle", post(habits::toggle_entry))
        .route("/api/habits/{id}/streak", get(habits::habit_streak))
        .route("/api/week", get(calendar::week_view))
        .route("/api/emoji/suggest", get(calendar::suggest));

    if legacy_errors {
        api = api.route_layer(middleware::from_fn(legacy_error_status));
    }

    Router::new()
        .merge(api)
        .route("/health", get(calendar::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use futures_util::future::join_all;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use habitgrid_db::Database;

    use crate::service::HabitService;
    use crate::state::AppStateInner;

    fn app_with(legacy_errors: bool) -> Router {
        let db = Database::open_in_memory().unwrap();
        router(AppStateInner::new(HabitService::new(db)), legacy_errors)
    }

    fn app() -> Router {
        app_with(false)
    }

    async fn call_raw(app: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        call_raw(app, method, uri, body.map(|b| b.to_string())).await
    }

    async fn create(app: &Router, name: &str, emoji: &str) -> i64 {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/habits",
            Some(json!({ "name": name, "emoji": emoji })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    async fn toggle(app: &Router, id: i64, date: &str) -> (StatusCode, Value) {
        call(
            app,
            Method::POST,
            &format!("/api/habits/{id}/toggle"),
            Some(json!({ "date": date })),
        )
        .await
    }

    #[tokio::test]
    async fn create_returns_bare_habit_and_list_attaches_entries() {
        let app = app();

        let (status, created) = call(
            &app,
            Method::POST,
            "/api/habits",
            Some(json!({ "name": "Read", "emoji": "📚" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Read");
        assert_eq!(created["emoji"], "📚");
        assert!(created["createdAt"].is_string());
        assert!(created.get("entries").is_none());

        let (status, listed) = call(&app, Method::GET, "/api/habits", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
        assert_eq!(listed[0]["entries"], json!([]));
    }

    #[tokio::test]
    async fn toggle_creates_then_flips_entry() {
        let app = app();
        let id = create(&app, "Walk", "🚶").await;

        let (status, first) = toggle(&app, id, "2024-05-06").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["habitId"], id);
        assert_eq!(first["date"], "2024-05-06");
        assert_eq!(first["completed"], true);

        let (_, second) = toggle(&app, id, "2024-05-06").await;
        assert_eq!(second["completed"], false);
        assert_eq!(second["id"], first["id"]);

        let (_, listed) = call(&app, Method::GET, "/api/habits", None).await;
        assert_eq!(listed[0]["entries"].as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["entries"][0]["completed"], false);
    }

    #[tokio::test]
    async fn toggle_truncates_timestamps_to_the_day() {
        let app = app();
        let id = create(&app, "Gym", "🏋️").await;

        let (status, entry) = toggle(&app, id, "2024-05-06T08:45:00").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["date"], "2024-05-06");

        let (_, again) = toggle(&app, id, "2024-05-06").await;
        assert_eq!(again["id"], entry["id"]);
        assert_eq!(again["completed"], false);
    }

    #[tokio::test]
    async fn toggle_errors_use_the_error_body() {
        let app = app();

        let (status, body) = toggle(&app, 77, "2024-05-06").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("77"));

        let id = create(&app, "Sleep", "💤").await;
        let (status, body) = toggle(&app, id, "next tuesday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_persisting() {
        let app = app();

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/habits",
            Some(json!({ "name": "   ", "emoji": "📝" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, listed) = call(&app, Method::GET, "/api/habits", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn malformed_requests_use_the_error_body() {
        let app = app();

        let (status, body) =
            call_raw(&app, Method::POST, "/api/habits", Some("{not json".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = call(&app, Method::DELETE, "/api/habits/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn delete_removes_habit_and_entries_and_is_idempotent() {
        let app = app();
        let doomed = create(&app, "Doomed", "🐕").await;
        let kept = create(&app, "Kept", "🌱").await;
        toggle(&app, doomed, "2024-05-06").await;
        toggle(&app, kept, "2024-05-06").await;

        let (status, body) = call(&app, Method::DELETE, &format!("/api/habits/{doomed}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = call(&app, Method::DELETE, &format!("/api/habits/{doomed}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, listed) = call(&app, Method::GET, "/api/habits", None).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], kept);
        assert!(
            listed[0]["entries"]
                .as_array()
                .unwrap()
                .iter()
                .all(|e| e["habitId"] == kept)
        );
    }

    #[tokio::test]
    async fn rename_changes_only_the_name() {
        let app = app();
        let id = create(&app, "Jog", "🏋️").await;

        let (status, renamed) = call(
            &app,
            Method::PATCH,
            &format!("/api/habits/{id}"),
            Some(json!({ "name": "Run" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["name"], "Run");
        assert_eq!(renamed["emoji"], "🏋️");

        let (status, _) = call(
            &app,
            Method::PATCH,
            "/api/habits/999",
            Some(json!({ "name": "Run" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn streak_counts_back_from_as_of() {
        let app = app();
        let id = create(&app, "Journal", "📝").await;
        for date in ["2024-05-04", "2024-05-05", "2024-05-06"] {
            toggle(&app, id, date).await;
        }

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/api/habits/{id}/streak?asOf=2024-05-06"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["habitId"], id);
        assert_eq!(body["asOf"], "2024-05-06");
        assert_eq!(body["streak"], 3);

        let (status, _) = call(&app, Method::GET, "/api/habits/999/streak", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn week_view_runs_monday_to_sunday() {
        let app = app();

        let (status, body) = call(&app, Method::GET, "/api/week?anchor=2024-05-10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["anchor"], "2024-05-10");
        let dates = body["dates"].as_array().unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], "2024-05-06");
        assert_eq!(dates[6], "2024-05-12");

        let (status, body) = call(&app, Method::GET, "/api/week", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dates"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn non_canonical_dates_are_bad_requests() {
        let app = app();

        let (status, body) =
            call(&app, Method::GET, "/api/week?anchor=%2B262142-12-31", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let id = create(&app, "Stretch", "🧘").await;
        let (status, body) = toggle(&app, id, "2024-5-6").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, listed) = call(&app, Method::GET, "/api/habits", None).await;
        assert_eq!(listed[0]["entries"], json!([]));
    }

    #[tokio::test]
    async fn emoji_suggestion_and_health() {
        let app = app();

        let (status, body) =
            call(&app, Method::GET, "/api/emoji/suggest?name=Morning%20yoga", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Morning yoga");
        assert_eq!(body["emoji"], "🧘");

        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn legacy_mode_reports_every_failure_as_500() {
        let app = app_with(true);

        let (status, body) = toggle(&app, 5, "2024-05-06").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/habits",
            Some(json!({ "name": "", "emoji": "📝" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let id = create(&app, "Read", "📚").await;
        let (status, _) = toggle(&app, id, "2024-05-06").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn concurrent_toggles_on_one_day_stay_consistent() {
        let app = app();
        let id = create(&app, "Water", "💧").await;

        let results = join_all((0..4).map(|_| toggle(&app, id, "2024-05-06"))).await;
        assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));

        let (_, listed) = call(&app, Method::GET, "/api/habits", None).await;
        let entries = listed[0]["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        // an even number of flips lands back on not-completed
        assert_eq!(entries[0]["completed"], false);
    }
}
