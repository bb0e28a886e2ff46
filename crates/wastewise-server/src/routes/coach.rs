use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use wastewise_core::coach::{ChatTurn, CoachContext, RECOMMENDATION_CATEGORY};
use wastewise_core::types::{DailyLogRecord, Recommendation};

use super::blocking;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub const COACH_FAILURE: &str = "Failed to generate response. Please try again.";

/// POST /api/coach: ask the waste coach a question.
pub async fn ask_coach(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let message = body
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::bad_request("Message is required"))?
        .to_string();
    let history: Vec<ChatTurn> = match body.get("conversationHistory") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(v) => serde_json::from_value(v.clone()).map_err(|_| {
            AppError::bad_request("conversationHistory must be a list of {role, content} messages")
        })?,
    };

    let store = app.store.clone();
    let context_logs = app.config.coach.context_logs;
    let profile = user.clone();
    let ctx = blocking(move || {
        let records: Vec<DailyLogRecord> = store
            .waste_logs_for(profile.id)?
            .into_iter()
            .take(context_logs)
            .map(|l| l.record)
            .collect();
        Ok(CoachContext::from_logs(&records, Some(&profile)))
    })
    .await?;

    let text = match app.coach.reply(&ctx, &history, &message).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(user = %user.email, backend = app.coach.name(), error = %e, "coach reply failed");
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": COACH_FAILURE })),
            ));
        }
    };

    let rec = Recommendation::new(user.id, text.clone(), RECOMMENDATION_CATEGORY);
    let store = app.store.clone();
    blocking(move || store.insert_recommendation(&rec)).await?;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "response": text,
            "timestamp": Utc::now(),
        })),
    ))
}
