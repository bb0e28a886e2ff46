use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use wastewise_core::types::WasteLog;
use wastewise_core::validate::LogInput;

use super::{blocking, parse_body};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/waste-logs: record one day of waste.
pub async fn create_waste_log(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let input: LogInput = parse_body(body)?;
    let record = input.validate(chrono::Utc::now().date_naive())?;
    let log = WasteLog::new(user.id, record);

    let store = app.store.clone();
    let saved = log.clone();
    blocking(move || store.insert_waste_log(&saved)).await?;

    tracing::info!(user = %user.email, date = %log.record.date, total_kg = log.record.total_kg, "logged waste");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "log": log }))))
}

/// GET /api/waste-logs: the caller's logs, newest date first.
pub async fn list_waste_logs(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let logs = blocking(move || store.waste_logs_for(user.id)).await?;
    Ok(Json(serde_json::json!({ "logs": logs })))
}
