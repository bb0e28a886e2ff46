use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use wastewise_core::calc::weekly_breakdown;
use wastewise_core::ecopoints::{points_for_waste, tracking_activity, WASTE_TRACKING_ACTIVITY};
use wastewise_core::types::{CalculationRecord, EcoPointEntry};
use wastewise_core::validate::WasteInput;

use super::{blocking, parse_body};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/calculations: convert, save, and award eco points.
pub async fn create_calculation(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let input: WasteInput = parse_body(body)?;
    let sample = input.validate()?;
    let results = sample.convert();
    let total_kg = sample.total_kg();
    let points = points_for_waste(total_kg, app.config.ecopoints.points_per_kg);

    let store = app.store.clone();
    let user_id = user.id;
    let record = CalculationRecord::from_result(user_id, &results);
    let calculation_id = record.id;
    let award = EcoPointEntry::new(
        user_id,
        points,
        tracking_activity(total_kg, &results),
        WASTE_TRACKING_ACTIVITY,
    );
    blocking(move || store.record_calculation(&record, &award)).await?;

    tracing::info!(user = %user.email, total_kg, points, "saved calculation");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "calculation_id": calculation_id,
            "results": results,
            "ecoPointsEarned": points,
        })),
    ))
}

/// GET /api/calculations: the caller's most recent calculations.
pub async fn list_calculations(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let limit = app.config.calculations.history_limit;
    let calculations = blocking(move || store.recent_calculations(user.id, limit)).await?;
    Ok(Json(serde_json::json!({ "calculations": calculations })))
}

/// POST /api/calculations/preview: convert without saving.
pub async fn preview_calculation(
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let input: WasteInput = parse_body(body)?;
    let results = input.validate()?.convert();
    Ok(Json(serde_json::json!({
        "results": results,
        "weekly": weekly_breakdown(&results),
    })))
}
