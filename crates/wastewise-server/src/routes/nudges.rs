use axum::extract::State;
use axum::Json;
use wastewise_core::nudge::{generate_nudges, window_start};
use wastewise_core::types::DailyLogRecord;

use super::blocking;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/nudges: advice over the caller's recent logs.
pub async fn get_nudges(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let since = window_start(
        chrono::Utc::now().date_naive(),
        app.config.nudges.window_days,
    );
    let logs = blocking(move || store.waste_logs_since(user.id, since)).await?;
    let records: Vec<DailyLogRecord> = logs.into_iter().map(|l| l.record).collect();
    Ok(Json(serde_json::json!({ "nudges": generate_nudges(&records) })))
}
