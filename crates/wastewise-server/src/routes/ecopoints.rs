use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use wastewise_core::ecopoints::GENERAL_ACTIVITY;
use wastewise_core::types::EcoPointEntry;

use super::blocking;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ecopoints: balance and recent ledger activity.
pub async fn get_ecopoints(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let limit = app.config.ecopoints.recent_activity_limit;
    let (balance, mut recent) =
        blocking(move || Ok((store.balance(user.id)?, store.eco_points_for(user.id)?))).await?;
    recent.truncate(limit);

    Ok(Json(serde_json::json!({
        "totalEarned": balance.total_earned,
        "totalSpent": balance.total_spent,
        "availablePoints": balance.available_points,
        "recentActivities": recent,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardBody {
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub activity_type: Option<String>,
}

/// POST /api/ecopoints: credit points for an activity.
pub async fn award_ecopoints(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<AwardBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let points = body.points.filter(|p| *p != 0);
    let activity = body.activity.filter(|a| !a.trim().is_empty());
    let (Some(points), Some(activity)) = (points, activity) else {
        return Err(AppError::bad_request("Points and activity are required"));
    };
    let activity_type = body
        .activity_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| GENERAL_ACTIVITY.to_string());

    let entry = EcoPointEntry::new(user.id, points, activity, activity_type);
    let store = app.store.clone();
    blocking(move || store.insert_eco_points(&entry)).await?;

    tracing::info!(user = %user.email, points, "awarded eco points");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Points added successfully",
    })))
}
