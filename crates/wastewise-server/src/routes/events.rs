use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use wastewise_core::types::DonationEvent;
use wastewise_core::validate::EventInput;

use super::{blocking, parse_body};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/events: announce surplus food from an event.
pub async fn create_event(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let input: EventInput = parse_body(body)?;
    let event_date = input.validate()?;
    let event = DonationEvent {
        id: Uuid::new_v4(),
        user_id: user.id,
        event_name: input.event_name.trim().to_string(),
        event_date,
        food_quantity_kg: input.food_quantity_kg,
        latitude: input.latitude,
        longitude: input.longitude,
        created_at: Utc::now(),
    };

    let store = app.store.clone();
    let saved = event.clone();
    blocking(move || store.insert_event(&saved)).await?;

    tracing::info!(user = %user.email, event = %event.event_name, "donation event created");
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "event": event }))))
}

/// GET /api/events: the caller's events, newest first.
pub async fn list_events(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let events = blocking(move || store.events_for(user.id)).await?;
    Ok(Json(serde_json::json!({ "events": events })))
}
