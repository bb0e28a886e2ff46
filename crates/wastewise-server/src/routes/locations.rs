use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use wastewise_core::geo::{within_radius, Coordinates, DEFAULT_RADIUS_KM};
use wastewise_core::types::{CommunityLocation, LocationKind};
use wastewise_core::validate::LocationInput;

use super::{blocking, parse_body};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
}

fn parse_number(name: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::bad_request(format!("{name} must be a number, got '{raw}'")))
}

/// GET /api/locations: community locations, optionally by kind and distance.
///
/// The radius filter only applies when both `latitude` and `longitude` are
/// given; matches then carry a `distance_km` field.
pub async fn list_locations(
    State(app): State<AppState>,
    Query(q): Query<LocationQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let kind = match q.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => Some(k.parse::<LocationKind>()?),
        None => None,
    };
    let origin = match (q.latitude.as_deref(), q.longitude.as_deref()) {
        (Some(lat), Some(lng)) => Some(Coordinates::new(
            parse_number("latitude", lat)?,
            parse_number("longitude", lng)?,
        )),
        _ => None,
    };
    let radius = match q.radius.as_deref() {
        Some(r) => parse_number("radius", r)?,
        None => DEFAULT_RADIUS_KM,
    };

    let store = app.store.clone();
    let locations = blocking(move || store.list_locations(kind)).await?;

    let body = match origin {
        Some(origin) => serde_json::json!({ "locations": within_radius(locations, origin, radius) }),
        None => serde_json::json!({ "locations": locations }),
    };
    Ok(Json(body))
}

/// POST /api/locations: register a digester, compost hub, or pickup point.
pub async fn create_location(
    State(app): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let input: LocationInput = parse_body(body)?;
    input.validate()?;
    let location = CommunityLocation {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        kind: input.kind,
        address: input.address.trim().to_string(),
        contact: input.contact.filter(|c| !c.trim().is_empty()),
        latitude: input.latitude,
        longitude: input.longitude,
    };

    let store = app.store.clone();
    let saved = location.clone();
    blocking(move || store.insert_location(&saved)).await?;

    tracing::info!(name = %location.name, kind = %location.kind, "location added");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "location": location })),
    ))
}
