use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::blocking;
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ecostore: products in stock, cheapest first.
pub async fn list_products(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.store.clone();
    let products = blocking(move || store.list_products_in_stock()).await?;
    Ok(Json(serde_json::json!({ "products": products })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBody {
    pub product_id: Option<String>,
}

/// POST /api/ecostore: spend eco points on one unit of a product.
///
/// The price is always the product's own `points_cost`.
pub async fn purchase_product(
    State(app): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<PurchaseBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let raw = body
        .product_id
        .ok_or_else(|| AppError::bad_request("productId is required"))?;
    let product_id = Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::bad_request(format!("invalid productId '{raw}'")))?;

    let store = app.store.clone();
    let user_id = user.id;
    let purchase = blocking(move || store.purchase(user_id, product_id)).await?;

    tracing::info!(
        user = %user.email,
        product = %product_id,
        points = purchase.points_spent,
        "product purchased"
    );
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Product purchased successfully",
        "purchase": purchase,
    })))
}
