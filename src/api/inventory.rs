use axum::{Json, extract::State};
use std::sync::Arc;

use super::auth::{AdminUser, AuthUser};
use super::extract::{ApiJson, ApiPath};
use super::types::{AdjustStockRequest, PurchaseResponse, RestockResponse};
use super::validation::{purchase_quantity, restock_amount};
use super::{ApiError, AppState};
use crate::models::Purchase;

/// POST /sweets/{id}/purchase
///
/// Body is optional; `quantity` defaults to one unit.
pub async fn purchase_sweet(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    ApiPath(id): ApiPath<i32>,
    payload: Option<ApiJson<AdjustStockRequest>>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let body = payload.map(|ApiJson(body)| body).unwrap_or_default();
    let quantity = purchase_quantity(body.quantity.as_ref())?;

    let receipt = state
        .inventory()
        .purchase(id, identity.user_id, quantity)
        .await?;

    Ok(Json(PurchaseResponse {
        message: "Purchase successful".to_string(),
        sweet: receipt.sweet,
        purchase: receipt.purchase,
    }))
}

/// POST /sweets/{id}/restock
///
/// Reads `amount`, falling back to `quantity`.
pub async fn restock_sweet(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i32>,
    payload: Option<ApiJson<AdjustStockRequest>>,
) -> Result<Json<RestockResponse>, ApiError> {
    let body = payload.map(|ApiJson(body)| body).unwrap_or_default();
    let amount = restock_amount(body.amount.as_ref().or(body.quantity.as_ref()))?;

    let sweet = state.inventory().restock(id, amount).await?;

    Ok(Json(RestockResponse {
        message: "Restock successful".to_string(),
        sweet,
    }))
}

/// GET /purchases
///
/// Regular users see their own purchases, admins see everyone's.
pub async fn list_purchases(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<Purchase>>, ApiError> {
    let purchases = state.inventory().list_purchases(identity).await?;
    Ok(Json(purchases))
}
