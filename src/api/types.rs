use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db::User;
use crate::models::{Purchase, Sweet};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "is_admin")]
    pub is_admin: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /sweets`, either from JSON or from multipart text fields.
/// Numbers stay untyped until validation so that `"5.50"` and `5.5` parse alike.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Value>,
    pub quantity: Option<Value>,
    pub image_url: Option<String>,
}

/// Body of `PUT /sweets/{id}`. The outer `Option` is "was the key sent",
/// so an explicit `null` can be told apart from an absent field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSweetRequest {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub quantity: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Body of purchase and restock requests. Restock reads `amount` first and
/// falls back to `quantity`.
#[derive(Debug, Default, Deserialize)]
pub struct AdjustStockRequest {
    pub quantity: Option<Value>,
    pub amount: Option<Value>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub message: String,
    pub sweet: Sweet,
    pub purchase: Purchase,
}

#[derive(Debug, Serialize)]
pub struct RestockResponse {
    pub message: String,
    pub sweet: Sweet,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub uptime_seconds: u64,
    pub version: &'static str,
}
