//! Domain service for stock adjustments.
//!
//! Purchases and restocks are the only operations that change a sweet's
//! quantity under contention. Both are applied as single conditional updates
//! by the store, so callers never observe an intermediate stock level.

use thiserror::Error;

use crate::models::{Purchase, Sweet};
use crate::services::token::Identity;

/// Errors specific to inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Sweet not found: {0}")]
    NotFound(i32),

    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("Insufficient stock: {available} available")]
    InsufficientStock { available: i64 },

    #[error("Cannot add {amount} units to a stock of {current}: limit exceeded")]
    StockLimit { current: i64, amount: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for InventoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for InventoryError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// An accepted purchase: the sweet after the decrement and the appended record.
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub sweet: Sweet,
    pub purchase: Purchase,
}

/// Domain service trait for inventory.
#[async_trait::async_trait]
pub trait InventoryService: Send + Sync {
    /// Takes `quantity` units out of stock on behalf of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::InsufficientStock`] without changing anything
    /// when fewer than `quantity` units are available.
    async fn purchase(
        &self,
        sweet_id: i32,
        user_id: i32,
        quantity: i64,
    ) -> Result<PurchaseReceipt, InventoryError>;

    /// Adds `amount` units to stock.
    async fn restock(&self, sweet_id: i32, amount: i64) -> Result<Sweet, InventoryError>;

    /// Purchase history visible to `viewer`: admins see everything, other
    /// users only their own purchases.
    async fn list_purchases(&self, viewer: Identity) -> Result<Vec<Purchase>, InventoryError>;
}
