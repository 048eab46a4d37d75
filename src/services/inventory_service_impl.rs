//! `SeaORM` implementation of the `InventoryService` trait.

use crate::db::{RestockChange, StockChange, Store};
use crate::models::{Purchase, Sweet};
use crate::services::inventory_service::{InventoryError, InventoryService, PurchaseReceipt};
use crate::services::token::Identity;
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmInventoryService {
    store: Store,
}

impl SeaOrmInventoryService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl InventoryService for SeaOrmInventoryService {
    async fn purchase(
        &self,
        sweet_id: i32,
        user_id: i32,
        quantity: i64,
    ) -> Result<PurchaseReceipt, InventoryError> {
        if quantity < 1 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        match self
            .store
            .purchase_sweet(sweet_id, user_id, quantity)
            .await?
        {
            StockChange::Applied { sweet, purchase } => {
                metrics::counter!("inventory_purchases_total").increment(1);
                info!(
                    sweet_id,
                    user_id,
                    quantity,
                    remaining = sweet.quantity,
                    "Purchase accepted"
                );
                Ok(PurchaseReceipt { sweet, purchase })
            }
            StockChange::NotFound => Err(InventoryError::NotFound(sweet_id)),
            StockChange::Insufficient { available } => {
                warn!(
                    sweet_id,
                    user_id,
                    requested = quantity,
                    available,
                    "Purchase rejected: insufficient stock"
                );
                Err(InventoryError::InsufficientStock { available })
            }
        }
    }

    async fn restock(&self, sweet_id: i32, amount: i64) -> Result<Sweet, InventoryError> {
        if amount < 1 {
            return Err(InventoryError::InvalidQuantity(amount));
        }

        match self.store.restock_sweet(sweet_id, amount).await? {
            RestockChange::Applied(sweet) => {
                metrics::counter!("inventory_restocks_total").increment(1);
                info!(sweet_id, amount, quantity = sweet.quantity, "Sweet restocked");
                Ok(sweet)
            }
            RestockChange::NotFound => Err(InventoryError::NotFound(sweet_id)),
            RestockChange::Overflow { current } => {
                warn!(sweet_id, amount, current, "Restock rejected: stock limit");
                Err(InventoryError::StockLimit { current, amount })
            }
        }
    }

    async fn list_purchases(&self, viewer: Identity) -> Result<Vec<Purchase>, InventoryError> {
        let scope = (!viewer.is_admin).then_some(viewer.user_id);
        Ok(self.store.list_purchases(scope).await?)
    }
}
