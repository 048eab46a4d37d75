use crate::entities::{prelude::*, purchases, sweets};
use crate::models::{Purchase, Sweet};
use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl From<purchases::Model> for Purchase {
    fn from(model: purchases::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            sweet_id: model.sweet_id,
            sweet_name: model.sweet_name,
            unit_price: model.unit_price,
            quantity: model.quantity,
            created_at: model.created_at,
        }
    }
}

/// Result of a guarded purchase.
#[derive(Debug, Clone, PartialEq)]
pub enum StockChange {
    Applied { sweet: Sweet, purchase: Purchase },
    NotFound,
    Insufficient { available: i64 },
}

/// Result of a guarded restock.
#[derive(Debug, Clone, PartialEq)]
pub enum RestockChange {
    Applied(Sweet),
    NotFound,
    /// The addition would not fit in the stock column.
    Overflow { current: i64 },
}

pub struct InventoryRepository {
    conn: DatabaseConnection,
}

impl InventoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Decrements stock and appends a purchase record in one transaction.
    ///
    /// The availability check lives in the `WHERE` clause of the decrement,
    /// so two concurrent purchases can never both pass it against the same
    /// units.
    pub async fn purchase(
        &self,
        sweet_id: i32,
        user_id: i32,
        quantity: i64,
    ) -> Result<StockChange> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin purchase transaction")?;
        let now = chrono::Utc::now().to_rfc3339();

        let result = Sweets::update_many()
            .col_expr(
                sweets::Column::Quantity,
                Expr::col(sweets::Column::Quantity).sub(quantity),
            )
            .col_expr(sweets::Column::UpdatedAt, Expr::value(now.clone()))
            .filter(sweets::Column::Id.eq(sweet_id))
            .filter(sweets::Column::Quantity.gte(quantity))
            .exec(&txn)
            .await
            .context("Failed to decrement stock")?;

        if result.rows_affected == 0 {
            let outcome = Self::miss(&txn, sweet_id).await?;
            txn.rollback().await?;
            return Ok(outcome);
        }

        let sweet = Self::reload(&txn, sweet_id).await?;

        let purchase = purchases::ActiveModel {
            user_id: Set(user_id),
            sweet_id: Set(Some(sweet_id)),
            sweet_name: Set(sweet.name.clone()),
            unit_price: Set(sweet.price),
            quantity: Set(quantity),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to record purchase")?;

        txn.commit()
            .await
            .context("Failed to commit purchase transaction")?;

        Ok(StockChange::Applied {
            sweet,
            purchase: Purchase::from(purchase),
        })
    }

    /// Adds stock with the same single-statement guard as [`Self::purchase`];
    /// here the guard keeps the sum within `i64`.
    pub async fn restock(&self, sweet_id: i32, amount: i64) -> Result<RestockChange> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin restock transaction")?;

        let result = Sweets::update_many()
            .col_expr(
                sweets::Column::Quantity,
                Expr::col(sweets::Column::Quantity).add(amount),
            )
            .col_expr(
                sweets::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(sweets::Column::Id.eq(sweet_id))
            .filter(sweets::Column::Quantity.lte(i64::MAX.saturating_sub(amount)))
            .exec(&txn)
            .await
            .context("Failed to increment stock")?;

        if result.rows_affected == 0 {
            let current = Sweets::find_by_id(sweet_id)
                .one(&txn)
                .await
                .context("Failed to query sweet stock")?;
            txn.rollback().await?;
            return Ok(current.map_or(RestockChange::NotFound, |sweet| {
                RestockChange::Overflow {
                    current: sweet.quantity,
                }
            }));
        }

        let sweet = Self::reload(&txn, sweet_id).await?;
        txn.commit()
            .await
            .context("Failed to commit restock transaction")?;

        Ok(RestockChange::Applied(sweet))
    }

    /// Newest first. `user_id = None` returns every user's purchases.
    pub async fn list_purchases(&self, user_id: Option<i32>) -> Result<Vec<Purchase>> {
        let mut query = Purchases::find();
        if let Some(user_id) = user_id {
            query = query.filter(purchases::Column::UserId.eq(user_id));
        }

        let purchases = query
            .order_by_desc(purchases::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list purchases")?;

        Ok(purchases.into_iter().map(Purchase::from).collect())
    }

    async fn miss(txn: &DatabaseTransaction, sweet_id: i32) -> Result<StockChange> {
        let current = Sweets::find_by_id(sweet_id)
            .one(txn)
            .await
            .context("Failed to query sweet stock")?;

        Ok(current.map_or(StockChange::NotFound, |sweet| StockChange::Insufficient {
            available: sweet.quantity,
        }))
    }

    async fn reload(txn: &DatabaseTransaction, sweet_id: i32) -> Result<Sweet> {
        Sweets::find_by_id(sweet_id)
            .one(txn)
            .await
            .context("Failed to reload sweet")?
            .map(Sweet::from)
            .ok_or_else(|| anyhow::anyhow!("Sweet {sweet_id} vanished inside its transaction"))
    }
}
