use crate::entities::{prelude::*, purchases, sweets};
use crate::models::{NewSweet, Sweet, SweetFilter, SweetPatch};
use anyhow::{Context, Result};
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl From<sweets::Model> for Sweet {
    fn from(model: sweets::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            price: model.price,
            quantity: model.quantity,
            image_url: model.image_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct SweetRepository {
    conn: DatabaseConnection,
}

impl SweetRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, sweet: NewSweet, placeholder_image: &str) -> Result<Sweet> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = sweets::ActiveModel {
            name: Set(sweet.name),
            category: Set(sweet.category),
            price: Set(sweet.price),
            quantity: Set(sweet.quantity),
            image_url: Set(sweet
                .image_url
                .unwrap_or_else(|| placeholder_image.to_string())),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert sweet")?;

        Ok(Sweet::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Sweet>> {
        let sweet = Sweets::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query sweet by ID")?;

        Ok(sweet.map(Sweet::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Sweet>> {
        let sweets = Sweets::find()
            .order_by_asc(sweets::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list sweets")?;

        Ok(sweets.into_iter().map(Sweet::from).collect())
    }

    pub async fn search(&self, filter: &SweetFilter) -> Result<Vec<Sweet>> {
        let mut condition = Condition::all();

        if let Some(text) = &filter.text {
            condition = condition.add(
                Condition::any()
                    .add(contains_ignore_case(sweets::Column::Name, text))
                    .add(contains_ignore_case(sweets::Column::Category, text)),
            );
        }

        if let Some(name) = &filter.name {
            condition = condition.add(contains_ignore_case(sweets::Column::Name, name));
        }

        if let Some(category) = &filter.category {
            condition = condition.add(contains_ignore_case(sweets::Column::Category, category));
        }

        if let Some(min_price) = filter.min_price {
            condition = condition.add(sweets::Column::Price.gte(min_price));
        }

        if let Some(max_price) = filter.max_price {
            condition = condition.add(sweets::Column::Price.lte(max_price));
        }

        let sweets = Sweets::find()
            .filter(condition)
            .order_by_asc(sweets::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to search sweets")?;

        Ok(sweets.into_iter().map(Sweet::from).collect())
    }

    /// Applies only the fields present in `patch`. Returns `None` for an unknown id.
    pub async fn update(&self, id: i32, patch: SweetPatch) -> Result<Option<Sweet>> {
        let Some(model) = Sweets::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query sweet for update")?
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(Sweet::from(model)));
        }

        let mut active: sweets::ActiveModel = model.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(quantity) = patch.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(image_url);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update sweet")?;

        Ok(Some(Sweet::from(model)))
    }

    /// Returns `false` when no sweet had this id. Purchase records survive with
    /// their sweet reference cleared, whether or not the connection enforces
    /// foreign keys.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let txn = self
            .conn
            .begin()
            .await
            .context("Failed to begin delete transaction")?;

        let result = Sweets::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete sweet")?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        Purchases::update_many()
            .col_expr(purchases::Column::SweetId, Expr::value(Option::<i32>::None))
            .filter(purchases::Column::SweetId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to detach purchases from sweet")?;

        txn.commit()
            .await
            .context("Failed to commit delete transaction")?;

        Ok(true)
    }
}

/// Case-insensitive substring match with LIKE wildcards in `needle` taken literally.
fn contains_ignore_case(column: sweets::Column, needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Condition::all().add(
        Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\')),
    )
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("choco"), "choco");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
