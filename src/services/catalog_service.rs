//! Domain service for the sweet catalog.
//!
//! Handles creating, reading, searching, updating and deleting sweets. Stock
//! changes caused by purchases and restocks live in the inventory service.

use thiserror::Error;

use crate::models::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::services::image::{ImageError, ImageUpload};

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Sweet not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for the catalog.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a sweet. When an image is supplied it is uploaded first and
    /// nothing is written if the upload fails.
    async fn create_sweet(
        &self,
        sweet: NewSweet,
        image: Option<ImageUpload>,
    ) -> Result<Sweet, CatalogError>;

    /// Gets a single sweet.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id.
    async fn get_sweet(&self, id: i32) -> Result<Sweet, CatalogError>;

    /// Lists every sweet ordered by id.
    async fn list_sweets(&self) -> Result<Vec<Sweet>, CatalogError>;

    /// Searches sweets. An empty filter behaves like [`CatalogService::list_sweets`].
    async fn search_sweets(&self, filter: SweetFilter) -> Result<Vec<Sweet>, CatalogError>;

    /// Applies a partial update.
    async fn update_sweet(&self, id: i32, patch: SweetPatch) -> Result<Sweet, CatalogError>;

    /// Removes a sweet permanently. Purchase records keep their captured data.
    async fn delete_sweet(&self, id: i32) -> Result<(), CatalogError>;
}

/// Checks the invariants of a sweet that is about to be written.
pub fn validate_new_sweet(sweet: &NewSweet) -> Result<(), CatalogError> {
    validate_text("name", &sweet.name)?;
    validate_text("category", &sweet.category)?;
    validate_price(sweet.price)?;
    validate_quantity(sweet.quantity)?;
    Ok(())
}

pub fn validate_patch(patch: &SweetPatch) -> Result<(), CatalogError> {
    if let Some(name) = &patch.name {
        validate_text("name", name)?;
    }
    if let Some(category) = &patch.category {
        validate_text("category", category)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    if let Some(quantity) = patch.quantity {
        validate_quantity(quantity)?;
    }
    if let Some(image_url) = &patch.image_url {
        validate_text("imageUrl", image_url)?;
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), CatalogError> {
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::Validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<(), CatalogError> {
    if quantity < 0 {
        return Err(CatalogError::Validation(format!(
            "quantity must be a non-negative integer, got {quantity}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweet() -> NewSweet {
        NewSweet {
            name: "Gulab Jamun".to_string(),
            category: "Indian".to_string(),
            price: 2.5,
            quantity: 0,
            image_url: None,
        }
    }

    #[test]
    fn test_validate_new_sweet() {
        assert!(validate_new_sweet(&sweet()).is_ok());

        let blank_name = NewSweet {
            name: "  ".to_string(),
            ..sweet()
        };
        assert!(validate_new_sweet(&blank_name).is_err());

        let negative_price = NewSweet {
            price: -0.01,
            ..sweet()
        };
        assert!(validate_new_sweet(&negative_price).is_err());

        let nan_price = NewSweet {
            price: f64::NAN,
            ..sweet()
        };
        assert!(validate_new_sweet(&nan_price).is_err());

        let negative_quantity = NewSweet {
            quantity: -1,
            ..sweet()
        };
        assert!(validate_new_sweet(&negative_quantity).is_err());
    }

    #[test]
    fn test_validate_patch() {
        assert!(validate_patch(&SweetPatch::default()).is_ok());
        assert!(
            validate_patch(&SweetPatch {
                price: Some(3.0),
                quantity: Some(12),
                ..SweetPatch::default()
            })
            .is_ok()
        );
        assert!(
            validate_patch(&SweetPatch {
                category: Some(String::new()),
                ..SweetPatch::default()
            })
            .is_err()
        );
        assert!(
            validate_patch(&SweetPatch {
                quantity: Some(-5),
                ..SweetPatch::default()
            })
            .is_err()
        );
    }
}
