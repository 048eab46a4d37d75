//! `SeaORM` implementation of the `CatalogService` trait.

use std::sync::Arc;

use crate::db::Store;
use crate::models::{NewSweet, Sweet, SweetFilter, SweetPatch};
use crate::services::catalog_service::{
    CatalogError, CatalogService, validate_new_sweet, validate_patch,
};
use crate::services::image::{ImageService, ImageUpload};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmCatalogService {
    store: Store,
    images: Arc<ImageService>,
    placeholder_image: String,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, images: Arc<ImageService>, placeholder_image: String) -> Self {
        Self {
            store,
            images,
            placeholder_image,
        }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn create_sweet(
        &self,
        mut sweet: NewSweet,
        image: Option<ImageUpload>,
    ) -> Result<Sweet, CatalogError> {
        validate_new_sweet(&sweet)?;

        // Upload before the insert so a failed upload leaves no row behind.
        if let Some(upload) = image {
            sweet.image_url = Some(self.images.ingest(upload).await?);
        }

        let created = self
            .store
            .create_sweet(sweet, &self.placeholder_image)
            .await?;

        info!(sweet_id = created.id, name = %created.name, "Sweet created");

        Ok(created)
    }

    async fn get_sweet(&self, id: i32) -> Result<Sweet, CatalogError> {
        self.store
            .get_sweet(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list_sweets(&self) -> Result<Vec<Sweet>, CatalogError> {
        Ok(self.store.list_sweets().await?)
    }

    async fn search_sweets(&self, filter: SweetFilter) -> Result<Vec<Sweet>, CatalogError> {
        if filter.is_empty() {
            return self.list_sweets().await;
        }

        Ok(self.store.search_sweets(&filter).await?)
    }

    async fn update_sweet(&self, id: i32, patch: SweetPatch) -> Result<Sweet, CatalogError> {
        validate_patch(&patch)?;

        let updated = self
            .store
            .update_sweet(id, patch)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        info!(sweet_id = id, "Sweet updated");

        Ok(updated)
    }

    async fn delete_sweet(&self, id: i32) -> Result<(), CatalogError> {
        if !self.store.delete_sweet(id).await? {
            return Err(CatalogError::NotFound(id));
        }

        info!(sweet_id = id, "Sweet deleted");

        Ok(())
    }
}
