use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::db::Store;
use crate::services::token::generate_secret;
use crate::services::{
    AuthService, CatalogService, ImageService, InventoryService, ObjectStorage, SeaOrmAuthService,
    SeaOrmCatalogService, SeaOrmInventoryService, TokenIssuer, build_storage,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub inventory_service: Arc<dyn InventoryService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let storage = build_storage(&config.storage)?;
        Self::with_storage(config, storage).await
    }

    /// Builds the state around a given object storage backend instead of the
    /// configured one.
    pub async fn with_storage(
        config: Config,
        storage: Arc<dyn ObjectStorage>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let secret = if config.security.jwt_secret.is_empty() {
            warn!("No jwt_secret configured; generated a random one. Tokens will not survive a restart");
            generate_secret()
        } else {
            config.security.jwt_secret.clone()
        };
        let tokens = TokenIssuer::new(
            secret.as_bytes(),
            chrono::Duration::minutes(config.security.token_ttl_minutes),
        );

        let images = Arc::new(ImageService::new(
            storage,
            config.storage.max_upload_bytes,
        ));

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            tokens,
            config.security.clone(),
        )) as Arc<dyn AuthService + Send + Sync + 'static>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(
            store.clone(),
            images,
            config.storage.placeholder_image_url.clone(),
        )) as Arc<dyn CatalogService + Send + Sync + 'static>;

        let inventory_service = Arc::new(SeaOrmInventoryService::new(store.clone()))
            as Arc<dyn InventoryService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            auth_service,
            catalog_service,
            inventory_service,
        })
    }
}
