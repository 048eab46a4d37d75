use crate::config::SecurityConfig;
use crate::models::{NewSweet, Purchase, Sweet, SweetFilter, SweetPatch};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::inventory::{RestockChange, StockChange};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn sweet_repo(&self) -> repositories::sweet::SweetRepository {
        repositories::sweet::SweetRepository::new(self.conn.clone())
    }

    fn inventory_repo(&self) -> repositories::inventory::InventoryRepository {
        repositories::inventory::InventoryRepository::new(self.conn.clone())
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        is_admin: bool,
        config: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo()
            .create(email, password, is_admin, config)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn create_sweet(&self, sweet: NewSweet, placeholder_image: &str) -> Result<Sweet> {
        self.sweet_repo().create(sweet, placeholder_image).await
    }

    pub async fn get_sweet(&self, id: i32) -> Result<Option<Sweet>> {
        self.sweet_repo().get(id).await
    }

    pub async fn list_sweets(&self) -> Result<Vec<Sweet>> {
        self.sweet_repo().list_all().await
    }

    pub async fn search_sweets(&self, filter: &SweetFilter) -> Result<Vec<Sweet>> {
        self.sweet_repo().search(filter).await
    }

    pub async fn update_sweet(&self, id: i32, patch: SweetPatch) -> Result<Option<Sweet>> {
        self.sweet_repo().update(id, patch).await
    }

    pub async fn delete_sweet(&self, id: i32) -> Result<bool> {
        self.sweet_repo().delete(id).await
    }

    pub async fn purchase_sweet(
        &self,
        sweet_id: i32,
        user_id: i32,
        quantity: i64,
    ) -> Result<StockChange> {
        self.inventory_repo()
            .purchase(sweet_id, user_id, quantity)
            .await
    }

    pub async fn restock_sweet(&self, sweet_id: i32, amount: i64) -> Result<RestockChange> {
        self.inventory_repo().restock(sweet_id, amount).await
    }

    pub async fn list_purchases(&self, user_id: Option<i32>) -> Result<Vec<Purchase>> {
        self.inventory_repo().list_purchases(user_id).await
    }
}
