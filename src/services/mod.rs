pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod inventory_service;
pub mod inventory_service_impl;
pub use inventory_service::{InventoryError, InventoryService, PurchaseReceipt};
pub use inventory_service_impl::SeaOrmInventoryService;

pub mod image;
pub use image::{ImageError, ImageService, ImageUpload};

pub mod storage;
pub use storage::{ObjectStorage, StorageError, build_storage};

pub mod token;
pub use token::{Identity, TokenIssuer};
