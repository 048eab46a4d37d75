pub mod inventory;
pub mod sweet;
pub mod user;
