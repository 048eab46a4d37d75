pub use super::purchases::Entity as Purchases;
pub use super::sweets::Entity as Sweets;
pub use super::users::Entity as Users;
