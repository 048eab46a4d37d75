pub mod prelude;

pub mod purchases;
pub mod sweets;
pub mod users;
