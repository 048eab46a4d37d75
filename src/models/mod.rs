pub mod purchase;
pub mod sweet;

pub use purchase::Purchase;
pub use sweet::{NewSweet, Sweet, SweetFilter, SweetPatch};
