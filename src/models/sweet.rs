use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sweet {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated sweet ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub image_url: Option<String>,
}

/// Fields to change on an existing sweet. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweetPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
}

impl SweetPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.image_url.is_none()
    }
}

/// Search criteria. Every filter is optional and they combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweetFilter {
    /// Matches name OR category.
    pub text: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SweetFilter {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}
