use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i32,
    pub user_id: i32,
    pub sweet_id: Option<i32>,
    pub sweet_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub created_at: String,
}
