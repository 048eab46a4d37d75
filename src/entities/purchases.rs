use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    /// Cleared when the sweet is deleted; the record itself is kept.
    pub sweet_id: Option<i32>,

    pub sweet_name: String,

    pub unit_price: f64,

    pub quantity: i64,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::sweets::Entity",
        from = "Column::SweetId",
        to = "super::sweets::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Sweet,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::sweets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sweet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
