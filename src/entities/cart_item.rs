use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "cart_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub cart_id: i32,
    pub product_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: Option<String>,
    pub quantity: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::cart::Entity",
        from = "Column::CartId",
        to = "crate::entities::cart::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Cart,
}

impl Related<crate::entities::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A cart line as captured into an inquiry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: i32,
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&Model> for ProductSnapshot {
    fn from(item: &Model) -> Self {
        ProductSnapshot {
            product_id: item.product_id,
            name: item.name.clone(),
            quantity: item.quantity,
            image: item.image.clone(),
        }
    }
}
