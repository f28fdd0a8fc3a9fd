use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(indexed)]
    pub category: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    /// JSON array of additional image paths.
    pub images: Json,
    #[sea_orm(default_value = false)]
    pub is_featured: bool,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[sea_orm(default_value = 0)]
    pub sort_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_value(self.images.clone()).unwrap_or_default()
    }
}
