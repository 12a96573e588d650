use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub price: f64,
    pub deluxe_price: f64,
    pub image: String,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::quantities::Entity")]
    Quantity,
}

impl Related<super::quantities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quantity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
