use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub key: String,

    pub name: String,

    pub category: String,

    /// Comma-joined tag list.
    pub tags: Option<String>,

    /// Escaped HTML with branding substitutions applied.
    pub description: String,

    pub difficulty: i32,

    pub solved: bool,

    pub hint_url: Option<String>,

    pub mitigation_url: Option<String>,

    pub disabled_env: Option<String>,

    pub tutorial_order: Option<i32>,

    pub has_coding_challenge: bool,

    pub coding_challenge_status: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hints::Entity")]
    Hints,
}

impl Related<super::hints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
