use sea_orm::entity::prelude::*;

/// One executed search. Rows are append-only; `search_time` is assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "search_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub search_term: String,
    pub search_type: String,
    pub search_time: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
