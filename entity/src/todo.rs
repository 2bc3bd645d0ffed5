use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a todo points at. Link resolution happens in the caller's scope, so
/// a todo can never reference a contact or company of another tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum LinkedKind {
    #[sea_orm(string_value = "contact")]
    Contact,
    #[sea_orm(string_value = "company")]
    Company,
}

#[derive(Debug, Clone, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTimeUtc>,
    pub completed: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub linked_kind: LinkedKind,
    pub linked_id: Uuid,
    pub workspace_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
