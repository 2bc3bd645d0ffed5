use chrono::{DateTime, Utc};
use entity::todo::LinkedKind;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Distinguishes an absent field (leave unchanged) from an explicit null
/// (clear the value): missing stays `None`, `null` becomes `Some(None)`.
fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub linked_kind: LinkedKind,
    pub linked_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TodoView {
    #[serde(flatten)]
    pub todo: entity::todo::Model,
    pub linked_name: String,
    pub linked_company_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Deserialize, Debug, Default)]
pub struct TodoListQuery {
    #[serde(default)]
    pub filter: TodoFilter,
}
