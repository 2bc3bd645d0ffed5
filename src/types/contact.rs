use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateContact {
    pub company_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct UpdateContact {
    pub company_id: Option<Uuid>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: entity::contact::Model,
    pub company_name: String,
    pub last_note_date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: entity::contact::Model,
    pub company_name: String,
    pub notes: Vec<entity::note::Model>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContactSort {
    #[default]
    Name,
    Company,
    LastNote,
}

#[derive(Deserialize, Debug, Default)]
pub struct ContactListQuery {
    #[serde(default)]
    pub sort: ContactSort,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateNote {
    pub content: String,
}
