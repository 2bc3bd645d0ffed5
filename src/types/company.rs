use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateCompany {
    pub name: String,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub organization_number: String,
    #[serde(default)]
    pub address: String,
}

/// Absent fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub technologies: Option<String>,
    pub organization_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CompanyView {
    #[serde(flatten)]
    pub company: entity::company::Model,
    pub contact_count: u64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: entity::company::Model,
    pub contacts: Vec<entity::contact::Model>,
}
