use crate::types::company::CompanyView;
use crate::types::contact::ContactView;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResults {
    pub contacts: Vec<ContactView>,
    pub companies: Vec<CompanyView>,
}
