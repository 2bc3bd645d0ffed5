use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateCandidate {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub resume_filename: String,
    #[serde(default)]
    pub resume_original_name: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct UpdateCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub skills: Option<String>,
    pub resume_filename: Option<String>,
    pub resume_original_name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CandidateDetail {
    #[serde(flatten)]
    pub candidate: entity::candidate::Model,
    pub comments: Vec<entity::candidate_comment::Model>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateComment {
    pub content: String,
}
