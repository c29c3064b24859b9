use super::{blank_as_none, join_ids, null_as_empty, FormFields, Language, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub languages: Vec<Language>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: Vec<User>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub link: String,
    /// `YYYY-MM-DD`; empty keeps the backend's timestamp.
    pub created_at: String,
    pub language_ids: Vec<String>,
    pub author_ids: Vec<String>,
}

impl FormFields for ProjectInput {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("link", self.link.clone()),
            ("created_at", self.created_at.clone()),
            ("language_ids", join_ids(&self.language_ids)),
            ("author_ids", join_ids(&self.author_ids)),
        ]
    }
}
