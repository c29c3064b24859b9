use super::{blank_as_none, FormFields};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageInput {
    pub name: String,
}

impl FormFields for LanguageInput {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }
}
