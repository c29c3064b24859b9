use super::FormFields;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

impl FormFields for CategoryInput {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone())]
    }
}
