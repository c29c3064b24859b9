use super::{blank_as_none, FormFields};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

impl FormFields for UserInput {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("name", self.name.clone()), ("email", self.email.clone())]
    }
}

impl From<&User> for UserInput {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
