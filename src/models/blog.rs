use super::{blank_as_none, join_ids, null_as_empty, Category, FormFields, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: Vec<User>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Blog {
    pub fn category_names(&self) -> String {
        self.categories
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlogInput {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub pinned: bool,
    pub author_ids: Vec<String>,
    pub category_ids: Vec<String>,
}

impl FormFields for BlogInput {
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("slug", self.slug.clone()),
            ("excerpt", self.excerpt.clone()),
            ("content", self.content.clone()),
            ("pinned", self.pinned.to_string()),
            ("author_ids", join_ids(&self.author_ids)),
            ("category_ids", join_ids(&self.category_ids)),
        ]
    }
}
