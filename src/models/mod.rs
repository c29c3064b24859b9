mod blog;
mod category;
mod language;
mod project;
mod upload;
mod user;

pub use blog::*;
pub use category::*;
pub use language::*;
pub use project::*;
pub use upload::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Text parts of a multipart create/update request, in the field names the
/// backend reads.
pub trait FormFields {
    fn form_fields(&self) -> Vec<(&'static str, String)>;
}

/// The backend stores optional text as `""`; treat that like a missing value.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Unloaded associations arrive as `null`.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `2024-03-01T10:00:00Z` -> `2024-03-01`, the value a date input expects.
pub fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or("")
}

pub(crate) fn join_ids(ids: &[String]) -> String {
    ids.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
