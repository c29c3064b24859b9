use crate::models::{
    Blog, BlogInput, Category, CategoryInput, FormFields, Language, LanguageInput, Project,
    ProjectInput, User, UserInput,
};
use serde::de::DeserializeOwned;
use std::fmt::Display;

/// An entity collection exposed by the backend under `/{PATH}`.
pub trait Resource: DeserializeOwned + Send + 'static {
    const PATH: &'static str;
    /// Human-readable singular, used in logs and messages.
    const LABEL: &'static str;
    /// Multipart field carrying the entity's image, if it has one.
    const FILE_FIELD: Option<&'static str>;

    type Id: Display + Send + Sync + ?Sized;
    type Input: FormFields + Send + Sync;
}

/// Collections that accept `DELETE /{PATH}/{id}`.
pub trait Deletable: Resource {}

impl Resource for User {
    const PATH: &'static str = "users";
    const LABEL: &'static str = "user";
    const FILE_FIELD: Option<&'static str> = Some("avatar");
    type Id = str;
    type Input = UserInput;
}

impl Resource for Blog {
    const PATH: &'static str = "blogs";
    const LABEL: &'static str = "blog";
    const FILE_FIELD: Option<&'static str> = Some("image_file");
    type Id = u64;
    type Input = BlogInput;
}

impl Deletable for Blog {}

impl Resource for Language {
    const PATH: &'static str = "languages";
    const LABEL: &'static str = "language";
    const FILE_FIELD: Option<&'static str> = Some("icon_file");
    type Id = str;
    type Input = LanguageInput;
}

impl Deletable for Language {}

impl Resource for Category {
    const PATH: &'static str = "categories";
    const LABEL: &'static str = "category";
    const FILE_FIELD: Option<&'static str> = None;
    type Id = str;
    type Input = CategoryInput;
}

impl Deletable for Category {}

impl Resource for Project {
    const PATH: &'static str = "projects";
    const LABEL: &'static str = "project";
    const FILE_FIELD: Option<&'static str> = Some("image_file");
    type Id = str;
    type Input = ProjectInput;
}

impl Deletable for Project {}
