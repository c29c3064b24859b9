use crate::models::{Blog, Category, Language, Project, User};
use serde::Serialize;

/// Case-insensitive text match used by the list screens' search box.
pub trait Searchable {
    /// `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Searchable for Blog {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle) || contains(&self.category_names(), needle)
    }
}

impl Searchable for Project {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.title, needle)
            || self.languages.iter().any(|l| contains(&l.name, needle))
    }
}

impl Searchable for User {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle) || contains(&self.email, needle)
    }
}

impl Searchable for Language {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
    }
}

impl Searchable for Category {
    fn matches(&self, needle: &str) -> bool {
        contains(&self.name, needle)
    }
}

/// Keep the items matching `query`, in backend order. A blank query keeps
/// everything.
pub fn search<T: Searchable>(items: Vec<T>, query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items.into_iter().filter(|i| i.matches(&needle)).collect()
}

/// Counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub users: usize,
    pub blogs: usize,
    pub languages: usize,
    pub categories: usize,
    pub projects: usize,
}

/// Blogs flagged `pinned` first, then the rest, each group in backend order.
pub fn pinned_first(mut blogs: Vec<Blog>) -> Vec<Blog> {
    blogs.sort_by_key(|b| !b.pinned);
    blogs
}
