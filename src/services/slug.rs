use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug separator pattern"));
static CANONICAL_SLUG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid canonical slug pattern")
});

/// German letters spelled out as ASCII digraphs. Every other non-ASCII
/// character is treated as a separator.
const DIGRAPHS: [(char, &str); 4] = [('ä', "ae"), ('ö', "oe"), ('ü', "ue"), ('ß', "ss")];

/// Derive a URL slug from a title.
///
/// Lowercases, spells out the German umlauts and `ß`, collapses every run of
/// characters outside `[a-z0-9]` into one hyphen and trims a hyphen from
/// either end. Returns an empty string when nothing alphanumeric is left.
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();

    let mut spelled = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        match DIGRAPHS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => spelled.push_str(to),
            None => spelled.push(c),
        }
    }

    let replaced = NON_ALNUM_RUN.replace_all(&spelled, "-");
    let hyphenated: &str = &replaced;
    let trimmed = hyphenated.strip_prefix('-').unwrap_or(hyphenated);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Whether `slug` already has the shape `derive_slug` produces.
///
/// Only used for hints; manually entered slugs are submitted as typed.
pub fn is_canonical_slug(slug: &str) -> bool {
    CANONICAL_SLUG.is_match(slug)
}

/// Whether the slug input still follows the title input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugSync {
    Linked,
    Broken,
}

impl SlugSync {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::Broken => "broken",
        }
    }

    /// Read the hidden form value. Anything unrecognised stays broken so a
    /// mangled form can never re-link a manual slug.
    pub fn from_form(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::Broken)
    }
}

impl FromStr for SlugSync {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linked" => Ok(Self::Linked),
            "broken" => Ok(Self::Broken),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SlugSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user edit on the title/slug pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Title(String),
    Slug(String),
}

/// Title, slug and sync state of one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugField {
    title: String,
    slug: String,
    sync: SlugSync,
}

impl SlugField {
    pub fn for_new() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            sync: SlugSync::Linked,
        }
    }

    /// An existing entity's stored slug counts as a manual override.
    pub fn for_existing(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            sync: SlugSync::Broken,
        }
    }

    pub fn restore(title: impl Into<String>, slug: impl Into<String>, sync: SlugSync) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            sync,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn sync(&self) -> SlugSync {
        self.sync
    }

    pub fn is_linked(&self) -> bool {
        self.sync == SlugSync::Linked
    }

    pub fn edit_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if self.is_linked() {
            self.slug = derive_slug(&self.title);
        }
    }

    /// Any direct slug edit breaks the link for the rest of the session.
    pub fn edit_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
        self.sync = SlugSync::Broken;
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Title(title) => self.edit_title(title),
            FieldEdit::Slug(slug) => self.edit_slug(slug),
        }
    }

    /// The slug to submit. A linked field that never saw a derived value
    /// (no scripting in the browser) is derived here once.
    pub fn finalize(self) -> (String, String) {
        let slug = if self.is_linked() && self.slug.is_empty() {
            derive_slug(&self.title)
        } else {
            self.slug
        };
        (self.title, slug)
    }
}

impl Default for SlugField {
    fn default() -> Self {
        Self::for_new()
    }
}
