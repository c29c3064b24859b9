use ammonia::Builder;
use pulldown_cmark::{html, Options, Parser};
use std::collections::HashSet;
use std::str::FromStr;

/// Toolbar buttons of the blog content editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownAction {
    Heading,
    Bold,
    Italic,
    List,
    Code,
    Quote,
    Link,
}

impl MarkdownAction {
    pub const ALL: [MarkdownAction; 7] = [
        Self::Heading,
        Self::Bold,
        Self::Italic,
        Self::List,
        Self::Code,
        Self::Quote,
        Self::Link,
    ];

    pub fn syntax(&self) -> &'static str {
        match self {
            Self::Heading => "# ",
            Self::Bold => "**",
            Self::Italic => "*",
            Self::List => "\n- ",
            Self::Code => "`",
            Self::Quote => "\n> ",
            Self::Link => "[Link](url)",
        }
    }

    /// Wrapping actions surround a selection instead of replacing it.
    pub fn wraps(&self) -> bool {
        matches!(self, Self::Bold | Self::Italic | Self::Code)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::List => "list",
            Self::Code => "code",
            Self::Quote => "quote",
            Self::Link => "link",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Heading => "Heading",
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::List => "List",
            Self::Code => "Code",
            Self::Quote => "Quote",
            Self::Link => "Link",
        }
    }
}

impl FromStr for MarkdownAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s.trim().to_lowercase())
            .ok_or(())
    }
}

/// Textarea selection in UTF-16 code units, as browsers report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownEdit {
    pub text: String,
    /// New caret position in UTF-16 code units.
    pub cursor: usize,
}

/// Apply a toolbar action to `text` at `selection`.
pub fn insert_markdown(text: &str, selection: Selection, action: MarkdownAction) -> MarkdownEdit {
    let (lo, hi) = if selection.start <= selection.end {
        (selection.start, selection.end)
    } else {
        (selection.end, selection.start)
    };

    let start = utf16_to_byte(text, lo);
    let end = utf16_to_byte(text, hi);
    let start_units = utf16_len(&text[..start]);
    let end_units = utf16_len(&text[..end]);

    let before = &text[..start];
    let selected = &text[start..end];
    let after = &text[end..];
    let syntax = action.syntax();
    let syntax_units = utf16_len(syntax);

    if action.wraps() && !selected.is_empty() {
        MarkdownEdit {
            text: format!("{before}{syntax}{selected}{syntax}{after}"),
            cursor: end_units + syntax_units * 2,
        }
    } else {
        MarkdownEdit {
            text: format!("{before}{syntax}{after}"),
            cursor: start_units + syntax_units,
        }
    }
}

fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Byte index of the character boundary at or before `units` UTF-16 code units.
fn utf16_to_byte(text: &str, units: usize) -> usize {
    let mut seen = 0;
    for (idx, c) in text.char_indices() {
        let next = seen + c.len_utf16();
        if next > units {
            return idx;
        }
        seen = next;
    }
    text.len()
}

/// Renders blog markdown for the editor's preview pane.
///
/// Output is sanitized against an allow-list; raw HTML in the markdown
/// survives only where the allow-list permits it.
pub struct PreviewRenderer {
    sanitizer: Builder<'static>,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewRenderer {
    pub fn new() -> Self {
        let mut tags = Builder::default().clone_tags();
        tags.insert("input");
        tags.insert("del");

        let mut attrs = Builder::default().clone_tag_attributes();
        attrs.insert(
            "input",
            ["type", "checked", "disabled"].iter().cloned().collect(),
        );

        let mut sanitizer = Builder::default();
        sanitizer
            .tags(tags)
            .tag_attributes(attrs)
            .url_schemes(HashSet::from(["http", "https", "mailto"]));

        Self { sanitizer }
    }

    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);
        let mut raw = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut raw, parser);

        self.sanitizer.clean(&raw).to_string()
    }
}
