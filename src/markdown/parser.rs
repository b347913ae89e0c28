//! Markdown parser implementation using comrak
//!
//! comrak parses the source and renders it to HTML, with raw HTML passed
//! through untouched. The rendered HTML is then parsed into the generic
//! document tree, so hand-written tags take part in restructuring exactly
//! like rendered ones. The result is a `main` element holding the flat
//! top-level block sequence that the restructuring engine consumes.

use comrak::{
    format_html,
    nodes::{AstNode, NodeValue},
    parse_document, Arena, Options,
};
use serde::{Deserialize, Serialize};

use crate::dom::{parse_html_fragment, Element};
use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Enable superscript (^text^)
    pub superscript: bool,
    /// Enable footnotes
    pub footnotes: bool,
    /// Enable description lists
    pub description_lists: bool,
    /// Front matter delimiter (YAML)
    pub front_matter_delimiter: Option<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            superscript: false,
            footnotes: true,
            description_lists: false,
            front_matter_delimiter: Some("---".to_string()),
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.superscript = self.superscript;
        options.extension.footnotes = self.footnotes;
        options.extension.description_lists = self.description_lists;
        options.extension.front_matter_delimiter = self.front_matter_delimiter.clone();

        // Author HTML is restructured, never filtered
        options.render.unsafe_ = true;

        options
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct ParsedMarkdown {
    /// `main` element holding the top-level blocks
    pub main: Element,
    /// Front matter body (delimiters stripped) if present
    pub front_matter: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown text into a document tree.
///
/// # Example
/// ```ignore
/// let parsed = parse_markdown("# Hello\n\nWorld", &MarkdownOptions::default())?;
/// assert_eq!(parsed.main.children.len(), 2);
/// ```
pub fn parse_markdown(markdown: &str, options: &MarkdownOptions) -> Result<ParsedMarkdown> {
    let arena = Arena::new();
    let comrak_options = options.to_comrak_options();

    let root = parse_document(&arena, markdown, &comrak_options);
    let front_matter = front_matter(root)
        .map(|raw| strip_front_matter(&raw, options.front_matter_delimiter.as_deref()));

    let mut html = Vec::new();
    format_html(root, &comrak_options, &mut html)?;

    let mut main = Element::new("main");
    main.children = parse_html_fragment(&String::from_utf8_lossy(&html));

    Ok(ParsedMarkdown { main, front_matter })
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Raw front matter block, delimiters included.
fn front_matter<'a>(root: &'a AstNode<'a>) -> Option<String> {
    root.children().find_map(|node| match &node.data.borrow().value {
        NodeValue::FrontMatter(raw) => Some(raw.clone()),
        _ => None,
    })
}

/// Strip the delimiter lines surrounding a front matter block.
fn strip_front_matter(raw: &str, delimiter: Option<&str>) -> String {
    let delimiter = delimiter.unwrap_or("---");
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix(delimiter).unwrap_or(trimmed);
    let body = body.strip_suffix(delimiter).unwrap_or(body);
    body.trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
