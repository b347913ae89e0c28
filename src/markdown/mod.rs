//! Markdown front end
//!
//! Parses Markdown with comrak and converts the AST into the generic
//! document tree consumed by the restructuring passes.

mod parser;

pub use parser::{parse_markdown, MarkdownOptions, ParsedMarkdown};
