//! Code-block interpreter: multi-line declaration bodies.

use regex::Regex;
use std::sync::OnceLock;

use super::declaration::Declaration;
use super::parser::parse_headline;

fn pipe_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+\|\s+").expect("separator pattern is valid"))
}

/// Split code text into trimmed, non-empty lines. ` | ` separates lines too.
pub fn declaration_lines(text: &str) -> Vec<String> {
    pipe_separator()
        .replace_all(text, "\n")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interpret the text of a code node.
///
/// The first line is parsed as a headline; every following line is
/// appended verbatim to `args`.
pub fn interpret_code(text: &str) -> Declaration {
    let mut lines = declaration_lines(text).into_iter();
    let Some(first) = lines.next() else {
        return Declaration::default();
    };
    let mut decl = parse_headline(&first);
    decl.args.extend(lines);
    decl
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
