//! Headline parser: token sequence to [`Declaration`].

use log::trace;
use regex::Regex;
use std::sync::OnceLock;

use super::declaration::Declaration;
use super::tokenizer::tokenize;

fn entity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Q\d+$").expect("entity pattern is valid"))
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+-[-A-Za-z0-9_]*[A-Za-z0-9_]+$").expect("tag pattern is valid")
    })
}

fn camel_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([a-z])([A-Z])").expect("camel pattern is valid"))
}

/// True for entity identifiers such as `Q42`.
pub fn is_entity_id(token: &str) -> bool {
    entity_pattern().is_match(token)
}

/// `fontSize` → `font-size`.
pub fn camel_to_kebab(input: &str) -> String {
    camel_pattern()
        .replace_all(input, "$1-$2")
        .to_lowercase()
}

/// Remove one pair of surrounding double quotes.
pub(crate) fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse a declaration line.
///
/// Each token is classified by the first matching rule, in order:
/// `key=value` (style when the key starts with `:`), `.class`, `"arg"`,
/// `#id`, entity id, hyphenated tag name, `script`/`link`, and finally a
/// bare word. Unparseable input yields an empty declaration.
pub fn parse_headline(line: &str) -> Declaration {
    let mut decl = Declaration::default();

    for token in tokenize(line) {
        classify(&mut decl, &token);
    }

    trace!("Parsed headline {:?} -> {:?}", line, decl);
    decl
}

fn classify(decl: &mut Declaration, token: &str) {
    if let Some((key, value)) = token.split_once('=').filter(|(key, _)| !key.is_empty()) {
        let value = strip_quotes(value);
        match key.strip_prefix(':') {
            Some(property) => decl.style.set(camel_to_kebab(property), value),
            None => decl.kwargs.append(key, value),
        }
    } else if let Some(class) = token.strip_prefix('.') {
        let class = strip_quotes(class);
        if !class.is_empty() {
            decl.push_class(class);
        }
    } else if token.starts_with('"') {
        decl.args.push(strip_quotes(token).to_string());
    } else if let Some(id) = token.strip_prefix('#') {
        decl.id = Some(id.to_string());
    } else if is_entity_id(token) {
        decl.entities.push(token.to_string());
    } else if decl.tag.is_none() && tag_pattern().is_match(token) {
        decl.tag = Some(token.to_string());
    } else if token == "script" || token == "link" {
        decl.tag = Some(token.to_string());
    } else {
        match decl.tag.as_deref() {
            Some("script") if decl.src.is_none() => decl.src = Some(token.to_string()),
            Some("link") if decl.href.is_none() => decl.href = Some(token.to_string()),
            _ => decl.args.push(token.to_string()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
