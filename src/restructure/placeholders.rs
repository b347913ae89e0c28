//! Normalization of paragraphs that stand in for other structures.

use log::debug;
use regex::Regex;
use std::sync::OnceLock;

use crate::dom::path::{collect_paths, element_at, element_at_mut, replace_at};
use crate::dom::{Element, Node};

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[#*]{1,6}$").expect("marker pattern is valid"))
}

fn component_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\.[A-Za-z0-9_]+-[A-Za-z0-9_]+\S").expect("component pattern is valid")
    })
}

fn list_continuation() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n\s*-\s+").expect("continuation pattern is valid"))
}

/// Trimmed text of the first child when it is a text node.
fn leading_text(el: &Element) -> Option<&str> {
    match el.children.first() {
        Some(Node::Text(text)) => Some(text.trim()),
        _ => None,
    }
}

/// Turn marker-only paragraphs (`##`, `***`) into headings of that level.
///
/// A code node inside the placeholder moves into a new paragraph placed
/// right after the heading, so its declaration still applies to the section.
pub fn normalize_placeholder_headings(root: &mut Element) -> usize {
    let paths = collect_paths(root, &|el: &Element| {
        el.tag == "p" && leading_text(el).is_some_and(|text| marker_pattern().is_match(text))
    });

    for path in paths.iter().rev() {
        let Some(para) = element_at(root, path) else {
            continue;
        };
        let level = leading_text(para).map(str::len).unwrap_or(1);
        let code = para.find_descendant(&|el: &Element| el.tag == "code").cloned();

        replace_at(root, path, Node::Element(Element::new(format!("h{}", level))));
        if let Some(code) = code {
            let (index, parent_path) = match path.split_last() {
                Some((index, parent_path)) => (*index, parent_path),
                None => continue,
            };
            if let Some(parent) = element_at_mut(root, parent_path) {
                parent
                    .children
                    .insert(index + 1, Node::Element(Element::new("p").with_child(code)));
            }
        }
    }

    if !paths.is_empty() {
        debug!("Normalized {} placeholder headings", paths.len());
    }
    paths.len()
}

/// Rewrite `.prefix-component ...` paragraphs into declaration code nodes.
pub fn convert_component_paragraphs(root: &mut Element) -> usize {
    let paths = collect_paths(root, &|el: &Element| {
        el.tag == "p" && leading_text(el).is_some_and(|text| component_pattern().is_match(text))
    });

    for path in &paths {
        let Some(para) = element_at_mut(root, path) else {
            continue;
        };
        let html = para.inner_html();
        let source = html.trim();
        let body = source.get(1..).unwrap_or_default();
        let text = list_continuation().replace_all(body, "\n").into_owned();
        para.children = vec![Node::Element(Element::new("code").with_text(text))];
    }

    paths.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_becomes_heading() {
        let mut main = Element::new("main")
            .with_child(Element::new("p").with_text("###"))
            .with_child(Element::new("p").with_text("after"));
        assert_eq!(normalize_placeholder_headings(&mut main), 1);

        let tags: Vec<_> = main.element_children().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["h3", "p"]);
    }

    #[test]
    fn test_placeholder_code_moves_to_following_paragraph() {
        let mut main = Element::new("main").with_child(
            Element::new("p")
                .with_text("** ")
                .with_child(Element::new("code").with_text(".cards")),
        );
        normalize_placeholder_headings(&mut main);

        let children: Vec<_> = main.element_children().collect();
        assert_eq!(children[0].tag, "h2");
        assert!(children[0].is_blank());
        assert_eq!(children[1].outer_html(), "<p><code>.cards</code></p>");
    }

    #[test]
    fn test_non_marker_paragraph_untouched() {
        let mut main = Element::new("main")
            .with_child(Element::new("p").with_text("####### seven"))
            .with_child(Element::new("p").with_text("#hashtag"));
        assert_eq!(normalize_placeholder_headings(&mut main), 0);
    }

    #[test]
    fn test_component_paragraph() {
        let mut main = Element::new("main").with_child(
            Element::new("p").with_text(".ve-header \"Essay\"\n  - Home\n- About"),
        );
        assert_eq!(convert_component_paragraphs(&mut main), 1);

        let para = main.children[0].as_element().unwrap();
        let code = para.element_children().next().unwrap();
        assert_eq!(code.tag, "code");
        assert_eq!(code.text_content(), "ve-header \"Essay\"\nHome\nAbout");
    }

    #[test]
    fn test_plain_class_paragraph_is_not_component() {
        let mut main = Element::new("main").with_child(Element::new("p").with_text(".lead text"));
        assert_eq!(convert_component_paragraphs(&mut main), 0);
    }
}
