//! Authoring conventions carried over from earlier document dialects.
//!
//! Each pass here is a small local rewrite that runs at a fixed point of
//! the pipeline (see [`crate::press::Processor`]).

use log::debug;
use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::dom::path::{
    collect_paths, element_at, element_at_mut, find_path, previous_element_sibling, remove_at,
};
use crate::dom::{Element, Node};
use crate::headline::{is_entity_id, parse_headline};

fn mark_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"==([^=]+)==\{([^}]+)\}").expect("mark pattern is valid"))
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{1,2}:\d{1,2}").expect("timestamp pattern is valid"))
}

fn attribute_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\{(.*)\}$").expect("attribute pattern is valid"))
}

/// Inner text of a `{...}` attribute block, if `text` is one.
fn attribute_block(text: &str) -> Option<String> {
    attribute_block_pattern()
        .captures(text.trim())
        .map(|caps| caps[1].to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlight marks
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrite `==text=={attrs}` runs inside paragraphs and list items.
///
/// An entity id becomes a link to that id; declared attributes become a
/// `mark` element carrying them. Anything else is left as written.
pub fn apply_highlight_marks(root: &mut Element) -> usize {
    let paths = collect_paths(root, &|el: &Element| {
        (el.tag == "p" || el.tag == "li") && mark_pattern().is_match(&el.text_content())
    });

    let mut rewritten = 0;
    for path in &paths {
        let Some(el) = element_at_mut(root, path) else {
            continue;
        };
        merge_text_runs(el);
        let mut children = Vec::with_capacity(el.children.len());
        for child in std::mem::take(&mut el.children) {
            match child {
                Node::Text(text) => match rewrite_marks(&text) {
                    Some(nodes) => {
                        rewritten += 1;
                        children.extend(nodes);
                    }
                    None => children.push(Node::Text(text)),
                },
                other => children.push(other),
            }
        }
        el.children = children;
    }
    rewritten
}

fn rewrite_marks(text: &str) -> Option<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut last = 0;
    let mut changed = false;

    for caps in mark_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        pending.push_str(&text[last..whole.start()]);
        last = whole.end();

        match mark_element(&caps) {
            Some(el) => {
                changed = true;
                if !pending.is_empty() {
                    nodes.push(Node::Text(std::mem::take(&mut pending)));
                }
                nodes.push(Node::Element(el));
            }
            None => pending.push_str(whole.as_str()),
        }
    }

    if !changed {
        return None;
    }
    pending.push_str(&text[last..]);
    if !pending.is_empty() {
        nodes.push(Node::Text(pending));
    }
    Some(nodes)
}

fn mark_element(caps: &Captures<'_>) -> Option<Element> {
    let label = caps[1].to_string();
    let attrs = caps[2].trim();

    if is_entity_id(attrs) {
        return Some(Element::new("a").with_attr("href", attrs).with_text(label));
    }

    let decl = parse_headline(attrs);
    if !decl.has_attributes() && decl.kwargs.is_empty() {
        return None;
    }
    let mut mark = Element::new("mark").with_text(label);
    decl.apply_to(&mut mark, "data-entities");
    Some(mark)
}

/// Join adjacent text children into one.
fn merge_text_runs(el: &mut Element) {
    let mut merged: Vec<Node> = Vec::with_capacity(el.children.len());
    for child in std::mem::take(&mut el.children) {
        match (merged.last_mut(), child) {
            (Some(Node::Text(previous)), Node::Text(text)) => previous.push_str(&text),
            (_, child) => merged.push(child),
        }
    }
    el.children = merged;
}

// ─────────────────────────────────────────────────────────────────────────────
// Legacy param elements
// ─────────────────────────────────────────────────────────────────────────────

fn is_legacy_param(el: &Element) -> bool {
    el.tag == "param" && !el.attrs.iter().any(|(name, _)| name.starts_with("ve-"))
}

/// Fold `param` elements without `ve-*` attributes into their predecessor.
///
/// The param's classes are added to the previous element sibling, its id
/// and style replace the sibling's, and the param is removed. Params are
/// handled in document order, so consecutive params all reach the same
/// element.
pub fn apply_param_attributes(root: &mut Element) -> usize {
    let mut applied = 0;
    while let Some(path) = find_path(root, &is_legacy_param) {
        let Some(Node::Element(param)) = remove_at(root, &path) else {
            break;
        };
        applied += 1;

        // The param was the node at `path`; its predecessors are unchanged
        let Some((index, _)) = previous_element_sibling(root, &path) else {
            debug!("Param at {:?} has no preceding element", path);
            continue;
        };
        let mut target_path = path[..path.len() - 1].to_vec();
        target_path.push(index);
        let Some(target) = element_at_mut(root, &target_path) else {
            continue;
        };

        target.add_classes(param.attr("class").unwrap_or_default());
        if let Some(id) = param.id() {
            target.set_id(id);
        }
        if let Some(style) = param.attr("style").filter(|style| !style.is_empty()) {
            target.set_attr("style", style);
        }
    }
    applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Timestamped paragraphs
// ─────────────────────────────────────────────────────────────────────────────

/// Split paragraphs that open with a timestamp line into data attributes.
///
/// Line 1 becomes `data-head`, line 2 the content, line 3 `data-entities`
/// and line 4 `data-related`. A declaration code node on the last line is
/// kept after the content.
pub fn apply_timestamps(root: &mut Element) -> usize {
    let paths = collect_paths(root, &|el: &Element| el.tag == "p");
    let mut applied = 0;

    for path in &paths {
        let Some(para) = element_at_mut(root, path) else {
            continue;
        };
        let text = para.text_content();
        let mut lines: Vec<&str> = text.split('\n').map(str::trim).collect();
        let code = para.find_descendant(&|el: &Element| el.tag == "code").cloned();
        if code.is_some() {
            lines.pop();
        }
        if lines.len() < 2 || !timestamp_pattern().is_match(lines[0]) {
            continue;
        }

        para.set_attr("data-head", lines[0]);
        if let Some(entities) = lines.get(2) {
            para.set_attr("data-entities", *entities);
        }
        if let Some(related) = lines.get(3) {
            para.set_attr("data-related", *related);
        }
        let mut children = vec![Node::text(lines[1])];
        children.extend(code.map(Node::Element));
        para.children = children;
        applied += 1;
    }

    applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Attribute paragraphs
// ─────────────────────────────────────────────────────────────────────────────

/// Apply `{...}` paragraphs to the nearest preceding paragraph sibling.
///
/// An attribute paragraph with no preceding paragraph is left in place.
pub fn apply_attribute_paragraphs(root: &mut Element) -> usize {
    let is_attribute_paragraph =
        |el: &Element| el.tag == "p" && attribute_block(&el.text_content()).is_some();

    let mut skipped = 0;
    let mut applied = 0;
    loop {
        let paths = collect_paths(root, &is_attribute_paragraph);
        let Some(path) = paths.into_iter().nth(skipped) else {
            break;
        };
        let Some((index, parent_path)) = path.split_last() else {
            break;
        };

        let target = element_at(root, parent_path).and_then(|parent| {
            parent.children[..*index]
                .iter()
                .rposition(|node| node.is_tag("p"))
        });
        let inner = element_at(root, &path)
            .and_then(|el| attribute_block(&el.text_content()))
            .unwrap_or_default();

        match target {
            Some(target_index) => {
                let decl = parse_headline(&inner);
                let mut target_path = parent_path.to_vec();
                target_path.push(target_index);
                if let Some(target_el) = element_at_mut(root, &target_path) {
                    decl.apply_to(target_el, "data-entities");
                }
                remove_at(root, &path);
                applied += 1;
            }
            None => {
                debug!("Attribute paragraph at {:?} has no preceding paragraph", path);
                skipped += 1;
            }
        }
    }

    applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Footer and page attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Finalize the first footer component and move it to the end of `main`.
///
/// List items written as `{...}` become attributes on the item itself.
pub fn finalize_footer(main: &mut Element) -> bool {
    let Some(path) = find_path(main, &|el: &Element| el.tag == "mdp-footer" || el.tag == "ve-footer") else {
        return false;
    };
    let Some(Node::Element(mut footer)) = remove_at(main, &path) else {
        return false;
    };

    for item_path in collect_paths(&footer, &|el: &Element| el.tag == "li") {
        let Some(item) = element_at_mut(&mut footer, &item_path) else {
            continue;
        };
        if let Some(inner) = attribute_block(&item.text_content()) {
            parse_headline(&inner).apply_to(item, "data-entities");
            item.children.clear();
        }
    }

    main.children.push(Node::Element(footer));
    true
}

/// Attributes carried by the restructured `main` element.
pub fn apply_page_attributes(main: &mut Element) {
    main.add_classes("page-content markdown-body");
    main.set_attr("aria-label", "Content");
    main.set_attr("data-theme", "light");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
