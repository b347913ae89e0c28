//! HTML parsing into the document tree.
//!
//! Rendered Markdown, including any HTML the author wrote by hand, is run
//! through a standards-conforming HTML parser so that raw blocks and inline
//! tags become real elements. The parser's tree is then copied into owned
//! [`Element`]s.

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{Element, Node};

/// Elements whose text is preserved exactly, whitespace included.
const PRESERVE_WHITESPACE: &[&str] = &["pre", "code", "textarea", "script", "style"];

/// Containers whose whitespace-only text is layout between blocks.
const BLOCK_CONTAINERS: &[&str] = &[
    "main", "section", "blockquote", "ul", "ol", "dl", "table", "thead", "tbody", "tfoot", "tr",
];

/// Block-level elements; whitespace next to them carries no content.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Parse an HTML fragment as the content of a `main` element.
///
/// Parsing follows browser rules: misnested tags are repaired, a block
/// start tag closes an open paragraph, and unknown (custom) elements are
/// kept as ordinary elements. Whitespace-only text that merely separates
/// block elements is dropped.
pub fn parse_html_fragment(html: &str) -> Vec<Node> {
    let document = format!(
        "<!DOCTYPE html><html><head></head><body><main>{}</main></body></html>",
        html
    );
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(document);

    let Some(body) = find_element(&dom.document, "body") else {
        return Vec::new();
    };

    // Content closed out of `main` early by a stray end tag lands after it
    let mut nodes = Vec::new();
    let mut flattened = false;
    for child in body.children.borrow().iter() {
        if !flattened && element_name(child).as_deref() == Some("main") {
            flattened = true;
            nodes.extend(convert_children(child, "main"));
        } else {
            nodes.extend(convert(child));
        }
    }
    prune_layout_whitespace("main", nodes)
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Raw(format!("<!--{}-->", contents))),
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let mut el = Element::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                let key = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                    None => attr.name.local.to_string(),
                };
                el.set_attr(key, attr.value.to_string());
            }
            // Template content lives in a separate document fragment
            let source = template_contents
                .borrow()
                .clone()
                .unwrap_or_else(|| handle.clone());
            el.children = convert_children(&source, &el.tag);
            Some(Node::Element(el))
        }
        _ => None,
    }
}

fn convert_children(handle: &Handle, tag: &str) -> Vec<Node> {
    let children: Vec<Node> = handle.children.borrow().iter().filter_map(convert).collect();
    prune_layout_whitespace(tag, children)
}

/// Drop whitespace-only text that only separates blocks.
fn prune_layout_whitespace(tag: &str, children: Vec<Node>) -> Vec<Node> {
    if PRESERVE_WHITESPACE.contains(&tag) {
        return children;
    }
    let container = BLOCK_CONTAINERS.contains(&tag);

    let keep: Vec<bool> = (0..children.len())
        .map(|i| {
            if !children[i].is_blank_text() {
                return true;
            }
            if container {
                return false;
            }
            let prev = i.checked_sub(1).and_then(|j| children.get(j));
            let next = children.get(i + 1);
            !(prev.map_or(true, is_block) || next.map_or(true, is_block))
        })
        .collect();

    children
        .into_iter()
        .zip(keep)
        .filter_map(|(node, keep)| keep.then_some(node))
        .collect()
}

fn is_block(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|el| BLOCK_ELEMENTS.contains(&el.tag.as_str()))
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// First element named `tag` in document order.
fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if element_name(child).as_deref() == Some(tag) {
            return Some(child.clone());
        }
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
