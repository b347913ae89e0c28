//! Generic document tree
//!
//! An owned, single-owner tree of elements, text, and opaque raw HTML. The
//! tree is built by parsing rendered HTML (see [`parse_html_fragment`]).
//! The restructuring passes never hold parent pointers: ancestry is
//! expressed through index paths (see [`path`]) and rewritten subtrees are
//! swapped in whole.
//!
//! # Example
//! ```ignore
//! let para = Element::new("p").with_class("lead").with_text("Hello");
//! assert_eq!(para.outer_html(), r#"<p class="lead">Hello</p>"#);
//! ```

mod html;
mod parse;
pub mod path;

pub use html::{escape_attr, escape_text, to_html};
pub use parse::parse_html_fragment;
pub use path::NodePath;

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Attribute list that preserves insertion order, like a DOM element does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its original position when it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Node
// ─────────────────────────────────────────────────────────────────────────────

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with a tag, attributes and children
    Element(Element),
    /// Plain text, escaped on output
    Text(String),
    /// Markup passed through verbatim (comments, declaration list args)
    Raw(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Whether this node is an element with the given tag.
    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|el| el.tag == tag)
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Raw(_) => {}
        }
    }

    /// True for text nodes holding only whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }

    pub fn outer_html(&self) -> String {
        to_html(self)
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Element
// ─────────────────────────────────────────────────────────────────────────────

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.set(name, value);
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.attrs.set("id", id);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Class list
    // ─────────────────────────────────────────────────────────────────────────

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class unless already present (DOM `classList.add` semantics).
    pub fn add_class(&mut self, class: &str) {
        let class = class.trim();
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let joined = match self.attr("class").filter(|c| !c.trim().is_empty()) {
            Some(existing) => format!("{} {}", existing.trim(), class),
            None => class.to_string(),
        };
        self.attrs.set("class", joined);
    }

    /// Add every whitespace-separated class in `classes`.
    pub fn add_classes(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        if remaining.is_empty() {
            self.attrs.remove("class");
        } else {
            self.attrs.set("class", remaining.join(" "));
        }
    }

    /// Drop the class attribute entirely.
    pub fn clear_classes(&mut self) {
        self.attrs.remove("class");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Heading level for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        heading_level(&self.tag)
    }

    pub fn is_heading(&self) -> bool {
        self.heading_level().is_some()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// True when the element renders no content (only whitespace text).
    pub fn is_blank(&self) -> bool {
        self.children.iter().all(Node::is_blank_text)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First descendant (document order, excluding self) matching `pred`.
    pub fn find_descendant(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        for child in self.element_children() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn inner_html(&self) -> String {
        self.children.iter().map(to_html).collect()
    }

    pub fn outer_html(&self) -> String {
        to_html(&Node::Element(self.clone()))
    }
}

/// Parse a heading tag name (`h1`..`h6`) into its level.
pub fn heading_level(tag: &str) -> Option<u8> {
    let digits = tag.strip_prefix('h').or_else(|| tag.strip_prefix('H'))?;
    match digits.parse::<u8>() {
        Ok(level @ 1..=6) if digits.len() == 1 => Some(level),
        _ => None,
    }
}

/// Serialize ordered style declarations as `prop:value;prop:value`.
pub fn style_string<'a>(decls: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    decls
        .into_iter()
        .map(|(prop, value)| format!("{}:{}", prop, value))
        .collect::<Vec<_>>()
        .join(";")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_preserve_order_on_update() {
        let mut attrs = Attributes::new();
        attrs.set("id", "a");
        attrs.set("class", "x");
        attrs.set("id", "b");
        let collected: Vec<_> = attrs.iter().collect();
        assert_eq!(collected, vec![("id", "b"), ("class", "x")]);
    }

    #[test]
    fn test_add_class_deduplicates() {
        let mut el = Element::new("section");
        el.add_class("cards");
        el.add_class("cards");
        el.add_classes("wide cards tall");
        assert_eq!(el.attr("class"), Some("cards wide tall"));
    }

    #[test]
    fn test_remove_class() {
        let mut el = Element::new("section").with_attr("class", "columns wrapper mcol");
        el.remove_class("columns");
        el.remove_class("missing");
        assert_eq!(el.attr("class"), Some("wrapper mcol"));
        assert!(!el.has_class("columns"));
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("h10"), None);
        assert_eq!(heading_level("hr"), None);
        assert_eq!(heading_level("header"), None);
    }

    #[test]
    fn test_text_content_skips_raw() {
        let el = Element::new("p")
            .with_text("Hello ")
            .with_child(Element::new("em").with_text("world"))
            .with_child(Node::Raw("<br>".to_string()));
        assert_eq!(el.text_content(), "Hello world");
    }

    #[test]
    fn test_is_blank() {
        assert!(Element::new("h2").is_blank());
        assert!(Element::new("h2").with_text("  \n").is_blank());
        assert!(!Element::new("h2").with_text("Title").is_blank());
        assert!(!Element::new("h2")
            .with_child(Element::new("code"))
            .is_blank());
    }

    #[test]
    fn test_find_descendant_document_order() {
        let el = Element::new("section")
            .with_child(Element::new("div").with_child(Element::new("h3").with_text("deep")))
            .with_child(Element::new("h2").with_text("shallow"));
        let found = el.find_descendant(&|e: &Element| e.is_heading()).unwrap();
        assert_eq!(found.text_content(), "deep");
    }

    #[test]
    fn test_style_string() {
        let style = style_string([("color", "red"), ("font-size", "2em")]);
        assert_eq!(style, "color:red;font-size:2em");
    }
}
