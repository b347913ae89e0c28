//! Node materializer
//!
//! Turns declarations found in code nodes into tree edits. Each code node
//! either synthesizes a new typed element, merges attributes onto a nearby
//! element, registers a head/body side effect, or is left alone for plain
//! code display.

mod context;

pub use context::{CodeContext, ContainerKind, SiblingKind};

use log::{debug, trace};

use crate::dom::path::{collect_paths, element_at, element_at_mut, find_path, remove_at, replace_at};
use crate::dom::{Element, Node};
use crate::headline::{interpret_code, Declaration};

// ─────────────────────────────────────────────────────────────────────────────
// Document Effects
// ─────────────────────────────────────────────────────────────────────────────

/// Elements registered for injection outside the content flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentEffects {
    /// `link` elements for the document head
    pub head: Vec<Element>,
    /// `script` elements for the end of the body
    pub body: Vec<Element>,
}

impl DocumentEffects {
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.body.is_empty()
    }
}

/// Which code nodes a materialization pass handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only code directly inside headings
    Headings,
    /// Every code node
    All,
}

/// What happened to a single code node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A side effect was registered and the wrapper removed
    SideEffect,
    /// A typed element was installed
    Typed,
    /// Attributes were merged onto a target and the wrapper removed
    Attributes,
    /// Nothing to do; the code stays in place
    Kept,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Materialize every in-scope code node under `root`, in document order.
///
/// Returns the number of code nodes that changed the tree.
pub fn materialize_declarations(root: &mut Element, effects: &mut DocumentEffects, scope: Scope) -> usize {
    let mut kept = 0;
    let mut applied = 0;

    loop {
        let paths = collect_paths(root, &|el: &Element| el.tag == "code");
        let Some(path) = paths.into_iter().nth(kept) else {
            break;
        };

        let outcome = match CodeContext::compute(root, &path) {
            Some(ctx) if in_scope(&ctx, scope) && !ctx.foreign_language => {
                let text = element_at(root, &path).map(Element::text_content).unwrap_or_default();
                let decl = interpret_code(&text);
                materialize(root, &ctx, decl, effects)
            }
            _ => Outcome::Kept,
        };

        trace!("Code node at {:?}: {:?}", path, outcome);
        match outcome {
            Outcome::Kept => kept += 1,
            _ => applied += 1,
        }
    }

    debug!("Materialized {} declarations ({} code nodes kept)", applied, kept);
    applied
}

fn in_scope(ctx: &CodeContext, scope: Scope) -> bool {
    match scope {
        Scope::All => true,
        Scope::Headings => matches!(ctx.container, ContainerKind::Heading(_)),
    }
}

/// Apply one declaration in its context.
pub fn materialize(
    root: &mut Element,
    ctx: &CodeContext,
    mut decl: Declaration,
    effects: &mut DocumentEffects,
) -> Outcome {
    if decl.is_side_effect() {
        let element = build_element(&decl);
        if element.tag == "link" {
            effects.head.push(element);
        } else {
            effects.body.push(element);
        }
        remove_at(root, &ctx.wrapper);
        return Outcome::SideEffect;
    }

    if let Some(tag) = decl.tag.clone() {
        if ctx.inline {
            decl.style.set("display", "inline-block");
        }
        let element = build_element(&decl);

        let singleton = matches!(decl.component_kind(), Some("header") | Some("footer"));
        let existing = if singleton {
            find_path(root, &|el: &Element| el.tag == tag)
                .filter(|existing| !ctx.wrapper.starts_with(existing))
        } else {
            None
        };

        match existing {
            Some(existing) => {
                debug!("Replacing existing <{}>", tag);
                replace_at(root, &existing, Node::Element(element));
                remove_at(root, &ctx.wrapper);
            }
            None => {
                replace_at(root, &ctx.wrapper, Node::Element(element));
            }
        }
        return Outcome::Typed;
    }

    if decl.has_attributes() {
        let target = attribute_target(root, ctx);
        if let Some(target_el) = element_at_mut(root, &target) {
            decl.apply_to(target_el, "data-entities");
        }
        remove_at(root, &ctx.wrapper);
        return Outcome::Attributes;
    }

    Outcome::Kept
}

/// Build a new element from a typed or side-effect declaration.
///
/// Positional arguments are rendered as a list of raw HTML items inside it.
pub fn build_element(decl: &Declaration) -> Element {
    let mut element = Element::new(decl.tag.as_deref().unwrap_or("div"));

    if let Some(id) = &decl.id {
        element.set_id(id.clone());
    }
    element.add_classes(decl.class.as_deref().unwrap_or_default());
    if let Some(style) = decl.style_attr() {
        element.set_attr("style", style);
    }
    if !decl.entities.is_empty() {
        element.set_attr("entities", decl.entities.join(" "));
    }
    for (key, value) in decl.kwargs.iter() {
        element.set_attr(key, value);
    }
    if let Some(src) = &decl.src {
        element.set_attr("src", src.clone());
    }
    if let Some(href) = &decl.href {
        element.set_attr("href", href.clone());
    }

    if !decl.args.is_empty() {
        let mut list = Element::new("ul");
        for arg in &decl.args {
            list.children
                .push(Node::Element(Element::new("li").with_child(Node::Raw(arg.clone()))));
        }
        element.children.push(Node::Element(list));
    }

    element
}

/// Resolve the element that receives an attribute-only declaration.
///
/// Emphasis is re-homed into a neutral `span` which becomes the target.
fn attribute_target(root: &mut Element, ctx: &CodeContext) -> Vec<usize> {
    match &ctx.prior {
        Some((SiblingKind::Emphasis | SiblingKind::Strong, prior)) => {
            let children = element_at(root, prior)
                .map(|el| el.children.clone())
                .unwrap_or_default();
            let mut span = Element::new("span");
            span.children = children;
            replace_at(root, prior, Node::Element(span));
            prior.clone()
        }
        Some((SiblingKind::Link | SiblingKind::Image, prior)) if !ctx.parent_is_list => prior.clone(),
        _ => ctx.parent.clone(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn code(text: &str) -> Element {
        Element::new("code").with_text(text)
    }

    fn section(children: Vec<Element>) -> Element {
        let mut section = Element::new("section").with_attr("class", "section1");
        for child in children {
            section.children.push(Node::Element(child));
        }
        Element::new("main").with_child(section)
    }

    fn run(root: &mut Element) -> DocumentEffects {
        let mut effects = DocumentEffects::default();
        materialize_declarations(root, &mut effects, Scope::All);
        effects
    }

    #[test]
    fn test_script_declaration_goes_to_body() {
        let mut root = section(vec![
            Element::new("p").with_text("Intro"),
            Element::new("p").with_child(code(r#"script src="a.js""#)),
        ]);
        let effects = run(&mut root);

        assert_eq!(effects.body.len(), 1);
        assert_eq!(effects.body[0].tag, "script");
        assert_eq!(effects.body[0].attr("src"), Some("a.js"));
        assert!(effects.head.is_empty());
        let section = root.element_children().next().unwrap();
        assert_eq!(section.element_children().count(), 1);
    }

    #[test]
    fn test_link_declaration_goes_to_head() {
        let mut root = section(vec![Element::new("p").with_child(code(r#"link href="a.css" rel=stylesheet"#))]);
        let effects = run(&mut root);

        assert_eq!(effects.head.len(), 1);
        assert_eq!(effects.head[0].attr("href"), Some("a.css"));
        assert_eq!(effects.head[0].attr("rel"), Some("stylesheet"));
        assert!(root.element_children().next().unwrap().children.is_empty());
    }

    #[test]
    fn test_typed_declaration_replaces_paragraph() {
        let mut root = section(vec![Element::new("p").with_child(code(
            "mdp-map #map .wide zoom=4 Q90 | Paris | Lyon",
        ))]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        let map = section.element_children().next().unwrap();
        assert_eq!(map.tag, "mdp-map");
        assert_eq!(map.id(), Some("map"));
        assert_eq!(map.attr("class"), Some("wide"));
        assert_eq!(map.attr("zoom"), Some("4"));
        assert_eq!(map.attr("entities"), Some("Q90"));
        assert_eq!(map.attr("style"), None);
        assert_eq!(map.inner_html(), "<ul><li>Paris</li><li>Lyon</li></ul>");
    }

    #[test]
    fn test_inline_typed_declaration_is_inline_block() {
        let mut root = section(vec![Element::new("p")
            .with_text("Status: ")
            .with_child(code("mdp-badge :color=green"))]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        let para = section.element_children().next().unwrap();
        let badge = para.element_children().next().unwrap();
        assert_eq!(badge.tag, "mdp-badge");
        assert_eq!(badge.attr("style"), Some("color:green;display:inline-block"));
    }

    #[test]
    fn test_header_singleton_replaces_existing() {
        let mut root = Element::new("main")
            .with_child(Element::new("mdp-header").with_attr("label", "old"))
            .with_child(Element::new("p").with_text("Body"))
            .with_child(Element::new("p").with_child(code(r#"mdp-header label=new"#)));
        run(&mut root);

        let tags: Vec<_> = root.element_children().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["mdp-header", "p"]);
        assert_eq!(root.children[0].as_element().unwrap().attr("label"), Some("new"));
    }

    #[test]
    fn test_header_singleton_installs_in_place_when_missing() {
        let mut root = Element::new("main")
            .with_child(Element::new("p").with_text("Body"))
            .with_child(Element::new("p").with_child(code("mdp-footer")));
        run(&mut root);

        let tags: Vec<_> = root.element_children().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["p", "mdp-footer"]);
    }

    #[test]
    fn test_attribute_declaration_targets_section() {
        let mut root = section(vec![
            Element::new("h1").with_text("Title"),
            Element::new("p").with_child(code(".cards #gallery :maxWidth=40em")),
        ]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        assert_eq!(section.attr("class"), Some("section1 cards"));
        assert_eq!(section.id(), Some("gallery"));
        assert_eq!(section.attr("style"), Some("max-width:40em"));
        assert_eq!(section.element_children().count(), 1);
    }

    #[test]
    fn test_attribute_declaration_after_image_targets_image() {
        let mut root = section(vec![Element::new("p")
            .with_child(Element::new("img").with_attr("src", "cat.png"))
            .with_child(code(".right"))]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        let para = section.element_children().next().unwrap();
        assert_eq!(para.children.len(), 1);
        assert_eq!(para.element_children().next().unwrap().attr("class"), Some("right"));
    }

    #[test]
    fn test_attribute_declaration_after_emphasis_rehomes_into_span() {
        let mut root = section(vec![Element::new("p")
            .with_text("A ")
            .with_child(Element::new("em").with_text("highlighted"))
            .with_child(code(".hl Q42"))
            .with_text(" phrase")]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        let para = section.element_children().next().unwrap();
        assert_eq!(
            para.inner_html(),
            r#"A <span class="hl" data-entities="Q42">highlighted</span> phrase"#
        );
    }

    #[test]
    fn test_attribute_declaration_in_list_item() {
        let mut root = section(vec![Element::new("ul")
            .with_child(Element::new("li").with_text("one ").with_child(code(".done")))
            .with_child(Element::new("li").with_text("two"))]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        let list = section.element_children().next().unwrap();
        let first = list.element_children().next().unwrap();
        assert_eq!(first.attr("class"), Some("done"));
        assert_eq!(first.inner_html(), "one ");
    }

    #[test]
    fn test_code_after_link_in_list_item_targets_list() {
        let mut root = section(vec![Element::new("ul")
            .with_child(
                Element::new("li")
                    .with_child(Element::new("a").with_attr("href", "/a").with_text("A"))
                    .with_child(code(".links")),
            )
            .with_child(
                Element::new("li")
                    .with_child(Element::new("img").with_attr("src", "b.png"))
                    .with_child(code("#gallery")),
            )]);
        run(&mut root);

        let section = root.element_children().next().unwrap();
        let list = section.element_children().next().unwrap();
        assert_eq!(list.attr("class"), Some("links"));
        assert_eq!(list.id(), Some("gallery"));

        let items: Vec<_> = list.element_children().collect();
        assert_eq!(items[0].inner_html(), r#"<a href="/a">A</a>"#);
        assert_eq!(items[1].inner_html(), r#"<img src="b.png">"#);
        assert!(items.iter().all(|item| item.attr("class").is_none()));
    }

    #[test]
    fn test_plain_code_is_kept() {
        let mut root = section(vec![
            Element::new("p").with_text("Run ").with_child(code("cargo build")),
            Element::new("pre").with_child(code("let x = 1;").with_attr("class", "language-rust")),
            Element::new("p").with_child(code(".after")),
        ]);
        let mut effects = DocumentEffects::default();
        let applied = materialize_declarations(&mut root, &mut effects, Scope::All);

        assert_eq!(applied, 1);
        let section = root.element_children().next().unwrap();
        assert_eq!(section.element_children().count(), 2);
        assert_eq!(section.attr("class"), Some("section1 after"));
    }

    #[test]
    fn test_heading_scope_only_touches_headings() {
        let mut root = Element::new("main")
            .with_child(Element::new("h2").with_text("Gallery ").with_child(code(".cards")))
            .with_child(Element::new("p").with_child(code(".lead")));
        let mut effects = DocumentEffects::default();
        materialize_declarations(&mut root, &mut effects, Scope::Headings);

        let heading = root.children[0].as_element().unwrap();
        assert_eq!(heading.attr("class"), Some("cards"));
        assert_eq!(heading.inner_html(), "Gallery ");
        assert!(root.children[1].as_element().unwrap().find_descendant(&|e: &Element| e.tag == "code").is_some());
    }
}
