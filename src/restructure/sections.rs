//! Section tree construction.
//!
//! Turns the flat top-level block sequence of `main` into nested
//! `section` elements keyed by heading level. Sections are collected in an
//! arena while the blocks stream past, then assembled into a new child list
//! that replaces the old one in a single swap.

use log::{debug, trace};

use crate::dom::path::{collect_paths, remove_at};
use crate::dom::{Element, Node};

/// Arena index of the document root.
const ROOT: usize = 0;

/// One entry of a section's accumulated content.
#[derive(Debug)]
enum Slot {
    Node(Node),
    Section(usize),
}

impl Slot {
    fn is_element(&self) -> bool {
        matches!(self, Slot::Section(_) | Slot::Node(Node::Element(_)))
    }
}

#[derive(Debug)]
struct SectionBuilder {
    /// The `section` element without its children
    element: Element,
    /// Hierarchical id, `None` for the root
    data_id: Option<String>,
    /// Number of sections attached directly below this one
    child_sections: usize,
    slots: Vec<Slot>,
}

impl SectionBuilder {
    fn new(element: Element, data_id: Option<String>) -> Self {
        Self {
            element,
            data_id,
            child_sections: 0,
            slots: Vec::new(),
        }
    }

    fn id_prefix(&self) -> &str {
        self.data_id.as_deref().unwrap_or("0")
    }

    fn element_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_element()).count()
    }

    /// Assign final segment ids `<section id>.<1..n>` to the numbered children.
    fn close(&mut self) {
        let prefix = self.id_prefix().to_string();
        let mut index = 0;
        for slot in &mut self.slots {
            if let Slot::Node(Node::Element(el)) = slot {
                if !is_segment_candidate(el) {
                    continue;
                }
                index += 1;
                mark_segment(el, &format!("{}.{}", prefix, index));
            }
        }
        trace!("Closed section {} with {} segments", prefix, index);
    }
}

/// Children that take part in segment numbering.
fn is_segment_candidate(el: &Element) -> bool {
    !(el.is_heading() || el.tag == "param" || el.tag == "style" || el.tag.starts_with("mdp-"))
}

fn mark_segment(el: &mut Element, segment_id: &str) {
    el.set_attr("data-id", segment_id);
    el.set_id(segment_id);
    el.add_class("segment");
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Nest the children of `main` into sections.
///
/// A level-k heading closes the current section (assigning its segment
/// ids), opens `section.section<k>` carrying the heading's classes and id,
/// and attaches it below the open level-(k-1) section, or below the root
/// when there is none. Body blocks join the current section with a
/// provisional segment id. The last section is closed at end of input.
pub fn build_sections(main: &mut Element) {
    let blocks = std::mem::take(&mut main.children);

    let mut arena = vec![SectionBuilder::new(Element::new("main"), None)];
    // open[k - 1] holds the arena index of the open level-k section
    let mut open: [Option<usize>; 6] = [None; 6];
    let mut current = ROOT;

    for block in blocks {
        let level = block.as_element().and_then(Element::heading_level);
        match (block, level) {
            (Node::Element(heading), Some(level)) => {
                arena[current].close();

                let depth = usize::from(level);
                for slot in open.iter_mut().skip(depth - 1) {
                    *slot = None;
                }
                let parent = depth.checked_sub(2).and_then(|i| open[i]).unwrap_or(ROOT);

                let (section, heading) = open_section(heading, level);
                arena[parent].child_sections += 1;
                let position = arena[parent].child_sections;
                let data_id = match &arena[parent].data_id {
                    Some(prefix) => format!("{}.{}", prefix, position),
                    None => position.to_string(),
                };

                let mut builder = SectionBuilder::new(section, Some(data_id));
                builder.element.set_attr("data-id", builder.data_id.clone().unwrap_or_default());
                builder.slots.push(Slot::Node(Node::Element(heading)));

                let index = arena.len();
                arena.push(builder);
                arena[parent].slots.push(Slot::Section(index));
                open[depth - 1] = Some(index);
                current = index;
            }
            (Node::Element(mut el), None) => {
                if el.tag != "param" {
                    let section = &arena[current];
                    let provisional = format!("{}.{}", section.id_prefix(), section.element_count());
                    mark_segment(&mut el, &provisional);
                }
                arena[current].slots.push(Slot::Node(Node::Element(el)));
            }
            (other, _) => arena[current].slots.push(Slot::Node(other)),
        }
    }
    arena[current].close();

    debug!("Built {} sections", arena.len() - 1);
    main.children = assemble(&mut arena, ROOT);
}

/// Create the section for a heading and strip the heading of class and id.
fn open_section(mut heading: Element, level: u8) -> (Element, Element) {
    let mut section = Element::new("section").with_class(&format!("section{}", level));
    for class in heading.classes().map(str::to_string).collect::<Vec<_>>() {
        section.add_class(&class);
    }
    heading.clear_classes();
    if let Some(id) = heading.remove_attr("id").filter(|id| !id.is_empty()) {
        section.set_id(id);
    }
    (section, heading)
}

fn assemble(arena: &mut [SectionBuilder], index: usize) -> Vec<Node> {
    let slots = std::mem::take(&mut arena[index].slots);
    slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Node(node) => node,
            Slot::Section(child) => {
                let mut section = std::mem::replace(&mut arena[child].element, Element::new("section"));
                section.children = assemble(arena, child);
                Node::Element(section)
            }
        })
        .collect()
}

/// Remove every heading whose content is blank.
pub fn remove_blank_headings(root: &mut Element) -> usize {
    let paths = collect_paths(root, &|el: &Element| el.is_heading() && el.is_blank());
    // Reverse document order keeps earlier paths valid
    for path in paths.iter().rev() {
        remove_at(root, path);
    }
    paths.len()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, text: &str) -> Element {
        Element::new(format!("h{}", level)).with_text(text)
    }

    fn para(text: &str) -> Element {
        Element::new("p").with_text(text)
    }

    fn main_of(children: Vec<Element>) -> Element {
        let mut main = Element::new("main");
        main.children = children.into_iter().map(Node::Element).collect();
        main
    }

    fn sections(el: &Element) -> Vec<&Element> {
        el.element_children().filter(|e| e.tag == "section").collect()
    }

    #[test]
    fn test_nested_sections_and_data_ids() {
        let mut main = main_of(vec![
            heading(1, "One"),
            para("a"),
            heading(2, "One.One"),
            para("b"),
            heading(2, "One.Two"),
            heading(1, "Two"),
        ]);
        build_sections(&mut main);

        let top = sections(&main);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].attr("data-id"), Some("1"));
        assert_eq!(top[1].attr("data-id"), Some("2"));
        assert_eq!(top[0].attr("class"), Some("section1"));

        let nested = sections(top[0]);
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].attr("data-id"), Some("1.1"));
        assert_eq!(nested[1].attr("data-id"), Some("1.2"));
        assert_eq!(nested[1].attr("class"), Some("section2"));
    }

    #[test]
    fn test_segment_ids_restart_per_section() {
        let mut main = main_of(vec![
            heading(1, "One"),
            para("a"),
            para("b"),
            heading(2, "Sub"),
            para("c"),
        ]);
        build_sections(&mut main);

        let one = sections(&main)[0];
        let ids: Vec<_> = one
            .element_children()
            .filter(|e| e.tag == "p")
            .map(|e| e.attr("data-id").unwrap())
            .collect();
        assert_eq!(ids, vec!["1.1", "1.2"]);

        let sub = sections(one)[0];
        let para = sub.element_children().find(|e| e.tag == "p").unwrap();
        assert_eq!(para.attr("data-id"), Some("1.1.1"));
        assert_eq!(para.id(), Some("1.1.1"));
        assert!(para.has_class("segment"));
    }

    #[test]
    fn test_heading_class_and_id_move_to_section() {
        let mut main = main_of(vec![heading(2, "Gallery")
            .with_attr("class", "cards wide")
            .with_attr("id", "gallery")]);
        build_sections(&mut main);

        let section = sections(&main)[0];
        assert_eq!(section.attr("class"), Some("section2 cards wide"));
        assert_eq!(section.id(), Some("gallery"));
        let h2 = section.element_children().next().unwrap();
        assert!(h2.attr("class").is_none());
        assert!(h2.attr("id").is_none());
    }

    #[test]
    fn test_orphan_heading_attaches_to_root() {
        let mut main = main_of(vec![heading(3, "Deep"), heading(1, "Top"), heading(3, "Skip")]);
        build_sections(&mut main);

        let top = sections(&main);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].attr("data-id"), Some("1"));
        assert_eq!(top[1].attr("data-id"), Some("2"));
        assert_eq!(top[2].attr("data-id"), Some("3"));
    }

    #[test]
    fn test_content_before_first_heading() {
        let mut main = main_of(vec![para("preface"), heading(1, "One")]);
        build_sections(&mut main);

        let first = main.children[0].as_element().unwrap();
        assert_eq!(first.tag, "p");
        assert_eq!(first.attr("data-id"), Some("0.1"));
    }

    #[test]
    fn test_excluded_children_keep_provisional_ids() {
        let mut main = main_of(vec![
            heading(1, "One"),
            Element::new("mdp-header"),
            para("a"),
            Element::new("param").with_attr("ve-config", ""),
        ]);
        build_sections(&mut main);

        let one = sections(&main)[0];
        let children: Vec<_> = one.element_children().collect();
        assert_eq!(children[1].attr("data-id"), Some("1.1"));
        assert_eq!(children[2].attr("data-id"), Some("1.1"));
        assert_eq!(children[3].attr("data-id"), None);
    }

    #[test]
    fn test_comment_nodes_are_carried_without_ids() {
        let mut main = Element::new("main")
            .with_child(heading(1, "One"))
            .with_child(Node::Raw("<!-- draft -->".to_string()))
            .with_child(para("a"));
        build_sections(&mut main);

        let one = sections(&main)[0];
        assert!(matches!(one.children[1], Node::Raw(_)));
        let p = one.element_children().find(|e| e.tag == "p").unwrap();
        assert_eq!(p.attr("data-id"), Some("1.1"));
    }

    #[test]
    fn test_remove_blank_headings() {
        let mut main = main_of(vec![heading(2, "").with_attr("class", "cards"), para("a")]);
        build_sections(&mut main);
        let removed = remove_blank_headings(&mut main);

        assert_eq!(removed, 1);
        let section = sections(&main)[0];
        assert_eq!(section.attr("class"), Some("section2 cards"));
        assert_eq!(section.element_children().next().unwrap().tag, "p");
    }
}
