//! Card grouping with "read more" toggles.

use crate::dom::path::{collect_paths, element_at, find_path, remove_at, replace_at};
use crate::dom::{Element, Node};

use super::ToggleIds;

/// True for sections that still need card grouping.
pub fn is_card_section(section: &Element) -> bool {
    section.has_class("cards") && !section.has_class("wrapper")
}

/// Group every element child after the first into `section.cards.wrapper`.
///
/// Inside each card the first heading is dropped, the first image and the
/// first link sitting in a paragraph replace that paragraph, and every
/// remaining paragraph is wrapped in a read-more toggle.
pub fn apply_cards(section: &mut Element, ids: &mut ToggleIds) {
    section.remove_class("cards");
    let mut wrapper = Element::new("section").with_attr("class", "cards wrapper");

    let mut seen_first = false;
    let mut kept = Vec::with_capacity(section.children.len());
    for child in std::mem::take(&mut section.children) {
        match child {
            Node::Element(card) if seen_first => {
                wrapper.children.push(Node::Element(build_card(card, ids)));
            }
            Node::Element(first) => {
                seen_first = true;
                kept.push(Node::Element(first));
            }
            other => kept.push(other),
        }
    }

    section.children = kept;
    section.children.push(Node::Element(wrapper));
}

fn build_card(mut card: Element, ids: &mut ToggleIds) -> Element {
    card.add_class("card");

    if let Some(heading) = find_path(&card, &|el: &Element| el.is_heading()) {
        remove_at(&mut card, &heading);
    }
    unwrap_first_in_paragraph(&mut card, "img");
    unwrap_first_in_paragraph(&mut card, "a");

    // Replacing a paragraph never shifts the paths of later paragraphs
    for path in collect_paths(&card, &|el: &Element| el.tag == "p") {
        let Some(para) = element_at(&card, &path) else {
            continue;
        };
        let toggle = read_more(para.children.clone(), ids.next_id());
        replace_at(&mut card, &path, Node::Element(toggle));
    }

    card
}

/// Replace the first paragraph holding a `tag` child with that child.
fn unwrap_first_in_paragraph(card: &mut Element, tag: &str) {
    let found = collect_paths(card, &|el: &Element| el.tag == "p")
        .into_iter()
        .find_map(|para_path| {
            let para = element_at(card, &para_path)?;
            let child = para.element_children().find(|child| child.tag == tag)?.clone();
            Some((para_path, child))
        });

    if let Some((para_path, child)) = found {
        replace_at(card, &para_path, Node::Element(child));
    }
}

fn read_more(content: Vec<Node>, id: usize) -> Element {
    let toggle_id = format!("read-more-{}", id);
    let mut para = Element::new("p");
    para.children = content;

    Element::new("div")
        .with_class("read-more")
        .with_child(
            Element::new("input")
                .with_attr("type", "checkbox")
                .with_attr("id", toggle_id.clone()),
        )
        .with_child(para)
        .with_child(
            Element::new("label")
                .with_attr("for", toggle_id)
                .with_attr("role", "button")
                .with_text("More"),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
