//! Multi-column layout.

use crate::dom::{Element, Node};

pub fn is_column_section(section: &Element) -> bool {
    (section.has_class("columns") || section.has_class("mcol")) && !section.has_class("wrapper")
}

/// Move the direct child sections into a `section.columns.wrapper`.
///
/// Columns are numbered `col-1`, `col-2`, ... and the wrapper is appended
/// to the section after its remaining content.
pub fn apply_columns(section: &mut Element) {
    section.remove_class("columns");
    section.remove_class("mcol");
    let mut wrapper = Element::new("section").with_attr("class", "columns wrapper");

    let mut kept = Vec::with_capacity(section.children.len());
    for child in std::mem::take(&mut section.children) {
        match child {
            Node::Element(mut column) if column.tag == "section" => {
                let index = wrapper.element_children().count() + 1;
                column.add_class(&format!("col-{}", index));
                wrapper.children.push(Node::Element(column));
            }
            other => kept.push(other),
        }
    }

    section.children = kept;
    section.children.push(Node::Element(wrapper));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
