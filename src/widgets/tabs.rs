//! Tab-group composition.

use crate::dom::{Element, Node};

pub fn is_tab_section(section: &Element) -> bool {
    section.has_class("tabs")
}

/// Build the `sl-tab-group` that replaces a tabs section.
///
/// The group copies the section's attributes. Each direct child section
/// contributes a `sl-tab` labelled with its first heading's content and a
/// `sl-tab-panel` holding its full content, keyed `tab1`, `tab2`, ...
pub fn build_tab_group(section: &Element) -> Element {
    let mut group = Element::new("sl-tab-group");
    group.attrs = section.attrs.clone();

    let panels: Vec<&Element> = section
        .element_children()
        .filter(|child| child.tag == "section")
        .collect();

    for (index, panel) in panels.iter().enumerate() {
        let mut tab = Element::new("sl-tab")
            .with_attr("slot", "nav")
            .with_attr("panel", format!("tab{}", index + 1));
        if let Some(heading) = panel.find_descendant(&|el: &Element| el.is_heading()) {
            tab.children = heading.children.clone();
        }
        group.children.push(Node::Element(tab));
    }

    for (index, panel) in panels.iter().enumerate() {
        let mut tab_panel = Element::new("sl-tab-panel").with_attr("name", format!("tab{}", index + 1));
        tab_panel.children = panel.children.clone();
        group.children.push(Node::Element(tab_panel));
    }

    group
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
