//! Widget transforms
//!
//! Structural rewrites applied once to every section of the restructured
//! tree, in document order: cards, then tabs, then columns. Entity links
//! are rewritten afterwards over the whole tree.

mod cards;
mod columns;
mod entities;
mod tabs;

pub use cards::{apply_cards, is_card_section};
pub use columns::{apply_columns, is_column_section};
pub use entities::{rewrite_entity_links, EntityResolver, EntityTarget, DEFAULT_SITE_URL};
pub use tabs::{build_tab_group, is_tab_section};

use log::debug;

use crate::dom::{Element, Node};

// ─────────────────────────────────────────────────────────────────────────────
// Toggle Id Allocator
// ─────────────────────────────────────────────────────────────────────────────

/// Allocator for "read more" toggle ids, scoped to one document run.
///
/// Ids start at 1 and strictly increase.
#[derive(Debug, Clone)]
pub struct ToggleIds {
    next: usize,
}

impl ToggleIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn allocated(&self) -> usize {
        self.next - 1
    }
}

impl Default for ToggleIds {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Section Traversal
// ─────────────────────────────────────────────────────────────────────────────

/// Apply card, tab and column transforms to every section under `root`.
///
/// Sections are visited in document order. A section is transformed before
/// its descendants, which are then visited inside the rewritten result.
pub fn apply_widgets(root: &mut Element, ids: &mut ToggleIds) {
    transform_children(root, ids);
    debug!("Widget pass allocated {} toggle ids", ids.allocated());
}

fn transform_children(el: &mut Element, ids: &mut ToggleIds) {
    for child in el.children.iter_mut() {
        if let Node::Element(child_el) = child {
            if child_el.tag == "section" {
                let section = std::mem::replace(child_el, Element::new("section"));
                *child_el = transform_section(section, ids);
            }
            transform_children(child_el, ids);
        }
    }
}

fn transform_section(mut section: Element, ids: &mut ToggleIds) -> Element {
    if is_card_section(&section) {
        apply_cards(&mut section, ids);
    }
    if is_tab_section(&section) {
        return build_tab_group(&section);
    }
    if is_column_section(&section) {
        apply_columns(&mut section);
    }
    section
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
