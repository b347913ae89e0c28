//! Index-path addressing into the document tree.
//!
//! A path is the list of child indices leading from a root element to a
//! node. The empty path addresses the root itself. Paths are only valid
//! until the next structural edit above or before them.

use super::{Element, Node};

/// Child-index path from a root element.
pub type NodePath = Vec<usize>;

/// Resolve a path to a node. The empty path has no node (the root is an element).
pub fn node_at<'a>(root: &'a Element, path: &[usize]) -> Option<&'a Node> {
    let (last, parents) = path.split_last()?;
    element_at(root, parents)?.children.get(*last)
}

/// Resolve a path to an element; the empty path yields the root.
pub fn element_at<'a>(root: &'a Element, path: &[usize]) -> Option<&'a Element> {
    let mut current = root;
    for &index in path {
        current = current.children.get(index)?.as_element()?;
    }
    Some(current)
}

pub fn element_at_mut<'a>(root: &'a mut Element, path: &[usize]) -> Option<&'a mut Element> {
    let mut current = root;
    for &index in path {
        current = current.children.get_mut(index)?.as_element_mut()?;
    }
    Some(current)
}

/// Paths of every descendant element matching `pred`, in document order.
pub fn collect_paths(root: &Element, pred: &impl Fn(&Element) -> bool) -> Vec<NodePath> {
    let mut out = Vec::new();
    let mut prefix = Vec::new();
    collect_into(root, pred, &mut prefix, &mut out);
    out
}

fn collect_into(
    el: &Element,
    pred: &impl Fn(&Element) -> bool,
    prefix: &mut NodePath,
    out: &mut Vec<NodePath>,
) {
    for (index, child) in el.children.iter().enumerate() {
        if let Node::Element(child_el) = child {
            prefix.push(index);
            if pred(child_el) {
                out.push(prefix.clone());
            }
            collect_into(child_el, pred, prefix, out);
            prefix.pop();
        }
    }
}

/// Path of the first descendant element matching `pred`.
pub fn find_path(root: &Element, pred: &impl Fn(&Element) -> bool) -> Option<NodePath> {
    collect_paths(root, pred).into_iter().next()
}

/// Remove the node at `path`, returning it.
pub fn remove_at(root: &mut Element, path: &[usize]) -> Option<Node> {
    let (last, parents) = path.split_last()?;
    let parent = element_at_mut(root, parents)?;
    (*last < parent.children.len()).then(|| parent.children.remove(*last))
}

/// Replace the node at `path`, returning the previous node.
pub fn replace_at(root: &mut Element, path: &[usize], node: Node) -> Option<Node> {
    let (last, parents) = path.split_last()?;
    let slot = element_at_mut(root, parents)?.children.get_mut(*last)?;
    Some(std::mem::replace(slot, node))
}

/// Index and element of the nearest preceding element sibling, skipping text.
pub fn previous_element_sibling<'a>(
    root: &'a Element,
    path: &[usize],
) -> Option<(usize, &'a Element)> {
    let (last, parents) = path.split_last()?;
    let parent = element_at(root, parents)?;
    parent.children[..*last]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, node)| node.as_element().map(|el| (index, el)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
