//! Context of a declaration-bearing code node.
//!
//! The materializer never inspects tag names itself; the caller computes a
//! [`CodeContext`] once from the tree and every decision is made from it.

use crate::dom::path::{element_at, previous_element_sibling};
use crate::dom::{Element, Node, NodePath};

/// The element directly containing the code node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Paragraph,
    ListItem,
    Heading(u8),
    Preformatted,
}

impl ContainerKind {
    fn of(el: &Element) -> Option<Self> {
        match el.tag.as_str() {
            "p" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            "pre" => Some(Self::Preformatted),
            _ => el.heading_level().map(Self::Heading),
        }
    }
}

/// The nearest preceding element sibling of the code node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingKind {
    Emphasis,
    Strong,
    Link,
    Image,
    Other,
}

impl SiblingKind {
    fn of(el: &Element) -> Self {
        match el.tag.as_str() {
            "em" => Self::Emphasis,
            "strong" => Self::Strong,
            "a" => Self::Link,
            "img" => Self::Image,
            _ => Self::Other,
        }
    }

    /// Emphasis-style siblings and links/images bind the declaration to themselves.
    fn binds_code(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// Everything the materializer needs to know about where a code node sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeContext {
    pub container: ContainerKind,
    /// Kind and path of the preceding element sibling, if any
    pub prior: Option<(SiblingKind, NodePath)>,
    /// Code sits inside running paragraph text
    pub inline: bool,
    /// Node removed or replaced once the declaration is applied
    pub wrapper: NodePath,
    /// Structural parent used as the default attribute target
    pub parent: NodePath,
    /// The parent is a `ul`/`ol` list
    pub parent_is_list: bool,
    /// A `pre` block tagged with a language other than the declaration language
    pub foreign_language: bool,
}

impl CodeContext {
    /// Compute the context of the code element at `path`.
    ///
    /// Returns `None` when the code is not inside a paragraph, list item,
    /// heading or preformatted block.
    pub fn compute(root: &Element, path: &[usize]) -> Option<Self> {
        let (_, container_path) = path.split_last()?;
        let container_el = element_at(root, container_path)?;
        let container = ContainerKind::of(container_el)?;
        let code = element_at(root, path)?;

        let prior = previous_element_sibling(root, path).map(|(index, el)| {
            let mut sibling_path = container_path.to_vec();
            sibling_path.push(index);
            (SiblingKind::of(el), sibling_path)
        });

        let mut inline = false;
        let wrapper: NodePath = match (&prior, container) {
            (Some((kind, _)), _) if kind.binds_code() => path.to_vec(),
            (_, ContainerKind::Paragraph) => {
                if has_direct_text(container_el) {
                    inline = true;
                    path.to_vec()
                } else {
                    container_path.to_vec()
                }
            }
            (_, ContainerKind::ListItem) | (_, ContainerKind::Heading(_)) => path.to_vec(),
            (_, ContainerKind::Preformatted) => container_path.to_vec(),
        };

        let parent: NodePath = match container {
            ContainerKind::ListItem if prior.is_some() => {
                container_path[..container_path.len().saturating_sub(1)].to_vec()
            }
            ContainerKind::ListItem => container_path.to_vec(),
            _ => wrapper[..wrapper.len() - 1].to_vec(),
        };
        let parent_is_list = element_at(root, &parent)
            .is_some_and(|el| el.tag == "ul" || el.tag == "ol");

        let foreign_language = container == ContainerKind::Preformatted
            && code_language(code).is_some_and(|lang| lang != "mdpress");

        Some(Self {
            container,
            prior,
            inline,
            wrapper,
            parent,
            parent_is_list,
            foreign_language,
        })
    }

    pub fn prior_kind(&self) -> Option<SiblingKind> {
        self.prior.as_ref().map(|(kind, _)| *kind)
    }
}

/// True when the element has non-blank text among its direct children.
fn has_direct_text(el: &Element) -> bool {
    el.children
        .iter()
        .any(|child| matches!(child, Node::Text(text) if !text.trim().is_empty()))
}

/// Language named by a `language-*` class (last hyphen segment).
fn code_language(code: &Element) -> Option<&str> {
    code.classes()
        .find(|class| class.starts_with("language"))
        .and_then(|class| class.rsplit('-').next())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
