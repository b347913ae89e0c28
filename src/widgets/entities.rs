//! Entity-reference links.
//!
//! Anchors pointing at a knowledge-base entity (`.../Q42`) or at a
//! `~`-marked document path become `mdp-entity-infobox` elements.

use log::{trace, warn};
use url::Url;

use crate::dom::path::{collect_paths, element_at, replace_at};
use crate::dom::{Element, Node};
use crate::headline::is_entity_id;

/// Base used when no site URL is configured.
pub const DEFAULT_SITE_URL: &str = "http://localhost/";

/// What an anchor refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTarget {
    /// Knowledge-base entity id
    Qid(String),
    /// Document path with sentinels and base prefix removed
    File(String),
}

/// Resolves anchor targets against the site location.
#[derive(Debug, Clone)]
pub struct EntityResolver {
    base: Option<Url>,
    baseurl: String,
}

impl EntityResolver {
    /// Create a resolver. An unparseable site URL falls back to
    /// [`DEFAULT_SITE_URL`] with a warning.
    pub fn new(site_url: &str, baseurl: &str) -> Self {
        let base = Url::parse(site_url)
            .or_else(|err| {
                warn!("Invalid site URL '{}': {}. Using {}.", site_url, err, DEFAULT_SITE_URL);
                Url::parse(DEFAULT_SITE_URL)
            })
            .ok();
        Self {
            base,
            baseurl: baseurl.to_string(),
        }
    }

    /// Classify an anchor `href`.
    pub fn resolve(&self, href: &str) -> Option<EntityTarget> {
        if href.contains("mailto:") {
            return None;
        }
        let url = self.base.as_ref()?.join(href).ok()?;
        let pathname = url.path();
        let segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();
        let last = segments.last()?;

        if is_entity_id(last) {
            return Some(EntityTarget::Qid(last.to_string()));
        }
        if !segments.iter().any(|segment| segment.starts_with('~')) {
            return None;
        }

        let skip = usize::from(!self.baseurl.is_empty() && pathname.starts_with(&self.baseurl));
        let file = segments
            .iter()
            .skip(skip)
            .map(|segment| segment.replacen('~', "", 1))
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        Some(EntityTarget::File(file))
    }
}

impl Default for EntityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_URL, "")
    }
}

/// Replace qualifying anchors under `root`. Returns the number replaced.
pub fn rewrite_entity_links(root: &mut Element, resolver: &EntityResolver) -> usize {
    let paths = collect_paths(root, &|el: &Element| el.tag == "a");
    let mut replaced = 0;

    for path in paths {
        let Some(anchor) = element_at(root, &path) else {
            continue;
        };
        let Some(target) = anchor.attr("href").and_then(|href| resolver.resolve(href)) else {
            continue;
        };
        trace!("Entity link {:?} -> {:?}", anchor.attr("href"), target);

        let mut infobox = Element::new("mdp-entity-infobox");
        match target {
            EntityTarget::Qid(qid) => infobox.set_attr("qid", qid),
            EntityTarget::File(file) => infobox.set_attr("file", file),
        }
        infobox.children = anchor.children.clone();
        replace_at(root, &path, Node::Element(infobox));
        replaced += 1;
    }

    replaced
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
