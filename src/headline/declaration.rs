//! The structured form of a parsed declaration line.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dom::{style_string, Element};

// ─────────────────────────────────────────────────────────────────────────────
// PropertyMap
// ─────────────────────────────────────────────────────────────────────────────

/// Insertion-ordered string map used for styles and keyword arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, replacing any existing one in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append a value, space-joining onto an existing non-empty one.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) if !entry.1.is_empty() => {
                entry.1.push(' ');
                entry.1.push_str(&value);
            }
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
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

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Declaration
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed headline declaration.
///
/// Merge rules per field:
/// - `class` appends (space-joined, never deduplicated)
/// - `style` keeps one value per property, later writes replace earlier ones
/// - `kwargs` space-joins repeated keys
/// - `id` is last write wins
/// - `tag` is first qualifying token wins (except `script`/`link`)
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Declaration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "PropertyMap::is_empty")]
    pub style: PropertyMap,
    #[serde(skip_serializing_if = "PropertyMap::is_empty")]
    pub kwargs: PropertyMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Declaration {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Append a class name.
    pub fn push_class(&mut self, class: &str) {
        match &mut self.class {
            Some(existing) => {
                existing.push(' ');
                existing.push_str(class);
            }
            None => self.class = Some(class.to_string()),
        }
    }

    /// Class names in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class.as_deref().unwrap_or_default().split_whitespace()
    }

    /// True when the declaration names a script or link side effect.
    pub fn is_side_effect(&self) -> bool {
        matches!(self.tag.as_deref(), Some("script") | Some("link"))
    }

    /// True when there is something to merge onto an existing element.
    pub fn has_attributes(&self) -> bool {
        self.id.is_some() || self.class.is_some() || !self.style.is_empty() || !self.entities.is_empty()
    }

    /// Component kind of the tag: everything after its leading segment.
    ///
    /// `mdp-header` is a `header`, `ve-image-grid` an `image-grid`.
    pub fn component_kind(&self) -> Option<&str> {
        let tag = self.tag.as_deref()?;
        tag.split_once('-').map(|(_, kind)| kind)
    }

    /// Serialized inline style, `None` when no properties are declared.
    pub fn style_attr(&self) -> Option<String> {
        (!self.style.is_empty()).then(|| style_string(self.style.iter()))
    }

    /// Merge id, classes, style, entities and keyword arguments onto `target`.
    ///
    /// Style replaces any existing inline style. Entities are written to
    /// `entities_attr` space-joined.
    pub fn apply_to(&self, target: &mut Element, entities_attr: &str) {
        if let Some(id) = &self.id {
            target.set_id(id.clone());
        }
        for class in self.classes() {
            target.add_class(class);
        }
        if let Some(style) = self.style_attr() {
            target.set_attr("style", style);
        }
        if !self.entities.is_empty() {
            target.set_attr(entities_attr, self.entities.join(" "));
        }
        for (key, value) in self.kwargs.iter() {
            target.set_attr(key, value);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
