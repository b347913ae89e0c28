//! Document processing pipeline
//!
//! A [`Processor`] owns the site configuration and runs one complete
//! restructuring run per document: Markdown is parsed into a tree, the
//! normalization passes and the restructuring engine rewrite it, and the
//! result is returned as a [`PressedDocument`] ready for export.

use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::{FrontMatter, SiteConfig};
use crate::dom::Element;
use crate::error::{Error, Result};
use crate::markdown::parse_markdown;
use crate::materialize::{materialize_declarations, DocumentEffects, Scope};
use crate::restructure::{
    apply_attribute_paragraphs, apply_highlight_marks, apply_page_attributes,
    apply_param_attributes, apply_timestamps, build_sections, convert_component_paragraphs,
    finalize_footer, normalize_placeholder_headings, remove_blank_headings,
};
use crate::widgets::{apply_widgets, rewrite_entity_links, EntityResolver, ToggleIds};

// ─────────────────────────────────────────────────────────────────────────────
// Pressed Document
// ─────────────────────────────────────────────────────────────────────────────

/// The result of one restructuring run.
#[derive(Debug, Clone)]
pub struct PressedDocument {
    /// The restructured `main` element
    pub main: Element,
    /// Elements destined for the page head and the end of the body
    pub effects: DocumentEffects,
    /// Site configuration with the document's front matter applied
    pub config: SiteConfig,
    /// Number of "read more" toggles created by card sections
    pub toggles: usize,
}

impl PressedDocument {
    /// Page title: the configured title, else the header component's
    /// label, else the first heading.
    pub fn title(&self) -> Option<String> {
        if !self.config.title.is_empty() {
            return Some(self.config.title.clone());
        }
        let header_label = self
            .main
            .find_descendant(&|el: &Element| el.tag == "mdp-header")
            .and_then(|header| header.attr("label"))
            .map(str::trim)
            .filter(|label| !label.is_empty());
        if let Some(label) = header_label {
            return Some(label.to_string());
        }
        self.main
            .find_descendant(&|el: &Element| el.is_heading())
            .map(|heading| heading.text_content().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Section tree of the document in document order.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        outline(&self.main)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outline
// ─────────────────────────────────────────────────────────────────────────────

/// One section of a restructured document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub data_id: String,
    pub level: u8,
    pub title: String,
}

/// List every heading section under `root` with its hierarchical id, level
/// and heading text.
pub fn outline(root: &Element) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    collect_outline(root, &mut entries);
    entries
}

fn collect_outline(el: &Element, entries: &mut Vec<OutlineEntry>) {
    for child in el.element_children() {
        if child.tag == "section" {
            let level = child
                .classes()
                .find_map(|class| class.strip_prefix("section")?.parse::<u8>().ok());
            if let (Some(data_id), Some(level)) = (child.attr("data-id"), level) {
                let title = child
                    .element_children()
                    .find(|c| c.is_heading())
                    .map(|heading| heading.text_content().trim().to_string())
                    .unwrap_or_default();
                entries.push(OutlineEntry {
                    data_id: data_id.to_string(),
                    level,
                    title,
                });
            }
        }
        collect_outline(child, entries);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Processor
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the restructuring pipeline with a fixed site configuration.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    config: SiteConfig,
}

impl Processor {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Read and process a Markdown file.
    pub fn process_file(&self, path: &Path) -> Result<PressedDocument> {
        let markdown = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Processing {}", path.display());
        self.process(&markdown)
    }

    /// Process Markdown text.
    ///
    /// Fails only when the front matter is not valid YAML. Malformed
    /// declarations never fail a document; they stay in place as code.
    pub fn process(&self, markdown: &str) -> Result<PressedDocument> {
        let mut config = self.config.clone();
        let parsed = parse_markdown(markdown, &config.markdown)?;
        if let Some(front_matter) = parsed.front_matter.as_deref() {
            config.apply_front_matter(&FrontMatter::parse(front_matter)?);
        }

        let mut main = parsed.main;
        let mut effects = DocumentEffects::default();
        let mut toggles = ToggleIds::new();

        normalize_placeholder_headings(&mut main);
        convert_component_paragraphs(&mut main);
        apply_highlight_marks(&mut main);
        apply_param_attributes(&mut main);
        // Heading ids and classes must be in place before sections copy them
        materialize_declarations(&mut main, &mut effects, Scope::Headings);

        build_sections(&mut main);
        remove_blank_headings(&mut main);

        apply_timestamps(&mut main);
        apply_attribute_paragraphs(&mut main);
        materialize_declarations(&mut main, &mut effects, Scope::All);

        apply_widgets(&mut main, &mut toggles);
        let resolver = EntityResolver::new(&config.site_url, &config.baseurl);
        let entities = rewrite_entity_links(&mut main, &resolver);

        finalize_footer(&mut main);
        apply_page_attributes(&mut main);

        debug!(
            "Pressed document: {} head, {} body side effects, {} entity links",
            effects.head.len(),
            effects.body.len(),
            entities
        );

        Ok(PressedDocument {
            main,
            effects,
            config,
            toggles: toggles.allocated(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::path::{collect_paths, element_at};

    fn press(markdown: &str) -> PressedDocument {
        Processor::default().process(markdown).unwrap()
    }

    fn find_all<'a>(root: &'a Element, tag: &str) -> Vec<&'a Element> {
        collect_paths(root, &|el: &Element| el.tag == tag)
            .iter()
            .filter_map(|path| element_at(root, path))
            .collect()
    }

    #[test]
    fn test_main_page_attributes() {
        let doc = press("# Title\n\nBody\n");
        assert!(doc.main.has_class("page-content"));
        assert!(doc.main.has_class("markdown-body"));
        assert_eq!(doc.main.attr("aria-label"), Some("Content"));
        assert_eq!(doc.main.attr("data-theme"), Some("light"));
    }

    #[test]
    fn test_segments_numbered_in_order() {
        let doc = press("# A\n\none\n\ntwo\n\nthree\n");
        let paragraphs = find_all(&doc.main, "p");
        let ids: Vec<_> = paragraphs.iter().filter_map(|p| p.attr("data-id")).collect();
        assert_eq!(ids, vec!["1.1", "1.2", "1.3"]);
        assert!(paragraphs.iter().all(|p| p.has_class("segment")));
    }

    #[test]
    fn test_html_blocks_take_part_in_segments() {
        let doc = press("# A\n\none\n\n<div>raw</div>\n\ntwo\n");
        let section = doc.main.element_children().next().unwrap();
        let segments: Vec<_> = section
            .element_children()
            .filter_map(|el| Some((el.tag.as_str(), el.attr("data-id")?)))
            .collect();
        assert_eq!(segments, vec![("p", "1.1"), ("div", "1.2"), ("p", "1.3")]);
    }

    #[test]
    fn test_html_anchor_becomes_entity_reference() {
        let doc = press("# Page\n\nSee <a href=\"https://www.wikidata.org/wiki/Q42\">Adams</a>.\n");
        let boxes = find_all(&doc.main, "mdp-entity-infobox");
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].attr("qid"), Some("Q42"));
        assert_eq!(boxes[0].text_content(), "Adams");
    }

    #[test]
    fn test_html_footer_is_finalized() {
        let doc = press(concat!(
            "# Page\n\nBody\n\n",
            "<mdp-footer>\n\n- {.sticky}\n- Copyright\n\n</mdp-footer>\n\n",
            "## Next\n\nMore\n",
        ));
        let footer = doc.main.element_children().last().unwrap();
        assert_eq!(footer.tag, "mdp-footer");
        assert_eq!(
            footer.inner_html(),
            r#"<ul><li class="sticky"></li><li>Copyright</li></ul>"#
        );
        assert_eq!(find_all(&doc.main, "mdp-footer").len(), 1);
    }

    #[test]
    fn test_html_param_applies_to_previous_block() {
        let doc = press("# A\n\nSome text\n\n<param class=\"wide\" id=\"lead\">\n\nMore\n");
        assert!(find_all(&doc.main, "param").is_empty());

        let paragraphs = find_all(&doc.main, "p");
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].has_class("wide"));
        assert_eq!(paragraphs[0].attr("data-id"), Some("1.1"));
        assert_eq!(paragraphs[1].attr("data-id"), Some("1.2"));
    }

    #[test]
    fn test_section_ids_unique_and_nested() {
        let doc = press("# A\n\ntext\n\n## B\n\ntext\n\n## C\n\n# D\n\n### E\n");
        let ids: Vec<String> = doc.outline().into_iter().map(|entry| entry.data_id).collect();
        assert_eq!(ids, vec!["1", "1.1", "1.2", "2", "3"]);

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_heading_declaration_reaches_section() {
        let doc = press("## Intro `#intro .lead`\n\nHello\n");
        let section = doc.main.element_children().next().unwrap();
        assert_eq!(section.tag, "section");
        assert_eq!(section.id(), Some("intro"));
        assert!(section.has_class("section2"));
        assert!(section.has_class("lead"));
    }

    #[test]
    fn test_tabs_from_child_sections() {
        let doc = press("## Choices `.tabs`\n\n### Alpha\n\nFirst\n\n### Beta\n\nSecond\n");

        let groups = find_all(&doc.main, "sl-tab-group");
        assert_eq!(groups.len(), 1);
        let group = groups[0];

        let tabs: Vec<_> = group.element_children().filter(|el| el.tag == "sl-tab").collect();
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].text_content(), "Alpha");
        assert_eq!(tabs[0].attr("panel"), Some("tab1"));
        assert_eq!(tabs[1].text_content(), "Beta");
        assert_eq!(tabs[1].attr("panel"), Some("tab2"));

        let panels: Vec<_> = group.element_children().filter(|el| el.tag == "sl-tab-panel").collect();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].attr("name"), Some("tab1"));
        assert!(panels[0].text_content().contains("First"));
        assert_eq!(panels[1].attr("name"), Some("tab2"));
        assert!(panels[1].text_content().contains("Second"));
    }

    #[test]
    fn test_script_and_link_side_effects() {
        let doc = press("# Page\n\nIntro\n\n`script src=\"a.js\"`\n\n`link href=\"a.css\" rel=stylesheet`\n");

        assert_eq!(doc.effects.body.len(), 1);
        assert_eq!(doc.effects.body[0].tag, "script");
        assert_eq!(doc.effects.body[0].attr("src"), Some("a.js"));
        assert_eq!(doc.effects.head.len(), 1);
        assert_eq!(doc.effects.head[0].tag, "link");
        assert_eq!(doc.effects.head[0].attr("href"), Some("a.css"));

        assert!(find_all(&doc.main, "code").is_empty());
        assert_eq!(find_all(&doc.main, "p").len(), 1);
    }

    #[test]
    fn test_entity_links_rewritten() {
        let doc = press("# Page\n\nSee [Adams](Q123) and [notes](/~people/adams).\n");
        let boxes = find_all(&doc.main, "mdp-entity-infobox");
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].attr("qid"), Some("Q123"));
        assert_eq!(boxes[0].text_content(), "Adams");
        assert_eq!(boxes[1].attr("file"), Some("people/adams"));
        assert!(find_all(&doc.main, "a").is_empty());
    }

    #[test]
    fn test_entity_links_skip_baseurl() {
        let config = SiteConfig {
            baseurl: "/essays".to_string(),
            ..SiteConfig::default()
        };
        let doc = Processor::new(config).process("[notes](/essays/~people/adams)\n").unwrap();
        let boxes = find_all(&doc.main, "mdp-entity-infobox");
        assert_eq!(boxes[0].attr("file"), Some("people/adams"));
    }

    #[test]
    fn test_typed_component_replaces_paragraph() {
        let doc = press("# Map\n\n`mdp-map #paris zoom=4 Q90`\n");
        let maps = find_all(&doc.main, "mdp-map");
        assert_eq!(maps.len(), 1);
        assert_eq!(maps[0].id(), Some("paris"));
        assert_eq!(maps[0].attr("zoom"), Some("4"));
        assert_eq!(maps[0].attr("entities"), Some("Q90"));
        assert!(maps[0].attr("data-id").is_none());
    }

    #[test]
    fn test_foreign_code_block_untouched() {
        let doc = press("# Code\n\n```rust\nfn main() {}\n```\n");
        let code = find_all(&doc.main, "code");
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].text_content(), "fn main() {}\n");
    }

    #[test]
    fn test_cards_get_toggle_ids() {
        let doc = press("## Team `.cards`\n\n### Ada\n\nFirst card text\n\n### Alan\n\nSecond card text\n");
        assert_eq!(doc.toggles, 2);

        let wrappers = find_all(&doc.main, "section");
        assert!(wrappers.iter().any(|section| section.has_class("wrapper")));

        // A second widget pass leaves wrapped sections alone
        let mut again = doc.main.clone();
        apply_widgets(&mut again, &mut ToggleIds::new());
        assert_eq!(again, doc.main);
    }

    #[test]
    fn test_front_matter_overrides_title() {
        let doc = press("---\ntitle: Essay One\n---\n\n# Heading\n");
        assert_eq!(doc.config.title, "Essay One");
        assert_eq!(doc.title().as_deref(), Some("Essay One"));
    }

    #[test]
    fn test_invalid_front_matter_is_error() {
        let result = Processor::default().process("---\ntitle: [unclosed\n---\n\n# Heading\n");
        assert!(matches!(result, Err(Error::FrontMatter { .. })));
    }

    #[test]
    fn test_title_falls_back_to_first_heading() {
        let doc = press("# First Heading\n\ntext\n\n## Second\n");
        assert_eq!(doc.title().as_deref(), Some("First Heading"));
        assert_eq!(press("just text\n").title(), None);
    }

    #[test]
    fn test_outline_levels_and_titles() {
        let outline = press("# One\n\n## Two\n\n### Three\n").outline();
        assert_eq!(
            outline,
            vec![
                OutlineEntry { data_id: "1".to_string(), level: 1, title: "One".to_string() },
                OutlineEntry { data_id: "1.1".to_string(), level: 2, title: "Two".to_string() },
                OutlineEntry { data_id: "1.1.1".to_string(), level: 3, title: "Three".to_string() },
            ]
        );
    }

    #[test]
    fn test_outline_skips_non_heading_sections() {
        let outline = press("# One\n\nText[^1]\n\n[^1]: A note.\n").outline();
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].data_id, "1");
    }

    #[test]
    fn test_process_file_missing() {
        let result = Processor::default().process_file(Path::new("/definitely/not/here.md"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
