//! HTML Export Generation
//!
//! This module writes pressed documents out as complete HTML pages or bare
//! fragments. Registered `link` elements land in `<head>`, registered
//! `script` elements at the end of `<body>`.

use log::info;
use std::fs;
use std::path::Path;

use crate::dom::{escape_attr, escape_text};
use crate::dom::Element;
use crate::error::{Error, Result};
use crate::export::options::{ExportFormat, ExportOptions};
use crate::press::{PressedDocument, Processor};

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML document from a pressed document.
pub fn generate_html_document(doc: &PressedDocument, options: &ExportOptions) -> String {
    let title = doc.title().unwrap_or_else(|| "Untitled".to_string());

    let mut head = String::new();
    if options.include_meta {
        for (name, value) in [
            ("description", &doc.config.description),
            ("robots", &doc.config.robots),
        ] {
            if !value.is_empty() {
                head.push_str(&format!(
                    "    <meta name=\"{}\" content=\"{}\">\n",
                    name,
                    escape_attr(value)
                ));
            }
        }
    }
    head.push_str(&render_elements(&doc.effects.head, "    "));

    let mut css = String::new();
    if options.include_base_css {
        css.push_str(BASE_CSS);
    }
    if let Some(custom) = &options.custom_css {
        css.push_str(custom);
        css.push('\n');
    }
    let style = if css.is_empty() {
        String::new()
    } else {
        format!("    <style>\n{}    </style>\n", css)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="mdpress">
    <title>{title}</title>
{head}{style}</head>
<body>
{body}
{scripts}</body>
</html>
"#,
        lang = escape_attr(&options.lang),
        title = escape_text(&title),
        head = head,
        style = style,
        body = doc.main.outer_html(),
        scripts = render_elements(&doc.effects.body, ""),
    )
}

/// Generate an HTML fragment: the restructured `main` element only.
pub fn generate_html_fragment(doc: &PressedDocument) -> String {
    doc.main.outer_html()
}

/// Render a pressed document in the format selected by `options`.
pub fn render(doc: &PressedDocument, options: &ExportOptions) -> String {
    match options.format {
        ExportFormat::Page => generate_html_document(doc, options),
        ExportFormat::Fragment => generate_html_fragment(doc),
    }
}

/// Process a markdown file and write the result to `output_path`.
pub fn export_to_html_file(
    source_path: &Path,
    output_path: &Path,
    processor: &Processor,
    options: &ExportOptions,
) -> Result<()> {
    let doc = processor.process_file(source_path)?;
    let html = render(&doc, options);

    if let Some(dir) = output_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| Error::FileWrite {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(output_path, html).map_err(|e| Error::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    info!("Exported {} -> {}", source_path.display(), output_path.display());
    Ok(())
}

fn render_elements(elements: &[Element], indent: &str) -> String {
    elements
        .iter()
        .map(|el| format!("{}{}\n", indent, el.outer_html()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for restructured pages (sections, cards, columns).
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

.page-content {
    max-width: 900px;
    margin: 0 auto;
    padding: 32px 24px;
}

.page-content section {
    margin-bottom: 24px;
}

.page-content img {
    max-width: 100%;
    height: auto;
}

/* Cards */
.cards.wrapper {
    display: grid;
    grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
    gap: 16px;
}

.card {
    padding: 12px;
    border: 1px solid rgba(128, 128, 128, 0.3);
    border-radius: 6px;
}

.read-more input[type="checkbox"] {
    display: none;
}

.read-more p {
    max-height: 6em;
    overflow: hidden;
    margin-bottom: 4px;
}

.read-more input[type="checkbox"]:checked ~ p {
    max-height: none;
}

.read-more label {
    cursor: pointer;
    font-size: 0.875em;
}

/* Columns */
.columns.wrapper {
    display: flex;
    gap: 24px;
}

.columns.wrapper > section {
    flex: 1;
    min-width: 0;
}

/* Marks and timestamps */
mark[class], mark[title] {
    background: rgba(255, 220, 0, 0.35);
}

p[data-head]::before {
    content: attr(data-head);
    display: block;
    font-weight: 600;
}
"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
