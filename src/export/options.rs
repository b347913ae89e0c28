//! Export Options and Configuration
//!
//! This module defines the export format and the options controlling how a
//! pressed document is written out.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Complete HTML page with head and body injections
    #[default]
    Page,
    /// The restructured `main` element only
    Fragment,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Page => "HTML Page",
            ExportFormat::Fragment => "HTML Fragment",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        "html"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for document export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// The export format to use
    pub format: ExportFormat,

    /// Whether to inline the base stylesheet for sections and widgets
    pub include_base_css: bool,

    /// Whether to emit description and robots meta tags
    pub include_meta: bool,

    /// Value of the `lang` attribute on `<html>`
    pub lang: String,

    /// Custom CSS to append (optional)
    pub custom_css: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            include_base_css: true,
            include_meta: true,
            lang: "en".to_string(),
            custom_css: None,
        }
    }
}

impl ExportOptions {
    /// Create options for a complete page.
    pub fn page() -> Self {
        Self::default()
    }

    /// Create options for a bare fragment.
    pub fn fragment() -> Self {
        Self {
            format: ExportFormat::Fragment,
            include_base_css: false,
            include_meta: false,
            ..Default::default()
        }
    }

    /// Append custom CSS after the base stylesheet.
    pub fn with_custom_css(mut self, css: impl Into<String>) -> Self {
        self.custom_css = Some(css.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
