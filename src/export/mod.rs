//! Document Export Module for mdpress
//!
//! Writes pressed documents as standalone HTML pages or as bare `main`
//! fragments for embedding in an existing layout.
//!
//! # Architecture
//!
//! - `options.rs` - Export format and options
//! - `html.rs` - Page and fragment generation

pub mod html;
pub mod options;

pub use html::{export_to_html_file, generate_html_document, generate_html_fragment, render};
pub use options::{ExportFormat, ExportOptions};
