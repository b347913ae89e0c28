//! Restructuring engine
//!
//! Rewrites the flat block sequence produced by the Markdown front end into
//! a nested section tree with hierarchical identifiers, plus the local
//! normalization passes that run before and after sectioning.

mod compat;
mod placeholders;
mod sections;

pub use compat::{
    apply_attribute_paragraphs, apply_highlight_marks, apply_page_attributes,
    apply_param_attributes, apply_timestamps, finalize_footer,
};
pub use placeholders::{convert_component_paragraphs, normalize_placeholder_headings};
pub use sections::{build_sections, remove_blank_headings};
