//! Configuration module for mdpress
//!
//! Site settings, their file formats, per-document front-matter overrides
//! and persistence to the platform-specific config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
