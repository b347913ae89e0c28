//! mdpress
//!
//! Restructures rendered Markdown into a sectioned, widget-aware HTML
//! document. Headline declarations written in code spans and code blocks
//! (`mdp-map #paris zoom=4 Q90`) become typed components, attribute
//! merges, or head/body injections.

pub mod config;
pub mod dom;
pub mod error;
pub mod export;
pub mod files;
pub mod headline;
pub mod markdown;
pub mod materialize;
pub mod press;
pub mod restructure;
pub mod widgets;

pub use error::{Error, Result};
pub use press::{PressedDocument, Processor};
