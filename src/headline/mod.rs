//! Headline declaration mini-language
//!
//! A declaration is a single line such as
//! `mdp-image .wide #hero src="cat.png" :maxWidth=40% Q146`, found inside a
//! code span or code block. The tokenizer splits it, the parser classifies
//! every token into a [`Declaration`], and the code-block interpreter turns
//! additional lines into positional arguments.

mod code_block;
mod declaration;
mod parser;
mod tokenizer;

pub use code_block::{declaration_lines, interpret_code};
pub use declaration::{Declaration, PropertyMap};
pub use parser::{camel_to_kebab, is_entity_id, parse_headline};
pub use tokenizer::{normalize_quotes, tokenize};
