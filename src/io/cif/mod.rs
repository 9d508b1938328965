//! Minimal CIF syntax layer: a tokenizer and an untyped document model.
//!
//! This is deliberately not a CIF validator. It understands exactly as
//! much of the grammar as category extraction needs.

mod dom;
mod parse;

pub use dom::{Block, Category, Document};
pub use parse::{CifError, Value};
