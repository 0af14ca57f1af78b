//! Grammar definitions for OPAL
//!
//! `keywords` holds the tag keyword table; `ast` holds the tree the parser
//! produces.

pub mod ast;
pub mod keywords;

pub use ast::nodes;
pub use keywords::Keyword;
