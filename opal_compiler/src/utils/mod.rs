//! Shared utilities for the OPAL front-end

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
