//! Syntax-generation reconciliation
//!
//! Both attribute generations land in the same [`AttributeBag`]; the
//! functions here turn a bag into the canonical fields of one construct,
//! expanding type, effect, semantic, and visibility shorthand along the way.

pub mod constructs;
pub mod shorthand;

pub use shorthand::{expand_effects, expand_semantic, parse_type, parse_visibility};
