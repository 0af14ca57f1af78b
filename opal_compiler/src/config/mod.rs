//! Configuration module for the OPAL front-end
//!
//! Compile-time limits live in `constants`; user-facing preferences live in
//! `runtime` and come from environment variables or a TOML file.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::RuntimeConfig;
