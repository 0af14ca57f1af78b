// Internal modules
#[macro_use]
pub mod logging;

pub mod attributes;
pub mod config;
pub mod diagnostics;
pub mod grammar;
pub mod lexical;
pub mod reconcile;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use diagnostics::{Diagnostic, DiagnosticBag, Severity};
pub use grammar::ast::Module;
pub use lexical::{tokenize, LexicalAnalyzer};
pub use syntax::parse;
pub use tokens::{Token, TokenStream};
pub use utils::{Position, Span};

/// Lex and parse one source buffer, accumulating diagnostics
pub fn parse_source(source: &str, diagnostics: &mut DiagnosticBag) -> Module {
    let tokens = lexical::tokenize(source, diagnostics);
    syntax::parse(tokens, diagnostics)
}
