pub mod analyzer;

pub use analyzer::{LexicalAnalyzer, LexicalMetrics};

use crate::diagnostics::DiagnosticBag;
use crate::tokens::TokenStream;

/// Tokenize one source buffer with default preferences
pub fn tokenize(source: &str, diagnostics: &mut DiagnosticBag) -> TokenStream {
    LexicalAnalyzer::new().tokenize(source, diagnostics)
}
