//! Accumulating diagnostics for the OPAL front-end
//!
//! Every stage reports problems into a [`DiagnosticBag`] and keeps going.
//! Nothing in the lexer or parser returns early on user errors; callers
//! check [`DiagnosticBag::has_errors`] after the run to decide whether the
//! produced tree is usable.

use crate::logging::codes::Code;
use crate::{log_error, log_warning};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Severity of a user-facing diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A single user-facing diagnostic with its source location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(span: Span, code: Code, severity: Severity, message: String) -> Self {
        Self {
            span,
            code: code.as_str().to_string(),
            severity,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Format as a single line for quick display
    pub fn format(&self) -> String {
        format!(
            "{}[{}]: {} at {}",
            self.severity.as_str(),
            self.code,
            self.message,
            self.span
        )
    }
}

/// Ordered collection of diagnostics produced by one compilation
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    items: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error diagnostic
    pub fn error(&mut self, code: Code, span: Span, message: impl Into<String>) {
        let message = message.into();
        log_error!(code, &message, span = span);
        self.push(Diagnostic::new(span, code, Severity::Error, message));
    }

    /// Record a warning diagnostic
    pub fn warning(&mut self, code: Code, span: Span, message: impl Into<String>) {
        let message = message.into();
        log_warning!(&message, "code" => code, "span" => span);
        self.push(Diagnostic::new(span, code, Severity::Warning, message));
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        // Pathological inputs stop accumulating past the cap but the error
        // count stays accurate
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        if self.items.len() < crate::config::compile_time::diagnostics::MAX_DIAGNOSTICS {
            self.items.push(diagnostic);
        }
    }

    /// Whether any error-severity diagnostic has been recorded
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Count diagnostics carrying a specific code
    pub fn count_of(&self, code: Code) -> usize {
        self.items
            .iter()
            .filter(|d| d.code == code.as_str())
            .count()
    }

    /// First diagnostic carrying a specific code, if any
    pub fn first_of(&self, code: Code) -> Option<&Diagnostic> {
        self.items.iter().find(|d| d.code == code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_empty_bag_has_no_errors() {
        let bag = DiagnosticBag::new();
        assert!(!bag.has_errors());
        assert!(bag.is_empty());
    }

    #[test]
    fn test_error_sets_has_errors() {
        let mut bag = DiagnosticBag::new();
        bag.error(
            codes::syntax::UNEXPECTED_TOKEN,
            Span::dummy(),
            "unexpected token",
        );

        assert!(bag.has_errors());
        assert_eq!(bag.error_count(), 1);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_warning_does_not_set_has_errors() {
        let mut bag = DiagnosticBag::new();
        bag.warning(
            codes::attributes::CONFLICTING_ATTRIBUTE_GROUPS,
            Span::dummy(),
            "second positional group",
        );

        assert!(!bag.has_errors());
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_count_of_filters_by_code() {
        let mut bag = DiagnosticBag::new();
        bag.error(codes::syntax::MISMATCHED_ID, Span::dummy(), "id mismatch");
        bag.error(codes::syntax::MISMATCHED_ID, Span::dummy(), "id mismatch");
        bag.error(
            codes::syntax::MISSING_EXPRESSION,
            Span::dummy(),
            "expression expected",
        );

        assert_eq!(bag.count_of(codes::syntax::MISMATCHED_ID), 2);
        assert_eq!(bag.count_of(codes::syntax::MISSING_EXPRESSION), 1);
        assert_eq!(bag.count_of(codes::syntax::UNEXPECTED_TOKEN), 0);
    }

    #[test]
    fn test_diagnostics_keep_insertion_order() {
        let mut bag = DiagnosticBag::new();
        bag.error(codes::lexical::UNEXPECTED_CHARACTER, Span::dummy(), "first");
        bag.warning(
            codes::attributes::CONFLICTING_ATTRIBUTE_GROUPS,
            Span::dummy(),
            "second",
        );
        bag.error(codes::syntax::UNEXPECTED_TOKEN, Span::dummy(), "third");

        let messages: Vec<&str> = bag.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_format_names_code_and_severity() {
        let diagnostic = Diagnostic::new(
            Span::dummy(),
            codes::syntax::MISSING_REQUIRED_ATTRIBUTE,
            Severity::Error,
            "missing id".to_string(),
        );
        let line = diagnostic.format();
        assert!(line.contains("error"));
        assert!(line.contains("E051"));
        assert!(line.contains("missing id"));
    }
}
