//! Parser core: cursor helpers, recovery primitives, and the entry point
//!
//! The parser walks the significant-token view once, left to right, making
//! every choice from the current token kind. There is no backtracking; a
//! production either commits or reports a diagnostic and advances. The
//! result is always a [`Module`], however broken the input.

use crate::attributes::{read_groups, AttributeBag};
use crate::config::constants::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::config::runtime::SyntaxPreferences;
use crate::diagnostics::DiagnosticBag;
use crate::grammar::ast::Module;
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::log_success;
use crate::reconcile::constructs;
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;

/// Recursive-descent parser over a token stream
pub struct Parser<'d> {
    pub(super) tokens: TokenStream,
    pub(super) diagnostics: &'d mut DiagnosticBag,
    pub(super) depth: usize,
    pub(super) preferences: SyntaxPreferences,
}

/// Parse a token stream into a module, accumulating diagnostics
pub fn parse(tokens: TokenStream, diagnostics: &mut DiagnosticBag) -> Module {
    let mut parser = Parser::new(tokens, diagnostics);
    let module = parser.parse_module();

    log_success!(codes::success::PARSE_COMPLETE,
        "Parsing completed",
        "module_id" => module.id,
        "functions" => module.functions.len(),
        "classes" => module.classes.len(),
        "interfaces" => module.interfaces.len(),
        "errors" => parser.diagnostics.error_count()
    );

    module
}

impl<'d> Parser<'d> {
    pub fn new(tokens: TokenStream, diagnostics: &'d mut DiagnosticBag) -> Self {
        Self {
            tokens,
            diagnostics,
            depth: 0,
            preferences: SyntaxPreferences::default(),
        }
    }

    pub fn with_preferences(
        tokens: TokenStream,
        diagnostics: &'d mut DiagnosticBag,
        preferences: SyntaxPreferences,
    ) -> Self {
        Self {
            tokens,
            diagnostics,
            depth: 0,
            preferences,
        }
    }

    // ========================================================================
    // CURSOR HELPERS
    // ========================================================================

    pub(super) fn current_span(&self) -> Span {
        self.tokens.current_span().unwrap_or_else(Span::dummy)
    }

    pub(super) fn current_keyword(&self) -> Option<Keyword> {
        self.tokens.current_token().and_then(Token::as_keyword)
    }

    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_keyword() == Some(keyword)
    }

    /// Consume the current token if it is the given keyword
    pub(super) fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.tokens.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn advance(&mut self) {
        self.tokens.advance();
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.tokens.is_at_end()
    }

    /// Read the attribute groups at the cursor
    pub(super) fn read_attrs(&mut self) -> (AttributeBag, Span) {
        read_groups(&mut self.tokens, self.diagnostics)
    }

    // ========================================================================
    // RECOVERY PRIMITIVES
    // ========================================================================

    /// Report an unexpected token without consuming it
    pub(super) fn unexpected_token(&mut self, context: &str) {
        let span = self.current_span();
        let found = self
            .tokens
            .current_token()
            .map(Token::as_source_string)
            .unwrap_or_else(|| "<end of input>".to_string());
        self.diagnostics.error(
            codes::syntax::UNEXPECTED_TOKEN,
            span,
            format!("unexpected '{}' {}", found, context),
        );
    }

    /// Guard against runaway recursion; reports once per overflow point
    pub(super) fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_PARSE_DEPTH {
            let span = self.current_span();
            self.diagnostics.error(
                codes::syntax::MAX_RECURSION_DEPTH,
                span,
                format!("nesting deeper than {} levels", MAX_PARSE_DEPTH),
            );
            false
        } else {
            true
        }
    }

    pub(super) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ========================================================================
    // OPEN/CLOSE TAG MATCHING
    // ========================================================================

    /// Consume a construct's closing tag and check its id against the
    /// opening tag's id. `open_id` of `None` skips the check for constructs
    /// that do not participate in id matching.
    pub(super) fn expect_close(
        &mut self,
        end: Keyword,
        construct: &str,
        open_id: Option<&str>,
    ) -> Span {
        if self.check_keyword(end) {
            self.advance();
            let (bag, close_span) = self.read_attrs();
            if let Some(open_id) = open_id {
                let close_id = constructs::close_id(&bag);
                self.verify_close_id(construct, open_id, &close_id, close_span);
            }
            close_span
        } else {
            let span = self.current_span();
            let found = self
                .tokens
                .current_token()
                .map(Token::as_source_string)
                .unwrap_or_else(|| "<end of input>".to_string());
            self.diagnostics.error(
                codes::syntax::UNEXPECTED_TOKEN,
                span,
                format!("expected closing tag for {}, found '{}'", construct, found),
            );
            span
        }
    }

    /// One generic id-match check used at every nesting level. A close tag
    /// without an id closes implicitly and is never a mismatch.
    pub(super) fn verify_close_id(
        &mut self,
        construct: &str,
        open_id: &str,
        close_id: &str,
        span: Span,
    ) {
        if close_id.is_empty() || open_id == close_id {
            return;
        }
        self.diagnostics.error(
            codes::syntax::MISMATCHED_ID,
            span,
            format!(
                "mismatched {} id: opened as '{}' but closed as '{}'",
                construct, open_id, close_id
            ),
        );
    }
}
