//! Span-accurate token stream management for the OPAL parser
//!
//! The lexer produces every token including whitespace; the stream keeps
//! them all for span fidelity and exposes a filtered significant-token view
//! for parsing. Navigation clamps at the trailing Eof token, so lookahead
//! never runs off the end of the buffer.

use crate::{
    tokens::token::*,
    utils::{Position, SourceMap, Span, Spanned},
};
use thiserror::Error;

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Token stream with trivia-filtered navigation over the full buffer
#[derive(Debug, Clone)]
pub struct TokenStream {
    /// All tokens (including whitespace) with original spans
    all_tokens: Vec<SpannedToken>,
    /// Indices into all_tokens for significant (non-whitespace) tokens
    significant_indices: Vec<usize>,
    /// Current position in significant_indices array
    position: usize,
    /// Source map for error reporting
    source_map: Option<SourceMap>,
}

impl TokenStream {
    /// Create a new token stream with automatic trivia filtering
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        let mut stream = Self {
            all_tokens: tokens,
            significant_indices: Vec::new(),
            position: 0,
            source_map: None,
        };
        stream.rebuild_significant_indices();
        stream
    }

    /// Create stream with source map for enhanced error reporting
    pub fn with_source_map(tokens: Vec<SpannedToken>, source_map: SourceMap) -> Self {
        let mut stream = Self {
            all_tokens: tokens,
            significant_indices: Vec::new(),
            position: 0,
            source_map: Some(source_map),
        };
        stream.rebuild_significant_indices();
        stream
    }

    fn rebuild_significant_indices(&mut self) {
        self.significant_indices.clear();

        for (i, spanned_token) in self.all_tokens.iter().enumerate() {
            if spanned_token.value.is_significant() {
                self.significant_indices.push(i);
            }
        }

        crate::log_debug!("Token stream built",
            "total_tokens" => self.all_tokens.len(),
            "significant_tokens" => self.significant_indices.len()
        );

        self.position = 0;
    }

    // === CORE NAVIGATION ===

    /// Get the current significant token with its span
    pub fn current(&self) -> Option<&SpannedToken> {
        self.significant_indices
            .get(self.position)
            .and_then(|&original_index| self.all_tokens.get(original_index))
    }

    /// Get the current token value (without span)
    pub fn current_token(&self) -> Option<&Token> {
        self.current().map(|spanned| &spanned.value)
    }

    /// Get the span of the current token
    pub fn current_span(&self) -> Option<Span> {
        self.current().map(|spanned| spanned.span)
    }

    /// Peek ahead by n positions; clamps at the trailing Eof token
    pub fn peek(&self, n: usize) -> Option<&SpannedToken> {
        if self.significant_indices.is_empty() {
            return None;
        }
        let clamped = (self.position + n).min(self.significant_indices.len() - 1);
        self.all_tokens.get(self.significant_indices[clamped])
    }

    /// Peek at the token value n positions ahead
    pub fn peek_token(&self, n: usize) -> Option<&Token> {
        self.peek(n).map(|spanned| &spanned.value)
    }

    /// Advance to the next significant token, stopping at Eof
    pub fn advance(&mut self) -> Option<&SpannedToken> {
        if self.position + 1 < self.significant_indices.len() {
            self.position += 1;
        }
        self.current()
    }

    /// Check if the current token is the end-of-file marker
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_token(), Some(Token::Eof) | None)
    }

    /// Get the number of significant tokens
    pub fn len(&self) -> usize {
        self.significant_indices.len()
    }

    /// Check if the stream has no significant tokens
    pub fn is_empty(&self) -> bool {
        self.significant_indices.is_empty()
    }

    // === SPAN ACCURACY METHODS ===

    /// Get span at a specific position in significant tokens
    pub fn span_at_position(&self, position: usize) -> Option<Span> {
        self.significant_indices
            .get(position)
            .and_then(|&original_index| self.all_tokens.get(original_index))
            .map(|spanned| spanned.span)
    }

    /// Get span covering from a saved start position to the current token
    pub fn span_from(&self, start_position: usize) -> Span {
        if let (Some(start_span), Some(current_span)) =
            (self.span_at_position(start_position), self.current_span())
        {
            start_span.merge(current_span)
        } else {
            self.current_span().unwrap_or_else(Span::dummy)
        }
    }

    /// Get span covering a range of significant token positions
    pub fn span_range(&self, start_pos: usize, end_pos: usize) -> Span {
        let start_span = self.span_at_position(start_pos);
        let end_span = self.span_at_position(end_pos);

        match (start_span, end_span) {
            (Some(start), Some(end)) => start.merge(end),
            (Some(start), None) => start,
            (None, Some(end)) => end,
            (None, None) => Span::dummy(),
        }
    }

    // === ERROR REPORTING ===

    /// Format an error with source context when a source map is attached
    pub fn format_error(&self, span: Span, message: &str) -> String {
        if let Some(ref source_map) = self.source_map {
            source_map.annotate(&span, message)
        } else {
            format!("Error at {}: {}", span, message)
        }
    }

    /// Get source text for a span (if source map available)
    pub fn source_text(&self, span: &Span) -> Option<&str> {
        self.source_map.as_ref().map(|sm| sm.span_text(span))
    }

    // === PARSER INTEGRATION METHODS ===

    /// Check if current token matches expected by discriminant
    pub fn check_token(&self, expected: &Token) -> bool {
        self.current_token()
            .map(|token| std::mem::discriminant(token) == std::mem::discriminant(expected))
            .unwrap_or(false)
    }

    /// Consume the current token if it matches the predicate
    pub fn consume_if<F>(&mut self, predicate: F) -> Option<SpannedToken>
    where
        F: FnOnce(&Token) -> bool,
    {
        if let Some(token) = self.current_token() {
            if predicate(token) {
                let result = self.current().cloned();
                self.advance();
                return result;
            }
        }
        None
    }

    /// Advance if current token matches expected
    pub fn advance_if_matches(&mut self, expected: &Token) -> bool {
        if self.check_token(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token discriminant, consuming it on success
    pub fn expect_token(&mut self, expected: Token) -> Result<SpannedToken, TokenStreamError> {
        if let Some(current) = self.current() {
            if std::mem::discriminant(&current.value) == std::mem::discriminant(&expected) {
                let result = current.clone();
                self.advance();
                Ok(result)
            } else {
                Err(TokenStreamError::UnexpectedToken {
                    expected: expected.as_source_string(),
                    found: current.value.as_source_string(),
                    span: current.span,
                })
            }
        } else {
            Err(TokenStreamError::UnexpectedEndOfStream {
                expected: expected.as_source_string(),
            })
        }
    }

    // === ITERATION ===

    /// Get an iterator over significant tokens with spans
    pub fn iter_significant(&self) -> impl Iterator<Item = &SpannedToken> {
        self.significant_indices
            .iter()
            .map(|&i| &self.all_tokens[i])
    }

    /// Get all tokens (including trivia) with spans
    pub fn all_tokens(&self) -> &[SpannedToken] {
        &self.all_tokens
    }

    // === DEBUGGING AND DIAGNOSTICS ===

    /// Get current position in significant tokens
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check that the buffer terminates with an Eof token
    pub fn has_eof(&self) -> bool {
        if let Some(&last_idx) = self.significant_indices.last() {
            matches!(self.all_tokens[last_idx].value, Token::Eof)
        } else {
            false
        }
    }

    /// One-line diagnostic of stream state
    pub fn diagnostic(&self) -> String {
        let current_info = if let Some(current) = self.current() {
            format!("'{}' at {}", current.value.as_source_string(), current.span)
        } else {
            "<empty>".to_string()
        };

        format!(
            "TokenStream(pos: {}/{}, current: {})",
            self.position,
            self.significant_indices.len(),
            current_info
        )
    }
}

/// Token stream errors with span accuracy
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenStreamError {
    #[error("Expected '{expected}', found '{found}' at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Expected '{expected}', but reached end of input")]
    UnexpectedEndOfStream { expected: String },
}

/// Token stream builder for tests and programmatic construction
#[derive(Debug, Default)]
pub struct TokenStreamBuilder {
    tokens: Vec<SpannedToken>,
    current_position: Position,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            current_position: Position::start(),
        }
    }

    /// Add a token, deriving its span from the source text it covers
    pub fn push_token(mut self, token: Token, text: &str) -> Self {
        let start = self.current_position;
        let end = start.advance_str(text);
        let span = Span::new(start, end);

        self.tokens.push(SpannedToken::new(token, span));
        self.current_position = end;
        self
    }

    /// Build the token stream, appending the Eof marker
    pub fn build(mut self) -> TokenStream {
        let at = self.current_position;
        self.tokens
            .push(SpannedToken::new(Token::Eof, Span::new(at, at)));
        TokenStream::new(self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::keywords::Keyword;

    fn sample_stream() -> TokenStream {
        TokenStreamBuilder::new()
            .push_token(Token::Keyword(Keyword::Return), "§R")
            .push_token(Token::Space, " ")
            .push_token(Token::IntLiteral(42), "42")
            .push_token(Token::Newline, "\n")
            .build()
    }

    #[test]
    fn test_trivia_is_filtered_but_retained() {
        let stream = sample_stream();
        // Keyword, literal, Eof are significant; space and newline are not
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.all_tokens().len(), 5);
        assert!(stream.has_eof());
    }

    #[test]
    fn test_peek_clamps_at_eof() {
        let stream = sample_stream();
        assert_eq!(stream.peek_token(0), Some(&Token::Keyword(Keyword::Return)));
        assert_eq!(stream.peek_token(1), Some(&Token::IntLiteral(42)));
        assert_eq!(stream.peek_token(2), Some(&Token::Eof));
        // Past the end still yields Eof
        assert_eq!(stream.peek_token(100), Some(&Token::Eof));
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut stream = sample_stream();
        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
        stream.advance();
        assert_eq!(stream.current_token(), Some(&Token::Eof));
    }

    #[test]
    fn test_spans_survive_filtering() {
        let stream = sample_stream();
        // The literal starts after "§R " in the source
        let literal_span = stream.span_at_position(1).unwrap();
        assert_eq!(literal_span.start.column, 4);
        assert_eq!(literal_span.len(), 2);
    }

    #[test]
    fn test_expect_token_reports_mismatch() {
        let mut stream = sample_stream();
        let result = stream.expect_token(Token::IntLiteral(0));
        assert!(matches!(
            result,
            Err(TokenStreamError::UnexpectedToken { .. })
        ));

        // Discriminant matching ignores the payload
        stream.advance();
        let ok = stream.expect_token(Token::IntLiteral(0)).unwrap();
        assert_eq!(ok.value, Token::IntLiteral(42));
    }

    #[test]
    fn test_consume_if_only_advances_on_match() {
        let mut stream = sample_stream();
        assert!(stream
            .consume_if(|t| matches!(t, Token::IntLiteral(_)))
            .is_none());
        assert!(stream
            .consume_if(|t| matches!(t, Token::Keyword(_)))
            .is_some());
        assert_eq!(stream.current_token(), Some(&Token::IntLiteral(42)));
    }
}
