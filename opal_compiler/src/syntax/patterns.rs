//! Match pattern parsing
//!
//! Patterns reuse the prefix-form surface: composite patterns are
//! parenthesized with a word head (`pos`, `prop`, `rel`, `list`), while
//! simple patterns are a bare identifier, a literal, or a wrapped
//! option/result tag. `_` is the wildcard.

use crate::grammar::ast::{Pattern, PatternKind};
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::syntax::parser::Parser;
use crate::tokens::Token;
use crate::utils::Span;

/// Check whether a token can begin a pattern
fn starts_pattern(token: &Token) -> bool {
    token.is_identifier()
        || token.is_literal()
        || matches!(token, Token::LParen)
        || matches!(
            token,
            Token::Keyword(Keyword::Some)
                | Token::Keyword(Keyword::NoneValue)
                | Token::Keyword(Keyword::Ok)
                | Token::Keyword(Keyword::Err)
        )
}

impl<'d> Parser<'d> {
    /// Parse one pattern, degrading to a wildcard on failure. The offending
    /// token is left in place so the arm loop can resynchronize.
    pub(super) fn parse_pattern(&mut self) -> Pattern {
        let span = self.current_span();

        match self.tokens.current_token() {
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                let kind = if name == "_" {
                    PatternKind::Wildcard
                } else {
                    PatternKind::Binding(name)
                };
                Pattern { kind, span }
            }
            Some(token) if token.is_literal() => {
                let value = self.parse_expression();
                Pattern {
                    kind: PatternKind::Literal(Box::new(value)),
                    span,
                }
            }
            Some(Token::Keyword(Keyword::Some)) => {
                self.advance();
                let inner = self.parse_pattern();
                let span = span.merge(inner.span);
                Pattern {
                    kind: PatternKind::SomeOf(Box::new(inner)),
                    span,
                }
            }
            Some(Token::Keyword(Keyword::NoneValue)) => {
                self.advance();
                Pattern {
                    kind: PatternKind::NoneValue,
                    span,
                }
            }
            Some(Token::Keyword(Keyword::Ok)) => {
                self.advance();
                let inner = self.parse_pattern();
                let span = span.merge(inner.span);
                Pattern {
                    kind: PatternKind::OkOf(Box::new(inner)),
                    span,
                }
            }
            Some(Token::Keyword(Keyword::Err)) => {
                self.advance();
                let inner = self.parse_pattern();
                let span = span.merge(inner.span);
                Pattern {
                    kind: PatternKind::ErrOf(Box::new(inner)),
                    span,
                }
            }
            Some(Token::LParen) => self.parse_composite_pattern(),
            _ => {
                self.unexpected_token("where a pattern was expected");
                Pattern {
                    kind: PatternKind::Wildcard,
                    span,
                }
            }
        }
    }

    /// `(pos ...)`, `(prop name=p ...)`, `(rel op literal)`, `(list ...)`
    fn parse_composite_pattern(&mut self) -> Pattern {
        let start = self.current_span();
        self.advance(); // (

        let head = match self.tokens.current_token() {
            Some(Token::Identifier(word)) => {
                let word = word.clone();
                self.advance();
                word
            }
            _ => {
                self.unexpected_token("after '(' in a pattern; expected pos, prop, rel, or list");
                let span = self.skip_to_pattern_close(start);
                return Pattern {
                    kind: PatternKind::Wildcard,
                    span,
                };
            }
        };

        let kind = match head.as_str() {
            "pos" => PatternKind::Positional(self.parse_pattern_list()),
            "list" => PatternKind::List(self.parse_pattern_list()),
            "prop" => PatternKind::Property(self.parse_property_patterns()),
            "rel" => self.parse_relational_pattern(),
            _ => {
                let span = self.current_span();
                self.diagnostics.error(
                    codes::syntax::UNEXPECTED_TOKEN,
                    span,
                    format!("'{}' is not a pattern form", head),
                );
                let span = self.skip_to_pattern_close(start);
                return Pattern {
                    kind: PatternKind::Wildcard,
                    span,
                };
            }
        };

        let span = self.skip_to_pattern_close(start);
        Pattern { kind, span }
    }

    fn parse_pattern_list(&mut self) -> Vec<Pattern> {
        let mut patterns = Vec::new();
        while !self.is_at_end() && !self.tokens.check_token(&Token::RParen) {
            if self.tokens.current_token().is_some_and(starts_pattern) {
                patterns.push(self.parse_pattern());
                self.tokens.advance_if_matches(&Token::Comma);
            } else {
                self.unexpected_token("in a destructuring pattern");
                self.advance();
            }
        }
        patterns
    }

    fn parse_property_patterns(&mut self) -> Vec<(String, Pattern)> {
        let mut pairs = Vec::new();
        while !self.is_at_end() && !self.tokens.check_token(&Token::RParen) {
            if self.tokens.current_token().is_some_and(Token::is_identifier)
                && matches!(self.tokens.peek_token(1), Some(Token::Equals))
            {
                let name = self
                    .tokens
                    .current_token()
                    .and_then(Token::as_identifier)
                    .unwrap_or_default()
                    .to_string();
                self.advance(); // name
                self.advance(); // =
                pairs.push((name, self.parse_pattern()));
                self.tokens.advance_if_matches(&Token::Comma);
            } else {
                self.unexpected_token("in a property pattern; expected name=pattern");
                self.advance();
            }
        }
        pairs
    }

    fn parse_relational_pattern(&mut self) -> PatternKind {
        let op = match self.tokens.current_token().and_then(Token::as_binary_op) {
            Some(op) => {
                self.advance();
                op
            }
            None => {
                let span = self.current_span();
                self.diagnostics.error(
                    codes::syntax::INVALID_OPERATOR,
                    span,
                    "relational pattern needs a comparison operator".to_string(),
                );
                crate::grammar::ast::BinaryOp::Eq
            }
        };
        let value = self.parse_expression();
        PatternKind::Relational {
            op,
            value: Box::new(value),
        }
    }

    /// Consume the pattern's closing paren, skipping stray tokens
    fn skip_to_pattern_close(&mut self, start: Span) -> Span {
        while !self.is_at_end() && !self.tokens.check_token(&Token::RParen) {
            self.advance();
        }
        let close_span = self.current_span();
        if !self.tokens.advance_if_matches(&Token::RParen) {
            self.diagnostics.error(
                codes::syntax::UNEXPECTED_TOKEN,
                close_span,
                "pattern not closed with ')'".to_string(),
            );
        }
        start.merge(close_span)
    }
}
