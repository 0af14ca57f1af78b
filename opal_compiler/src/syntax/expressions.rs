//! Expression parsing
//!
//! Expressions dispatch on the leading token. A token that starts no
//! expression form yields a placeholder Missing node plus a diagnostic; the
//! offending token is left for the caller's recovery loop, so the parser
//! never panics and never consumes blindly.

use crate::grammar::ast::{
    BinaryOp, Expression, ExpressionKind, InterpPart, LambdaBody, UnaryOp,
};
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::reconcile::constructs;
use crate::syntax::parser::Parser;
use crate::tokens::Token;
use crate::utils::Span;

/// Check whether a token can begin an expression
pub(super) fn starts_expression(token: &Token) -> bool {
    token.is_literal()
        || token.is_identifier()
        || matches!(token, Token::LParen)
        || matches!(token, Token::Keyword(kw) if kw.is_expression_head())
}

/// Prefix-form operator classification
enum FormOp {
    /// `!`, `~`, and the word `not`
    UnaryOnly(UnaryOp),
    /// `-` is negation with one operand and subtraction with more
    MinusLike,
    Binary(BinaryOp),
    Unknown,
}

fn word_operator(word: &str) -> Option<FormOp> {
    match word {
        "and" => Some(FormOp::Binary(BinaryOp::And)),
        "or" => Some(FormOp::Binary(BinaryOp::Or)),
        "not" => Some(FormOp::UnaryOnly(UnaryOp::Not)),
        "mod" => Some(FormOp::Binary(BinaryOp::Mod)),
        "eq" => Some(FormOp::Binary(BinaryOp::Eq)),
        "ne" | "neq" => Some(FormOp::Binary(BinaryOp::Ne)),
        "lt" => Some(FormOp::Binary(BinaryOp::Lt)),
        "le" | "lte" => Some(FormOp::Binary(BinaryOp::Le)),
        "gt" => Some(FormOp::Binary(BinaryOp::Gt)),
        "ge" | "gte" => Some(FormOp::Binary(BinaryOp::Ge)),
        _ => None,
    }
}

impl<'d> Parser<'d> {
    pub(super) fn at_expression_start(&self) -> bool {
        self.tokens
            .current_token()
            .is_some_and(starts_expression)
    }

    /// Parse one expression, degrading to a Missing node on failure
    pub(super) fn parse_expression(&mut self) -> Expression {
        if !self.enter() {
            self.leave();
            let span = self.current_span();
            self.advance();
            return Expression::missing(span);
        }
        let expression = self.parse_expression_inner();
        self.leave();
        expression
    }

    fn parse_expression_inner(&mut self) -> Expression {
        let span = self.current_span();

        match self.tokens.current_token() {
            Some(Token::IntLiteral(value)) => {
                let value = *value;
                self.advance();
                Expression::new(ExpressionKind::IntLiteral(value), span)
            }
            Some(Token::FloatLiteral(value)) => {
                let value = *value;
                self.advance();
                Expression::new(ExpressionKind::FloatLiteral(value), span)
            }
            Some(Token::StringLiteral(value)) => {
                let value = value.clone();
                self.advance();
                Expression::new(ExpressionKind::StringLiteral(value), span)
            }
            Some(Token::BoolLiteral(value)) => {
                let value = *value;
                self.advance();
                Expression::new(ExpressionKind::BoolLiteral(value), span)
            }
            Some(Token::Identifier(name)) => {
                let name = name.clone();
                self.advance();
                Expression::new(ExpressionKind::Identifier(name), span)
            }
            Some(Token::LParen) => self.parse_prefix_form(),
            Some(Token::Keyword(keyword)) => {
                let keyword = *keyword;
                self.parse_keyword_expression(keyword, span)
            }
            _ => self.missing_expression(span),
        }
    }

    /// Report a missing expression without consuming the offending token
    fn missing_expression(&mut self, span: Span) -> Expression {
        let found = self
            .tokens
            .current_token()
            .map(Token::as_source_string)
            .unwrap_or_else(|| "<end of input>".to_string());
        self.diagnostics.error(
            codes::syntax::MISSING_EXPRESSION,
            span,
            format!("expected an expression, found '{}'", found),
        );
        Expression::missing(span)
    }

    fn parse_keyword_expression(&mut self, keyword: Keyword, span: Span) -> Expression {
        match keyword {
            Keyword::Some => {
                self.advance();
                let inner = self.parse_expression();
                let span = span.merge(inner.span);
                Expression::new(ExpressionKind::SomeOf(Box::new(inner)), span)
            }
            Keyword::NoneValue => {
                self.advance();
                Expression::new(ExpressionKind::NoneValue, span)
            }
            Keyword::Ok => {
                self.advance();
                let inner = self.parse_expression();
                let span = span.merge(inner.span);
                Expression::new(ExpressionKind::OkOf(Box::new(inner)), span)
            }
            Keyword::Err => {
                self.advance();
                let inner = self.parse_expression();
                let span = span.merge(inner.span);
                Expression::new(ExpressionKind::ErrOf(Box::new(inner)), span)
            }
            Keyword::This => {
                self.advance();
                Expression::new(ExpressionKind::This, span)
            }
            Keyword::Base => {
                self.advance();
                Expression::new(ExpressionKind::Base, span)
            }
            Keyword::Record => self.parse_record_expression(),
            Keyword::Match => self.parse_match_expression(),
            Keyword::Array => self.parse_array_expression(),
            Keyword::Index => {
                self.advance();
                let target = self.parse_expression();
                let index = self.parse_expression();
                let span = span.merge(index.span);
                Expression::new(
                    ExpressionKind::ArrayIndex {
                        target: Box::new(target),
                        index: Box::new(index),
                    },
                    span,
                )
            }
            Keyword::Len => {
                self.advance();
                let target = self.parse_expression();
                let span = span.merge(target.span);
                Expression::new(ExpressionKind::ArrayLength(Box::new(target)), span)
            }
            Keyword::Generic => {
                self.advance();
                let (bag, attr_span) = self.read_attrs();
                let attrs = constructs::generic(&bag, attr_span, self.diagnostics);
                Expression::new(
                    ExpressionKind::GenericInstance {
                        base: attrs.base,
                        args: attrs.args,
                    },
                    span.merge(attr_span),
                )
            }
            Keyword::New => self.parse_new_expression(),
            Keyword::Lambda => self.parse_lambda_expression(),
            Keyword::Await => {
                self.advance();
                let (bag, _) = self.read_attrs();
                let attrs = constructs::await_expr(&bag);
                let operand = self.parse_expression();
                let span = span.merge(operand.span);
                Expression::new(
                    ExpressionKind::Await {
                        operand: Box::new(operand),
                        configure_context: attrs.configure_context,
                    },
                    span,
                )
            }
            Keyword::Interp => self.parse_interpolation(),
            Keyword::Coalesce => {
                self.advance();
                let left = self.parse_expression();
                let right = self.parse_expression();
                let span = span.merge(right.span);
                Expression::new(
                    ExpressionKind::Coalesce {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                )
            }
            Keyword::Safe => {
                self.advance();
                let target = self.parse_expression();
                let (member, end_span) = match self.tokens.current() {
                    Some(spanned) => match &spanned.value {
                        Token::Identifier(name) => {
                            let result = (name.clone(), spanned.span);
                            self.advance();
                            result
                        }
                        _ => {
                            self.unexpected_token("after safe access; expected a member name");
                            (String::new(), target.span)
                        }
                    },
                    None => (String::new(), target.span),
                };
                let span = span.merge(end_span);
                Expression::new(
                    ExpressionKind::SafeAccess {
                        target: Box::new(target),
                        member,
                    },
                    span,
                )
            }
            Keyword::Range => {
                self.advance();
                let from = self.parse_expression();
                let to = self.parse_expression();
                let span = span.merge(to.span);
                Expression::new(
                    ExpressionKind::Range {
                        from: Box::new(from),
                        to: Box::new(to),
                    },
                    span,
                )
            }
            Keyword::FromEnd => {
                self.advance();
                let operand = self.parse_expression();
                let span = span.merge(operand.span);
                Expression::new(ExpressionKind::FromEnd(Box::new(operand)), span)
            }
            Keyword::With => self.parse_with_expression(),
            _ => self.missing_expression(span),
        }
    }

    // ========================================================================
    // LISP-STYLE PREFIX FORMS
    // ========================================================================

    /// `(op arg...)`: unary for one operand of a unary-capable operator,
    /// left-folded binary chain for two or more operands
    fn parse_prefix_form(&mut self) -> Expression {
        let start = self.current_span();
        self.advance(); // (

        let op = match self.tokens.current_token() {
            Some(Token::Bang) | Some(Token::Tilde) => {
                self.advance();
                FormOp::UnaryOnly(UnaryOp::Not)
            }
            Some(Token::Minus) => {
                self.advance();
                FormOp::MinusLike
            }
            Some(Token::Identifier(word)) => match word_operator(word) {
                Some(op) => {
                    self.advance();
                    op
                }
                None => {
                    let word = word.clone();
                    let span = self.current_span();
                    self.diagnostics.error(
                        codes::syntax::INVALID_OPERATOR,
                        span,
                        format!("'{}' is not a prefix-form operator", word),
                    );
                    self.advance();
                    FormOp::Unknown
                }
            },
            Some(token) => match token.as_binary_op() {
                Some(op) => {
                    self.advance();
                    FormOp::Binary(op)
                }
                None => {
                    let span = self.current_span();
                    self.diagnostics.error(
                        codes::syntax::INVALID_OPERATOR,
                        span,
                        "prefix form is missing its operator".to_string(),
                    );
                    FormOp::Unknown
                }
            },
            None => {
                let span = self.current_span();
                self.diagnostics.error(
                    codes::syntax::INVALID_OPERATOR,
                    span,
                    "prefix form is missing its operator".to_string(),
                );
                FormOp::Unknown
            }
        };

        let mut operands = Vec::new();
        while !self.is_at_end() && !self.tokens.check_token(&Token::RParen) {
            if self.at_expression_start() {
                operands.push(self.parse_expression());
            } else {
                self.unexpected_token("inside a prefix form");
                self.advance();
            }
        }

        let close_span = self.current_span();
        if !self.tokens.advance_if_matches(&Token::RParen) {
            self.diagnostics.error(
                codes::syntax::UNEXPECTED_TOKEN,
                close_span,
                "prefix form not closed with ')'".to_string(),
            );
        }

        let form_span = start.merge(close_span);
        self.resolve_prefix_form(op, operands, form_span)
    }

    fn resolve_prefix_form(
        &mut self,
        op: FormOp,
        operands: Vec<Expression>,
        form_span: Span,
    ) -> Expression {
        let mut rest = operands.into_iter();
        let first = rest.next();
        let second = rest.next();

        match op {
            FormOp::UnaryOnly(unary) => match (first, second) {
                (Some(operand), None) => Expression::new(
                    ExpressionKind::Unary {
                        op: unary,
                        operand: Box::new(operand),
                    },
                    form_span,
                ),
                (None, _) => self.empty_form(form_span),
                (Some(operand), Some(_)) => {
                    self.diagnostics.error(
                        codes::syntax::INVALID_OPERATOR,
                        form_span,
                        format!("'{}' takes exactly one operand", unary.as_str()),
                    );
                    operand
                }
            },
            FormOp::MinusLike => match (first, second) {
                (None, _) => self.empty_form(form_span),
                (Some(operand), None) => Expression::new(
                    ExpressionKind::Unary {
                        op: UnaryOp::Neg,
                        operand: Box::new(operand),
                    },
                    form_span,
                ),
                (Some(first), Some(second)) => {
                    fold_binary(BinaryOp::Sub, first, second, rest, form_span)
                }
            },
            FormOp::Binary(binary) => match (first, second) {
                (None, _) => self.empty_form(form_span),
                (Some(operand), None) => {
                    self.diagnostics.error(
                        codes::syntax::INVALID_OPERATOR,
                        form_span,
                        format!("'{}' needs at least two operands", binary.as_str()),
                    );
                    operand
                }
                (Some(first), Some(second)) => {
                    fold_binary(binary, first, second, rest, form_span)
                }
            },
            FormOp::Unknown => first
                .unwrap_or_else(|| Expression::new(ExpressionKind::IntLiteral(0), form_span)),
        }
    }

    fn empty_form(&mut self, form_span: Span) -> Expression {
        self.diagnostics.error(
            codes::syntax::MISSING_EXPRESSION,
            form_span,
            "prefix form has no operands".to_string(),
        );
        Expression::missing(form_span)
    }

    // ========================================================================
    // COMPOSITE EXPRESSION FORMS
    // ========================================================================

    fn parse_record_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::record(&bag, attr_span, self.diagnostics);

        let mut fields = Vec::new();
        while !self.is_at_end() && !self.check_keyword(Keyword::EndRecord) {
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
                fields.push((name, self.parse_expression()));
                self.tokens.advance_if_matches(&Token::Comma);
            } else {
                self.unexpected_token("in record construction; expected name=value");
                self.advance();
            }
        }

        let close = self.expect_close(Keyword::EndRecord, "record construction", None);
        Expression::new(
            ExpressionKind::Record {
                type_name: attrs.type_name,
                fields,
            },
            start.merge(close),
        )
    }

    fn parse_match_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let id = constructs::id_only("match", &bag, attr_span, self.diagnostics);

        let scrutinee = self.parse_expression();

        let mut arms = Vec::new();
        while self.check_keyword(Keyword::Case) {
            self.advance();
            let pattern = self.parse_pattern();
            self.tokens.advance_if_matches(&Token::Arrow);
            let value = self.parse_expression();
            arms.push((pattern, value));
        }

        let close = self.expect_close(Keyword::EndMatch, "match", Some(&id));
        Expression::new(
            ExpressionKind::MatchExpr {
                scrutinee: Box::new(scrutinee),
                arms,
            },
            start.merge(close),
        )
    }

    fn parse_array_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::array(&bag, attr_span, self.diagnostics);

        let size = attrs
            .size
            .map(|s| Box::new(constructs::expr_from_attr(&s, attr_span)));

        let mut elements = Vec::new();
        while !self.is_at_end() && !self.check_keyword(Keyword::EndArray) {
            if self.at_expression_start() {
                elements.push(self.parse_expression());
                self.tokens.advance_if_matches(&Token::Comma);
            } else {
                self.unexpected_token("in array elements");
                self.advance();
            }
        }

        let close = self.expect_close(Keyword::EndArray, "array", Some(&attrs.id));
        Expression::new(
            ExpressionKind::ArrayCreate {
                id: attrs.id,
                element_type: attrs.element_type,
                size,
                elements,
            },
            start.merge(close),
        )
    }

    fn parse_new_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::new_object(&bag, attr_span, self.diagnostics);

        let mut args = Vec::new();
        while !self.is_at_end() && !self.check_keyword(Keyword::EndNew) {
            if self.at_expression_start() {
                args.push(self.parse_expression());
                self.tokens.advance_if_matches(&Token::Comma);
            } else {
                self.unexpected_token("in constructor arguments");
                self.advance();
            }
        }

        let close = self.expect_close(Keyword::EndNew, "object construction", None);
        Expression::new(
            ExpressionKind::New {
                type_name: attrs.type_name,
                args,
            },
            start.merge(close),
        )
    }

    fn parse_lambda_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::lambda(&bag, attr_span, self.diagnostics);

        let prefix = self.parse_signature_prefix();

        // A statement-head keyword means a block body; anything that starts
        // an expression is a single-expression body
        let body = if self.at_expression_start() && !self.at_statement_head() {
            LambdaBody::Expression(Box::new(self.parse_expression()))
        } else {
            LambdaBody::Block(self.parse_statements_until(&[Keyword::EndLambda]))
        };

        let close = self.expect_close(Keyword::EndLambda, "lambda", Some(&attrs.id));
        Expression::new(
            ExpressionKind::Lambda {
                id: attrs.id,
                is_async: attrs.is_async,
                params: prefix.params,
                effects: prefix.effects.unwrap_or_default(),
                body,
            },
            start.merge(close),
        )
    }

    fn at_statement_head(&self) -> bool {
        matches!(
            self.current_keyword(),
            Some(
                Keyword::Call
                    | Keyword::Return
                    | Keyword::For
                    | Keyword::While
                    | Keyword::If
                    | Keyword::Bind
                    | Keyword::Match
                    | Keyword::Foreach
                    | Keyword::Try
                    | Keyword::Throw
                    | Keyword::Rethrow
                    | Keyword::Subscribe
                    | Keyword::Unsubscribe
                    | Keyword::Print
                    | Keyword::Println
                    | Keyword::Lock
            )
        )
    }

    fn parse_interpolation(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (_, _) = self.read_attrs();

        let mut parts = Vec::new();
        while !self.is_at_end() && !self.check_keyword(Keyword::EndInterp) {
            match self.tokens.current_token() {
                Some(Token::StringLiteral(text)) => {
                    parts.push(InterpPart::Literal(text.clone()));
                    self.advance();
                }
                Some(token) if starts_expression(token) => {
                    parts.push(InterpPart::Expression(self.parse_expression()));
                }
                _ => {
                    self.unexpected_token("in string interpolation");
                    self.advance();
                }
            }
        }

        let close = self.expect_close(Keyword::EndInterp, "string interpolation", None);
        Expression::new(ExpressionKind::Interpolation { parts }, start.merge(close))
    }

    fn parse_with_expression(&mut self) -> Expression {
        let start = self.current_span();
        self.advance();
        let (_, _) = self.read_attrs();

        let target = self.parse_expression();

        let mut overrides = Vec::new();
        while !self.is_at_end() && !self.check_keyword(Keyword::EndWith) {
            if self.tokens.current_token().is_some_and(Token::is_identifier)
                && matches!(self.tokens.peek_token(1), Some(Token::Equals))
            {
                let name = self
                    .tokens
                    .current_token()
                    .and_then(Token::as_identifier)
                    .unwrap_or_default()
                    .to_string();
                self.advance();
                self.advance();
                overrides.push((name, self.parse_expression()));
                self.tokens.advance_if_matches(&Token::Comma);
            } else {
                self.unexpected_token("in with-expression; expected property=value");
                self.advance();
            }
        }

        let close = self.expect_close(Keyword::EndWith, "with-expression", None);
        Expression::new(
            ExpressionKind::With {
                target: Box::new(target),
                overrides,
            },
            start.merge(close),
        )
    }
}

/// Left-fold operands into nested binary nodes sharing the form's span
fn fold_binary(
    op: BinaryOp,
    first: Expression,
    second: Expression,
    rest: impl Iterator<Item = Expression>,
    form_span: Span,
) -> Expression {
    let mut acc = Expression::new(
        ExpressionKind::Binary {
            op,
            left: Box::new(first),
            right: Box::new(second),
        },
        form_span,
    );
    for right in rest {
        acc = Expression::new(
            ExpressionKind::Binary {
                op,
                left: Box::new(acc),
                right: Box::new(right),
            },
            form_span,
        );
    }
    acc
}
