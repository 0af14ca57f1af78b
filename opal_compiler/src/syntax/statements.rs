//! Statement parsing
//!
//! Statements dispatch on the leading token kind. Block statements read
//! their bodies until their own closing tag; a stray closing tag or section
//! keyword ends the body and is left for the enclosing construct to report.

use crate::grammar::ast::{
    CatchClause, ElseIfClause, Expression, MatchArm, Statement, StatementKind,
};
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::reconcile::constructs;
use crate::syntax::parser::Parser;
use crate::tokens::Token;

/// Keywords that open a section of an enclosing construct rather than a
/// statement of their own
fn is_section_keyword(keyword: Keyword) -> bool {
    matches!(
        keyword,
        Keyword::Case | Keyword::Catch | Keyword::Finally | Keyword::ElseIf | Keyword::Else
    )
}

impl<'d> Parser<'d> {
    /// Parse statements until one of the terminators, a stray closing tag,
    /// or a section keyword
    pub(super) fn parse_statements_until(&mut self, terminators: &[Keyword]) -> Vec<Statement> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(keyword) = self.current_keyword() {
                if terminators.contains(&keyword)
                    || keyword.is_block_end()
                    || is_section_keyword(keyword)
                {
                    break;
                }
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
        }

        statements
    }

    /// Parse one statement; returns None after reporting and skipping an
    /// invalid leading token
    pub(super) fn parse_statement(&mut self) -> Option<Statement> {
        if !self.enter() {
            self.leave();
            self.advance();
            return None;
        }
        let statement = self.parse_statement_inner();
        self.leave();
        statement
    }

    fn parse_statement_inner(&mut self) -> Option<Statement> {
        match self.current_keyword() {
            Some(Keyword::Call) => Some(self.parse_call()),
            Some(Keyword::Return) => Some(self.parse_return()),
            Some(Keyword::For) => Some(self.parse_for()),
            Some(Keyword::While) => Some(self.parse_while()),
            Some(Keyword::If) => Some(self.parse_if()),
            Some(Keyword::Bind) => Some(self.parse_bind()),
            Some(Keyword::Match) => Some(self.parse_match_statement()),
            Some(Keyword::Foreach) => Some(self.parse_foreach()),
            Some(Keyword::Try) => Some(self.parse_try()),
            Some(Keyword::Throw) => {
                let start = self.current_span();
                self.advance();
                let value = self.parse_expression();
                let span = start.merge(value.span);
                Some(Statement {
                    kind: StatementKind::Throw(value),
                    span,
                })
            }
            Some(Keyword::Rethrow) => {
                let span = self.current_span();
                self.advance();
                Some(Statement {
                    kind: StatementKind::Rethrow,
                    span,
                })
            }
            Some(Keyword::Subscribe) => Some(self.parse_subscription(true)),
            Some(Keyword::Unsubscribe) => Some(self.parse_subscription(false)),
            Some(Keyword::Print) => Some(self.parse_print(false)),
            Some(Keyword::Println) => Some(self.parse_print(true)),
            Some(Keyword::Lock) => Some(self.parse_lock()),
            Some(_) | None if self.at_expression_start() => self.parse_assignment(),
            _ => {
                let span = self.current_span();
                let found = self
                    .tokens
                    .current_token()
                    .map(Token::as_source_string)
                    .unwrap_or_else(|| "<end of input>".to_string());
                self.diagnostics.error(
                    codes::syntax::INVALID_STATEMENT,
                    span,
                    format!("'{}' does not start a statement", found),
                );
                self.advance();
                None
            }
        }
    }

    /// Assignment: target expression, `=`, value expression
    fn parse_assignment(&mut self) -> Option<Statement> {
        let target = self.parse_expression();

        if self.tokens.advance_if_matches(&Token::Equals) {
            let value = self.parse_expression();
            let span = target.span.merge(value.span);
            Some(Statement {
                kind: StatementKind::Assign { target, value },
                span,
            })
        } else {
            self.diagnostics.error(
                codes::syntax::INVALID_STATEMENT,
                target.span,
                "expression is not a statement; expected '=' for assignment".to_string(),
            );
            None
        }
    }

    // ========================================================================
    // CALL
    // ========================================================================

    /// Call with an explicit `@`-delimited argument list and close tag, or a
    /// single implicit argument with implicit closing
    fn parse_call(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::call(&bag, attr_span, self.diagnostics);

        let mut args = Vec::new();
        let mut end_span = attr_span;

        if self.tokens.advance_if_matches(&Token::At) {
            while !self.is_at_end() && !self.check_keyword(Keyword::EndCall) {
                if self.at_expression_start() {
                    let arg = self.parse_expression();
                    end_span = arg.span;
                    args.push(arg);
                } else {
                    self.unexpected_token("in call argument list");
                    self.advance();
                }
            }
            end_span = self.expect_close(Keyword::EndCall, "call", None);
        } else if self.at_expression_start() {
            let arg = self.parse_expression();
            end_span = arg.span;
            args.push(arg);
            if self.check_keyword(Keyword::EndCall) {
                self.advance();
                let (_, close_span) = self.read_attrs();
                end_span = close_span;
            }
        } else if self.check_keyword(Keyword::EndCall) {
            self.advance();
            let (_, close_span) = self.read_attrs();
            end_span = close_span;
        }

        Statement {
            kind: StatementKind::Call {
                target: attrs.target,
                fallible: attrs.fallible,
                args,
            },
            span: start.merge(end_span),
        }
    }

    // ========================================================================
    // SIMPLE STATEMENTS
    // ========================================================================

    fn parse_return(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();

        let value = if self.at_expression_start() {
            Some(self.parse_expression())
        } else {
            None
        };

        let span = value
            .as_ref()
            .map(|v| start.merge(v.span))
            .unwrap_or(start);
        Statement {
            kind: StatementKind::Return(value),
            span,
        }
    }

    fn parse_bind(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::bind(&bag, attr_span, self.diagnostics);

        // Initializer is optional; accept with or without a leading `=`
        let initializer = if self.tokens.advance_if_matches(&Token::Equals) {
            self.parse_expression()
        } else if self.at_expression_start() {
            self.parse_expression()
        } else {
            Expression::missing(attr_span)
        };

        let span = start.merge(initializer.span);
        Statement {
            kind: StatementKind::Bind {
                name: attrs.name,
                mutable: attrs.mutable,
                ty: attrs.ty,
                initializer,
            },
            span,
        }
    }

    fn parse_subscription(&mut self, subscribing: bool) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::subscribe(&bag, attr_span, self.diagnostics);
        let handler = self.parse_expression();

        let span = start.merge(handler.span);
        let kind = if subscribing {
            StatementKind::Subscribe {
                event: attrs.event,
                handler,
            }
        } else {
            StatementKind::Unsubscribe {
                event: attrs.event,
                handler,
            }
        };
        Statement { kind, span }
    }

    fn parse_print(&mut self, newline: bool) -> Statement {
        let start = self.current_span();
        self.advance();
        let value = self.parse_expression();
        let span = start.merge(value.span);
        Statement {
            kind: StatementKind::Print { value, newline },
            span,
        }
    }

    // ========================================================================
    // LOOPS
    // ========================================================================

    fn parse_for(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::for_loop(&bag, attr_span, self.diagnostics);

        let body = self.parse_statements_until(&[Keyword::EndFor]);
        let close = self.expect_close(Keyword::EndFor, "for loop", Some(&attrs.id));

        Statement {
            kind: StatementKind::For {
                id: attrs.id,
                var: attrs.var,
                from: constructs::expr_from_attr(&attrs.from, attr_span),
                to: constructs::expr_from_attr(&attrs.to, attr_span),
                step: constructs::expr_from_attr(&attrs.step, attr_span),
                body,
            },
            span: start.merge(close),
        }
    }

    fn parse_while(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let id = constructs::id_only("while loop", &bag, attr_span, self.diagnostics);

        let condition = self.parse_expression();
        let body = self.parse_statements_until(&[Keyword::EndWhile]);
        let close = self.expect_close(Keyword::EndWhile, "while loop", Some(&id));

        Statement {
            kind: StatementKind::While {
                id,
                condition,
                body,
            },
            span: start.merge(close),
        }
    }

    fn parse_foreach(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let attrs = constructs::foreach(&bag, attr_span, self.diagnostics);

        let collection = self.parse_expression();
        let body = self.parse_statements_until(&[Keyword::EndForeach]);
        let close = self.expect_close(Keyword::EndForeach, "foreach", Some(&attrs.id));

        Statement {
            kind: StatementKind::Foreach {
                id: attrs.id,
                var: attrs.var,
                ty: attrs.ty,
                collection,
                body,
            },
            span: start.merge(close),
        }
    }

    // ========================================================================
    // CONDITIONALS
    // ========================================================================

    /// Verbose if closes with its own tag; the compact arrow form takes one
    /// statement per branch and closes implicitly
    fn parse_if(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let id = constructs::id_only("if", &bag, attr_span, self.diagnostics);

        let condition = self.parse_expression();

        if self.tokens.check_token(&Token::Arrow) {
            return self.parse_compact_if(start, id, condition);
        }

        let then_body =
            self.parse_statements_until(&[Keyword::ElseIf, Keyword::Else, Keyword::EndIf]);

        let mut elseifs = Vec::new();
        while self.check_keyword(Keyword::ElseIf) {
            let clause_start = self.current_span();
            self.advance();
            let clause_condition = self.parse_expression();
            let body =
                self.parse_statements_until(&[Keyword::ElseIf, Keyword::Else, Keyword::EndIf]);
            let span = body
                .last()
                .map(|s| clause_start.merge(s.span))
                .unwrap_or(clause_start);
            elseifs.push(ElseIfClause {
                condition: clause_condition,
                body,
                span,
            });
        }

        let else_body = if self.consume_keyword(Keyword::Else) {
            Some(self.parse_statements_until(&[Keyword::EndIf]))
        } else {
            None
        };

        let close = self.expect_close(Keyword::EndIf, "if", Some(&id));

        Statement {
            kind: StatementKind::If {
                id,
                condition,
                then_body,
                elseifs,
                else_body,
            },
            span: start.merge(close),
        }
    }

    fn parse_compact_if(
        &mut self,
        start: crate::utils::Span,
        id: String,
        condition: Expression,
    ) -> Statement {
        self.advance(); // arrow
        let then_body: Vec<Statement> = self.parse_statement().into_iter().collect();
        let mut end_span = then_body.last().map(|s| s.span).unwrap_or(start);

        let mut elseifs = Vec::new();
        let mut else_body = None;

        loop {
            if self.check_keyword(Keyword::ElseIf) {
                let clause_start = self.current_span();
                self.advance();
                let clause_condition = self.parse_expression();
                if !self.tokens.advance_if_matches(&Token::Arrow) {
                    self.unexpected_token("in compact elseif; expected '->'");
                }
                let body: Vec<Statement> = self.parse_statement().into_iter().collect();
                let span = body
                    .last()
                    .map(|s| clause_start.merge(s.span))
                    .unwrap_or(clause_start);
                end_span = span;
                elseifs.push(ElseIfClause {
                    condition: clause_condition,
                    body,
                    span,
                });
            } else if self.check_keyword(Keyword::Else) {
                self.advance();
                if !self.tokens.advance_if_matches(&Token::Arrow) {
                    self.unexpected_token("in compact else; expected '->'");
                }
                let body: Vec<Statement> = self.parse_statement().into_iter().collect();
                if let Some(last) = body.last() {
                    end_span = last.span;
                }
                else_body = Some(body);
                break;
            } else {
                break;
            }
        }

        Statement {
            kind: StatementKind::If {
                id,
                condition,
                then_body,
                elseifs,
                else_body,
            },
            span: start.merge(end_span),
        }
    }

    // ========================================================================
    // MATCH
    // ========================================================================

    fn parse_match_statement(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let id = constructs::id_only("match", &bag, attr_span, self.diagnostics);

        let scrutinee = self.parse_expression();

        let mut arms = Vec::new();
        while self.check_keyword(Keyword::Case) {
            let arm_start = self.current_span();
            self.advance();
            let pattern = self.parse_pattern();
            // Arrow between pattern and body is optional
            self.tokens.advance_if_matches(&Token::Arrow);
            let body = self.parse_statements_until(&[Keyword::EndMatch]);
            let span = body
                .last()
                .map(|s| arm_start.merge(s.span))
                .unwrap_or_else(|| arm_start.merge(pattern.span));
            arms.push(MatchArm {
                pattern,
                guard: None,
                body,
                span,
            });
        }

        let close = self.expect_close(Keyword::EndMatch, "match", Some(&id));

        Statement {
            kind: StatementKind::Match {
                id,
                scrutinee,
                arms,
            },
            span: start.merge(close),
        }
    }

    // ========================================================================
    // TRY / CATCH / FINALLY / LOCK
    // ========================================================================

    fn parse_try(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let id = constructs::id_only("try", &bag, attr_span, self.diagnostics);

        let body = self.parse_statements_until(&[Keyword::EndTry]);

        let mut catches = Vec::new();
        while self.check_keyword(Keyword::Catch) {
            let clause_start = self.current_span();
            self.advance();
            let (bag, clause_span) = self.read_attrs();
            let attrs = constructs::catch_clause(&bag, clause_span, self.diagnostics);

            let filter = if self.consume_keyword(Keyword::When) {
                Some(self.parse_expression())
            } else {
                None
            };

            let clause_body = self.parse_statements_until(&[Keyword::EndTry]);
            let span = clause_body
                .last()
                .map(|s| clause_start.merge(s.span))
                .unwrap_or_else(|| clause_start.merge(clause_span));
            catches.push(CatchClause {
                var: attrs.var,
                ty: attrs.ty,
                filter,
                body: clause_body,
                span,
            });
        }

        let finally = if self.consume_keyword(Keyword::Finally) {
            Some(self.parse_statements_until(&[Keyword::EndTry]))
        } else {
            None
        };

        let close = self.expect_close(Keyword::EndTry, "try", Some(&id));

        Statement {
            kind: StatementKind::Try {
                id,
                body,
                catches,
                finally,
            },
            span: start.merge(close),
        }
    }

    fn parse_lock(&mut self) -> Statement {
        let start = self.current_span();
        self.advance();
        let (bag, attr_span) = self.read_attrs();
        let id = constructs::id_only("lock", &bag, attr_span, self.diagnostics);

        let resource = self.parse_expression();
        let body = self.parse_statements_until(&[Keyword::EndLock]);
        let close = self.expect_close(Keyword::EndLock, "lock", Some(&id));

        Statement {
            kind: StatementKind::Lock { id, resource, body },
            span: start.merge(close),
        }
    }
}
