//! Core lexical analyzer implementation
//!
//! Tokenization never fails: invalid text becomes `Token::Error` plus a
//! diagnostic, and scanning continues. The produced buffer always ends with
//! exactly one Eof token, so downstream lookahead can clamp against it.

use crate::config::constants::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::diagnostics::DiagnosticBag;
use crate::grammar::keywords::Keyword;
use crate::logging::codes;
use crate::tokens::token::classify_word;
use crate::tokens::{SpannedToken, Token, TokenStream};
use crate::utils::{Position, SourceMap, Span, Spanned};
use crate::{log_debug, log_success};

/// Tag sigil that introduces every keyword form
const TAG_SIGIL: char = '§';

/// Essential lexical analysis metrics
#[derive(Debug, Default, Clone)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub identifier_tokens: usize,
    pub literal_tokens: usize,
    pub operator_tokens: usize,
    pub trivia_tokens: usize,
    pub error_tokens: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        if token.is_whitespace() {
            self.trivia_tokens += 1;
            if preferences.include_trivia_in_counts {
                self.total_tokens += 1;
            }
            return;
        }

        self.total_tokens += 1;

        match token {
            Token::Keyword(_) => self.keyword_tokens += 1,
            Token::Identifier(_) => self.identifier_tokens += 1,
            Token::Error(_) => self.error_tokens += 1,
            t if t.is_literal() => self.literal_tokens += 1,
            t if t.as_binary_op().is_some() => self.operator_tokens += 1,
            _ => {}
        }
    }
}

/// Lexical analyzer over a character buffer with multi-character lookahead
pub struct LexicalAnalyzer {
    chars: Vec<char>,
    index: usize,
    position: Position,
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            index: 0,
            position: Position::start(),
            metrics: LexicalMetrics::default(),
            preferences: LexicalPreferences::default(),
        }
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            preferences,
            ..Self::new()
        }
    }

    /// Get metrics from the last tokenization
    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Tokenize source text, reporting problems into the diagnostic bag
    pub fn tokenize(&mut self, source: &str, diagnostics: &mut DiagnosticBag) -> TokenStream {
        self.chars = source.chars().collect();
        self.index = 0;
        self.position = Position::start();
        self.metrics = LexicalMetrics::default();

        log_debug!("Starting lexical analysis",
            "char_count" => self.chars.len(),
            "max_tokens_allowed" => MAX_TOKEN_COUNT
        );

        let mut tokens: Vec<SpannedToken> = Vec::new();

        while !self.at_eof() {
            if tokens.len() >= MAX_TOKEN_COUNT {
                let here = Span::new(self.position, self.position);
                diagnostics.error(
                    codes::lexical::TOO_MANY_TOKENS,
                    here,
                    format!("token limit of {} exceeded", MAX_TOKEN_COUNT),
                );
                break;
            }

            let start = self.position;
            let token = self.next_token(diagnostics);
            self.metrics.record_token(&token, &self.preferences);
            tokens.push(Spanned::new(token, Span::new(start, self.position)));
        }

        let at = self.position;
        tokens.push(Spanned::new(Token::Eof, Span::new(at, at)));

        log_success!(codes::success::TOKENIZATION_COMPLETE,
            "Lexical analysis completed",
            "token_count" => tokens.len(),
            "keywords" => self.metrics.keyword_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "literals" => self.metrics.literal_tokens,
            "error_tokens" => self.metrics.error_tokens
        );

        TokenStream::with_source_map(tokens, SourceMap::new(source.to_string()))
    }

    // ========================================================================
    // Cursor primitives
    // ========================================================================

    fn at_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.index + n).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek(0)?;
        self.index += 1;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.peek(0) == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn is_ident_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_ident_continue(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_'
    }

    // ========================================================================
    // Token dispatch
    // ========================================================================

    fn next_token(&mut self, diagnostics: &mut DiagnosticBag) -> Token {
        let start = self.position;
        let ch = match self.bump() {
            Some(ch) => ch,
            None => return Token::Eof,
        };

        match ch {
            ' ' => Token::Space,
            '\t' => Token::Tab,
            '\n' => Token::Newline,
            '\r' => {
                // CRLF folds into one newline token
                self.bump_if('\n');
                Token::Newline
            }

            TAG_SIGIL => self.lex_tag(start, diagnostics),

            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ':' => Token::Colon,
            '~' => Token::Tilde,
            '#' => Token::Hash,
            '?' => Token::Question,
            ',' => Token::Comma,
            '@' => Token::At,

            '=' => {
                if self.bump_if('=') {
                    Token::EqualsEquals
                } else {
                    Token::Equals
                }
            }
            '!' => {
                if self.bump_if('=') {
                    Token::BangEquals
                } else {
                    Token::Bang
                }
            }
            '*' => {
                if self.bump_if('*') {
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            '/' => Token::Slash,
            '%' => Token::Percent,
            '+' => Token::Plus,
            '-' => {
                if self.bump_if('>') {
                    Token::Arrow
                } else if self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number(start, '-', false, diagnostics)
                } else {
                    Token::Minus
                }
            }
            '<' => {
                if self.bump_if('=') {
                    Token::LessEquals
                } else if self.bump_if('<') {
                    Token::ShiftLeft
                } else {
                    Token::Less
                }
            }
            '>' => {
                if self.bump_if('=') {
                    Token::GreaterEquals
                } else if self.bump_if('>') {
                    Token::ShiftRight
                } else {
                    Token::Greater
                }
            }
            '&' => {
                if self.bump_if('&') {
                    Token::AmpAmp
                } else {
                    Token::Amp
                }
            }
            '|' => {
                if self.bump_if('|') {
                    Token::PipePipe
                } else {
                    Token::Pipe
                }
            }

            '"' => self.lex_string(start, diagnostics),
            '`' => self.lex_verbatim_identifier(start, diagnostics),

            '0'..='9' => self.lex_number(start, ch, false, diagnostics),

            c if Self::is_ident_start(c) => self.lex_word(c, start, diagnostics),

            _ => {
                let span = Span::new(start, self.position);
                diagnostics.error(
                    codes::lexical::UNEXPECTED_CHARACTER,
                    span,
                    format!("unexpected character '{}'", ch),
                );
                Token::Error(ch.to_string())
            }
        }
    }

    // ========================================================================
    // Tag keywords
    // ========================================================================

    fn lex_tag(&mut self, start: Position, diagnostics: &mut DiagnosticBag) -> Token {
        let is_close = self.bump_if('/');

        let mut name = String::new();
        while self.peek(0).is_some_and(Self::is_ident_continue) {
            name.push(self.bump().unwrap());
        }

        let span = Span::new(start, self.position);

        if name.is_empty() {
            diagnostics.error(
                codes::lexical::UNKNOWN_KEYWORD,
                span,
                "tag sigil without a keyword name".to_string(),
            );
            return Token::Error(TAG_SIGIL.to_string());
        }

        let keyword = if is_close {
            Keyword::from_close_tag(&name)
        } else {
            Keyword::from_tag(&name)
        };

        match keyword {
            Some(kw) => Token::Keyword(kw),
            None => {
                diagnostics.error(
                    codes::lexical::UNKNOWN_KEYWORD,
                    span,
                    if is_close {
                        format!("unknown close tag '/{}' after tag sigil", name)
                    } else {
                        format!("unknown keyword '{}' after tag sigil", name)
                    },
                );
                Token::Error(name)
            }
        }
    }

    // ========================================================================
    // Words, typed literals, verbatim identifiers
    // ========================================================================

    fn lex_word(&mut self, first: char, start: Position, diagnostics: &mut DiagnosticBag) -> Token {
        let mut word = String::new();
        word.push(first);

        loop {
            match self.peek(0) {
                Some(c) if Self::is_ident_continue(c) => {
                    word.push(self.bump().unwrap());
                }
                // Dots join identifier segments only when another segment follows
                Some('.') if self.peek(1).is_some_and(Self::is_ident_continue) => {
                    self.bump();
                    word.push('.');
                }
                _ => break,
            }
        }

        // Typed literal prefixes take the colon only when the payload can
        // actually start the declared type; otherwise the colon stays a
        // separate token
        if self.peek(0) == Some(':') {
            if let Some(token) = self.try_typed_literal(&word, start, diagnostics) {
                return token;
            }
        }

        if word.len() > MAX_IDENTIFIER_LENGTH {
            let span = Span::new(start, self.position);
            diagnostics.error(
                codes::lexical::IDENTIFIER_TOO_LONG,
                span,
                format!(
                    "identifier of {} characters exceeds the {} character limit",
                    word.len(),
                    MAX_IDENTIFIER_LENGTH
                ),
            );
        }

        classify_word(&word)
    }

    fn try_typed_literal(
        &mut self,
        prefix: &str,
        start: Position,
        diagnostics: &mut DiagnosticBag,
    ) -> Option<Token> {
        // peek(0) is the colon; peek(1) is the payload head
        let payload_head = self.peek(1)?;

        let accepts = match prefix {
            "INT" | "FLOAT" => {
                payload_head.is_ascii_digit()
                    || (payload_head == '-' && self.peek(2).is_some_and(|c| c.is_ascii_digit()))
            }
            "STR" => payload_head == '"',
            "BOOL" => payload_head == 't' || payload_head == 'f',
            _ => return None,
        };
        if !accepts {
            return None;
        }

        self.bump(); // colon

        match prefix {
            "STR" => {
                self.bump(); // opening quote
                Some(self.lex_string(start, diagnostics))
            }
            "BOOL" => {
                let mut word = String::new();
                while self.peek(0).is_some_and(Self::is_ident_continue) {
                    word.push(self.bump().unwrap());
                }
                match word.as_str() {
                    "true" => Some(Token::BoolLiteral(true)),
                    "false" => Some(Token::BoolLiteral(false)),
                    _ => {
                        let span = Span::new(start, self.position);
                        diagnostics.error(
                            codes::lexical::INVALID_TYPED_LITERAL,
                            span,
                            format!("BOOL literal payload '{}' is not true or false", word),
                        );
                        Some(Token::Error(format!("BOOL:{}", word)))
                    }
                }
            }
            "INT" | "FLOAT" => {
                let first = self.bump().unwrap();
                let token = self.lex_number(start, first, prefix == "FLOAT", diagnostics);
                match (prefix, token) {
                    ("INT", t @ Token::IntLiteral(_)) => Some(t),
                    ("FLOAT", Token::FloatLiteral(f)) => Some(Token::FloatLiteral(f)),
                    // Integral payload is still a valid float
                    ("FLOAT", Token::IntLiteral(i)) => Some(Token::FloatLiteral(i as f64)),
                    ("INT", Token::FloatLiteral(f)) => {
                        let span = Span::new(start, self.position);
                        diagnostics.error(
                            codes::lexical::INVALID_TYPED_LITERAL,
                            span,
                            format!("INT literal payload '{}' has a fractional part", f),
                        );
                        Some(Token::Error(format!("INT:{}", f)))
                    }
                    (_, t) => Some(t),
                }
            }
            _ => None,
        }
    }

    fn lex_verbatim_identifier(
        &mut self,
        start: Position,
        diagnostics: &mut DiagnosticBag,
    ) -> Token {
        let mut name = String::new();

        loop {
            match self.peek(0) {
                Some('`') => {
                    self.bump();
                    return Token::Identifier(name);
                }
                Some('\n') | None => {
                    let span = Span::new(start, self.position);
                    diagnostics.error(
                        codes::lexical::UNTERMINATED_STRING,
                        span,
                        "verbatim identifier not closed before end of line".to_string(),
                    );
                    return Token::Error(format!("`{}", name));
                }
                Some(_) => {
                    name.push(self.bump().unwrap());
                }
            }
        }
    }

    // ========================================================================
    // Literals
    // ========================================================================

    fn lex_string(&mut self, start: Position, diagnostics: &mut DiagnosticBag) -> Token {
        let mut content = String::new();

        loop {
            match self.peek(0) {
                Some('"') => {
                    self.bump();
                    return Token::StringLiteral(content);
                }
                Some('\n') | None => {
                    let span = Span::new(start, self.position);
                    diagnostics.error(
                        codes::lexical::UNTERMINATED_STRING,
                        span,
                        "string literal not terminated before end of line".to_string(),
                    );
                    return Token::Error(format!("\"{}", content));
                }
                Some('\\') => {
                    self.bump();
                    match self.peek(0) {
                        Some('n') => {
                            self.bump();
                            content.push('\n');
                        }
                        Some('r') => {
                            self.bump();
                            content.push('\r');
                        }
                        Some('t') => {
                            self.bump();
                            content.push('\t');
                        }
                        Some('\\') => {
                            self.bump();
                            content.push('\\');
                        }
                        Some('"') => {
                            self.bump();
                            content.push('"');
                        }
                        Some(other) => {
                            let span = Span::new(start, self.position);
                            diagnostics.error(
                                codes::lexical::INVALID_ESCAPE_SEQUENCE,
                                span,
                                format!("unrecognized escape sequence '\\{}'", other),
                            );
                            // Drop the backslash, keep the character
                            self.bump();
                            content.push(other);
                        }
                        None => {}
                    }
                }
                Some(_) => {
                    content.push(self.bump().unwrap());
                    if content.len() > MAX_STRING_SIZE {
                        let span = Span::new(start, self.position);
                        diagnostics.error(
                            codes::lexical::UNTERMINATED_STRING,
                            span,
                            format!("string literal exceeds {} bytes", MAX_STRING_SIZE),
                        );
                        return Token::Error(format!("\"{}", content));
                    }
                }
            }
        }
    }

    /// Scan a numeric literal; `first` is the already-consumed leading
    /// character, either a digit or a '-' with a digit guaranteed behind it.
    /// Exponents are accepted only for the typed `FLOAT:` form.
    fn lex_number(
        &mut self,
        start: Position,
        first: char,
        allow_exponent: bool,
        diagnostics: &mut DiagnosticBag,
    ) -> Token {
        let mut text = String::new();
        text.push(first);

        let mut has_dot = false;
        loop {
            match self.peek(0) {
                Some(c) if c.is_ascii_digit() => {
                    text.push(self.bump().unwrap());
                }
                Some('.') if !has_dot && self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                    has_dot = true;
                    text.push(self.bump().unwrap());
                }
                _ => break,
            }
        }

        if allow_exponent && self.peek(0).is_some_and(|c| c == 'e' || c == 'E') {
            let exponent_ok = match self.peek(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.peek(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_ok {
                has_dot = true;
                text.push(self.bump().unwrap());
                if self.peek(0).is_some_and(|c| c == '+' || c == '-') {
                    text.push(self.bump().unwrap());
                }
                while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    text.push(self.bump().unwrap());
                }
            }
        }

        if has_dot {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Token::FloatLiteral(value),
                _ => {
                    let span = Span::new(start, self.position);
                    diagnostics.error(
                        codes::lexical::INVALID_TYPED_LITERAL,
                        span,
                        format!("float literal '{}' is out of range", text),
                    );
                    Token::Error(text)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => Token::IntLiteral(value),
                Err(_) => {
                    let span = Span::new(start, self.position);
                    diagnostics.error(
                        codes::lexical::INVALID_TYPED_LITERAL,
                        span,
                        format!("integer literal '{}' is out of range", text),
                    );
                    Token::Error(text)
                }
            }
        }
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    fn lex(source: &str) -> (Vec<Token>, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::new();
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize(source, &mut diagnostics);
        let tokens: Vec<Token> = stream
            .iter_significant()
            .map(|spanned| spanned.value.clone())
            .collect();
        (tokens, diagnostics)
    }

    #[test]
    fn test_tag_with_attribute_group() {
        let (tokens, diagnostics) = lex("§M[m1:Demo]");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Module),
                Token::LBracket,
                Token::Identifier("m1".to_string()),
                Token::Colon,
                Token::Identifier("Demo".to_string()),
                Token::RBracket,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_verbose_and_compact_tags_lex_identically() {
        let (verbose, _) = lex("§MODULE");
        let (compact, _) = lex("§M");
        assert_eq!(verbose, compact);
    }

    #[test]
    fn test_close_tags() {
        let (tokens, diagnostics) = lex("§/M §END_MODULE §/MODULE");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::EndModule),
                Token::Keyword(Keyword::EndModule),
                Token::Keyword(Keyword::EndModule),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unknown_keyword_after_sigil() {
        let (tokens, diagnostics) = lex("§BOGUS");
        assert_eq!(tokens[0], Token::Error("BOGUS".to_string()));
        assert_eq!(diagnostics.count_of(codes::lexical::UNKNOWN_KEYWORD), 1);
        // Lexing continues to Eof
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }

    #[test]
    fn test_typed_literal_with_valid_payload() {
        let (tokens, diagnostics) = lex("INT:5 FLOAT:3.25 STR:\"hi\" BOOL:true INT:-7");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            tokens,
            vec![
                Token::IntLiteral(5),
                Token::FloatLiteral(3.25),
                Token::StringLiteral("hi".to_string()),
                Token::BoolLiteral(true),
                Token::IntLiteral(-7),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_float_typed_literal_with_exponent() {
        let (tokens, diagnostics) = lex("FLOAT:1.5e3 FLOAT:2e-2");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens[0], Token::FloatLiteral(1500.0));
        assert_eq!(tokens[1], Token::FloatLiteral(0.02));
    }

    #[test]
    fn test_exponent_not_taken_for_bare_floats() {
        let (tokens, _) = lex("1.5e3");
        assert_eq!(tokens[0], Token::FloatLiteral(1.5));
        assert_eq!(tokens[1], Token::Identifier("e3".to_string()));
    }

    #[test]
    fn test_typed_prefix_with_failing_lookahead_stays_identifier() {
        let (tokens, diagnostics) = lex("INT:abc");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("INT".to_string()),
                Token::Colon,
                Token::Identifier("abc".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_typed_and_bare_booleans_agree() {
        let (typed, _) = lex("BOOL:true");
        let (bare, _) = lex("true");
        assert_eq!(typed, bare);
    }

    #[test]
    fn test_bool_payload_mismatch_reports_error() {
        let (tokens, diagnostics) = lex("BOOL:tru");
        assert_eq!(
            diagnostics.count_of(codes::lexical::INVALID_TYPED_LITERAL),
            1
        );
        assert!(matches!(tokens[0], Token::Error(_)));
    }

    #[test]
    fn test_unterminated_string_recovers_with_error_token() {
        let (tokens, diagnostics) = lex("\"abc");
        assert_eq!(diagnostics.count_of(codes::lexical::UNTERMINATED_STRING), 1);
        assert_eq!(tokens[0], Token::Error("\"abc".to_string()));
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }

    #[test]
    fn test_string_escapes() {
        let (tokens, diagnostics) = lex("\"a\\n\\t\\\"b\\\\\"");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens[0], Token::StringLiteral("a\n\t\"b\\".to_string()));
    }

    #[test]
    fn test_invalid_escape_keeps_character() {
        let (tokens, diagnostics) = lex("\"a\\qb\"");
        assert_eq!(
            diagnostics.count_of(codes::lexical::INVALID_ESCAPE_SEQUENCE),
            1
        );
        assert_eq!(tokens[0], Token::StringLiteral("aqb".to_string()));
    }

    #[test]
    fn test_operators_and_arrow() {
        let (tokens, diagnostics) = lex("-> - -3 ** * == = != << <= &&");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            tokens,
            vec![
                Token::Arrow,
                Token::Minus,
                Token::IntLiteral(-3),
                Token::StarStar,
                Token::Star,
                Token::EqualsEquals,
                Token::Equals,
                Token::BangEquals,
                Token::ShiftLeft,
                Token::LessEquals,
                Token::AmpAmp,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_dotted_identifier_is_single_token() {
        let (tokens, _) = lex("foo.bar.baz");
        assert_eq!(tokens[0], Token::Identifier("foo.bar.baz".to_string()));
    }

    #[test]
    fn test_verbatim_identifier() {
        let (tokens, diagnostics) = lex("`weird name!`");
        assert!(!diagnostics.has_errors());
        assert_eq!(tokens[0], Token::Identifier("weird name!".to_string()));
    }

    #[test]
    fn test_unterminated_verbatim_identifier() {
        let (tokens, diagnostics) = lex("`oops\n");
        assert_eq!(diagnostics.count_of(codes::lexical::UNTERMINATED_STRING), 1);
        assert!(matches!(tokens[0], Token::Error(_)));
    }

    #[test]
    fn test_unexpected_character_recovers() {
        let (tokens, diagnostics) = lex("$ 42");
        assert_eq!(
            diagnostics.count_of(codes::lexical::UNEXPECTED_CHARACTER),
            1
        );
        assert_eq!(tokens[0], Token::Error("$".to_string()));
        assert_eq!(tokens[1], Token::IntLiteral(42));
    }

    #[test]
    fn test_crlf_folds_to_single_newline() {
        let mut diagnostics = DiagnosticBag::new();
        let mut analyzer = LexicalAnalyzer::new();
        let stream = analyzer.tokenize("a\r\nb", &mut diagnostics);
        let newlines = stream
            .all_tokens()
            .iter()
            .filter(|t| t.value == Token::Newline)
            .count();
        assert_eq!(newlines, 1);
    }

    #[test]
    fn test_single_trailing_eof() {
        let (tokens, _) = lex("§M §/M");
        let eof_count = tokens.iter().filter(|t| **t == Token::Eof).count();
        assert_eq!(eof_count, 1);
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }

    #[test]
    fn test_metrics_count_token_classes() {
        let mut diagnostics = DiagnosticBag::new();
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("§R 42 name", &mut diagnostics);
        let metrics = analyzer.metrics();
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.literal_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 1);
        assert_eq!(metrics.trivia_tokens, 2);
    }
}
