//! Token definitions for OPAL
//!
//! Tag keywords are resolved by the lexer against the keyword table; bare
//! words outside tags become identifiers or boolean literals. All operator
//! spellings get dedicated symbol tokens so the parser never re-inspects
//! source text.
use crate::grammar::ast::BinaryOp;
use crate::grammar::keywords::Keyword;
use crate::log_debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// OPAL token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    // === STRUCTURAL KEYWORDS ===
    /// Tag keyword resolved from a `§` form
    Keyword(Keyword),

    // === LITERALS ===
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),

    // === IDENTIFIERS ===
    /// User-defined names; dots are part of the identifier
    Identifier(String),

    // === ATTRIBUTE AND GROUPING PUNCTUATION ===
    LBracket,  // [
    RBracket,  // ]
    LParen,    // (
    RParen,    // )
    Colon,     // :
    Tilde,     // ~
    Hash,      // #
    Question,  // ?
    Comma,     // ,
    At,        // @

    // === OPERATOR SYMBOLS ===
    Equals,        // =
    EqualsEquals,  // ==
    Bang,          // !
    BangEquals,    // !=
    Star,          // *
    StarStar,      // **
    Slash,         // /
    Percent,       // %
    Plus,          // +
    Minus,         // -
    Arrow,         // ->
    Less,          // <
    LessEquals,    // <=
    ShiftLeft,     // <<
    Greater,       // >
    GreaterEquals, // >=
    ShiftRight,    // >>
    Amp,           // &
    AmpAmp,        // &&
    Pipe,          // |
    PipePipe,      // ||

    // === WHITESPACE ===
    Space,
    Tab,
    Newline,

    // === SPECIAL ===
    /// Lexically invalid text; carries the offending characters
    Error(String),
    /// End of file marker
    Eof,
}

impl Token {
    /// Check if this token is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Space | Self::Tab | Self::Newline)
    }

    /// Check if this token should be skipped during parsing
    pub fn is_ignorable(&self) -> bool {
        self.is_whitespace()
    }

    pub fn is_significant(&self) -> bool {
        let result = !self.is_ignorable();

        if matches!(self, Self::Eof) {
            log_debug!("EOF token significance determination",
                "is_significant" => result
            );
        }

        result
    }

    /// Check if this token is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::IntLiteral(_)
                | Self::FloatLiteral(_)
                | Self::StringLiteral(_)
                | Self::BoolLiteral(_)
        )
    }

    /// Check if this token is an identifier
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Get keyword if this token is a keyword
    pub fn as_keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Get identifier if this token is an identifier
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Check if this token matches a specific keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Self::Keyword(kw) if *kw == keyword)
    }

    /// Map an operator symbol token to its binary operator
    pub fn as_binary_op(&self) -> Option<BinaryOp> {
        match self {
            Self::Plus => Some(BinaryOp::Add),
            Self::Minus => Some(BinaryOp::Sub),
            Self::Star => Some(BinaryOp::Mul),
            Self::StarStar => Some(BinaryOp::Pow),
            Self::Slash => Some(BinaryOp::Div),
            Self::Percent => Some(BinaryOp::Mod),
            Self::EqualsEquals => Some(BinaryOp::Eq),
            Self::BangEquals => Some(BinaryOp::Ne),
            Self::Less => Some(BinaryOp::Lt),
            Self::LessEquals => Some(BinaryOp::Le),
            Self::Greater => Some(BinaryOp::Gt),
            Self::GreaterEquals => Some(BinaryOp::Ge),
            Self::AmpAmp => Some(BinaryOp::And),
            Self::PipePipe => Some(BinaryOp::Or),
            Self::Amp => Some(BinaryOp::BitAnd),
            Self::Pipe => Some(BinaryOp::BitOr),
            Self::ShiftLeft => Some(BinaryOp::Shl),
            Self::ShiftRight => Some(BinaryOp::Shr),
            _ => None,
        }
    }

    /// Get the token as it appears in OPAL source
    pub fn as_source_string(&self) -> String {
        match self {
            Self::Keyword(kw) => kw.as_str().to_string(),

            Self::IntLiteral(i) => i.to_string(),
            Self::FloatLiteral(f) => f.to_string(),
            Self::StringLiteral(s) => format!("\"{}\"", s),
            Self::BoolLiteral(b) => b.to_string(),

            Self::Identifier(id) => id.clone(),

            Self::LBracket => "[".to_string(),
            Self::RBracket => "]".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::Colon => ":".to_string(),
            Self::Tilde => "~".to_string(),
            Self::Hash => "#".to_string(),
            Self::Question => "?".to_string(),
            Self::Comma => ",".to_string(),
            Self::At => "@".to_string(),

            Self::Equals => "=".to_string(),
            Self::EqualsEquals => "==".to_string(),
            Self::Bang => "!".to_string(),
            Self::BangEquals => "!=".to_string(),
            Self::Star => "*".to_string(),
            Self::StarStar => "**".to_string(),
            Self::Slash => "/".to_string(),
            Self::Percent => "%".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Arrow => "->".to_string(),
            Self::Less => "<".to_string(),
            Self::LessEquals => "<=".to_string(),
            Self::ShiftLeft => "<<".to_string(),
            Self::Greater => ">".to_string(),
            Self::GreaterEquals => ">=".to_string(),
            Self::ShiftRight => ">>".to_string(),
            Self::Amp => "&".to_string(),
            Self::AmpAmp => "&&".to_string(),
            Self::Pipe => "|".to_string(),
            Self::PipePipe => "||".to_string(),

            Self::Space => " ".to_string(),
            Self::Tab => "\t".to_string(),
            Self::Newline => "\n".to_string(),

            Self::Error(text) => text.clone(),
            Self::Eof => "<EOF>".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_source_string())
    }
}

/// Token classification for different parsing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// Structural tokens (keywords)
    Structural,
    /// Operator symbols
    Operator,
    /// Literal values
    Literal,
    /// Identifiers
    Identifier,
    /// Punctuation
    Punctuation,
    /// Whitespace and formatting
    Whitespace,
    /// Special tokens (errors, EOF)
    Special,
}

impl Token {
    /// Get the classification of this token
    pub fn token_class(&self) -> TokenClass {
        match self {
            Self::Keyword(_) => TokenClass::Structural,

            Self::Equals
            | Self::EqualsEquals
            | Self::Bang
            | Self::BangEquals
            | Self::Star
            | Self::StarStar
            | Self::Slash
            | Self::Percent
            | Self::Plus
            | Self::Minus
            | Self::Arrow
            | Self::Less
            | Self::LessEquals
            | Self::ShiftLeft
            | Self::Greater
            | Self::GreaterEquals
            | Self::ShiftRight
            | Self::Amp
            | Self::AmpAmp
            | Self::Pipe
            | Self::PipePipe => TokenClass::Operator,

            Self::IntLiteral(_)
            | Self::FloatLiteral(_)
            | Self::StringLiteral(_)
            | Self::BoolLiteral(_) => TokenClass::Literal,

            Self::Identifier(_) => TokenClass::Identifier,

            Self::LBracket
            | Self::RBracket
            | Self::LParen
            | Self::RParen
            | Self::Colon
            | Self::Tilde
            | Self::Hash
            | Self::Question
            | Self::Comma
            | Self::At => TokenClass::Punctuation,

            Self::Space | Self::Tab | Self::Newline => TokenClass::Whitespace,
            Self::Error(_) | Self::Eof => TokenClass::Special,
        }
    }
}

/// Classify a bare word outside a tag as literal or identifier
pub fn classify_word(word: &str) -> Token {
    match word {
        "true" => Token::BoolLiteral(true),
        "false" => Token::BoolLiteral(false),
        _ => Token::Identifier(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_word_booleans_and_identifiers() {
        assert_eq!(classify_word("true"), Token::BoolLiteral(true));
        assert_eq!(classify_word("false"), Token::BoolLiteral(false));
        assert_eq!(
            classify_word("count"),
            Token::Identifier("count".to_string())
        );
        // Tag keywords never reach word classification without the sigil
        assert_eq!(
            classify_word("MODULE"),
            Token::Identifier("MODULE".to_string())
        );
    }

    #[test]
    fn test_whitespace_is_not_significant() {
        assert!(!Token::Space.is_significant());
        assert!(!Token::Newline.is_significant());
        assert!(Token::Eof.is_significant());
        assert!(Token::Keyword(Keyword::Module).is_significant());
        assert!(Token::Error("$".to_string()).is_significant());
    }

    #[test]
    fn test_binary_op_mapping() {
        assert_eq!(Token::Plus.as_binary_op(), Some(BinaryOp::Add));
        assert_eq!(Token::StarStar.as_binary_op(), Some(BinaryOp::Pow));
        assert_eq!(Token::AmpAmp.as_binary_op(), Some(BinaryOp::And));
        assert_eq!(Token::Equals.as_binary_op(), None);
        assert_eq!(Token::Bang.as_binary_op(), None);
    }

    #[test]
    fn test_token_class() {
        assert_eq!(
            Token::Keyword(Keyword::Return).token_class(),
            TokenClass::Structural
        );
        assert_eq!(Token::LBracket.token_class(), TokenClass::Punctuation);
        assert_eq!(Token::IntLiteral(42).token_class(), TokenClass::Literal);
        assert_eq!(Token::Arrow.token_class(), TokenClass::Operator);
    }

    #[test]
    fn test_source_round_trip_spellings() {
        assert_eq!(Token::Arrow.as_source_string(), "->");
        assert_eq!(Token::ShiftLeft.as_source_string(), "<<");
        assert_eq!(
            Token::StringLiteral("hi".to_string()).as_source_string(),
            "\"hi\""
        );
        assert_eq!(
            Token::Keyword(Keyword::EndModule).as_source_string(),
            "END_MODULE"
        );
    }
}
