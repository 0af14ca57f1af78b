//! OPAL tag keyword system
//!
//! Every construct tag has a verbose spelling and a compact spelling, and
//! both resolve to the same [`Keyword`]. Block constructs close with either
//! the verbose `END_NAME` tag or the slash-prefixed compact form; the lexer
//! resolves the slash form through [`Keyword::corresponding_end`].
//!
//! Lookup is exact and case-sensitive. Anything after the tag sigil that is
//! not in this table is an unknown-keyword error, never an identifier.
use serde::{Deserialize, Serialize};

/// OPAL structural keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    // === BLOCK CONSTRUCTS ===
    Module,
    EndModule,
    Class,
    EndClass,
    Interface,
    EndInterface,
    Function,
    EndFunction,
    Method,
    EndMethod,
    Constructor,
    EndConstructor,
    Property,
    EndProperty,
    For,
    EndFor,
    While,
    EndWhile,
    If,
    EndIf,
    Match,
    EndMatch,
    Foreach,
    EndForeach,
    Try,
    EndTry,
    Lambda,
    EndLambda,
    Array,
    EndArray,
    Record,
    EndRecord,
    With,
    EndWith,
    Interp,
    EndInterp,
    Call,
    EndCall,
    New,
    EndNew,
    Lock,
    EndLock,

    // === DECLARATION CLAUSES ===
    Using,
    Field,
    Param,
    Output,
    Effects,
    TypeParam,
    Where,
    Pre,
    Post,

    // === STATEMENT HEADS ===
    Return,
    Bind,
    ElseIf,
    Else,
    Case,
    Catch,
    Finally,
    When,
    Throw,
    Rethrow,
    Subscribe,
    Unsubscribe,
    Print,
    Println,

    // === EXPRESSION HEADS ===
    Some,
    NoneValue,
    Ok,
    Err,
    This,
    Base,
    Await,
    Index,
    Len,
    Generic,
    Coalesce,
    Safe,
    Range,
    FromEnd,

    // === METADATA ANNOTATIONS ===
    Todo,
    Fixme,
    Hack,
    Assumption,
    Invariant,
    Decision,
    Context,
    Author,
}

impl Keyword {
    /// Get the verbose spelling as it appears in OPAL source
    pub const fn as_str(self) -> &'static str {
        match self {
            // Block constructs
            Self::Module => "MODULE",
            Self::EndModule => "END_MODULE",
            Self::Class => "CLASS",
            Self::EndClass => "END_CLASS",
            Self::Interface => "INTERFACE",
            Self::EndInterface => "END_INTERFACE",
            Self::Function => "FUNCTION",
            Self::EndFunction => "END_FUNCTION",
            Self::Method => "METHOD",
            Self::EndMethod => "END_METHOD",
            Self::Constructor => "CONSTRUCTOR",
            Self::EndConstructor => "END_CONSTRUCTOR",
            Self::Property => "PROPERTY",
            Self::EndProperty => "END_PROPERTY",
            Self::For => "FOR",
            Self::EndFor => "END_FOR",
            Self::While => "WHILE",
            Self::EndWhile => "END_WHILE",
            Self::If => "IF",
            Self::EndIf => "END_IF",
            Self::Match => "MATCH",
            Self::EndMatch => "END_MATCH",
            Self::Foreach => "FOREACH",
            Self::EndForeach => "END_FOREACH",
            Self::Try => "TRY",
            Self::EndTry => "END_TRY",
            Self::Lambda => "LAMBDA",
            Self::EndLambda => "END_LAMBDA",
            Self::Array => "ARRAY",
            Self::EndArray => "END_ARRAY",
            Self::Record => "RECORD",
            Self::EndRecord => "END_RECORD",
            Self::With => "WITH",
            Self::EndWith => "END_WITH",
            Self::Interp => "INTERP",
            Self::EndInterp => "END_INTERP",
            Self::Call => "CALL",
            Self::EndCall => "END_CALL",
            Self::New => "NEW",
            Self::EndNew => "END_NEW",
            Self::Lock => "LOCK",
            Self::EndLock => "END_LOCK",

            // Declaration clauses
            Self::Using => "USING",
            Self::Field => "FIELD",
            Self::Param => "PARAM",
            Self::Output => "OUTPUT",
            Self::Effects => "EFFECTS",
            Self::TypeParam => "TYPEPARAM",
            Self::Where => "WHERE",
            Self::Pre => "PRE",
            Self::Post => "POST",

            // Statement heads
            Self::Return => "RETURN",
            Self::Bind => "BIND",
            Self::ElseIf => "ELSEIF",
            Self::Else => "ELSE",
            Self::Case => "CASE",
            Self::Catch => "CATCH",
            Self::Finally => "FINALLY",
            Self::When => "WHEN",
            Self::Throw => "THROW",
            Self::Rethrow => "RETHROW",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Print => "PRINT",
            Self::Println => "PRINTLN",

            // Expression heads
            Self::Some => "SOME",
            Self::NoneValue => "NONE",
            Self::Ok => "OK",
            Self::Err => "ERR",
            Self::This => "THIS",
            Self::Base => "BASE",
            Self::Await => "AWAIT",
            Self::Index => "INDEX",
            Self::Len => "LEN",
            Self::Generic => "GENERIC",
            Self::Coalesce => "COALESCE",
            Self::Safe => "SAFE",
            Self::Range => "RANGE",
            Self::FromEnd => "FROMEND",

            // Metadata annotations
            Self::Todo => "TODO",
            Self::Fixme => "FIXME",
            Self::Hack => "HACK",
            Self::Assumption => "ASSUMPTION",
            Self::Invariant => "INVARIANT",
            Self::Decision => "DECISION",
            Self::Context => "CONTEXT",
            Self::Author => "AUTHOR",
        }
    }

    /// Get the compact spelling. Closers have no standalone compact
    /// spelling; their compact form is the slash-prefixed construct tag.
    pub const fn compact_str(self) -> &'static str {
        match self {
            Self::Module => "M",
            Self::Class => "CL",
            Self::Interface => "IX",
            Self::Function => "F",
            Self::Method => "MD",
            Self::Constructor => "CT",
            Self::Property => "PY",
            Self::For => "FOR",
            Self::While => "WL",
            Self::If => "IF",
            Self::Match => "MA",
            Self::Foreach => "FE",
            Self::Try => "TR",
            Self::Lambda => "LM",
            Self::Array => "AR",
            Self::Record => "RC",
            Self::With => "WI",
            Self::Interp => "SI",
            Self::Call => "C",
            Self::New => "NW",
            Self::Lock => "LK",

            Self::Using => "US",
            Self::Field => "FD",
            Self::Param => "P",
            Self::Output => "O",
            Self::Effects => "E",
            Self::TypeParam => "TP",
            Self::Where => "W",
            Self::Pre => "PRE",
            Self::Post => "POST",

            Self::Return => "R",
            Self::Bind => "B",
            Self::ElseIf => "EI",
            Self::Else => "EL",
            Self::Case => "CS",
            Self::Catch => "CH",
            Self::Finally => "FN",
            Self::When => "WN",
            Self::Throw => "TH",
            Self::Rethrow => "RT",
            Self::Subscribe => "SUB",
            Self::Unsubscribe => "UNSUB",
            Self::Print => "PT",
            Self::Println => "PL",

            Self::Some => "SM",
            Self::NoneValue => "NN",
            Self::Ok => "OK",
            Self::Err => "ERR",
            Self::This => "THIS",
            Self::Base => "BASE",
            Self::Await => "AW",
            Self::Index => "IDX",
            Self::Len => "LEN",
            Self::Generic => "GN",
            Self::Coalesce => "NC",
            Self::Safe => "SF",
            Self::Range => "RG",
            Self::FromEnd => "IE",

            Self::Todo => "TODO",
            Self::Fixme => "FIXME",
            Self::Hack => "HACK",
            Self::Assumption => "ASM",
            Self::Invariant => "INV",
            Self::Decision => "DEC",
            Self::Context => "CTX",
            Self::Author => "AU",

            // Closers only exist as END_NAME or /NAME
            Self::EndModule
            | Self::EndClass
            | Self::EndInterface
            | Self::EndFunction
            | Self::EndMethod
            | Self::EndConstructor
            | Self::EndProperty
            | Self::EndFor
            | Self::EndWhile
            | Self::EndIf
            | Self::EndMatch
            | Self::EndForeach
            | Self::EndTry
            | Self::EndLambda
            | Self::EndArray
            | Self::EndRecord
            | Self::EndWith
            | Self::EndInterp
            | Self::EndCall
            | Self::EndNew
            | Self::EndLock => "",
        }
    }

    /// Parse a tag name (verbose or compact) with exact case matching
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            // Block constructs
            "MODULE" | "M" => Some(Self::Module),
            "END_MODULE" => Some(Self::EndModule),
            "CLASS" | "CL" => Some(Self::Class),
            "END_CLASS" => Some(Self::EndClass),
            "INTERFACE" | "IX" => Some(Self::Interface),
            "END_INTERFACE" => Some(Self::EndInterface),
            "FUNCTION" | "F" => Some(Self::Function),
            "END_FUNCTION" => Some(Self::EndFunction),
            "METHOD" | "MD" => Some(Self::Method),
            "END_METHOD" => Some(Self::EndMethod),
            "CONSTRUCTOR" | "CT" => Some(Self::Constructor),
            "END_CONSTRUCTOR" => Some(Self::EndConstructor),
            "PROPERTY" | "PY" => Some(Self::Property),
            "END_PROPERTY" => Some(Self::EndProperty),
            "FOR" => Some(Self::For),
            "END_FOR" => Some(Self::EndFor),
            "WHILE" | "WL" => Some(Self::While),
            "END_WHILE" => Some(Self::EndWhile),
            "IF" => Some(Self::If),
            "END_IF" => Some(Self::EndIf),
            "MATCH" | "MA" => Some(Self::Match),
            "END_MATCH" => Some(Self::EndMatch),
            "FOREACH" | "FE" => Some(Self::Foreach),
            "END_FOREACH" => Some(Self::EndForeach),
            "TRY" | "TR" => Some(Self::Try),
            "END_TRY" => Some(Self::EndTry),
            "LAMBDA" | "LM" => Some(Self::Lambda),
            "END_LAMBDA" => Some(Self::EndLambda),
            "ARRAY" | "AR" => Some(Self::Array),
            "END_ARRAY" => Some(Self::EndArray),
            "RECORD" | "RC" => Some(Self::Record),
            "END_RECORD" => Some(Self::EndRecord),
            "WITH" | "WI" => Some(Self::With),
            "END_WITH" => Some(Self::EndWith),
            "INTERP" | "SI" => Some(Self::Interp),
            "END_INTERP" => Some(Self::EndInterp),
            "CALL" | "C" => Some(Self::Call),
            "END_CALL" => Some(Self::EndCall),
            "NEW" | "NW" => Some(Self::New),
            "END_NEW" => Some(Self::EndNew),
            "LOCK" | "LK" => Some(Self::Lock),
            "END_LOCK" => Some(Self::EndLock),

            // Declaration clauses
            "USING" | "US" => Some(Self::Using),
            "FIELD" | "FD" => Some(Self::Field),
            "PARAM" | "P" => Some(Self::Param),
            "OUTPUT" | "O" => Some(Self::Output),
            "EFFECTS" | "E" => Some(Self::Effects),
            "TYPEPARAM" | "TP" => Some(Self::TypeParam),
            "WHERE" | "W" => Some(Self::Where),
            "PRE" => Some(Self::Pre),
            "POST" => Some(Self::Post),

            // Statement heads
            "RETURN" | "R" => Some(Self::Return),
            "BIND" | "B" => Some(Self::Bind),
            "ELSEIF" | "EI" => Some(Self::ElseIf),
            "ELSE" | "EL" => Some(Self::Else),
            "CASE" | "CS" => Some(Self::Case),
            "CATCH" | "CH" => Some(Self::Catch),
            "FINALLY" | "FN" => Some(Self::Finally),
            "WHEN" | "WN" => Some(Self::When),
            "THROW" | "TH" => Some(Self::Throw),
            "RETHROW" | "RT" => Some(Self::Rethrow),
            "SUBSCRIBE" | "SUB" => Some(Self::Subscribe),
            "UNSUBSCRIBE" | "UNSUB" => Some(Self::Unsubscribe),
            "PRINT" | "PT" => Some(Self::Print),
            "PRINTLN" | "PL" => Some(Self::Println),

            // Expression heads
            "SOME" | "SM" => Some(Self::Some),
            "NONE" | "NN" => Some(Self::NoneValue),
            "OK" => Some(Self::Ok),
            "ERR" => Some(Self::Err),
            "THIS" => Some(Self::This),
            "BASE" => Some(Self::Base),
            "AWAIT" | "AW" => Some(Self::Await),
            "INDEX" | "IDX" => Some(Self::Index),
            "LEN" => Some(Self::Len),
            "GENERIC" | "GN" => Some(Self::Generic),
            "COALESCE" | "NC" => Some(Self::Coalesce),
            "SAFE" | "SF" => Some(Self::Safe),
            "RANGE" | "RG" => Some(Self::Range),
            "FROMEND" | "IE" => Some(Self::FromEnd),

            // Metadata annotations
            "TODO" => Some(Self::Todo),
            "FIXME" => Some(Self::Fixme),
            "HACK" => Some(Self::Hack),
            "ASSUMPTION" | "ASM" => Some(Self::Assumption),
            "INVARIANT" | "INV" => Some(Self::Invariant),
            "DECISION" | "DEC" => Some(Self::Decision),
            "CONTEXT" | "CTX" => Some(Self::Context),
            "AUTHOR" | "AU" => Some(Self::Author),

            _ => None,
        }
    }

    /// Parse a slash-prefixed close tag name (`/M`, `/MODULE`)
    pub fn from_close_tag(s: &str) -> Option<Self> {
        Self::from_tag(s).and_then(Self::corresponding_end)
    }

    /// Get the corresponding end keyword for a block construct keyword
    pub const fn corresponding_end(self) -> Option<Self> {
        match self {
            Self::Module => Some(Self::EndModule),
            Self::Class => Some(Self::EndClass),
            Self::Interface => Some(Self::EndInterface),
            Self::Function => Some(Self::EndFunction),
            Self::Method => Some(Self::EndMethod),
            Self::Constructor => Some(Self::EndConstructor),
            Self::Property => Some(Self::EndProperty),
            Self::For => Some(Self::EndFor),
            Self::While => Some(Self::EndWhile),
            Self::If => Some(Self::EndIf),
            Self::Match => Some(Self::EndMatch),
            Self::Foreach => Some(Self::EndForeach),
            Self::Try => Some(Self::EndTry),
            Self::Lambda => Some(Self::EndLambda),
            Self::Array => Some(Self::EndArray),
            Self::Record => Some(Self::EndRecord),
            Self::With => Some(Self::EndWith),
            Self::Interp => Some(Self::EndInterp),
            Self::Call => Some(Self::EndCall),
            Self::New => Some(Self::EndNew),
            Self::Lock => Some(Self::EndLock),
            _ => None,
        }
    }

    /// Check if this keyword opens a block construct
    pub const fn is_block_start(self) -> bool {
        self.corresponding_end().is_some()
    }

    /// Check if this keyword closes a block construct
    pub const fn is_block_end(self) -> bool {
        matches!(
            self,
            Self::EndModule
                | Self::EndClass
                | Self::EndInterface
                | Self::EndFunction
                | Self::EndMethod
                | Self::EndConstructor
                | Self::EndProperty
                | Self::EndFor
                | Self::EndWhile
                | Self::EndIf
                | Self::EndMatch
                | Self::EndForeach
                | Self::EndTry
                | Self::EndLambda
                | Self::EndArray
                | Self::EndRecord
                | Self::EndWith
                | Self::EndInterp
                | Self::EndCall
                | Self::EndNew
                | Self::EndLock
        )
    }

    /// Check if this keyword is a metadata annotation tag
    pub const fn is_metadata(self) -> bool {
        matches!(
            self,
            Self::Todo
                | Self::Fixme
                | Self::Hack
                | Self::Assumption
                | Self::Invariant
                | Self::Decision
                | Self::Context
                | Self::Author
        )
    }

    /// Check if this keyword can head an expression
    pub const fn is_expression_head(self) -> bool {
        matches!(
            self,
            Self::Some
                | Self::NoneValue
                | Self::Ok
                | Self::Err
                | Self::This
                | Self::Base
                | Self::Await
                | Self::Index
                | Self::Len
                | Self::Generic
                | Self::Coalesce
                | Self::Safe
                | Self::Range
                | Self::FromEnd
                | Self::Record
                | Self::Match
                | Self::Array
                | Self::New
                | Self::Lambda
                | Self::Interp
                | Self::With
        )
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check if a tag name resolves to a keyword
pub fn is_known_tag(s: &str) -> bool {
    Keyword::from_tag(s).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_and_compact_resolve_to_same_keyword() {
        assert_eq!(Keyword::from_tag("MODULE"), Some(Keyword::Module));
        assert_eq!(Keyword::from_tag("M"), Some(Keyword::Module));
        assert_eq!(Keyword::from_tag("FUNCTION"), Some(Keyword::Function));
        assert_eq!(Keyword::from_tag("F"), Some(Keyword::Function));
        assert_eq!(Keyword::from_tag("RETURN"), Some(Keyword::Return));
        assert_eq!(Keyword::from_tag("R"), Some(Keyword::Return));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Keyword::from_tag("module"), None);
        assert_eq!(Keyword::from_tag("Module"), None);
        assert_eq!(Keyword::from_tag("m"), None);
    }

    #[test]
    fn test_close_tag_resolution() {
        assert_eq!(Keyword::from_tag("END_MODULE"), Some(Keyword::EndModule));
        assert_eq!(Keyword::from_close_tag("M"), Some(Keyword::EndModule));
        assert_eq!(Keyword::from_close_tag("MODULE"), Some(Keyword::EndModule));
        assert_eq!(Keyword::from_close_tag("F"), Some(Keyword::EndFunction));
        // Non-block tags have no close form
        assert_eq!(Keyword::from_close_tag("R"), None);
    }

    #[test]
    fn test_block_classification() {
        assert!(Keyword::Module.is_block_start());
        assert!(Keyword::Call.is_block_start());
        assert!(!Keyword::Return.is_block_start());
        assert!(Keyword::EndFunction.is_block_end());
        assert!(!Keyword::Function.is_block_end());
    }

    #[test]
    fn test_every_block_start_has_unique_end() {
        let starts = [
            Keyword::Module,
            Keyword::Class,
            Keyword::Interface,
            Keyword::Function,
            Keyword::Method,
            Keyword::Constructor,
            Keyword::Property,
            Keyword::For,
            Keyword::While,
            Keyword::If,
            Keyword::Match,
            Keyword::Foreach,
            Keyword::Try,
            Keyword::Lambda,
            Keyword::Array,
            Keyword::Record,
            Keyword::With,
            Keyword::Interp,
            Keyword::Call,
            Keyword::New,
            Keyword::Lock,
        ];
        let mut ends: Vec<Keyword> = starts
            .iter()
            .map(|k| k.corresponding_end().unwrap())
            .collect();
        let total = ends.len();
        ends.dedup();
        assert_eq!(ends.len(), total);
        for end in ends {
            assert!(end.is_block_end());
        }
    }

    #[test]
    fn test_metadata_tags() {
        assert!(Keyword::Todo.is_metadata());
        assert!(Keyword::Decision.is_metadata());
        assert!(!Keyword::Module.is_metadata());
        assert_eq!(Keyword::from_tag("DEC"), Some(Keyword::Decision));
    }
}
