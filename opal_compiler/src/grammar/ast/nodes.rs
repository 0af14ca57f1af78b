//! Syntax tree node definitions for OPAL
//!
//! Every node wraps its kind with the source span it covers. The parser
//! always produces a [`Module`], even on broken input; holes left by
//! recovery are [`ExpressionKind::Missing`] nodes paired with diagnostics.

use crate::utils::Span;
use serde::{Deserialize, Serialize};

// ============================================================================
// MODULE AND DECLARATIONS
// ============================================================================

/// Root node of every parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub usings: Vec<UsingDecl>,
    pub interfaces: Vec<Interface>,
    pub classes: Vec<Class>,
    pub functions: Vec<Function>,
    pub metadata: Vec<MetadataEntry>,
    pub span: Span,
}

/// An import of another module or namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsingDecl {
    pub path: String,
    pub span: Span,
}

/// Free function or method body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
    pub type_params: Vec<TypeParamDecl>,
    pub params: Vec<Param>,
    pub output: Option<Output>,
    pub effects: EffectSet,
    pub preconditions: Vec<Expression>,
    pub postconditions: Vec<Expression>,
    pub body: Vec<Statement>,
    pub metadata: Vec<MetadataEntry>,
    pub span: Span,
}

/// Class declaration with its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
    pub implements: Vec<String>,
    pub type_params: Vec<TypeParamDecl>,
    pub members: Vec<Member>,
    pub metadata: Vec<MetadataEntry>,
    pub span: Span,
}

/// A class member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Member {
    Field(Field),
    Method(Function),
    Property(Property),
    Constructor(Constructor),
}

/// Instance or static data slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
    pub visibility: Visibility,
    pub mutable: bool,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// Property with optional initializer expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub ty: TypeDescriptor,
    pub visibility: Visibility,
    pub initializer: Option<Expression>,
    pub span: Span,
}

/// Constructor block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    pub id: String,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub effects: EffectSet,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// Interface declaration: method signatures without bodies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
    pub methods: Vec<MethodSignature>,
    pub span: Span,
}

/// Bodiless method declaration inside an interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub id: String,
    pub name: String,
    pub params: Vec<Param>,
    pub output: Option<Output>,
    pub effects: EffectSet,
    pub span: Span,
}

/// Declared type parameter with its constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeParamDecl {
    pub name: String,
    pub constraints: Vec<String>,
    pub span: Span,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeDescriptor,
    pub semantic: Option<String>,
    pub mutable: bool,
    pub span: Span,
}

/// Declared return value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    pub ty: TypeDescriptor,
    pub semantic: Option<String>,
    pub span: Span,
}

// ============================================================================
// TYPES, VISIBILITY, EFFECTS
// ============================================================================

/// Resolved type notation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Primitive(PrimitiveType),
    Named(String),
    Optional(Box<TypeDescriptor>),
    Result {
        ok: Box<TypeDescriptor>,
        err: Box<TypeDescriptor>,
    },
}

/// Built-in primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
    Bool,
    Char,
    Void,
    Never,
}

/// Declaration visibility; unmarked declarations are private
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    #[default]
    Private,
    Internal,
}

/// One declared effect, category plus value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    pub category: String,
    pub value: String,
}

/// Ordered set of declared effects
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectSet {
    pub entries: Vec<EffectEntry>,
}

impl EffectSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value declared for a category, if any
    pub fn get(&self, category: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.value.as_str())
    }
}

// ============================================================================
// METADATA ANNOTATIONS
// ============================================================================

/// Source-level annotation attached to the enclosing declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub kind: MetadataKind,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataKind {
    Todo,
    Fixme,
    Hack,
    Assumption,
    Invariant,
    Decision { id: String, status: String },
    Context,
    Author,
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// Invocation of a named target
    Call {
        target: String,
        fallible: bool,
        args: Vec<Expression>,
    },
    Return(Option<Expression>),
    For {
        id: String,
        var: String,
        from: Expression,
        to: Expression,
        step: Expression,
        body: Vec<Statement>,
    },
    While {
        id: String,
        condition: Expression,
        body: Vec<Statement>,
    },
    If {
        id: String,
        condition: Expression,
        then_body: Vec<Statement>,
        elseifs: Vec<ElseIfClause>,
        else_body: Option<Vec<Statement>>,
    },
    Bind {
        name: String,
        mutable: bool,
        ty: Option<TypeDescriptor>,
        initializer: Expression,
    },
    Match {
        id: String,
        scrutinee: Expression,
        arms: Vec<MatchArm>,
    },
    Foreach {
        id: String,
        var: String,
        ty: Option<TypeDescriptor>,
        collection: Expression,
        body: Vec<Statement>,
    },
    Assign {
        target: Expression,
        value: Expression,
    },
    Try {
        id: String,
        body: Vec<Statement>,
        catches: Vec<CatchClause>,
        finally: Option<Vec<Statement>>,
    },
    Throw(Expression),
    Rethrow,
    Subscribe {
        event: String,
        handler: Expression,
    },
    Unsubscribe {
        event: String,
        handler: Expression,
    },
    Print {
        value: Expression,
        newline: bool,
    },
    Lock {
        id: String,
        resource: Expression,
        body: Vec<Statement>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseIfClause {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub var: String,
    pub ty: Option<TypeDescriptor>,
    pub filter: Option<Expression>,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// One arm of a statement-level match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub pattern: Pattern,
    /// Guard slot; the current grammar never populates it
    pub guard: Option<Expression>,
    pub body: Vec<Statement>,
    pub span: Span,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Placeholder produced by error recovery
    pub fn missing(span: Span) -> Self {
        Self {
            kind: ExpressionKind::Missing,
            span,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, ExpressionKind::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),
    Identifier(String),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    SomeOf(Box<Expression>),
    NoneValue,
    OkOf(Box<Expression>),
    ErrOf(Box<Expression>),
    Record {
        type_name: String,
        fields: Vec<(String, Expression)>,
    },
    MatchExpr {
        scrutinee: Box<Expression>,
        arms: Vec<(Pattern, Expression)>,
    },
    ArrayCreate {
        id: String,
        element_type: TypeDescriptor,
        size: Option<Box<Expression>>,
        elements: Vec<Expression>,
    },
    ArrayIndex {
        target: Box<Expression>,
        index: Box<Expression>,
    },
    ArrayLength(Box<Expression>),
    GenericInstance {
        base: String,
        args: Vec<TypeDescriptor>,
    },
    New {
        type_name: String,
        args: Vec<Expression>,
    },
    This,
    Base,
    Lambda {
        id: String,
        is_async: bool,
        params: Vec<Param>,
        effects: EffectSet,
        body: LambdaBody,
    },
    Await {
        operand: Box<Expression>,
        configure_context: bool,
    },
    Interpolation {
        parts: Vec<InterpPart>,
    },
    Coalesce {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    SafeAccess {
        target: Box<Expression>,
        member: String,
    },
    Range {
        from: Box<Expression>,
        to: Box<Expression>,
    },
    FromEnd(Box<Expression>),
    With {
        target: Box<Expression>,
        overrides: Vec<(String, Expression)>,
    },
    /// Hole left by error recovery
    Missing,
}

/// Lambda body: single expression or statement block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LambdaBody {
    Expression(Box<Expression>),
    Block(Vec<Statement>),
}

/// Piece of a string interpolation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InterpPart {
    Literal(String),
    Expression(Expression),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Pow,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    BitAnd,
    BitOr,
    Shl,
    Shr,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Pow => "**",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::Shl => "<<",
            Self::Shr => ">>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
        }
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatternKind {
    /// `_` matches anything without binding
    Wildcard,
    /// Bare identifier binds the scrutinee
    Binding(String),
    Literal(Box<Expression>),
    SomeOf(Box<Pattern>),
    NoneValue,
    OkOf(Box<Pattern>),
    ErrOf(Box<Pattern>),
    /// Positional destructuring: `(pos p0 p1 ...)`
    Positional(Vec<Pattern>),
    /// Property destructuring: `(prop name=p ...)`
    Property(Vec<(String, Pattern)>),
    /// Relational test against the scrutinee: `(rel < 10)`
    Relational {
        op: BinaryOp,
        value: Box<Expression>,
    },
    /// List destructuring: `(list p0 p1 ...)`
    List(Vec<Pattern>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_expression_placeholder() {
        let expr = Expression::missing(Span::dummy());
        assert!(expr.is_missing());
    }

    #[test]
    fn test_visibility_defaults_to_private() {
        assert_eq!(Visibility::default(), Visibility::Private);
    }

    #[test]
    fn test_effect_set_lookup() {
        let effects = EffectSet {
            entries: vec![
                EffectEntry {
                    category: "console".to_string(),
                    value: "write".to_string(),
                },
                EffectEntry {
                    category: "file".to_string(),
                    value: "read,write".to_string(),
                },
            ],
        };

        assert_eq!(effects.get("console"), Some("write"));
        assert_eq!(effects.get("file"), Some("read,write"));
        assert_eq!(effects.get("network"), None);
    }

    #[test]
    fn test_nodes_serialize_to_json() {
        let expr = Expression::new(
            ExpressionKind::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expression::new(
                    ExpressionKind::IntLiteral(1),
                    Span::dummy(),
                )),
                right: Box::new(Expression::new(
                    ExpressionKind::IntLiteral(2),
                    Span::dummy(),
                )),
            },
            Span::dummy(),
        );

        let json = serde_json::to_string(&expr).expect("expression serializes");
        assert!(json.contains("Binary"));
        assert!(json.contains("Add"));
    }
}
