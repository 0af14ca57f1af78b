//! Per-construct attribute reconciliation
//!
//! One pure function per construct kind turns an [`AttributeBag`] into that
//! construct's canonical fields, regardless of which attribute generation
//! wrote them. Named v1 keys win when present and non-empty; otherwise the
//! construct's fixed positional layout decodes the v2 slots. Missing required
//! fields degrade to empty strings with a diagnostic instead of failing.

use crate::attributes::AttributeBag;
use crate::diagnostics::DiagnosticBag;
use crate::grammar::ast::{EffectSet, Expression, ExpressionKind, TypeDescriptor, Visibility};
use crate::logging::codes;
use crate::reconcile::shorthand::{
    expand_effects, expand_semantic, parse_type, parse_visibility,
};
use crate::utils::Span;

// ============================================================================
// LOOKUP HELPERS
// ============================================================================

/// Named key first (non-empty wins), then the positional slot
fn lookup<'a>(bag: &'a AttributeBag, key: &str, pos: usize) -> Option<&'a str> {
    named(bag, key).or_else(|| bag.positional(pos).filter(|v| !v.is_empty()))
}

/// Named key only, for fields with no positional slot
fn named<'a>(bag: &'a AttributeBag, key: &str) -> Option<&'a str> {
    bag.get(key).filter(|v| !v.is_empty())
}

fn optional(bag: &AttributeBag, key: &str, pos: usize) -> Option<String> {
    lookup(bag, key, pos).map(str::to_string)
}

fn required(
    bag: &AttributeBag,
    key: &str,
    pos: usize,
    construct: &str,
    span: Span,
    diagnostics: &mut DiagnosticBag,
) -> String {
    match lookup(bag, key, pos) {
        Some(value) => value.to_string(),
        None => {
            diagnostics.error(
                codes::syntax::MISSING_REQUIRED_ATTRIBUTE,
                span,
                format!("{} requires a '{}' attribute", construct, key),
            );
            String::new()
        }
    }
}

/// Strip the mutability sigil from a name slot
fn strip_mutability(text: &str) -> (String, bool) {
    match text.strip_prefix('~') {
        Some(rest) => (rest.to_string(), true),
        None => (text.to_string(), false),
    }
}

/// Split a call target from its fallibility marker (`Foo!` or `Foo!ErrType`)
fn split_fallible(text: &str) -> (String, bool) {
    match text.split_once('!') {
        Some((target, _)) => (target.to_string(), true),
        None => (text.to_string(), false),
    }
}

/// Interpret an attribute value as a literal or identifier expression
pub fn expr_from_attr(text: &str, span: Span) -> Expression {
    let kind = if let Ok(value) = text.parse::<i64>() {
        ExpressionKind::IntLiteral(value)
    } else if let Ok(value) = text.parse::<f64>() {
        ExpressionKind::FloatLiteral(value)
    } else {
        match text {
            "true" => ExpressionKind::BoolLiteral(true),
            "false" => ExpressionKind::BoolLiteral(false),
            _ => ExpressionKind::Identifier(text.to_string()),
        }
    };
    Expression::new(kind, span)
}

fn split_list(text: &str) -> Vec<String> {
    text.split('+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn visibility_from(bag: &AttributeBag, pos: usize) -> Visibility {
    lookup(bag, "vis", pos)
        .and_then(parse_visibility)
        .unwrap_or_default()
}

// ============================================================================
// DECLARATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleAttrs {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
}

/// Module layout: `[id:name:version?]`
pub fn module(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> ModuleAttrs {
    ModuleAttrs {
        id: required(bag, "id", 0, "module", span, diagnostics),
        name: required(bag, "name", 1, "module", span, diagnostics),
        version: optional(bag, "version", 2),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsingAttrs {
    pub path: String,
}

/// Using layout: `[path]`
pub fn using(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> UsingAttrs {
    UsingAttrs {
        path: required(bag, "path", 0, "using directive", span, diagnostics),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionAttrs {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
}

/// Function and method layout: `[id:name:vis?]`
pub fn function(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> FunctionAttrs {
    FunctionAttrs {
        id: required(bag, "id", 0, "function", span, diagnostics),
        name: required(bag, "name", 1, "function", span, diagnostics),
        visibility: visibility_from(bag, 2),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassAttrs {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
    pub implements: Vec<String>,
}

/// Class layout: `[id:name:vis?:implements?]`; interface names are joined
/// with `+`
pub fn class(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> ClassAttrs {
    ClassAttrs {
        id: required(bag, "id", 0, "class", span, diagnostics),
        name: required(bag, "name", 1, "class", span, diagnostics),
        visibility: visibility_from(bag, 2),
        implements: lookup(bag, "implements", 3)
            .map(split_list)
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceAttrs {
    pub id: String,
    pub name: String,
    pub visibility: Visibility,
}

/// Interface layout: `[id:name:vis?]`
pub fn interface(
    bag: &AttributeBag,
    span: Span,
    diagnostics: &mut DiagnosticBag,
) -> InterfaceAttrs {
    InterfaceAttrs {
        id: required(bag, "id", 0, "interface", span, diagnostics),
        name: required(bag, "name", 1, "interface", span, diagnostics),
        visibility: visibility_from(bag, 2),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAttrs {
    pub name: String,
    pub ty: TypeDescriptor,
    pub visibility: Visibility,
    pub mutable: bool,
}

/// Field layout: `[~?name:type:vis?]`
pub fn field(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> FieldAttrs {
    let (name, mutable) = strip_mutability(&required(bag, "name", 0, "field", span, diagnostics));
    FieldAttrs {
        name,
        ty: parse_type(&required(bag, "type", 1, "field", span, diagnostics)),
        visibility: visibility_from(bag, 2),
        mutable,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CtorAttrs {
    pub id: String,
    pub visibility: Visibility,
}

/// Constructor layout: `[id:vis?]`
pub fn constructor(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> CtorAttrs {
    CtorAttrs {
        id: required(bag, "id", 0, "constructor", span, diagnostics),
        visibility: visibility_from(bag, 1),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAttrs {
    pub id: String,
    pub name: String,
    pub ty: TypeDescriptor,
    pub visibility: Visibility,
}

/// Property layout: `[id:name:type:vis?]`
pub fn property(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> PropertyAttrs {
    PropertyAttrs {
        id: required(bag, "id", 0, "property", span, diagnostics),
        name: required(bag, "name", 1, "property", span, diagnostics),
        ty: parse_type(&required(bag, "type", 2, "property", span, diagnostics)),
        visibility: visibility_from(bag, 3),
    }
}

// ============================================================================
// SIGNATURE PARTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamAttrs {
    pub name: String,
    pub constraints: Vec<String>,
}

/// Type parameter layout: `[name:constraints?]`; constraints joined with `+`
pub fn type_param(
    bag: &AttributeBag,
    span: Span,
    diagnostics: &mut DiagnosticBag,
) -> TypeParamAttrs {
    TypeParamAttrs {
        name: required(bag, "name", 0, "type parameter", span, diagnostics),
        constraints: lookup(bag, "constraints", 1)
            .map(split_list)
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereAttrs {
    pub target: String,
    pub constraints: Vec<String>,
}

/// Where clause layout: `[target:constraints]`
pub fn where_clause(
    bag: &AttributeBag,
    span: Span,
    diagnostics: &mut DiagnosticBag,
) -> WhereAttrs {
    WhereAttrs {
        target: required(bag, "target", 0, "where clause", span, diagnostics),
        constraints: lookup(bag, "constraints", 1)
            .map(split_list)
            .unwrap_or_default(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamAttrs {
    pub name: String,
    pub ty: TypeDescriptor,
    pub semantic: Option<String>,
    pub mutable: bool,
}

/// Parameter layout: `[~?name:type:#semantic?]`
pub fn param(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> ParamAttrs {
    let (name, mutable) =
        strip_mutability(&required(bag, "name", 0, "parameter", span, diagnostics));
    ParamAttrs {
        name,
        ty: parse_type(&required(bag, "type", 1, "parameter", span, diagnostics)),
        semantic: lookup(bag, "semantic", 2).and_then(expand_semantic),
        mutable,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputAttrs {
    pub ty: TypeDescriptor,
    pub semantic: Option<String>,
}

/// Output layout: `[type:#semantic?]`
pub fn output(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> OutputAttrs {
    OutputAttrs {
        ty: parse_type(&required(bag, "type", 0, "output declaration", span, diagnostics)),
        semantic: lookup(bag, "semantic", 1).and_then(expand_semantic),
    }
}

/// Effects layout: every positional slot is one effect code; the v1 form
/// carries a single code under `effects`
pub fn effects(bag: &AttributeBag) -> EffectSet {
    if let Some(value) = bag.get("effects").filter(|v| !v.is_empty()) {
        return expand_effects(value.split(','));
    }

    let codes: Vec<&str> = (0..bag.positional_count())
        .filter_map(|i| bag.positional(i))
        .collect();
    expand_effects(codes)
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CallAttrs {
    pub target: String,
    pub fallible: bool,
}

/// Call layout: `[target]` with an optional `!` fallibility suffix
pub fn call(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> CallAttrs {
    let (target, mut fallible) =
        split_fallible(&required(bag, "target", 0, "call", span, diagnostics));
    if named(bag, "fallible") == Some("true") {
        fallible = true;
    }
    CallAttrs { target, fallible }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindAttrs {
    pub name: String,
    pub mutable: bool,
    pub ty: Option<TypeDescriptor>,
}

/// Bind layout: `[~?name:type?]`
pub fn bind(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> BindAttrs {
    let (name, mutable) = strip_mutability(&required(bag, "name", 0, "bind", span, diagnostics));
    BindAttrs {
        name,
        mutable,
        ty: lookup(bag, "type", 1).map(parse_type),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForAttrs {
    pub id: String,
    pub var: String,
    pub from: String,
    pub to: String,
    pub step: String,
}

/// For layout: `[id:var:from:to:step?]`; step defaults to 1
pub fn for_loop(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> ForAttrs {
    ForAttrs {
        id: required(bag, "id", 0, "for loop", span, diagnostics),
        var: required(bag, "var", 1, "for loop", span, diagnostics),
        from: required(bag, "from", 2, "for loop", span, diagnostics),
        to: required(bag, "to", 3, "for loop", span, diagnostics),
        step: optional(bag, "step", 4).unwrap_or_else(|| "1".to_string()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeachAttrs {
    pub id: String,
    pub var: String,
    pub ty: Option<TypeDescriptor>,
}

/// Foreach layout: `[id:var:type?]`; the collection expression follows the tag
pub fn foreach(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> ForeachAttrs {
    ForeachAttrs {
        id: required(bag, "id", 0, "foreach", span, diagnostics),
        var: required(bag, "var", 1, "foreach", span, diagnostics),
        ty: lookup(bag, "type", 2).map(parse_type),
    }
}

/// Shared layout for constructs whose only attribute is their id
pub fn id_only(
    construct: &str,
    bag: &AttributeBag,
    span: Span,
    diagnostics: &mut DiagnosticBag,
) -> String {
    required(bag, "id", 0, construct, span, diagnostics)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchAttrs {
    pub var: String,
    pub ty: Option<TypeDescriptor>,
}

/// Catch clause layout: `[var:type?]`
pub fn catch_clause(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> CatchAttrs {
    CatchAttrs {
        var: required(bag, "var", 0, "catch clause", span, diagnostics),
        ty: lookup(bag, "type", 1).map(parse_type),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscribeAttrs {
    pub event: String,
}

/// Subscribe/unsubscribe layout: `[event]`; the handler expression follows
pub fn subscribe(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> SubscribeAttrs {
    SubscribeAttrs {
        event: required(bag, "event", 0, "event subscription", span, diagnostics),
    }
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAttrs {
    pub id: String,
    pub element_type: TypeDescriptor,
    pub size: Option<String>,
}

/// Array layout: `[id:type:size?]`; size absent means initializer-list form
pub fn array(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> ArrayAttrs {
    ArrayAttrs {
        id: required(bag, "id", 0, "array", span, diagnostics),
        element_type: parse_type(&required(bag, "type", 1, "array", span, diagnostics)),
        size: optional(bag, "size", 2),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenericAttrs {
    pub base: String,
    pub args: Vec<TypeDescriptor>,
}

/// Generic instantiation layout: `[base:arg0:arg1:...]`
pub fn generic(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> GenericAttrs {
    let args = if let Some(list) = named(bag, "args") {
        split_list(list).iter().map(|a| parse_type(a)).collect()
    } else {
        (1..bag.positional_count())
            .filter_map(|i| bag.positional(i))
            .map(parse_type)
            .collect()
    };

    GenericAttrs {
        base: required(bag, "base", 0, "generic instantiation", span, diagnostics),
        args,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordAttrs {
    pub type_name: String,
}

/// Record construction layout: `[type]`
pub fn record(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> RecordAttrs {
    RecordAttrs {
        type_name: required(bag, "type", 0, "record construction", span, diagnostics),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttrs {
    pub type_name: String,
}

/// Object construction layout: `[type]`
pub fn new_object(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> NewAttrs {
    NewAttrs {
        type_name: required(bag, "type", 0, "object construction", span, diagnostics),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaAttrs {
    pub id: String,
    pub is_async: bool,
}

/// Lambda layout: `[id:async?]`
pub fn lambda(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> LambdaAttrs {
    let marker = lookup(bag, "async", 1);
    LambdaAttrs {
        id: required(bag, "id", 0, "lambda", span, diagnostics),
        is_async: matches!(marker, Some("async") | Some("true")),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AwaitAttrs {
    pub configure_context: bool,
}

/// Await layout: `[context?]`; defaults to not capturing the context
pub fn await_expr(bag: &AttributeBag) -> AwaitAttrs {
    AwaitAttrs {
        configure_context: lookup(bag, "context", 0) == Some("true"),
    }
}

// ============================================================================
// METADATA
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionAttrs {
    pub id: String,
    pub status: String,
}

/// Decision record layout: `[id:status]`; the decision text follows the tag
pub fn decision(bag: &AttributeBag, span: Span, diagnostics: &mut DiagnosticBag) -> DecisionAttrs {
    DecisionAttrs {
        id: required(bag, "id", 0, "decision record", span, diagnostics),
        status: optional(bag, "status", 1).unwrap_or_else(|| "open".to_string()),
    }
}

/// Close-tag id; never required since the match check reports separately
pub fn close_id(bag: &AttributeBag) -> String {
    lookup(bag, "id", 0).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::read_groups;
    use crate::lexical::LexicalAnalyzer;

    fn bag_from(source: &str) -> (AttributeBag, Span, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::new();
        let mut stream = LexicalAnalyzer::new().tokenize(source, &mut diagnostics);
        let (bag, span) = read_groups(&mut stream, &mut diagnostics);
        (bag, span, diagnostics)
    }

    #[test]
    fn test_call_generation_equivalence() {
        let (v1_bag, span, mut diags) = bag_from("[target=Foo]");
        let v1 = call(&v1_bag, span, &mut diags);

        let (v2_bag, span, mut diags) = bag_from("[Foo]");
        let v2 = call(&v2_bag, span, &mut diags);

        assert_eq!(v1, v2);
        assert_eq!(v1.target, "Foo");
        assert!(!v1.fallible);
    }

    #[test]
    fn test_call_fallibility_suffix() {
        let (bag, span, mut diags) = bag_from("[TryParse!ParseError]");
        let attrs = call(&bag, span, &mut diags);
        assert_eq!(attrs.target, "TryParse");
        assert!(attrs.fallible);
    }

    #[test]
    fn test_module_missing_attributes_degrade() {
        let (bag, span, mut diags) = bag_from("");
        let attrs = module(&bag, span, &mut diags);
        assert_eq!(attrs.id, "");
        assert_eq!(attrs.name, "");
        assert_eq!(
            diags.count_of(codes::syntax::MISSING_REQUIRED_ATTRIBUTE),
            2
        );
    }

    #[test]
    fn test_named_keys_win_over_positions() {
        let (bag, span, mut diags) = bag_from("[f9:Ignored][id=f1, name=Main]");
        let attrs = function(&bag, span, &mut diags);
        assert_eq!(attrs.id, "f1");
        assert_eq!(attrs.name, "Main");
    }

    #[test]
    fn test_function_visibility_defaults_private() {
        let (bag, span, mut diags) = bag_from("[f1:Main]");
        let attrs = function(&bag, span, &mut diags);
        assert_eq!(attrs.visibility, Visibility::Private);

        let (bag, span, mut diags) = bag_from("[f1:Main:pub]");
        let attrs = function(&bag, span, &mut diags);
        assert_eq!(attrs.visibility, Visibility::Public);
    }

    #[test]
    fn test_param_mutability_and_semantic() {
        let (bag, span, mut diags) = bag_from("[~count:i32:#input]");
        let attrs = param(&bag, span, &mut diags);
        assert!(!diags.has_errors());
        assert_eq!(attrs.name, "count");
        assert!(attrs.mutable);
        assert_eq!(attrs.semantic.as_deref(), Some("user input"));
    }

    #[test]
    fn test_for_loop_step_default() {
        let (bag, span, mut diags) = bag_from("[f1:i:0:10]");
        let attrs = for_loop(&bag, span, &mut diags);
        assert_eq!(attrs.step, "1");

        let (bag, span, mut diags) = bag_from("[f1:i:0:10:2]");
        let attrs = for_loop(&bag, span, &mut diags);
        assert_eq!(attrs.step, "2");
    }

    #[test]
    fn test_effects_reconciliation() {
        let (bag, _, _) = bag_from("[fr:fw:cw]");
        let set = effects(&bag);
        assert_eq!(set.get("file"), Some("read,write"));
        assert_eq!(set.get("console"), Some("write"));
    }

    #[test]
    fn test_class_implements_list() {
        let (bag, span, mut diags) = bag_from("[c1:Widget:pub:IDraw+IResize]");
        let attrs = class(&bag, span, &mut diags);
        assert_eq!(attrs.implements, vec!["IDraw", "IResize"]);
    }

    #[test]
    fn test_generic_type_arguments() {
        let (bag, span, mut diags) = bag_from("[Dictionary:str:i32]");
        let attrs = generic(&bag, span, &mut diags);
        assert_eq!(attrs.base, "Dictionary");
        assert_eq!(attrs.args.len(), 2);
    }

    #[test]
    fn test_expr_from_attr_classification() {
        let span = Span::dummy();
        assert!(matches!(
            expr_from_attr("42", span).kind,
            ExpressionKind::IntLiteral(42)
        ));
        assert!(matches!(
            expr_from_attr("n", span).kind,
            ExpressionKind::Identifier(_)
        ));
        assert!(matches!(
            expr_from_attr("true", span).kind,
            ExpressionKind::BoolLiteral(true)
        ));
    }

    #[test]
    fn test_close_id_is_never_required() {
        let (bag, _, diags) = bag_from("");
        assert_eq!(close_id(&bag), "");
        assert!(!diags.has_errors());
    }
}
