//! End-to-end parses over the public API: source text in, module out,
//! diagnostics accumulated along the way.

use assert_matches::assert_matches;
use opal_compiler::diagnostics::DiagnosticBag;
use opal_compiler::grammar::ast::{ExpressionKind, StatementKind, Visibility};
use opal_compiler::logging::codes;
use opal_compiler::tokens::Token;
use opal_compiler::{parse_source, tokenize};

#[test]
fn clean_program_parses_without_diagnostics() {
    let source = "§M[m1:Demo]\n§F[f1:Main:pub]\n§R 42\n§/F[f1]\n§/M[m1]\n";
    let mut diagnostics = DiagnosticBag::new();
    let module = parse_source(source, &mut diagnostics);

    assert!(diagnostics.is_empty(), "expected no diagnostics");
    assert_eq!(module.id, "m1");
    assert_eq!(module.name, "Demo");
    assert_eq!(module.functions.len(), 1);

    let function = &module.functions[0];
    assert_eq!(function.name, "Main");
    assert_eq!(function.visibility, Visibility::Public);
    assert_eq!(function.body.len(), 1);
    assert_matches!(
        &function.body[0].kind,
        StatementKind::Return(Some(expr)) if expr.kind == ExpressionKind::IntLiteral(42)
    );
}

#[test]
fn both_generations_produce_the_same_module_shape() {
    let compact = "§M[m1:Demo] §F[f1:Main:pub] §R 42 §/F[f1] §/M[m1]";
    let verbose = "§MODULE[id=m1,name=Demo] §FUNCTION[id=f1,name=Main,vis=pub] \
                   §RETURN 42 §END_FUNCTION[id=f1] §END_MODULE[id=m1]";

    let mut d1 = DiagnosticBag::new();
    let mut d2 = DiagnosticBag::new();
    let a = parse_source(compact, &mut d1);
    let b = parse_source(verbose, &mut d2);

    assert!(!d1.has_errors());
    assert!(!d2.has_errors());
    assert_eq!(a.id, b.id);
    assert_eq!(a.name, b.name);
    assert_eq!(a.functions[0].name, b.functions[0].name);
    assert_eq!(a.functions[0].visibility, b.functions[0].visibility);
    assert_eq!(a.functions[0].body, b.functions[0].body);
}

#[test]
fn bare_module_reports_missing_attributes() {
    let mut diagnostics = DiagnosticBag::new();
    let module = parse_source("§M §/M", &mut diagnostics);

    assert_eq!(module.id, "");
    assert_eq!(module.name, "");
    assert_eq!(
        diagnostics.count_of(codes::syntax::MISSING_REQUIRED_ATTRIBUTE),
        2
    );
    assert_eq!(diagnostics.count_of(codes::syntax::MISMATCHED_ID), 0);
}

#[test]
fn altered_close_id_keeps_open_id_and_reports_once() {
    let mut diagnostics = DiagnosticBag::new();
    let module = parse_source(
        "§M[m1:Demo] §F[f1:Main] §R 1 §/F[zz] §/M[m1]",
        &mut diagnostics,
    );

    assert_eq!(diagnostics.count_of(codes::syntax::MISMATCHED_ID), 1);
    assert_eq!(module.functions[0].id, "f1");

    let diagnostic = diagnostics
        .first_of(codes::syntax::MISMATCHED_ID)
        .expect("mismatch diagnostic");
    assert!(diagnostic.message.contains("f1"));
    assert!(diagnostic.message.contains("zz"));
}

#[test]
fn unterminated_string_still_yields_a_tree() {
    let mut diagnostics = DiagnosticBag::new();
    let module = parse_source(
        "§M[m1:Demo] §F[f1:Main] §PT \"oops\n§/F[f1] §/M[m1]",
        &mut diagnostics,
    );

    assert_eq!(
        diagnostics.count_of(codes::lexical::UNTERMINATED_STRING),
        1
    );
    assert_eq!(module.id, "m1");
    assert_eq!(module.functions.len(), 1);
}

#[test]
fn lexer_terminates_with_eof_for_arbitrary_input() {
    for source in ["", "   ", "§", "\"", "§M[", "```", "éé §BOGUS ~~~"] {
        let mut diagnostics = DiagnosticBag::new();
        let stream = tokenize(source, &mut diagnostics);
        assert!(stream.has_eof(), "no Eof for {:?}", source);
    }
}

#[test]
fn typed_literals_match_their_bare_spellings() {
    let mut diagnostics = DiagnosticBag::new();
    let typed = tokenize("INT:5 BOOL:true", &mut diagnostics);
    let significant: Vec<&Token> = typed
        .iter_significant()
        .map(|s| &s.value)
        .collect();
    assert_eq!(
        significant,
        vec![
            &Token::IntLiteral(5),
            &Token::BoolLiteral(true),
            &Token::Eof
        ]
    );
    assert!(diagnostics.is_empty());

    // A failed lookahead leaves the prefix and colon as ordinary tokens
    let mut diagnostics = DiagnosticBag::new();
    let fallback = tokenize("INT:abc", &mut diagnostics);
    let significant: Vec<&Token> = fallback
        .iter_significant()
        .map(|s| &s.value)
        .collect();
    assert_eq!(
        significant,
        vec![
            &Token::Identifier("INT".to_string()),
            &Token::Colon,
            &Token::Identifier("abc".to_string()),
            &Token::Eof
        ]
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn richer_program_survives_a_full_pass() {
    let source = "\
§M[m2:Geometry]
§US[core.math]
§IX[ix1:Shape:pub]
§MD[s1:Area] §O[f64] §/MD[s1]
§/IX[ix1]
§CL[c1:Circle:pub:Shape]
§FD[~radius:f64:pri]
§CT[ct1:pub] §P[r:f64:#input]
radius = r
§/CT[ct1]
§MD[a1:Area:pub] §O[f64:#result] §E[alloc]
§R (* radius radius 3)
§/MD[a1]
§/CL[c1]
§F[f1:Main:pub]
§B[c] = §NW[Circle] 2.0 §/NW
§PL §NC §SF c name 1
§/F[f1]
§/M[m2]
";
    let mut diagnostics = DiagnosticBag::new();
    let module = parse_source(source, &mut diagnostics);

    assert!(
        !diagnostics.has_errors(),
        "unexpected errors: {:?}",
        diagnostics.iter().map(|d| d.format()).collect::<Vec<_>>()
    );
    assert_eq!(module.usings.len(), 1);
    assert_eq!(module.usings[0].path, "core.math");
    assert_eq!(module.interfaces.len(), 1);
    assert_eq!(module.classes.len(), 1);
    assert_eq!(module.functions.len(), 1);

    let class = &module.classes[0];
    assert_eq!(class.implements, vec!["Shape".to_string()]);
    assert_eq!(class.members.len(), 3);
}
