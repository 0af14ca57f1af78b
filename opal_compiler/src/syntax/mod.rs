//! Syntax analysis: recursive-descent parsing of the significant-token view
//!
//! Split by grammar stratum: `parser` holds the cursor and recovery
//! machinery, `declarations` the module-level constructs, `statements` and
//! `expressions` the body grammar, `patterns` the match-arm forms.

mod declarations;
mod expressions;
mod parser;
mod patterns;
mod statements;

pub use parser::{parse, Parser};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticBag;
    use crate::grammar::ast::*;
    use crate::lexical::LexicalAnalyzer;
    use crate::logging::codes;

    fn parse_source(source: &str) -> (Module, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::new();
        let tokens = LexicalAnalyzer::new().tokenize(source, &mut diagnostics);
        let module = parse(tokens, &mut diagnostics);
        (module, diagnostics)
    }

    #[test]
    fn test_minimal_program_compact_syntax() {
        let (module, diagnostics) = parse_source(
            "§M[m1:Demo]\n§F[f1:Main:pub]\n§R 42\n§/F[f1]\n§/M[m1]\n",
        );

        assert!(!diagnostics.has_errors());
        assert_eq!(module.id, "m1");
        assert_eq!(module.name, "Demo");
        assert_eq!(module.functions.len(), 1);

        let function = &module.functions[0];
        assert_eq!(function.name, "Main");
        assert_eq!(function.visibility, Visibility::Public);
        assert_eq!(function.body.len(), 1);
        match &function.body[0].kind {
            StatementKind::Return(Some(expr)) => {
                assert_eq!(expr.kind, ExpressionKind::IntLiteral(42));
            }
            other => panic!("expected return statement, got {:?}", other),
        }
    }

    #[test]
    fn test_named_and_positional_attributes_parse_alike() {
        let (compact, d1) =
            parse_source("§M[m1:Demo] §F[f1:Main:pub] §R 1 §/F[f1] §/M[m1]");
        let (named, d2) = parse_source(
            "§MODULE[id=m1,name=Demo] §FUNCTION[id=f1,name=Main,vis=pub] \
             §RETURN 1 §END_FUNCTION[id=f1] §END_MODULE[id=m1]",
        );

        assert!(!d1.has_errors());
        assert!(!d2.has_errors());
        assert_eq!(compact.id, named.id);
        assert_eq!(compact.name, named.name);
        assert_eq!(compact.functions[0].name, named.functions[0].name);
        assert_eq!(
            compact.functions[0].visibility,
            named.functions[0].visibility
        );
    }

    #[test]
    fn test_mismatched_close_id_reports_once() {
        let (module, diagnostics) =
            parse_source("§M[m1:Demo] §F[f1:Main] §R 1 §/F[f9] §/M[m1]");

        assert_eq!(diagnostics.count_of(codes::syntax::MISMATCHED_ID), 1);
        // The tree keeps the opening id
        assert_eq!(module.functions[0].id, "f1");
    }

    #[test]
    fn test_bare_close_tag_is_not_a_mismatch() {
        let (_, diagnostics) = parse_source("§M §/M");

        // Missing id and name on the open tag, but the bare close is fine
        assert_eq!(
            diagnostics.count_of(codes::syntax::MISSING_REQUIRED_ATTRIBUTE),
            2
        );
        assert_eq!(diagnostics.count_of(codes::syntax::MISMATCHED_ID), 0);
    }

    #[test]
    fn test_prefix_form_folds_left() {
        let (module, diagnostics) =
            parse_source("§M[m1:D] §F[f1:Main] §B[x] = (+ 1 2 3) §/F §/M");

        assert!(!diagnostics.has_errors());
        let initializer = match &module.functions[0].body[0].kind {
            StatementKind::Bind { initializer, .. } => initializer,
            other => panic!("expected bind, got {:?}", other),
        };
        match &initializer.kind {
            ExpressionKind::Binary { op, left, right } => {
                assert_eq!(*op, BinaryOp::Add);
                assert_eq!(right.kind, ExpressionKind::IntLiteral(3));
                match &left.kind {
                    ExpressionKind::Binary { op, left, right } => {
                        assert_eq!(*op, BinaryOp::Add);
                        assert_eq!(left.kind, ExpressionKind::IntLiteral(1));
                        assert_eq!(right.kind, ExpressionKind::IntLiteral(2));
                    }
                    other => panic!("expected nested add, got {:?}", other),
                }
            }
            other => panic!("expected binary fold, got {:?}", other),
        }
    }

    #[test]
    fn test_single_operand_minus_is_negation() {
        let (module, diagnostics) =
            parse_source("§M[m1:D] §F[f1:Main] §B[x] = (- 5) §/F §/M");

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Bind { initializer, .. } => match &initializer.kind {
                ExpressionKind::Unary { op, operand } => {
                    assert_eq!(*op, UnaryOp::Neg);
                    assert_eq!(operand.kind, ExpressionKind::IntLiteral(5));
                }
                other => panic!("expected negation, got {:?}", other),
            },
            other => panic!("expected bind, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_operator_with_one_operand() {
        let (_, diagnostics) =
            parse_source("§M[m1:D] §F[f1:Main] §B[x] = (* 5) §/F §/M");

        assert_eq!(diagnostics.count_of(codes::syntax::INVALID_OPERATOR), 1);
    }

    #[test]
    fn test_compact_if_with_else() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Main] §IF[i1] (== x 1) -> §R 1 §EL -> §R 2 §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::If {
                id,
                then_body,
                elseifs,
                else_body,
                ..
            } => {
                assert_eq!(id, "i1");
                assert_eq!(then_body.len(), 1);
                assert!(elseifs.is_empty());
                assert_eq!(else_body.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_verbose_if_with_elseif_chain() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Main] \
             §IF[i1] flag §R 1 §EI other §R 2 §EL §R 3 §/IF[i1] \
             §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::If {
                elseifs, else_body, ..
            } => {
                assert_eq!(elseifs.len(), 1);
                assert_eq!(elseifs[0].body.len(), 1);
                assert_eq!(else_body.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_match_statement_arms_carry_no_guards() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Main] \
             §MA[s1] value §CS 1 -> §R 1 §CS _ -> §R 0 §/MA[s1] \
             §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Match { id, arms, .. } => {
                assert_eq!(id, "s1");
                assert_eq!(arms.len(), 2);
                assert!(arms.iter().all(|arm| arm.guard.is_none()));
                assert_eq!(arms[1].pattern.kind, PatternKind::Wildcard);
            }
            other => panic!("expected match statement, got {:?}", other),
        }
    }

    #[test]
    fn test_call_target_from_named_or_positional() {
        let (named, d1) =
            parse_source("§M[m1:D] §F[f1:Main] §C[target=Compute] §/C §/F §/M");
        let (positional, d2) =
            parse_source("§M[m1:D] §F[f1:Main] §C[Compute] §/C §/F §/M");

        assert!(!d1.has_errors());
        assert!(!d2.has_errors());
        for module in [&named, &positional] {
            match &module.functions[0].body[0].kind {
                StatementKind::Call {
                    target, fallible, ..
                } => {
                    assert_eq!(target, "Compute");
                    assert!(!fallible);
                }
                other => panic!("expected call, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_fallible_call_suffix() {
        let (module, diagnostics) =
            parse_source("§M[m1:D] §F[f1:Main] §C[Compute!] §/C §/F §/M");

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Call { fallible, .. } => assert!(fallible),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_call_arguments() {
        let (module, diagnostics) =
            parse_source("§M[m1:D] §F[f1:Main] §C[Sum] @ 1 2 3 §/C §/F §/M");

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Call { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_initializer_yields_placeholder() {
        let (module, diagnostics) =
            parse_source("§M[m1:D] §F[f1:Main] §B[x] = §/F §/M");

        assert!(diagnostics.count_of(codes::syntax::MISSING_EXPRESSION) >= 1);
        match &module.functions[0].body[0].kind {
            StatementKind::Bind { initializer, .. } => {
                assert!(initializer.is_missing());
            }
            other => panic!("expected bind, got {:?}", other),
        }
    }

    #[test]
    fn test_class_with_field_and_method() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] \
             §CL[c1:Point:pub] \
             §FD[x:i32:pub] \
             §MD[md1:GetX:pub] §P[self:Point] §O[i32] §R 0 §/MD[md1] \
             §/CL[c1] \
             §/M",
        );

        assert!(!diagnostics.has_errors());
        assert_eq!(module.classes.len(), 1);
        let class = &module.classes[0];
        assert_eq!(class.name, "Point");
        assert_eq!(class.members.len(), 2);

        match &class.members[0] {
            Member::Field(field) => {
                assert_eq!(field.name, "x");
                assert_eq!(field.ty, TypeDescriptor::Primitive(PrimitiveType::I32));
            }
            other => panic!("expected field, got {:?}", other),
        }
        match &class.members[1] {
            Member::Method(method) => {
                assert_eq!(method.params.len(), 1);
                assert!(method.output.is_some());
            }
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_function_effects_are_expanded() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Log] §E[cw:fr] §R 0 §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        let effects = &module.functions[0].effects;
        assert_eq!(effects.get("console"), Some("write"));
        assert_eq!(effects.get("file"), Some("read"));
    }

    #[test]
    fn test_lambda_with_expression_body() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Main] §B[inc] = §LM[l1] §P[x:i32] (+ x 1) §/LM[l1] §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Bind { initializer, .. } => match &initializer.kind {
                ExpressionKind::Lambda { id, params, body, .. } => {
                    assert_eq!(id, "l1");
                    assert_eq!(params.len(), 1);
                    assert!(matches!(body, LambdaBody::Expression(_)));
                }
                other => panic!("expected lambda, got {:?}", other),
            },
            other => panic!("expected bind, got {:?}", other),
        }
    }

    #[test]
    fn test_array_literal_elements() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Main] §B[a] = §AR[a1:i32] 1 2 3 §/AR[a1] §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Bind { initializer, .. } => match &initializer.kind {
                ExpressionKind::ArrayCreate {
                    id,
                    element_type,
                    elements,
                    size,
                } => {
                    assert_eq!(id, "a1");
                    assert_eq!(
                        *element_type,
                        TypeDescriptor::Primitive(PrimitiveType::I32)
                    );
                    assert_eq!(elements.len(), 3);
                    assert!(size.is_none());
                }
                other => panic!("expected array, got {:?}", other),
            },
            other => panic!("expected bind, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_recovers_at_module_scope() {
        let (module, diagnostics) = parse_source("§M[m1:D] §BOGUS §F[f1:Main] §R 1 §/F §/M");

        assert_eq!(diagnostics.count_of(codes::lexical::UNKNOWN_KEYWORD), 1);
        // The function after the bad tag still parses
        assert_eq!(module.functions.len(), 1);
    }

    #[test]
    fn test_try_catch_finally() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] §F[f1:Main] \
             §TR[t1] §C[Risky!] §/C §CH[e:ParseError] §RT §FN §PT \"done\" §/TR[t1] \
             §/F §/M",
        );

        assert!(!diagnostics.has_errors());
        match &module.functions[0].body[0].kind {
            StatementKind::Try {
                id,
                body,
                catches,
                finally,
            } => {
                assert_eq!(id, "t1");
                assert_eq!(body.len(), 1);
                assert_eq!(catches.len(), 1);
                assert_eq!(catches[0].var, "e");
                assert!(catches[0].ty.is_some());
                assert_eq!(finally.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected try statement, got {:?}", other),
        }
    }

    #[test]
    fn test_interface_collects_signatures() {
        let (module, diagnostics) = parse_source(
            "§M[m1:D] \
             §IX[ix1:Shape:pub] \
             §MD[md1:Area] §O[f64] §/MD[md1] \
             §/IX[ix1] \
             §/M",
        );

        assert!(!diagnostics.has_errors());
        assert_eq!(module.interfaces.len(), 1);
        let interface = &module.interfaces[0];
        assert_eq!(interface.name, "Shape");
        assert_eq!(interface.methods.len(), 1);
        assert!(interface.methods[0].output.is_some());
    }
}
