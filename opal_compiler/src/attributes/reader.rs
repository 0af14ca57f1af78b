//! Attribute group reader
//!
//! Reads the bracketed attribute groups that follow a tag keyword and merges
//! them into one [`AttributeBag`]. A group whose first token is an identifier
//! followed by `=` is a v1 named group; anything else is a v2 positional
//! group whose colon-separated slots land under synthetic `_pos<N>` keys.
//! Sigils (`~ # ? !`) are composed into the stored slot text. Reading never
//! fails; malformed groups produce diagnostics and the reader resynchronizes
//! at the closing bracket.

use crate::attributes::bag::{positional_key, AttributeBag, POS_COUNT_KEY};
use crate::config::constants::compile_time::syntax::{MAX_ATTRIBUTE_GROUPS, MAX_ATTRIBUTE_SLOTS};
use crate::diagnostics::DiagnosticBag;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;

/// Read all attribute groups at the current stream position
///
/// Returns the merged bag and the span covering every group that was read.
/// When no group is present the bag is empty and the span is an empty span
/// at the current token.
pub fn read_groups(
    stream: &mut TokenStream,
    diagnostics: &mut DiagnosticBag,
) -> (AttributeBag, Span) {
    let mut bag = AttributeBag::new();
    let here = stream.current_span().unwrap_or_else(Span::dummy);
    let mut overall: Option<Span> = None;

    let mut group_count = 0usize;
    let mut positional_groups = 0usize;
    let mut next_slot = 0usize;

    while stream.check_token(&Token::LBracket) {
        let open_span = stream.current_span().unwrap_or_else(Span::dummy);
        stream.advance();
        group_count += 1;

        if group_count > MAX_ATTRIBUTE_GROUPS {
            diagnostics.error(
                codes::attributes::MALFORMED_ATTRIBUTE,
                open_span,
                format!("more than {} attribute groups on one tag", MAX_ATTRIBUTE_GROUPS),
            );
            skip_to_group_end(stream);
            continue;
        }

        let is_named = stream.current_token().is_some_and(Token::is_identifier)
            && matches!(stream.peek_token(1), Some(Token::Equals));

        let close_span = if is_named {
            read_named_group(stream, diagnostics, &mut bag)
        } else {
            positional_groups += 1;
            if positional_groups == 2 {
                diagnostics.warning(
                    codes::attributes::CONFLICTING_ATTRIBUTE_GROUPS,
                    open_span,
                    format!(
                        "additional positional attribute group; slots continue at position {}",
                        next_slot
                    ),
                );
            }
            let close = read_positional_group(stream, diagnostics, &mut bag, &mut next_slot);
            bag.set(POS_COUNT_KEY, next_slot.to_string());
            close
        };

        let group_span = open_span.merge(close_span);
        overall = Some(match overall {
            Some(span) => span.merge(group_span),
            None => group_span,
        });
    }

    let span = overall.unwrap_or_else(|| Span::new(here.start, here.start));
    (bag, span)
}

/// Read `name=value` pairs until the closing bracket; commas between pairs
/// are optional
fn read_named_group(
    stream: &mut TokenStream,
    diagnostics: &mut DiagnosticBag,
    bag: &mut AttributeBag,
) -> Span {
    loop {
        let span = stream.current_span().unwrap_or_else(Span::dummy);
        match stream.current_token() {
            Some(Token::RBracket) => {
                stream.advance();
                return span;
            }
            Some(Token::Eof) | None => {
                diagnostics.error(
                    codes::attributes::MALFORMED_ATTRIBUTE,
                    span,
                    "attribute group not closed before end of input".to_string(),
                );
                return span;
            }
            Some(Token::Comma) => {
                stream.advance();
            }
            Some(Token::Identifier(name))
                if matches!(stream.peek_token(1), Some(Token::Equals)) =>
            {
                let name = name.clone();
                stream.advance(); // name
                stream.advance(); // =

                let value = read_value_text(stream);
                if value.is_empty() {
                    diagnostics.error(
                        codes::attributes::MALFORMED_ATTRIBUTE,
                        span,
                        format!("attribute '{}' has no value", name),
                    );
                }
                bag.insert(name, value);
            }
            Some(other) => {
                diagnostics.error(
                    codes::attributes::MALFORMED_ATTRIBUTE,
                    span,
                    format!("expected name=value pair, found '{}'", other.as_source_string()),
                );
                stream.advance();
            }
        }
    }
}

/// Accumulate value tokens until the next pair, comma, or closing bracket
fn read_value_text(stream: &mut TokenStream) -> String {
    let mut text = String::new();
    loop {
        match stream.current_token() {
            Some(Token::RBracket) | Some(Token::Comma) | Some(Token::Eof) | None => break,
            Some(Token::Identifier(_))
                if matches!(stream.peek_token(1), Some(Token::Equals)) =>
            {
                break;
            }
            Some(token) => {
                text.push_str(&token.as_source_string());
                stream.advance();
            }
        }
    }
    text
}

/// Read colon-separated positional slots until the closing bracket
fn read_positional_group(
    stream: &mut TokenStream,
    diagnostics: &mut DiagnosticBag,
    bag: &mut AttributeBag,
    next_slot: &mut usize,
) -> Span {
    let mut slot_text = String::new();
    let mut slots_in_group = 0usize;

    loop {
        let span = stream.current_span().unwrap_or_else(Span::dummy);
        match stream.current_token() {
            Some(Token::RBracket) => {
                // An entirely empty group contributes no slots
                if slots_in_group > 0 || !slot_text.is_empty() {
                    push_slot(diagnostics, bag, next_slot, &mut slots_in_group, &mut slot_text, span);
                }
                stream.advance();
                return span;
            }
            Some(Token::Colon) => {
                push_slot(diagnostics, bag, next_slot, &mut slots_in_group, &mut slot_text, span);
                stream.advance();
            }
            Some(Token::Eof) | None => {
                diagnostics.error(
                    codes::attributes::MALFORMED_ATTRIBUTE,
                    span,
                    "attribute group not closed before end of input".to_string(),
                );
                return span;
            }
            Some(Token::Keyword(_)) | Some(Token::LBracket) | Some(Token::Equals)
            | Some(Token::Comma) => {
                let found = stream
                    .current_token()
                    .map(|t| t.as_source_string())
                    .unwrap_or_default();
                diagnostics.error(
                    codes::attributes::MALFORMED_ATTRIBUTE,
                    span,
                    format!("unexpected '{}' in positional attribute group", found),
                );
                skip_to_group_end(stream);
                return span;
            }
            Some(token) => {
                slot_text.push_str(&token.as_source_string());
                stream.advance();
            }
        }
    }
}

fn push_slot(
    diagnostics: &mut DiagnosticBag,
    bag: &mut AttributeBag,
    next_slot: &mut usize,
    slots_in_group: &mut usize,
    slot_text: &mut String,
    span: Span,
) {
    if *slots_in_group >= MAX_ATTRIBUTE_SLOTS {
        diagnostics.error(
            codes::attributes::MALFORMED_ATTRIBUTE,
            span,
            format!("more than {} positional slots in one group", MAX_ATTRIBUTE_SLOTS),
        );
        slot_text.clear();
        return;
    }
    bag.insert(positional_key(*next_slot), std::mem::take(slot_text));
    *next_slot += 1;
    *slots_in_group += 1;
}

/// Resynchronize after a malformed group by consuming through the closing
/// bracket
fn skip_to_group_end(stream: &mut TokenStream) {
    loop {
        match stream.current_token() {
            Some(Token::RBracket) => {
                stream.advance();
                return;
            }
            Some(Token::Eof) | None => return,
            _ => {
                stream.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::LexicalAnalyzer;

    fn read(source: &str) -> (AttributeBag, DiagnosticBag) {
        let mut diagnostics = DiagnosticBag::new();
        let mut stream = LexicalAnalyzer::new().tokenize(source, &mut diagnostics);
        let (bag, _) = read_groups(&mut stream, &mut diagnostics);
        (bag, diagnostics)
    }

    #[test]
    fn test_named_group() {
        let (bag, diagnostics) = read("[id=f1, name=Main vis=pub]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.get("id"), Some("f1"));
        assert_eq!(bag.get("name"), Some("Main"));
        assert_eq!(bag.get("vis"), Some("pub"));
    }

    #[test]
    fn test_positional_group_with_sigils() {
        let (bag, diagnostics) = read("[f1:Main:pub]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.positional(0), Some("f1"));
        assert_eq!(bag.positional(1), Some("Main"));
        assert_eq!(bag.positional(2), Some("pub"));

        let (bag, diagnostics) = read("[p1:~count:i32:#input]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.positional(1), Some("~count"));
        assert_eq!(bag.positional(3), Some("#input"));
    }

    #[test]
    fn test_result_sigil_composes_into_slot() {
        let (bag, diagnostics) = read("[o1:i32!ParseError]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.positional(1), Some("i32!ParseError"));
    }

    #[test]
    fn test_mixed_named_and_positional_groups() {
        let (bag, diagnostics) = read("[f1:Main][vis=pub]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.positional(0), Some("f1"));
        assert_eq!(bag.get("vis"), Some("pub"));
    }

    #[test]
    fn test_second_positional_group_warns_and_offsets() {
        let (bag, diagnostics) = read("[a:b][c]");
        assert!(!diagnostics.has_errors());
        assert_eq!(
            diagnostics.count_of(codes::attributes::CONFLICTING_ATTRIBUTE_GROUPS),
            1
        );
        // Slots keep counting across groups
        assert_eq!(bag.positional(0), Some("a"));
        assert_eq!(bag.positional(1), Some("b"));
        assert_eq!(bag.positional(2), Some("c"));
    }

    #[test]
    fn test_empty_group_has_no_slots() {
        let (bag, diagnostics) = read("[]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.positional_count(), 0);
        assert_eq!(bag.positional(0), None);
    }

    #[test]
    fn test_empty_slot_is_preserved() {
        let (bag, _) = read("[a::c]");
        assert_eq!(bag.positional(1), Some(""));
        assert_eq!(bag.positional_count(), 3);
    }

    #[test]
    fn test_unterminated_group() {
        let (_, diagnostics) = read("[id=f1");
        assert_eq!(
            diagnostics.count_of(codes::attributes::MALFORMED_ATTRIBUTE),
            1
        );
    }

    #[test]
    fn test_missing_value_reports_malformed() {
        let (bag, diagnostics) = read("[id=]");
        assert_eq!(
            diagnostics.count_of(codes::attributes::MALFORMED_ATTRIBUTE),
            1
        );
        assert_eq!(bag.get("id"), Some(""));
    }

    #[test]
    fn test_no_groups_yields_empty_bag() {
        let (bag, diagnostics) = read("§R 42");
        assert!(!diagnostics.has_errors());
        assert!(bag.is_empty());
    }

    #[test]
    fn test_quoted_string_slot_keeps_quotes() {
        let (bag, diagnostics) = read("[#\"hello world\"]");
        assert!(!diagnostics.has_errors());
        assert_eq!(bag.positional(0), Some("#\"hello world\""));
    }
}
