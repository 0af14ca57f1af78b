//! Shared shorthand expansion tables
//!
//! Type codes, effect codes, semantic shortcodes, and visibility spellings
//! are process-wide read-only tables, built once and shared by every
//! reconciler function. Unrecognized codes pass through unchanged rather
//! than failing, so the emitter still sees what the author wrote.

use crate::grammar::ast::{EffectEntry, EffectSet, PrimitiveType, TypeDescriptor, Visibility};
use std::collections::HashMap;
use std::sync::OnceLock;

static PRIMITIVE_TYPES: OnceLock<HashMap<&'static str, PrimitiveType>> = OnceLock::new();
static EFFECT_CODES: OnceLock<HashMap<&'static str, (&'static str, &'static str)>> =
    OnceLock::new();
static SEMANTIC_CODES: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

fn primitive_types() -> &'static HashMap<&'static str, PrimitiveType> {
    PRIMITIVE_TYPES.get_or_init(|| {
        HashMap::from([
            ("i8", PrimitiveType::I8),
            ("i16", PrimitiveType::I16),
            ("i32", PrimitiveType::I32),
            ("i64", PrimitiveType::I64),
            ("u8", PrimitiveType::U8),
            ("u16", PrimitiveType::U16),
            ("u32", PrimitiveType::U32),
            ("u64", PrimitiveType::U64),
            ("f32", PrimitiveType::F32),
            ("f64", PrimitiveType::F64),
            ("str", PrimitiveType::Str),
            ("bool", PrimitiveType::Bool),
            ("char", PrimitiveType::Char),
            ("void", PrimitiveType::Void),
            ("never", PrimitiveType::Never),
        ])
    })
}

fn effect_codes() -> &'static HashMap<&'static str, (&'static str, &'static str)> {
    EFFECT_CODES.get_or_init(|| {
        HashMap::from([
            ("cw", ("console", "write")),
            ("cr", ("console", "read")),
            ("fw", ("file", "write")),
            ("fr", ("file", "read")),
            ("fd", ("file", "delete")),
            ("net", ("network", "any")),
            ("http", ("network", "http")),
            ("db", ("database", "any")),
            ("dbr", ("database", "read")),
            ("dbw", ("database", "write")),
            ("env", ("system", "env")),
            ("proc", ("system", "process")),
            ("alloc", ("memory", "alloc")),
            ("time", ("system", "time")),
            ("rand", ("system", "random")),
        ])
    })
}

fn semantic_codes() -> &'static HashMap<&'static str, &'static str> {
    SEMANTIC_CODES.get_or_init(|| {
        HashMap::from([
            ("input", "user input"),
            ("output", "computed output"),
            ("state", "internal state"),
            ("config", "configuration value"),
            ("temp", "temporary value"),
            ("id", "unique identifier"),
            ("count", "element count"),
            ("flag", "boolean flag"),
            ("result", "operation result"),
            ("error", "error value"),
        ])
    })
}

/// Expand a type code into a canonical descriptor
///
/// `?T` recurses into an optional; `T!E` becomes a result descriptor with the
/// error type defaulting to `STRING` when omitted. Primitive codes match
/// case-insensitively; anything else passes through as a named type.
pub fn parse_type(text: &str) -> TypeDescriptor {
    let text = text.trim();

    if let Some(inner) = text.strip_prefix('?') {
        return TypeDescriptor::Optional(Box::new(parse_type(inner)));
    }

    if let Some((ok, err)) = text.split_once('!') {
        let err_ty = if err.is_empty() {
            TypeDescriptor::Named("STRING".to_string())
        } else {
            parse_type(err)
        };
        return TypeDescriptor::Result {
            ok: Box::new(parse_type(ok)),
            err: Box::new(err_ty),
        };
    }

    match primitive_types().get(text.to_ascii_lowercase().as_str()) {
        Some(primitive) => TypeDescriptor::Primitive(*primitive),
        None => TypeDescriptor::Named(text.to_string()),
    }
}

/// Expand effect codes into an effect set
///
/// Codes in the same category concatenate their values with commas in
/// declaration order; unknown codes pass through as their own category.
pub fn expand_effects<'a, I: IntoIterator<Item = &'a str>>(codes: I) -> EffectSet {
    let mut set = EffectSet::default();

    for code in codes {
        let code = code.trim();
        if code.is_empty() {
            continue;
        }

        let (category, value) = match effect_codes().get(code) {
            Some(&(category, value)) => (category.to_string(), value.to_string()),
            None => (code.to_string(), code.to_string()),
        };

        match set.entries.iter_mut().find(|e| e.category == category) {
            Some(entry) => {
                entry.value.push(',');
                entry.value.push_str(&value);
            }
            None => set.entries.push(EffectEntry { category, value }),
        }
    }

    set
}

/// Expand a `#`-prefixed semantic shortcode into its documentation text
///
/// `#"..."` passes the quoted text through verbatim; a known shortcode uses
/// the table; an unknown word passes through unchanged. Text without the
/// sigil is not a semantic annotation.
pub fn expand_semantic(text: &str) -> Option<String> {
    let rest = text.strip_prefix('#')?;

    if let Some(quoted) = rest.strip_prefix('"') {
        return Some(quoted.strip_suffix('"').unwrap_or(quoted).to_string());
    }

    Some(
        semantic_codes()
            .get(rest)
            .map(|expansion| expansion.to_string())
            .unwrap_or_else(|| rest.to_string()),
    )
}

/// Map a visibility spelling; unmarked declarations stay private
pub fn parse_visibility(text: &str) -> Option<Visibility> {
    match text.trim() {
        "pub" | "public" => Some(Visibility::Public),
        "pri" | "private" => Some(Visibility::Private),
        "int" | "internal" => Some(Visibility::Internal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_codes_case_insensitive() {
        assert_eq!(parse_type("i32"), TypeDescriptor::Primitive(PrimitiveType::I32));
        assert_eq!(parse_type("I32"), TypeDescriptor::Primitive(PrimitiveType::I32));
        assert_eq!(parse_type("BOOL"), TypeDescriptor::Primitive(PrimitiveType::Bool));
        assert_eq!(parse_type("never"), TypeDescriptor::Primitive(PrimitiveType::Never));
    }

    #[test]
    fn test_unknown_type_passes_through() {
        assert_eq!(
            parse_type("Customer"),
            TypeDescriptor::Named("Customer".to_string())
        );
    }

    #[test]
    fn test_optional_type_recurses() {
        assert_eq!(
            parse_type("?i32"),
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Primitive(PrimitiveType::I32)))
        );
        assert_eq!(
            parse_type("??str"),
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Optional(Box::new(
                TypeDescriptor::Primitive(PrimitiveType::Str)
            ))))
        );
    }

    #[test]
    fn test_result_type_with_default_error() {
        assert_eq!(
            parse_type("i32!ParseError"),
            TypeDescriptor::Result {
                ok: Box::new(TypeDescriptor::Primitive(PrimitiveType::I32)),
                err: Box::new(TypeDescriptor::Named("ParseError".to_string())),
            }
        );
        assert_eq!(
            parse_type("i32!"),
            TypeDescriptor::Result {
                ok: Box::new(TypeDescriptor::Primitive(PrimitiveType::I32)),
                err: Box::new(TypeDescriptor::Named("STRING".to_string())),
            }
        );
    }

    #[test]
    fn test_effect_expansion_merges_categories() {
        let effects = expand_effects(["fr", "fw", "cw"]);
        assert_eq!(effects.get("file"), Some("read,write"));
        assert_eq!(effects.get("console"), Some("write"));
        assert_eq!(effects.entries.len(), 2);
    }

    #[test]
    fn test_unknown_effect_passes_through() {
        let effects = expand_effects(["gpu"]);
        assert_eq!(effects.get("gpu"), Some("gpu"));
    }

    #[test]
    fn test_semantic_shortcodes() {
        assert_eq!(expand_semantic("#input"), Some("user input".to_string()));
        assert_eq!(
            expand_semantic("#\"raw note\""),
            Some("raw note".to_string())
        );
        assert_eq!(expand_semantic("#custom"), Some("custom".to_string()));
        assert_eq!(expand_semantic("input"), None);
    }

    #[test]
    fn test_visibility_spellings() {
        assert_eq!(parse_visibility("pub"), Some(Visibility::Public));
        assert_eq!(parse_visibility("public"), Some(Visibility::Public));
        assert_eq!(parse_visibility("pri"), Some(Visibility::Private));
        assert_eq!(parse_visibility("int"), Some(Visibility::Internal));
        assert_eq!(parse_visibility("protected"), None);
    }
}
