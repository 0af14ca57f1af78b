//! Consolidated diagnostic codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and
//! classification functions. Code constants live next to their behavioral
//! metadata so every stage reports through the same vocabulary.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning, and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const UNEXPECTED_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_TYPED_LITERAL: Code = Code::new("E022");
    pub const INVALID_ESCAPE_SEQUENCE: Code = Code::new("E023");
    pub const UNKNOWN_KEYWORD: Code = Code::new("E024");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E025");
    pub const TOO_MANY_TOKENS: Code = Code::new("E026");
}

/// Attribute list reader error codes
pub mod attributes {
    use super::Code;

    pub const MALFORMED_ATTRIBUTE: Code = Code::new("E030");
    pub const CONFLICTING_ATTRIBUTE_GROUPS: Code = Code::new("E031");
}

/// Syntax analysis error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const MISSING_REQUIRED_ATTRIBUTE: Code = Code::new("E051");
    pub const MISMATCHED_ID: Code = Code::new("E052");
    pub const INVALID_STATEMENT: Code = Code::new("E053");
    pub const MISSING_EXPRESSION: Code = Code::new("E054");
    pub const UNKNOWN_CONSTRAINT_TARGET: Code = Code::new("E055");
    pub const INVALID_OPERATOR: Code = Code::new("E056");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();

        // System errors
        registry.insert(
            "ERR001",
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                "Critical internal system error",
                "Contact maintainers or file a bug report",
            ),
        );
        registry.insert(
            "ERR002",
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                "System initialization failure",
                "Check configuration and dependencies",
            ),
        );

        // Lexical analysis errors
        registry.insert(
            "E020",
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                "Character has no meaning at this point in the source",
                "Remove or replace the unexpected character",
            ),
        );
        registry.insert(
            "E021",
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::Medium,
                true,
                "String literal not terminated before newline or end of input",
                "Add the closing double quote",
            ),
        );
        registry.insert(
            "E022",
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::Low,
                true,
                "Typed literal payload does not parse as the declared type",
                "Fix the literal payload after the type prefix",
            ),
        );
        registry.insert(
            "E023",
            ErrorMetadata::new(
                "E023",
                "Lexical",
                Severity::Low,
                true,
                "Unrecognized escape sequence in string literal",
                "Use one of \\n \\r \\t \\\\ \\\"",
            ),
        );
        registry.insert(
            "E024",
            ErrorMetadata::new(
                "E024",
                "Lexical",
                Severity::Medium,
                true,
                "Tag sigil followed by an unknown keyword",
                "Check the tag spelling against the keyword table",
            ),
        );
        registry.insert(
            "E025",
            ErrorMetadata::new(
                "E025",
                "Lexical",
                Severity::Low,
                true,
                "Identifier exceeds maximum allowed length",
                "Reduce identifier length to 255 characters or less",
            ),
        );
        registry.insert(
            "E026",
            ErrorMetadata::new(
                "E026",
                "Lexical",
                Severity::High,
                false,
                "Buffer contains too many tokens",
                "Reduce input complexity or raise the token limit",
            ),
        );

        // Attribute reader errors
        registry.insert(
            "E030",
            ErrorMetadata::new(
                "E030",
                "Attributes",
                Severity::Medium,
                true,
                "Attribute group is not well formed",
                "Check bracket group contents against the attribute grammar",
            ),
        );
        registry.insert(
            "E031",
            ErrorMetadata::new(
                "E031",
                "Attributes",
                Severity::Low,
                true,
                "Multiple positional attribute groups on one tag",
                "Merge positional attributes into a single bracket group",
            ),
        );

        // Syntax analysis errors
        registry.insert(
            "E050",
            ErrorMetadata::new(
                "E050",
                "Syntax",
                Severity::Medium,
                true,
                "Unexpected token during parsing",
                "Check token sequence against the construct grammar",
            ),
        );
        registry.insert(
            "E051",
            ErrorMetadata::new(
                "E051",
                "Syntax",
                Severity::Medium,
                true,
                "Construct is missing a required attribute",
                "Add the named attribute to the tag's bracket group",
            ),
        );
        registry.insert(
            "E052",
            ErrorMetadata::new(
                "E052",
                "Syntax",
                Severity::Medium,
                true,
                "Closing tag id does not match the opening tag id",
                "Make the close id match the open id",
            ),
        );
        registry.insert(
            "E053",
            ErrorMetadata::new(
                "E053",
                "Syntax",
                Severity::Medium,
                true,
                "Token does not start any statement",
                "Remove the token or complete the intended statement",
            ),
        );
        registry.insert(
            "E054",
            ErrorMetadata::new(
                "E054",
                "Syntax",
                Severity::Medium,
                true,
                "Token does not start any expression",
                "Provide an expression at this position",
            ),
        );
        registry.insert(
            "E055",
            ErrorMetadata::new(
                "E055",
                "Syntax",
                Severity::Medium,
                true,
                "Constraint clause names an undeclared type parameter",
                "Declare the type parameter before constraining it",
            ),
        );
        registry.insert(
            "E056",
            ErrorMetadata::new(
                "E056",
                "Syntax",
                Severity::Low,
                true,
                "Operator arity does not match its operand count",
                "Check the prefix form's operator and operand count",
            ),
        );
        registry.insert(
            "E087",
            ErrorMetadata::new(
                "E087",
                "Syntax",
                Severity::High,
                false,
                "Maximum recursion depth exceeded",
                "Reduce nesting depth or simplify structure",
            ),
        );

        // Success codes
        registry.insert(
            "I004",
            ErrorMetadata::new(
                "I004",
                "System",
                Severity::Low,
                true,
                "System initialization completed successfully",
                "Continue normal operation",
            ),
        );
        registry.insert(
            "I020",
            ErrorMetadata::new(
                "I020",
                "Lexical",
                Severity::Low,
                true,
                "Tokenization completed",
                "Continue to syntax analysis",
            ),
        );
        registry.insert(
            "I040",
            ErrorMetadata::new(
                "I040",
                "Syntax",
                Severity::Low,
                true,
                "Syntax tree construction completed",
                "Continue to downstream consumers",
            ),
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from a code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if the condition behind a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for a code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stage_code_has_metadata() {
        let codes = [
            "E020", "E021", "E022", "E023", "E024", "E025", "E026", "E030", "E031", "E050",
            "E051", "E052", "E053", "E054", "E055", "E056", "E087",
        ];
        for code in codes {
            assert_ne!(get_description(code), "Unknown error", "missing {}", code);
        }
    }

    #[test]
    fn test_classification_lookups() {
        assert_eq!(get_category("E052"), "Syntax");
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(!is_recoverable("E087"));
        assert!(is_recoverable("E050"));
    }
}
