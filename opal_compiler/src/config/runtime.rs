// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to collect detailed token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to include whitespace tokens in token counts
    pub include_trivia_in_counts: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env::var("OPAL_LEXICAL_DETAILED_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_trivia_in_counts: env::var("OPAL_LEXICAL_INCLUDE_TRIVIA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_position_in_errors: env::var("OPAL_LEXICAL_INCLUDE_POSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxPreferences {
    /// Whether to log each construct as it is parsed
    pub log_construct_trace: bool,

    /// Whether to include attribute bags in debug output
    pub log_attribute_bags: bool,

    /// Whether diagnostics for compact-form constructs should name the
    /// verbose spelling of the tag as well
    pub name_verbose_spelling_in_errors: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            log_construct_trace: env::var("OPAL_SYNTAX_LOG_CONSTRUCT_TRACE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_attribute_bags: env::var("OPAL_SYNTAX_LOG_ATTRIBUTE_BAGS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            name_verbose_spelling_in_errors: env::var("OPAL_SYNTAX_VERBOSE_SPELLING_ERRORS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging (user preference)
    pub use_structured_logging: bool,

    /// Whether to enable console output (user preference)
    pub enable_console_logging: bool,

    /// User preferred minimum log level
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var("OPAL_LOGGING_USE_STRUCTURED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("OPAL_LOGGING_ENABLE_CONSOLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var("OPAL_LOGGING_MIN_LEVEL")
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML string, falling back to defaults for
    /// any missing section
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load preferences from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("failed to read {}: {}", path.as_ref().display(), e))?;
        Self::from_toml_str(&content).map_err(|e| format!("invalid preferences file: {}", e))
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "OPAL_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_INCLUDE_TRIVIA: &str = "OPAL_LEXICAL_INCLUDE_TRIVIA";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "OPAL_LEXICAL_INCLUDE_POSITIONS";

    // Syntax
    pub const SYNTAX_LOG_CONSTRUCT_TRACE: &str = "OPAL_SYNTAX_LOG_CONSTRUCT_TRACE";
    pub const SYNTAX_LOG_ATTRIBUTE_BAGS: &str = "OPAL_SYNTAX_LOG_ATTRIBUTE_BAGS";
    pub const SYNTAX_VERBOSE_SPELLING_ERRORS: &str = "OPAL_SYNTAX_VERBOSE_SPELLING_ERRORS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "OPAL_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "OPAL_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "OPAL_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_toml_round_trip_defaults() {
        let config = RuntimeConfig::from_toml_str("").expect("empty TOML should parse");
        assert_eq!(config.logging.min_log_level, LogLevel::Info);
    }

    #[test]
    fn test_toml_partial_override() {
        let toml = r#"
[syntax]
log_construct_trace = true
log_attribute_bags = false
name_verbose_spelling_in_errors = false
"#;
        let config = RuntimeConfig::from_toml_str(toml).expect("valid TOML");
        assert!(config.syntax.log_construct_trace);
        assert!(!config.syntax.name_verbose_spelling_in_errors);
    }

    #[test]
    fn test_toml_file_loading() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[lexical]\ncollect_detailed_metrics = false\ninclude_trivia_in_counts = false\ninclude_position_in_errors = true").unwrap();

        let config = RuntimeConfig::from_toml_file(file.path()).expect("load from file");
        assert!(!config.lexical.collect_detailed_metrics);
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(!env_vars::LEXICAL_DETAILED_METRICS.is_empty());
        assert!(!env_vars::LOGGING_MIN_LEVEL.is_empty());
    }
}
