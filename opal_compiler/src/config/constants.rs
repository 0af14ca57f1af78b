pub mod compile_time {
    pub mod lexical {
        /// Maximum string literal size (1MB)
        /// SECURITY: Prevents DoS attacks via enormous string literals
        pub const MAX_STRING_SIZE: usize = 1_048_576;

        /// Maximum identifier length (255 characters)
        /// SECURITY: Prevents parser complexity attacks
        pub const MAX_IDENTIFIER_LENGTH: usize = 255;

        /// Maximum number of tokens allowed in a single buffer
        /// SECURITY: Prevents DoS via token explosion attacks
        pub const MAX_TOKEN_COUNT: usize = 1_000_000;

        /// Buffer size for lexical metrics collection
        /// RESOURCE: Controls memory allocation for metrics
        pub const METRICS_BUFFER_SIZE: usize = 1000;
    }

    pub mod syntax {
        /// Maximum parser recursion depth to prevent stack overflow
        /// SECURITY: Prevents DoS attacks via deeply nested structures
        pub const MAX_PARSE_DEPTH: usize = 100;

        /// Token lookahead limit for parsing decisions
        /// PERFORMANCE: Controls lookahead memory usage
        pub const MAX_LOOKAHEAD_TOKENS: usize = 10;

        /// Maximum attribute groups accepted on a single tag
        /// SECURITY: Bounds attribute-merge work per tag
        pub const MAX_ATTRIBUTE_GROUPS: usize = 8;

        /// Maximum positional slots accepted in one attribute group
        /// SECURITY: Bounds per-tag attribute storage
        pub const MAX_ATTRIBUTE_SLOTS: usize = 64;
    }

    pub mod diagnostics {
        /// Maximum diagnostics collected per compilation
        /// RESOURCE: Prevents unbounded accumulation on pathological input
        pub const MAX_DIAGNOSTICS: usize = 10_000;

        /// Maximum length for diagnostic messages
        /// RESOURCE: Prevents memory attacks via huge error descriptions
        pub const MAX_MESSAGE_LENGTH: usize = 10_000;
    }

    pub mod logging {
        /// Maximum log events retained by in-memory loggers
        /// RESOURCE: Controls memory usage for logging
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length
        /// RESOURCE: Prevents memory attacks via huge messages
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 10_000;
    }
}
