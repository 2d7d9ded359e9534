//! Centralized default constants for Zetria.
//!
//! Both binaries and the repositories reference these constants instead of
//! defining their own magic numbers.

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host for the HTTP server.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const SERVER_PORT: u16 = 5000;

/// Default database URL when `DATABASE_URL` is not set.
pub const DATABASE_URL: &str = "postgres://localhost/zetria";

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "zetria_session";

/// Session lifetime in hours (7 days).
pub const SESSION_TTL_HOURS: u64 = 168;

/// Length of the random session token.
pub const SESSION_TOKEN_LEN: usize = 48;

/// Minimum username length accepted at registration.
pub const USERNAME_MIN_LEN: usize = 3;

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN_LEN: usize = 6;

// =============================================================================
// GRAPH VIEW
// =============================================================================

/// Characters of a note title kept in a graph node label.
pub const GRAPH_LABEL_MAX_CHARS: usize = 30;

/// Characters of note content kept in a graph node preview.
pub const GRAPH_CONTENT_MAX_CHARS: usize = 100;

// =============================================================================
// QUEUE
// =============================================================================

/// Default Redis URL.
pub const REDIS_URL: &str = "redis://localhost:6379";

/// Name of the graph event queue.
pub const GRAPH_QUEUE: &str = "grafos_queue";

/// Suffix of the in-flight list paired with a queue.
pub const PROCESSING_SUFFIX: &str = ":processing";

/// Seconds the consumer blocks waiting for a message before re-checking shutdown.
pub const CONSUMER_BLOCK_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Requests allowed per rate limit period.
pub const RATE_LIMIT_REQUESTS: u32 = 100;

/// Rate limit period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;
