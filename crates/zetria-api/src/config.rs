//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `postgres://localhost/zetria` |
//! | `HOST` / `PORT` | `0.0.0.0` / `5000` |
//! | `DB_MAX_CONNECTIONS` | 10 |
//! | `SESSION_TTL_HOURS` | 168 |
//! | `SESSION_COOKIE_SECURE` | false |
//! | `ALLOWED_ORIGINS` | `http://localhost:5000,http://localhost:3000` |
//! | `RATE_LIMIT_ENABLED` / `RATE_LIMIT_REQUESTS` / `RATE_LIMIT_PERIOD_SECS` | true / 100 / 60 |
//! | `GRAPH_EVENTS_ENABLED` | false |
//! | `REDIS_URL` / `GRAPH_QUEUE` | `redis://localhost:6379` / `grafos_queue` |

use std::time::Duration;

use zetria_core::defaults;
use zetria_db::pool::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5000,http://localhost:3000";

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub ttl: Duration,
    pub cookie_secure: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(defaults::SESSION_TTL_HOURS * 3600),
            cookie_secure: false,
        }
    }
}

/// Global request rate limit. `None` on [`ServerConfig`] disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub requests: u32,
    pub period: Duration,
}

/// Graph event publishing settings.
#[derive(Debug, Clone)]
pub struct GraphEventSettings {
    pub enabled: bool,
    pub redis_url: String,
    pub queue: String,
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub session: SessionSettings,
    pub allowed_origins: Vec<String>,
    pub rate_limit: Option<RateLimitSettings>,
    pub graph_events: GraphEventSettings,
}

fn parse_bool(value: &str) -> bool {
    value == "true" || value == "1"
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Split a comma-separated origin list, dropping empty entries.
pub fn parse_allowed_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS)
    } else {
        origins
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let rate_limit_enabled = get("RATE_LIMIT_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(true);
        let requests: u32 = parse_or(get("RATE_LIMIT_REQUESTS"), defaults::RATE_LIMIT_REQUESTS);
        let period_secs: u64 =
            parse_or(get("RATE_LIMIT_PERIOD_SECS"), defaults::RATE_LIMIT_PERIOD_SECS);
        let rate_limit = (rate_limit_enabled && requests > 0 && period_secs > 0).then(|| {
            RateLimitSettings {
                requests,
                period: Duration::from_secs(period_secs),
            }
        });

        let ttl_hours: u64 = parse_or(get("SESSION_TTL_HOURS"), defaults::SESSION_TTL_HOURS);

        Self {
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| defaults::DATABASE_URL.to_string()),
            host: get("HOST").unwrap_or_else(|| defaults::SERVER_HOST.to_string()),
            port: parse_or(get("PORT"), defaults::SERVER_PORT),
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS),
            session: SessionSettings {
                ttl: Duration::from_secs(ttl_hours.max(1) * 3600),
                cookie_secure: get("SESSION_COOKIE_SECURE")
                    .map(|v| parse_bool(&v))
                    .unwrap_or(false),
            },
            allowed_origins: parse_allowed_origins(
                &get("ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
            rate_limit,
            graph_events: GraphEventSettings {
                enabled: get("GRAPH_EVENTS_ENABLED")
                    .map(|v| parse_bool(&v))
                    .unwrap_or(false),
                redis_url: get("REDIS_URL").unwrap_or_else(|| defaults::REDIS_URL.to_string()),
                queue: get("GRAPH_QUEUE").unwrap_or_else(|| defaults::GRAPH_QUEUE.to_string()),
            },
        }
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
