//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for vidgate.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Shared secret expected in the `x-api-key` header.
    ///
    /// When unset, every protected endpoint rejects with 401 (fail closed).
    pub api_key: Option<String>,

    /// Bearer credential for the Sora API.
    pub sora_api_key: Option<String>,

    /// Bearer credential for the Vidfly API.
    pub vidfly_api_key: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// Deadline in seconds applied to each outbound provider call.
    pub request_timeout_secs: u64,

    /// Extra attempts after the first outbound create call fails transiently.
    pub max_retries: u32,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("VIDGATE_BIND", "0.0.0.0:3000"),
            api_key: std::env::var("VIDGATE_API_KEY").ok(),
            sora_api_key: std::env::var("SORA_API_KEY").ok(),
            vidfly_api_key: std::env::var("VIDFLY_API_KEY").ok(),
            log_level: env_or("VIDGATE_LOG", "info"),
            request_timeout_secs: parse_env("VIDGATE_REQUEST_TIMEOUT_SECS", 30),
            max_retries: parse_env("VIDGATE_MAX_RETRIES", 2),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        // Scoped to variables no other test touches.
        std::env::remove_var("VIDGATE_BIND");
        std::env::remove_var("VIDGATE_LOG");
        std::env::remove_var("VIDGATE_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("VIDGATE_MAX_RETRIES");

        let cfg = Config::from_env();
        assert_eq!(cfg.bind_address, "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.max_retries, 2);
    }

    #[test]
    fn parse_env_falls_back_on_garbage() {
        std::env::set_var("VIDGATE_TEST_PARSE", "not-a-number");
        assert_eq!(parse_env::<u32>("VIDGATE_TEST_PARSE", 7), 7);
        std::env::set_var("VIDGATE_TEST_PARSE", "42");
        assert_eq!(parse_env::<u32>("VIDGATE_TEST_PARSE", 7), 42);
        std::env::remove_var("VIDGATE_TEST_PARSE");
    }
}
