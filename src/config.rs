//! Configuration management for the Code Operation MCP Server
//!
//! Operational limits with environment variable overrides.

/// Default cap on lines returned by a single read
pub const DEFAULT_MAX_READ_LINES: usize = 100;

/// Default cap on displayed search matches
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 100;

/// Configuration for the Code Operation MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of lines a single read_text_file call may return
    pub max_read_lines: usize,

    /// Maximum number of search matches shown in a search report
    pub max_search_results: usize,
}

impl Config {
    /// Create a new configuration, applying environment overrides
    pub fn new() -> Self {
        Self {
            max_read_lines: env_limit("CODE_OPS_MAX_READ_LINES", DEFAULT_MAX_READ_LINES),
            max_search_results: env_limit(
                "CODE_OPS_MAX_SEARCH_RESULTS",
                DEFAULT_MAX_SEARCH_RESULTS,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a positive limit from the environment, falling back on the default
fn env_limit(var: &str, default: usize) -> usize {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = Config::new();
        assert_eq!(config.max_read_lines, DEFAULT_MAX_READ_LINES);
        assert_eq!(config.max_search_results, DEFAULT_MAX_SEARCH_RESULTS);
    }

    #[test]
    fn test_env_limit_unset_uses_default() {
        assert_eq!(env_limit("CODE_OPS_TEST_UNSET_LIMIT", 42), 42);
    }

    #[test]
    fn test_env_limit_rejects_garbage() {
        let var = "CODE_OPS_TEST_GARBAGE_LIMIT";
        std::env::set_var(var, "abc");
        assert_eq!(env_limit(var, 42), 42);
        std::env::remove_var(var);
    }

    #[test]
    fn test_env_limit_rejects_zero() {
        let var = "CODE_OPS_TEST_ZERO_LIMIT";
        std::env::set_var(var, "0");
        assert_eq!(env_limit(var, 42), 42);
        std::env::remove_var(var);
    }

    #[test]
    fn test_env_limit_accepts_valid_override() {
        let var = "CODE_OPS_TEST_VALID_LIMIT";
        std::env::set_var(var, "25");
        assert_eq!(env_limit(var, 42), 25);
        std::env::remove_var(var);
    }
}
