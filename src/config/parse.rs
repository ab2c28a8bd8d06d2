//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse environment variable as boolean.
/// Treats "1", "true" (case-insensitive) as true.
pub fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(default)
}

/// Parse environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            value: v,
            error: e.to_string(),
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_bool() {
        std::env::set_var("HOSTINFO_TEST_BOOL", "1");
        assert!(env_bool("HOSTINFO_TEST_BOOL", false));

        std::env::set_var("HOSTINFO_TEST_BOOL", "TRUE");
        assert!(env_bool("HOSTINFO_TEST_BOOL", false));

        std::env::set_var("HOSTINFO_TEST_BOOL", "no");
        assert!(!env_bool("HOSTINFO_TEST_BOOL", true));

        std::env::remove_var("HOSTINFO_TEST_BOOL");
        assert!(env_bool("HOSTINFO_TEST_BOOL", true));
    }

    #[test]
    fn test_env_parse_invalid() {
        std::env::set_var("HOSTINFO_TEST_PORT", "not-a-number");
        let result: Result<u16, _> = env_parse("HOSTINFO_TEST_PORT", 80);
        assert!(result.is_err());
        std::env::remove_var("HOSTINFO_TEST_PORT");
    }

    #[test]
    fn test_env_parse_addr() {
        std::env::remove_var("HOSTINFO_TEST_ADDR");
        let fallback = std::net::SocketAddr::from(([0, 0, 0, 0], 9090));
        assert_eq!(env_parse("HOSTINFO_TEST_ADDR", fallback).unwrap(), fallback);

        std::env::set_var("HOSTINFO_TEST_ADDR", "127.0.0.1:8080");
        let addr: std::net::SocketAddr = env_parse("HOSTINFO_TEST_ADDR", fallback).unwrap();
        assert_eq!(addr, "127.0.0.1:8080".parse().unwrap());
        std::env::remove_var("HOSTINFO_TEST_ADDR");
    }
}
