//! Environment helpers for service configuration

use std::str::FromStr;

/// Variable value, or `default` when unset or blank
pub fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Variable value if set and not blank
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parsed variable, or `default` when unset; unparsable values are logged and ignored
pub fn env_parse<T>(name: &str, default: T) -> T
where
    T: FromStr,
{
    match env_opt(name) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(variable = name, value = %raw, "Unparsable value, using default");
                default
            }
        },
        None => default,
    }
}

/// `1`, `true`, `yes` and `on` (any case) are true
pub fn env_flag(name: &str) -> bool {
    env_opt(name).is_some_and(|v| {
        matches!(
            v.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Comma-separated list, blanks dropped
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_env_or_default() {
        assert_eq!(env_or("PLATFORM_TEST_SURELY_UNSET", "fallback"), "fallback");
    }

    #[test]
    fn test_env_parse_default_when_unset() {
        assert_eq!(env_parse("PLATFORM_TEST_UNSET_NUMBER", 42u32), 42);
    }

    #[test]
    fn test_env_flag_unset_is_false() {
        assert!(!env_flag("PLATFORM_TEST_UNSET_FLAG"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://a.test, ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
