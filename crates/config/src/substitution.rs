use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

fn env_var_regex() -> Result<Regex> {
    Regex::new(ENV_VAR_PATTERN).context("Invalid environment variable pattern")
}

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
///
/// Each placeholder is matched as a whole name. Unset variables keep their
/// placeholder so validation can report them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = env_var_regex()?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &Captures| {
        let placeholder = &caps[0];
        let Some(name) = caps.get(1).or_else(|| caps.get(2)) else {
            return placeholder.to_string();
        };
        let var_name = name.as_str();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {} = \"{}\"", var_name, value);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!("Unresolved environment variables: {:?}", missing_vars);
    }

    Ok(result.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    env_var_regex().map(|re| re.is_match(content)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_set_variable() {
        env::set_var("SURFSUP_TEST_DB_PATH", "/data/hawaii.sqlite");
        let out = substitute_env_vars("url: sqlite://${SURFSUP_TEST_DB_PATH}").unwrap();
        assert_eq!(out, "url: sqlite:///data/hawaii.sqlite");
        env::remove_var("SURFSUP_TEST_DB_PATH");
    }

    #[test]
    fn test_unset_variable_is_kept() {
        let out = substitute_env_vars("port: ${SURFSUP_TEST_UNSET_PORT}").unwrap();
        assert_eq!(out, "port: ${SURFSUP_TEST_UNSET_PORT}");
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_prefix_name_does_not_rewrite_longer_name() {
        env::set_var("SURFSUP_TEST_HOST", "127.0.0.1");
        let out =
            substitute_env_vars("host: $SURFSUP_TEST_HOST other: $SURFSUP_TEST_HOSTNAME").unwrap();
        assert_eq!(out, "host: 127.0.0.1 other: $SURFSUP_TEST_HOSTNAME");
        env::remove_var("SURFSUP_TEST_HOST");
    }

    #[test]
    fn test_plain_sqlite_url_has_no_placeholders() {
        assert!(!has_unresolved_env_vars("sqlite://Resources/hawaii.sqlite"));
    }
}
