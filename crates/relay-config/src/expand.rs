//! Environment variable expansion for configuration strings.
//!
//! Supports two forms:
//! - `${VAR}` - the value of VAR, error if unset
//! - `${VAR:-default}` - the value of VAR if set, otherwise the default

use crate::ConfigError;

/// Expand environment variable references in a configuration value.
///
/// `field` names the config field for error messages
/// (e.g. `"oauth.consumer_secret"`).
///
/// # Errors
///
/// Returns [`ConfigError::EnvVar`] for unterminated references or for
/// `${VAR}` references where VAR is unset.
pub fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("unterminated variable reference in \"{value}\""),
            });
        };
        let reference = &after[..end];

        let expanded = match reference.split_once(":-") {
            Some((name, default)) => {
                std::env::var(name).unwrap_or_else(|_| default.to_owned())
            }
            None => std::env::var(reference).map_err(|_| ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{reference}}} not set"),
            })?,
        };
        result.push_str(&expanded);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}
