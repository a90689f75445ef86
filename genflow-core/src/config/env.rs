//! Environment variable interpolation for configuration

use super::error::ConfigError;
use regex::Regex;
use std::env;

/// Interpolate `${VAR}` references in a configuration string.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let env_var_pattern = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = content.to_string();
    let mut missing_vars = Vec::new();

    for cap in env_var_pattern.captures_iter(content) {
        let full_match = cap.get(0).unwrap().as_str();
        let var_name = &cap[1];

        match env::var(var_name) {
            Ok(value) => {
                result = result.replace(full_match, &value);
            }
            Err(_) => {
                missing_vars.push(var_name.to_string());
            }
        }
    }

    // Report the first missing variable
    if let Some(var) = missing_vars.first() {
        return Err(ConfigError::EnvVarNotFound { var: var.clone() });
    }

    Ok(result)
}
