//! Configuration loading and service URL resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the detection service base URL
pub const SERVICE_URL_ENV: &str = "RAILWATCH_SERVICE_URL";

/// Compiled default for the detection service base URL
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Default upload timeout (seconds). Detection runs inside the upload request,
/// so this covers inference time as well as the transfer.
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. `"info"` or `"railwatch_client=debug"`
    #[serde(default)]
    pub level: Option<String>,
}

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Detection service base URL
    #[serde(default)]
    pub service_url: Option<String>,

    /// Confidence threshold used when none is given on the command line
    #[serde(default)]
    pub default_threshold: Option<f64>,

    /// Upload request timeout in seconds
    #[serde(default)]
    pub upload_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load an explicit config file, or the platform default one if it exists.
///
/// An explicit path that cannot be read is an error; a missing default file is not.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        return load_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => load_toml_config(&path),
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => Ok(TomlConfig::default()),
    }
}

/// Platform config file location: `<config_dir>/railwatch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("railwatch").join("config.toml"))
}

/// Service URL resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. Compiled default (fallback)
pub fn resolve_service_url(
    cli_arg: Option<&str>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> String {
    // Priority 1: Command-line argument
    if let Some(url) = cli_arg {
        return url.to_string();
    }

    // Priority 2: Environment variable
    if let Ok(url) = std::env::var(env_var_name) {
        if !url.trim().is_empty() {
            return url;
        }
    }

    // Priority 3: TOML config file
    if let Some(url) = &toml_config.service_url {
        return url.clone();
    }

    // Priority 4: Compiled default
    DEFAULT_SERVICE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_wins() {
        let toml_config = TomlConfig {
            service_url: Some("http://toml:1".to_string()),
            ..Default::default()
        };
        let url = resolve_service_url(
            Some("http://cli:1"),
            "RAILWATCH_TEST_UNSET_VAR_A",
            &toml_config,
        );
        assert_eq!(url, "http://cli:1");
    }

    #[test]
    fn test_toml_used_without_cli_or_env() {
        let toml_config = TomlConfig {
            service_url: Some("http://toml:1".to_string()),
            ..Default::default()
        };
        let url = resolve_service_url(None, "RAILWATCH_TEST_UNSET_VAR_B", &toml_config);
        assert_eq!(url, "http://toml:1");
    }

    #[test]
    fn test_compiled_default() {
        let url = resolve_service_url(None, "RAILWATCH_TEST_UNSET_VAR_C", &TomlConfig::default());
        assert_eq!(url, DEFAULT_SERVICE_URL);
    }

    #[test]
    fn test_env_beats_toml() {
        std::env::set_var("RAILWATCH_TEST_ENV_URL", "http://env:1");
        let toml_config = TomlConfig {
            service_url: Some("http://toml:1".to_string()),
            ..Default::default()
        };
        let url = resolve_service_url(None, "RAILWATCH_TEST_ENV_URL", &toml_config);
        std::env::remove_var("RAILWATCH_TEST_ENV_URL");
        assert_eq!(url, "http://env:1");
    }
}
