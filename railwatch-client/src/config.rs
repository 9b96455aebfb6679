//! Client configuration resolution
//!
//! Combines command-line values with the TOML config and environment:
//! CLI → ENV (service URL only) → TOML → compiled defaults.

use crate::models::Threshold;
use railwatch_common::config::{
    resolve_service_url, TomlConfig, DEFAULT_UPLOAD_TIMEOUT_SECS, SERVICE_URL_ENV,
};
use railwatch_common::{Error, Result};
use std::time::Duration;

/// Settings for one run of the client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the detection service
    pub service_url: String,
    /// Threshold the session starts with
    pub threshold: Threshold,
    pub upload_timeout: Duration,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub service_url: Option<String>,
    pub threshold: Option<f64>,
    pub upload_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Resolve the effective configuration.
    ///
    /// A threshold outside the selectable set is a configuration error here, unlike
    /// `UploadSession::set_threshold` which silently ignores it.
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let service_url =
            resolve_service_url(cli.service_url.as_deref(), SERVICE_URL_ENV, toml_config);

        let threshold = match cli.threshold.or(toml_config.default_threshold) {
            Some(value) => Threshold::new(value).ok_or_else(|| {
                Error::Config(format!(
                    "threshold {} is not one of 0.1, 0.2, ..., 1.0",
                    value
                ))
            })?,
            None => Threshold::default(),
        };

        let timeout_secs = cli
            .upload_timeout_secs
            .or(toml_config.upload_timeout_secs)
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(Error::Config("upload timeout must be at least 1 second".to_string()));
        }

        tracing::debug!(
            service_url = %service_url,
            threshold = %threshold,
            timeout_secs,
            "Client configuration resolved"
        );

        Ok(Self {
            service_url,
            threshold,
            upload_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = CliOverrides {
            service_url: Some("http://localhost:8000".to_string()),
            ..Default::default()
        };
        let config = ClientConfig::resolve(&cli, &TomlConfig::default()).unwrap();
        assert_eq!(config.threshold, Threshold::default());
        assert_eq!(
            config.upload_timeout,
            Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_cli_threshold_beats_toml() {
        let cli = CliOverrides {
            service_url: Some("http://x".to_string()),
            threshold: Some(0.4),
            upload_timeout_secs: None,
        };
        let toml_config = TomlConfig {
            default_threshold: Some(0.6),
            upload_timeout_secs: Some(10),
            ..Default::default()
        };
        let config = ClientConfig::resolve(&cli, &toml_config).unwrap();
        assert_eq!(config.threshold.as_f64(), 0.4);
        assert_eq!(config.upload_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_threshold_is_config_error() {
        let toml_config = TomlConfig {
            default_threshold: Some(0.75),
            ..Default::default()
        };
        let err = ClientConfig::resolve(&CliOverrides::default(), &toml_config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = CliOverrides {
            upload_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(ClientConfig::resolve(&cli, &TomlConfig::default()).is_err());
    }
}
