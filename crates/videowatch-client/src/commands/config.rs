//! Configuration commands.

use std::path::PathBuf;

use videowatch_protocol::Endpoint;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, path: &PathBuf) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    if config.connection.host.is_empty() {
        return Err(ClientError::Config(
            "connection.host must not be empty".to_string(),
        ));
    }
    if config.connection.port == 0 {
        return Err(ClientError::Config(
            "connection.port must not be 0".to_string(),
        ));
    }

    // The host must form a valid endpoint URL.
    Endpoint::new(config.connection.host.clone(), config.connection.port)
        .url()
        .map_err(|e| ClientError::Config(e.to_string()))?;

    if config.watch.poll_interval_ms == 0 {
        return Err(ClientError::Config(
            "watch.poll_interval_ms must be greater than 0".to_string(),
        ));
    }
    // NaN fails every comparison, so check it on its own.
    if config.watch.reconnect_multiplier.is_nan() || config.watch.reconnect_multiplier < 1.0 {
        return Err(ClientError::Config(
            "watch.reconnect_multiplier must be at least 1.0".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&config.watch.reconnect_jitter_fraction) {
        return Err(ClientError::Config(
            "watch.reconnect_jitter_fraction must be between 0.0 and 1.0".to_string(),
        ));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(override_path: Option<&PathBuf>) -> ClientResult<()> {
    let config_path = override_path
        .cloned()
        .unwrap_or_else(ClientConfig::default_path);
    println!("config: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn empty_host_is_rejected() {
        let mut config = ClientConfig::default();
        config.connection.host = String::new();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = ClientConfig::default();
        config.connection.port = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("port"));
    }

    #[test]
    fn unparseable_host_is_rejected() {
        let mut config = ClientConfig::default();
        config.connection.host = "not a host".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut config = ClientConfig::default();
        config.watch.poll_interval_ms = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn shrinking_multiplier_is_rejected() {
        let mut config = ClientConfig::default();
        config.watch.reconnect_multiplier = 0.5;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("reconnect_multiplier"));
    }

    #[test]
    fn nan_multiplier_is_rejected() {
        // TOML accepts `nan` as a float literal.
        let config: ClientConfig = toml::from_str("[watch]\nreconnect_multiplier = nan\n")
            .expect("nan parses as a float");
        assert!(config.watch.reconnect_multiplier.is_nan());

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("reconnect_multiplier"));
    }

    #[test]
    fn out_of_range_jitter_is_rejected() {
        let mut config = ClientConfig::default();
        config.watch.reconnect_jitter_fraction = 1.5;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("jitter"));
    }
}
