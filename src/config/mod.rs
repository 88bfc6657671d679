mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::{debug, warn};

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub const API_KEY_ENV: &str = "HUGGING_FACE_KEY";
pub const PORT_ENV: &str = "PORT";

pub async fn load() -> Result<Config> {
    let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from(&config_path).await?;
    config.apply_overrides(|key| env::var(key).ok())?;
    config.validate()?;

    Ok(config)
}

/// Reads a YAML config file. A missing file yields the defaults.
pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        debug!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

impl Config {
    /// Applies environment overrides through `lookup`, so callers decide where values come from.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.upstream.api_key = key;
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .parse()
                .map_err(|_| Error::config(format!("{PORT_ENV} is not a valid port: '{port}'")))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_retries == 0 {
            return Err(Error::config("retry.max_retries must be at least 1"));
        }

        if !self.server.path.starts_with('/') {
            return Err(Error::config(format!(
                "server.path must start with '/': '{}'",
                self.server.path
            )));
        }

        if self.upstream.model.trim().is_empty() {
            return Err(Error::config("upstream.model must not be empty"));
        }

        if self.upstream.api_key.is_empty() {
            warn!("{} is not set; upstream calls will be anonymous", API_KEY_ENV);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.path, "/api/analyze");
        assert_eq!(config.retry.max_retries, 10);
        assert_eq!(config.retry.retry_delay_ms, 3000);
        assert_eq!(
            config.upstream.model_url(),
            "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[(API_KEY_ENV, "hf_secret"), (PORT_ENV, "8081")]))
            .unwrap();

        assert_eq!(config.upstream.api_key, "hf_secret");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_invalid_port_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(lookup_from(&[(PORT_ENV, "eighty")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = Config::default();
        config.retry.max_retries = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_relative_path_rejected() {
        let mut config = Config::default();
        config.server.path = "api/analyze".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_model_url_trims_trailing_slash() {
        let upstream = UpstreamConfig {
            base_url: "http://localhost:9000/".to_string(),
            model: "m".to_string(),
            ..UpstreamConfig::default()
        };
        assert_eq!(upstream.model_url(), "http://localhost:9000/models/m");
    }
}
