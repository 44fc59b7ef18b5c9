use serde::Deserialize;
use std::path::PathBuf;

use crate::services::DEFAULT_RECOMMENDATIONS;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path of the standardized feature snapshot (CSV)
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Recommendations returned when a request does not ask for a count
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Upper bound on the count a request may ask for
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Comma separated list of allowed CORS origins, any origin when unset
    #[serde(default)]
    pub cors_allow_origins: Option<String>,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("scaled_dataset.csv")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_recommendations() -> usize {
    DEFAULT_RECOMMENDATIONS
}

fn default_max_recommendations() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            host: default_host(),
            port: default_port(),
            default_recommendations: default_recommendations(),
            max_recommendations: default_max_recommendations(),
            cors_allow_origins: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.default_recommendations > config.max_recommendations {
            anyhow::bail!(
                "DEFAULT_RECOMMENDATIONS ({}) exceeds MAX_RECOMMENDATIONS ({})",
                config.default_recommendations,
                config.max_recommendations
            );
        }

        Ok(config)
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed CORS origins, `None` meaning any origin
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        self.cors_allow_origins.as_ref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert_eq!(config.snapshot_path, PathBuf::from("scaled_dataset.csv"));
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.default_recommendations, 10);
        assert_eq!(config.max_recommendations, 100);
        assert_eq!(config.cors_origins(), None);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("SNAPSHOT_PATH", "/data/songs.csv"),
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("DEFAULT_RECOMMENDATIONS", "5"),
            ("CORS_ALLOW_ORIGINS", "http://localhost:3000, https://beatwise.app,"),
        ]))
        .unwrap();

        assert_eq!(config.snapshot_path, PathBuf::from("/data/songs.csv"));
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.default_recommendations, 5);
        assert_eq!(
            config.cors_origins(),
            Some(vec![
                "http://localhost:3000".to_string(),
                "https://beatwise.app".to_string()
            ])
        );
    }

    #[test]
    fn test_default_above_max_is_rejected() {
        let result = Config::from_vars(vars(&[
            ("DEFAULT_RECOMMENDATIONS", "50"),
            ("MAX_RECOMMENDATIONS", "20"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port() {
        assert!(Config::from_vars(vars(&[("PORT", "not-a-port")])).is_err());
    }
}
