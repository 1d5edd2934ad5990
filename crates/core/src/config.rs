use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const VISION_API_KEY_VAR: &str = "GOOGLE_CLOUD_VISION_API_KEY";
pub const MODEL_API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const DB_PATH_VAR: &str = "INVENSCAN_DB_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{service} API key not found. Set {var} or add it to the config file.")]
    MissingApiKey { service: &'static str, var: &'static str },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
        }
    }
}

impl VisionConfig {
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.api_key.as_deref()).ok_or(ConfigError::MissingApiKey {
            service: "Google Cloud Vision",
            var: VISION_API_KEY_VAR,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            name: "gemini-2.0-flash".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        non_empty(self.api_key.as_deref()).ok_or(ConfigError::MissingApiKey {
            service: "Gemini",
            var: MODEL_API_KEY_VAR,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("invenscan.db") }
    }
}

/// Everything the pipeline needs from the outside world. Built once at
/// startup and handed to the clients that need it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vision: VisionConfig,
    pub model: ModelConfig,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read the optional config file, then overlay environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(VISION_API_KEY_VAR) {
            self.vision.api_key = Some(key);
        }
        if let Some(key) = get(MODEL_API_KEY_VAR) {
            self.model.api_key = Some(key);
        }
        if let Some(path) = get(DB_PATH_VAR) {
            self.database.path = PathBuf::from(path);
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_google_endpoints() {
        let c = Config::default();
        assert!(c.vision.endpoint.ends_with("images:annotate"));
        assert_eq!(c.model.name, "gemini-2.0-flash");
        assert_eq!(c.database.path, PathBuf::from("invenscan.db"));
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = Config::from_toml_str(
            r#"
            [model]
            name = "gemini-1.5-pro"

            [database]
            path = "/tmp/receipts.db"
            "#,
        )
        .unwrap();
        assert_eq!(c.model.name, "gemini-1.5-pro");
        assert!(c.model.endpoint.starts_with("https://generativelanguage"));
        assert_eq!(c.database.path, PathBuf::from("/tmp/receipts.db"));
        assert!(c.vision.api_key.is_none());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml_str("[model\nname = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut c = Config::from_toml_str("[vision]\napi_key = \"from-file\"").unwrap();
        let env: HashMap<&str, &str> = [
            (VISION_API_KEY_VAR, "from-env"),
            (MODEL_API_KEY_VAR, "gemini-key"),
            (DB_PATH_VAR, "other.db"),
        ]
        .into_iter()
        .collect();
        c.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(c.vision.require_api_key().unwrap(), "from-env");
        assert_eq!(c.model.require_api_key().unwrap(), "gemini-key");
        assert_eq!(c.database.path, PathBuf::from("other.db"));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut c = Config::default();
        c.apply_env(|_| Some("   ".to_string()));
        assert!(c.vision.api_key.is_none());
        assert_eq!(c.database.path, PathBuf::from("invenscan.db"));
    }

    #[test]
    fn missing_key_names_the_variable() {
        let err = Config::default().vision.require_api_key().unwrap_err();
        assert!(err.to_string().contains(VISION_API_KEY_VAR));
        assert!(matches!(
            Config::default().model.require_api_key(),
            Err(ConfigError::MissingApiKey { service: "Gemini", .. })
        ));
    }

    #[test]
    fn load_reports_unreadable_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
