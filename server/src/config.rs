use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clara_core::GeminiConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PORT_ATTEMPTS: u16 = 10;
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// One source of configuration values: a TOML file, the environment or
/// command-line flags. Layers are merged, later ones winning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub port_attempts: Option<u16>,
    pub assets_dir: Option<PathBuf>,
    pub gemini: GeminiConfig,
}

impl ConfigLayer {
    /// Loads a layer from a TOML file if it exists, otherwise returns an empty layer
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("Config file {} not found, skipping", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads the layer from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the layer through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            host: parse_var(&non_empty, "HOST")?,
            port: parse_var(&non_empty, "PORT")?,
            port_attempts: parse_var(&non_empty, "CLARA_PORT_ATTEMPTS")?,
            assets_dir: non_empty("CLARA_ASSETS_DIR").map(PathBuf::from),
            gemini: GeminiConfig::new(
                non_empty("GEMINI_API_KEY"),
                non_empty("GEMINI_MODEL"),
                non_empty("GEMINI_API_BASE_URL"),
            ),
        })
    }

    /// Merges this layer with another, preferring values from the other layer if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            port_attempts: other.port_attempts.or(self.port_attempts),
            assets_dir: other.assets_dir.clone().or_else(|| self.assets_dir.clone()),
            gemini: self.gemini.merge(&other.gemini),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        })
        .transpose()
}

/// Immutable configuration of the Query Service, built once at startup
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: IpAddr,
    pub port: u16,
    pub port_attempts: u16,
    pub assets_dir: PathBuf,
    pub gemini: GeminiConfig,
}

impl ServiceConfig {
    /// Resolves the final configuration; fails when no API key is present
    pub fn from_layer(layer: ConfigLayer) -> Result<Self, ConfigError> {
        if layer
            .gemini
            .api_key
            .as_deref()
            .map_or(true, |key| key.trim().is_empty())
        {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(Self {
            host: layer.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            port: layer.port.unwrap_or(DEFAULT_PORT),
            port_attempts: layer.port_attempts.unwrap_or(DEFAULT_PORT_ATTEMPTS),
            assets_dir: layer
                .assets_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
            gemini: layer.gemini,
        })
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.assets_dir.join("icons")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_api_key_only() {
        let layer = ConfigLayer::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        let config = ServiceConfig::from_layer(layer).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.port_attempts, DEFAULT_PORT_ATTEMPTS);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.icons_dir(), PathBuf::from("assets/icons"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini.model_name_or_default(), "gemini-2.5-flash");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let layer = ConfigLayer::from_lookup(lookup(&[("PORT", "4000")])).unwrap();
        assert!(matches!(
            ServiceConfig::from_layer(layer),
            Err(ConfigError::MissingApiKey)
        ));

        let blank = ConfigLayer::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(ServiceConfig::from_layer(blank).is_err());
    }

    #[test]
    fn test_invalid_port() {
        let err = ConfigLayer::from_lookup(lookup(&[("PORT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));

        let err = ConfigLayer::from_lookup(lookup(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_env_values() {
        let layer = ConfigLayer::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("PORT", " 8081 "),
            ("HOST", "127.0.0.1"),
            ("CLARA_PORT_ATTEMPTS", "3"),
            ("CLARA_ASSETS_DIR", "/srv/clara"),
        ]))
        .unwrap();
        let config = ServiceConfig::from_layer(layer).unwrap();

        assert_eq!(config.port, 8081);
        assert_eq!(config.port_attempts, 3);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.icons_dir(), PathBuf::from("/srv/clara/icons"));
        assert_eq!(config.gemini.model_name.as_deref(), Some("gemini-2.0-flash"));
    }

    #[test]
    fn test_later_layers_win() {
        let file = ConfigLayer {
            port: Some(5000),
            port_attempts: Some(2),
            gemini: GeminiConfig::new(Some("file-key".into()), Some("file-model".into()), None),
            ..Default::default()
        };
        let env = ConfigLayer::from_lookup(lookup(&[("PORT", "6000")])).unwrap();
        let cli = ConfigLayer {
            gemini: GeminiConfig::new(None, Some("cli-model".into()), None),
            ..Default::default()
        };

        let merged = file.merge(&env).merge(&cli);
        assert_eq!(merged.port, Some(6000));
        assert_eq!(merged.port_attempts, Some(2));
        assert_eq!(merged.gemini.api_key.as_deref(), Some("file-key"));
        assert_eq!(merged.gemini.model_name.as_deref(), Some("cli-model"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port = 4100\nhost = \"127.0.0.1\"\n\n[gemini]\napi_key = \"from-file\"\n"
        )
        .unwrap();

        let layer = ConfigLayer::load_from_file(file.path()).unwrap();
        assert_eq!(layer.port, Some(4100));
        assert_eq!(layer.host, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
        assert_eq!(layer.gemini.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_from_missing_file_is_empty() {
        let layer = ConfigLayer::load_from_file(Path::new("/nonexistent/clara.toml")).unwrap();
        assert_eq!(layer, ConfigLayer::default());
    }

    #[test]
    fn test_blank_api_key_from_file_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gemini]\napi_key = \"   \"").unwrap();

        let layer = ConfigLayer::load_from_file(file.path())
            .unwrap()
            .merge(&ConfigLayer::from_lookup(lookup(&[])).unwrap());
        assert_eq!(layer.gemini.api_key.as_deref(), Some("   "));
        assert!(matches!(
            ServiceConfig::from_layer(layer),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(matches!(
            ConfigLayer::load_from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
