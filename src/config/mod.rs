//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/route-planner/config.toml

pub mod defaults;

use crate::constants::api::{IP_API_URL, NOMINATIM_URL, OPENROUTESERVICE_URL};
use crate::constants::origin::{DEFAULT_LABEL, DEFAULT_LAT, DEFAULT_LNG};
use crate::constants::routing::{DISTANCE_LIMIT_METERS, MAX_ALTERNATIVES};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default values for CLI output
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Routing service settings
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Default values for CLI output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim base URL
    #[serde(default = "default_geocoding_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

/// Routing service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// OpenRouteService base URL
    #[serde(default = "default_routing_url")]
    pub base_url: String,

    /// Routing profile
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,

    /// Number of alternative routes to ask for
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,

    /// Maximum shared fraction between alternatives
    #[serde(default = "default_share_factor")]
    pub share_factor: f64,

    /// Maximum length factor of an alternative over the primary route
    #[serde(default = "default_weight_factor")]
    pub weight_factor: f64,

    /// Great-circle distance above which no routing is attempted
    #[serde(default = "default_distance_limit")]
    pub distance_limit_meters: f64,
}

/// Location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Position source: "ip" or "none"
    #[serde(default = "default_location_source")]
    pub source: String,

    /// IP geolocation endpoint
    #[serde(default = "default_ip_api_url")]
    pub ip_api_url: String,

    /// Timeout per position fix in seconds
    #[serde(default = "default_fix_timeout")]
    pub fix_timeout_secs: u64,

    /// Delay between fixes while observing, in seconds
    #[serde(default = "default_watch_interval")]
    pub watch_interval_secs: u64,

    /// Fallback origin latitude
    #[serde(default = "default_origin_lat")]
    pub default_lat: f64,

    /// Fallback origin longitude
    #[serde(default = "default_origin_lng")]
    pub default_lng: f64,

    /// Fallback origin name
    #[serde(default = "default_origin_label")]
    pub default_label: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory with presentation assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// OpenRouteService API key
    #[serde(default)]
    pub openrouteservice: String,
}

// Default value functions for serde
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_geocoding_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_routing_url() -> String {
    OPENROUTESERVICE_URL.to_string()
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_profile() -> String {
    DEFAULT_ROUTING_PROFILE.to_string()
}
fn default_max_alternatives() -> usize {
    MAX_ALTERNATIVES
}
fn default_share_factor() -> f64 {
    DEFAULT_SHARE_FACTOR
}
fn default_weight_factor() -> f64 {
    DEFAULT_WEIGHT_FACTOR
}
fn default_distance_limit() -> f64 {
    DISTANCE_LIMIT_METERS
}
fn default_location_source() -> String {
    DEFAULT_LOCATION_SOURCE.to_string()
}
fn default_ip_api_url() -> String {
    IP_API_URL.to_string()
}
fn default_fix_timeout() -> u64 {
    DEFAULT_FIX_TIMEOUT_SECS
}
fn default_watch_interval() -> u64 {
    DEFAULT_WATCH_INTERVAL_SECS
}
fn default_origin_lat() -> f64 {
    DEFAULT_LAT
}
fn default_origin_lng() -> f64 {
    DEFAULT_LNG
}
fn default_origin_label() -> String {
    DEFAULT_LABEL.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_url(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_url(),
            profile: default_profile(),
            timeout_secs: default_request_timeout(),
            max_alternatives: default_max_alternatives(),
            share_factor: default_share_factor(),
            weight_factor: default_weight_factor(),
            distance_limit_meters: default_distance_limit(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            source: default_location_source(),
            ip_api_url: default_ip_api_url(),
            fix_timeout_secs: default_fix_timeout(),
            watch_interval_secs: default_watch_interval(),
            default_lat: default_origin_lat(),
            default_lng: default_origin_lng(),
            default_label: default_origin_label(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl LocationConfig {
    /// The fallback origin
    pub fn default_origin(&self) -> Coordinate {
        Coordinate::new(self.default_lat, self.default_lng)
    }

    pub fn fix_timeout(&self) -> Duration {
        Duration::from_secs(self.fix_timeout_secs)
    }

    pub fn watch_interval(&self) -> Duration {
        Duration::from_secs(self.watch_interval_secs)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Check values that would otherwise fail later at request time
    pub fn validate(&self) -> Result<()> {
        self.location.default_origin().validate().map_err(|e| {
            Error::Config(format!("Invalid default origin: {}", e))
        })?;

        if self.routing.max_alternatives == 0 {
            return Err(Error::Config(
                "routing.max_alternatives must be at least 1".to_string(),
            ));
        }

        if self.location.watch_interval_secs == 0 {
            return Err(Error::Config(
                "location.watch_interval_secs must be at least 1".to_string(),
            ));
        }

        if !(self.routing.distance_limit_meters > 0.0) {
            return Err(Error::Config(
                "routing.distance_limit_meters must be positive".to_string(),
            ));
        }

        if !matches!(self.location.source.as_str(), "ip" | "none") {
            return Err(Error::Config(format!(
                "Unknown location source: {}",
                self.location.source
            )));
        }

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "format"] => Some(self.defaults.format.clone()),

            ["geocoding", "base_url"] => Some(self.geocoding.base_url.clone()),
            ["geocoding", "timeout_secs"] => Some(self.geocoding.timeout_secs.to_string()),

            ["routing", "base_url"] => Some(self.routing.base_url.clone()),
            ["routing", "profile"] => Some(self.routing.profile.clone()),
            ["routing", "timeout_secs"] => Some(self.routing.timeout_secs.to_string()),
            ["routing", "max_alternatives"] => Some(self.routing.max_alternatives.to_string()),
            ["routing", "share_factor"] => Some(self.routing.share_factor.to_string()),
            ["routing", "weight_factor"] => Some(self.routing.weight_factor.to_string()),
            ["routing", "distance_limit_meters"] => {
                Some(self.routing.distance_limit_meters.to_string())
            }

            ["location", "source"] => Some(self.location.source.clone()),
            ["location", "ip_api_url"] => Some(self.location.ip_api_url.clone()),
            ["location", "fix_timeout_secs"] => Some(self.location.fix_timeout_secs.to_string()),
            ["location", "watch_interval_secs"] => {
                Some(self.location.watch_interval_secs.to_string())
            }
            ["location", "default_lat"] => Some(self.location.default_lat.to_string()),
            ["location", "default_lng"] => Some(self.location.default_lng.to_string()),
            ["location", "default_label"] => Some(self.location.default_label.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "static_dir"] => Some(self.server.static_dir.clone()),

            ["api_keys", "openrouteservice"] => Some(self.api_keys.openrouteservice.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.clone();
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }

            ["geocoding", "base_url"] => {
                self.geocoding.base_url = value.to_string();
            }
            ["geocoding", "timeout_secs"] => {
                self.geocoding.timeout_secs = parse_value(key, value)?;
            }

            ["routing", "base_url"] => {
                self.routing.base_url = value.to_string();
            }
            ["routing", "profile"] => {
                self.routing.profile = value.to_string();
            }
            ["routing", "timeout_secs"] => {
                self.routing.timeout_secs = parse_value(key, value)?;
            }
            ["routing", "max_alternatives"] => {
                self.routing.max_alternatives = parse_value(key, value)?;
            }
            ["routing", "share_factor"] => {
                self.routing.share_factor = parse_value(key, value)?;
            }
            ["routing", "weight_factor"] => {
                self.routing.weight_factor = parse_value(key, value)?;
            }
            ["routing", "distance_limit_meters"] => {
                self.routing.distance_limit_meters = parse_value(key, value)?;
            }

            ["location", "source"] => {
                self.location.source = value.to_string();
            }
            ["location", "ip_api_url"] => {
                self.location.ip_api_url = value.to_string();
            }
            ["location", "fix_timeout_secs"] => {
                self.location.fix_timeout_secs = parse_value(key, value)?;
            }
            ["location", "watch_interval_secs"] => {
                self.location.watch_interval_secs = parse_value(key, value)?;
            }
            ["location", "default_lat"] => {
                self.location.default_lat = parse_value(key, value)?;
            }
            ["location", "default_lng"] => {
                self.location.default_lng = parse_value(key, value)?;
            }
            ["location", "default_label"] => {
                self.location.default_label = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(key, value)?;
            }
            ["server", "static_dir"] => {
                self.server.static_dir = value.to_string();
            }

            ["api_keys", "openrouteservice"] => {
                self.api_keys.openrouteservice = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        if let Err(e) = self.validate() {
            *self = previous;
            return Err(e);
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.format",
            "geocoding.base_url",
            "geocoding.timeout_secs",
            "routing.base_url",
            "routing.profile",
            "routing.timeout_secs",
            "routing.max_alternatives",
            "routing.share_factor",
            "routing.weight_factor",
            "routing.distance_limit_meters",
            "location.source",
            "location.ip_api_url",
            "location.fix_timeout_secs",
            "location.watch_interval_secs",
            "location.default_lat",
            "location.default_lng",
            "location.default_label",
            "server.host",
            "server.port",
            "server.static_dir",
            "api_keys.openrouteservice",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.defaults.format, "text");
        assert_eq!(config.routing.max_alternatives, 3);
        assert_eq!(config.routing.distance_limit_meters, 150_000.0);
        assert_eq!(config.routing.timeout_secs, 15);
        assert_eq!(config.location.fix_timeout_secs, 15);
        assert_eq!(config.location.default_origin(), Coordinate::new(6.5244, 3.3792));
        assert_eq!(config.server.port, 7979);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("routing.profile"), Some("driving-car".to_string()));

        config.set("routing.profile", "driving-hgv").unwrap();
        assert_eq!(config.get("routing.profile"), Some("driving-hgv".to_string()));

        config.set("routing.distance_limit_meters", "6000000").unwrap();
        assert_eq!(config.routing.distance_limit_meters, 6_000_000.0);

        config.set("api_keys.openrouteservice", "secret").unwrap();
        assert_eq!(config.api_keys.openrouteservice, "secret");
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("routing.max_alternatives", "three").is_err());
        assert!(config.set("routing.max_alternatives", "0").is_err());
        assert!(config.set("location.default_lat", "120").is_err());
        assert!(config.set("location.source", "gps").is_err());
        assert!(config.set("location.watch_interval_secs", "0").is_err());

        // Rejected values leave the config untouched
        assert_eq!(config.routing.max_alternatives, 3);
        assert_eq!(config.location.watch_interval_secs, 30);
        assert_eq!(config.location.source, "ip");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("route-planner").join("config.toml");

        let mut config = Config::default();
        config.routing.max_alternatives = 2;
        config.location.default_label = "Ibadan".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.routing.max_alternatives, 2);
        assert_eq!(loaded.location.default_label, "Ibadan");
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.routing.profile, "driving-car");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[routing]\nmax_alternatives = 1\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.routing.max_alternatives, 1);
        assert_eq!(config.routing.share_factor, 0.6);
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[geocoding]"));
        assert!(toml.contains("[routing]"));
        assert!(toml.contains("[location]"));
        assert!(toml.contains("[api_keys]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7979");
    }

    #[test]
    fn test_available_keys_are_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }
}
