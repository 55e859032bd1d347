//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Timeout for geocoding and routing requests, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// OpenRouteService routing profile
pub const DEFAULT_ROUTING_PROFILE: &str = "driving-car";

/// Alternative routes may share at most this fraction of the primary route
pub const DEFAULT_SHARE_FACTOR: f64 = 0.6;

/// Alternative routes may be at most this factor longer than the primary route
pub const DEFAULT_WEIGHT_FACTOR: f64 = 1.4;

/// Default position source ("ip" or "none")
pub const DEFAULT_LOCATION_SOURCE: &str = "ip";

/// Timeout for a single position fix, in seconds
pub const DEFAULT_FIX_TIMEOUT_SECS: u64 = 15;

/// Delay between fixes while observing continuously, in seconds
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 30;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Directory the presentation layer's assets are served from
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "route-planner";
