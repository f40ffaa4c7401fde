//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Attendance engine configuration.
    #[serde(default)]
    pub attendance: AttendanceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for verifying (and, in tooling, signing) tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    86400 // 1 day
}

/// Attendance engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    /// IANA time zone of the institution, used for "today" and class times.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Minimum similarity score accepted by face verification.
    #[serde(default = "default_face_match_threshold")]
    pub face_match_threshold: f64,
    /// QR token lifetime when the request does not specify one.
    #[serde(default = "default_qr_expiry")]
    pub qr_default_expiry_secs: u32,
    /// Upper bound on a requested QR token lifetime.
    #[serde(default = "default_qr_max_expiry")]
    pub qr_max_expiry_secs: u32,
    /// CIDR blocks or single addresses allowed to submit face scans.
    /// Empty means unrestricted.
    #[serde(default)]
    pub allowed_networks: Vec<String>,
    /// Take the client address from `X-Forwarded-For` when present.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            face_match_threshold: default_face_match_threshold(),
            qr_default_expiry_secs: default_qr_expiry(),
            qr_max_expiry_secs: default_qr_max_expiry(),
            allowed_networks: Vec::new(),
            trust_forwarded_for: false,
        }
    }
}

impl AttendanceConfig {
    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not a known IANA zone.
    pub fn time_zone(&self) -> Result<chrono_tz::Tz, config::ConfigError> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            config::ConfigError::Message(format!("unknown time zone: {}", self.timezone))
        })
    }
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_face_match_threshold() -> f64 {
    0.6
}

fn default_qr_expiry() -> u32 {
    60
}

fn default_qr_max_expiry() -> u32 {
    3600
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("CLASSIQ")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("attendance.allowed_networks")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
