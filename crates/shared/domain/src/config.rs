use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across the server and the feature slices.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub map: MapConfig,
    pub app: AppInfo,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Exposes diagnostic endpoints such as `/api/debug-data`.
    pub debug: bool,
    pub ssl: Option<SslConfig>,
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Where the layer files and the static web assets live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Create `data_dir` on startup when it does not exist.
    pub create: bool,
}

/// Console/file logging knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    pub path: Option<PathBuf>,
    pub json: bool,
}

/// Interactive map defaults served to the web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[latitude, longitude]` of the barangay center.
    pub default_center: [f64; 2],
    pub default_zoom: u8,
    pub max_zoom: u8,
    pub min_zoom: u8,
    pub tile_layer: String,
    pub attribution: String,
}

/// Application identity shown by the web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 5000, debug: true, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("static/data/geojson"),
            static_dir: PathBuf::from("static"),
            create: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, path: None, json: false }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: [12.2392, 125.3185],
            default_zoom: 16,
            max_zoom: 20,
            min_zoom: 12,
            tile_layer: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
            attribution: "Barangay Cagpile Mapping System | OpenStreetMap contributors".to_owned(),
        }
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: "Barangay Cagpile Information Mapping System".to_owned(),
            version: "2.0.0".to_owned(),
            description: "A modern GIS-based mapping system for Barangay Cagpile, Oras, Eastern Samar"
                .to_owned(),
        }
    }
}
