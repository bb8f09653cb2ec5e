//! Shared constants for `OpenAPI` tags and configuration.

/// `OpenAPI` tag for platform endpoints (health, map configuration).
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the GIS layer data and editing endpoints.
pub const LAYERS_TAG: &str = "Layers";
/// `OpenAPI` tag for the household records endpoints.
pub const HOUSEHOLDS_TAG: &str = "Households";

/// Prefix of environment variables overriding the configuration file.
pub const ENV_PREFIX: &str = "CAGPILE";
/// Configuration file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "server";
