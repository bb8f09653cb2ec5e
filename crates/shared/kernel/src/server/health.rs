use super::state::ApiState;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use cagpile_derive::{api_handler, api_model};
use cagpile_domain::config::{AppInfo, MapConfig};
use cagpile_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;

#[api_model]
/// Health check response
pub(super) struct HealthResponse {
    /// Always `up` while the process serves requests
    status: &'static str,
    /// Crate version
    version: &'static str,
    /// Uptime in seconds
    uptime: u64,
}

#[api_model]
/// Map defaults and application identity for the web client
pub(super) struct MapConfigResponse {
    /// `[latitude, longitude]`
    default_center: [f64; 2],
    default_zoom: u8,
    max_zoom: u8,
    min_zoom: u8,
    tile_layer: String,
    attribution: String,
    app_name: String,
    app_version: String,
    app_description: String,
}

impl MapConfigResponse {
    fn new(map: &MapConfig, app: &AppInfo) -> Self {
        Self {
            default_center: map.default_center,
            default_zoom: map.default_zoom,
            max_zoom: map.max_zoom,
            min_zoom: map.min_zoom,
            tile_layer: map.tile_layer.clone(),
            attribution: map.attribution.clone(),
            app_name: app.name.clone(),
            app_version: app.version.clone(),
            app_description: app.description.clone(),
        }
    }
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

#[api_handler(
    get,
    path = "/api/map-config",
    responses((status = OK, description = "Map defaults for the web client", body = MapConfigResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn map_config_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(MapConfigResponse::new(&state.config.map, &state.config.app))
}
