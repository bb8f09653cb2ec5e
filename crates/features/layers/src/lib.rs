//! Layers feature slice: serves the four GeoJSON layers to the map and lets the map
//! editor update, delete, add and fetch individual features.

mod error;
#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod models;

pub use crate::error::{LayersError, LayersErrorExt};
use cagpile_domain::config::ApiConfig;
use cagpile_kernel::domain::registry::InitializedSlice;

/// Layers feature state
#[cagpile_derive::cagpile_slice]
pub struct Layers {
    /// Serve `/api/debug-data`.
    pub debug: bool,
}

/// Initializes the layers slice from the server configuration.
///
/// # Errors
///
/// None at present.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, LayersError> {
    let inner = LayersInner { debug: config.server.debug };
    tracing::info!(debug = inner.debug, "Layers slice initialized");

    Ok(InitializedSlice::new(Layers::new(inner)))
}

#[cfg(feature = "server")]
pub use handlers::router;
