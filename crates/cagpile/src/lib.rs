//! Facade crate for the Cagpile mapping features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `cagpile` with the `server` feature flag.
//! - Call `cagpile::init` to build the feature slices and
//!   `cagpile::server::router::api_router` for their routes.

pub use cagpile_domain as domain;
use cagpile_domain::config::ApiConfig;
pub use cagpile_geostore as geostore;
pub use cagpile_kernel as kernel;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        use cagpile_kernel::server::ApiState;
        pub use cagpile_kernel::server::router::system_router;
        use utoipa_axum::router::OpenApiRouter;

        /// Every route of the platform: system endpoints plus each feature slice.
        #[must_use]
        pub fn api_router() -> OpenApiRouter<ApiState> {
            system_router()
                .merge(crate::features::layers::router())
                .merge(crate::features::households::router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use cagpile_households as households;
    pub use cagpile_layers as layers;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "server")]
        "server",
        "layers",
        "households",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(
    config: &ApiConfig,
) -> Result<Vec<domain::registry::InitializedSlice>, Box<dyn std::error::Error>> {
    let slices = vec![features::layers::init(config)?, features::households::init(config)?];

    tracing::debug!(count = slices.len(), "Feature slices initialized");
    Ok(slices)
}
