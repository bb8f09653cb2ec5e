//! Households feature slice: the household records table, the add/edit/delete forms and
//! the dashboard statistics.

mod error;
#[cfg(feature = "server")]
mod form;
#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod table;

pub use crate::error::{HouseholdsError, HouseholdsErrorExt};
use cagpile_domain::config::ApiConfig;
use cagpile_kernel::domain::registry::InitializedSlice;

/// Households feature state
#[cagpile_derive::cagpile_slice]
pub struct Households {
    /// `(latitude, longitude)` used when a form omits coordinates.
    pub default_location: (f64, f64),
}

/// Initializes the households slice from the map configuration.
///
/// # Errors
///
/// Returns [`HouseholdsError::Validation`] if the configured map center is not a
/// finite coordinate.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, HouseholdsError> {
    let [latitude, longitude] = config.map.default_center;
    if !(latitude.is_finite() && longitude.is_finite()) {
        return Err(HouseholdsError::Validation {
            message: "map.default_center must be finite".into(),
        });
    }

    tracing::info!(latitude, longitude, "Households slice initialized");
    Ok(InitializedSlice::new(Households::new(HouseholdsInner {
        default_location: (latitude, longitude),
    })))
}

#[cfg(feature = "server")]
pub use handlers::router;
