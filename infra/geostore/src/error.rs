use crate::layer::Layer;
use std::borrow::Cow;

/// Errors raised by [`GeoStore`](crate::GeoStore) operations.
#[cagpile_derive::cagpile_error]
pub enum GeoStoreError {
    /// The requested layer name is not one of the four known layers.
    #[error("Layer {name} not found")]
    LayerNotFound { name: Cow<'static, str> },

    /// No feature of the layer carries the requested `properties.id`.
    #[error("Feature {id} not found in {layer}")]
    FeatureNotFound { id: String, layer: Layer },

    #[error("Layer file I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed GeoJSON{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl GeoStoreError {
    /// `true` for the missing layer / missing feature cases, which callers report
    /// as a plain failed operation rather than a fault.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::LayerNotFound { .. } | Self::FeatureNotFound { .. })
    }
}
