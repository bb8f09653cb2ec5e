use std::borrow::Cow;

#[cagpile_derive::cagpile_error]
pub enum LayersError {
    /// A request body lacks a field the endpoint cannot do without.
    #[error("{message}")]
    MissingField { message: Cow<'static, str> },

    #[cfg(feature = "server")]
    #[error("{source}")]
    Store { source: cagpile_geostore::GeoStoreError, context: Option<Cow<'static, str>> },

    #[error("Internal layers error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl From<LayersError> for cagpile_kernel::server::ApiFailure {
    fn from(err: LayersError) -> Self {
        match err {
            LayersError::MissingField { message } => Self::bad_request(message),
            LayersError::Store { source, .. } => source.into(),
            LayersError::Internal { .. } => {
                Self::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            },
        }
    }
}
