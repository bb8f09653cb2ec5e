//! The `{success, message}` envelope every mutation endpoint answers with.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cagpile_derive::api_model;
use cagpile_geostore::{GeoStoreError, Outcome};
use std::borrow::Cow;
use tracing::error;

/// Uniform reply body: `success` plus a human-readable `message`.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct OutcomeResponse {
    pub success: bool,
    pub message: String,
}

impl From<Outcome> for OutcomeResponse {
    fn from(outcome: Outcome) -> Self {
        Self { success: outcome.success, message: outcome.message }
    }
}

impl OutcomeResponse {
    #[must_use]
    pub fn saved() -> Self {
        Outcome::saved().into()
    }
}

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A failed request, rendered as `{success: false, message}` with its status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: Cow<'static, str>,
}

impl ApiFailure {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self { status, message: message.into() }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Keeps the message, replaces the status.
    #[must_use]
    pub const fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl From<GeoStoreError> for ApiFailure {
    fn from(err: GeoStoreError) -> Self {
        if err.is_not_found() {
            return Self::bad_request(err.to_string());
        }
        error!(error = %err, "Layer store failure");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = OutcomeResponse { success: false, message: self.message.into_owned() };
        (self.status, Json(body)).into_response()
    }
}

/// Handler result: a JSON body on success, an [`ApiFailure`] otherwise.
pub type ApiReply<T> = Result<T, ApiFailure>;

#[cfg(test)]
mod tests {
    use super::*;
    use cagpile_geostore::Layer;

    #[test]
    fn not_found_maps_to_bad_request() {
        let failure = ApiFailure::from(GeoStoreError::FeatureNotFound {
            id: "999".into(),
            layer: Layer::Households,
        });
        assert_eq!(failure.status, StatusCode::BAD_REQUEST);
        assert_eq!(failure.message, "Feature 999 not found in households");
    }

    #[test]
    fn store_faults_map_to_internal_error() {
        let failure = ApiFailure::from(GeoStoreError::from("disk on fire"));
        assert_eq!(failure.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
