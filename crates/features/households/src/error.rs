use std::borrow::Cow;

#[cagpile_derive::cagpile_error]
pub enum HouseholdsError {
    /// A submitted form field is missing or malformed; the message is shown to the user.
    #[error("{message}")]
    Validation { message: Cow<'static, str> },

    #[cfg(feature = "server")]
    #[error("{source}")]
    Store { source: cagpile_geostore::GeoStoreError, context: Option<Cow<'static, str>> },

    #[error("Internal households error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
impl HouseholdsError {
    pub(crate) const NUMERIC: &'static str =
        "Please check that numeric fields contain valid numbers";
    pub(crate) const ID_REQUIRED: &'static str = "Household ID is required";
    pub(crate) const HEAD_REQUIRED: &'static str = "Head of Household is required";

    pub(crate) const fn validation(message: &'static str) -> Self {
        Self::Validation { message: Cow::Borrowed(message) }
    }
}

#[cfg(feature = "server")]
impl From<HouseholdsError> for cagpile_kernel::server::ApiFailure {
    fn from(err: HouseholdsError) -> Self {
        match err {
            HouseholdsError::Validation { message } => Self::bad_request(message),
            HouseholdsError::Store { source, .. } => source.into(),
            HouseholdsError::Internal { .. } => {
                Self::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            },
        }
    }
}
