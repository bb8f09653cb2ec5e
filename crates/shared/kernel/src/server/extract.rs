use super::reply::ApiFailure;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

/// `axum::Json` whose rejections use the `{success: false, message}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiFailure))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}
