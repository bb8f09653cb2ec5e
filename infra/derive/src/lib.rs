#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the workspace crates.
//!
//! * [`macro@cagpile_error`] turns an enum into a context-aware `thiserror` error.
//! * [`macro@api_model`] and [`macro@api_handler`] keep HTTP DTOs and handlers consistent
//!   with the `OpenAPI` document.
//! * [`macro@cagpile_slice`] wraps feature state into a registrable slice handle.
//!
//! Examples are `ignore`d here because a proc-macro crate cannot use its own macros;
//! the workspace crates exercise every macro.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a domain error enum.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant wrapping a source error.
/// * `From<Source>` for variants with a `source` field (or one marked `#[source]`/`#[from]`).
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * A private `format_context` helper for the `#[error(...)]` strings.
///
/// # Requirements
///
/// Every variant uses named fields. Variants wrapping a source error must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[cagpile_derive::cagpile_error]
/// pub enum GeoStoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<Vec<u8>, GeoStoreError> {
///     std::fs::read(path).context("Reading layer file")
/// }
/// ```
#[proc_macro_attribute]
pub fn cagpile_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Defines an API data model (request or response body).
///
/// Adds `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` derives when missing and
/// applies `#[serde(rename_all = "snake_case")]`, the wire convention of the records API.
///
/// # Arguments
///
/// * `rename_all = "..."` - overrides the rename policy.
/// * `deny_unknown_fields = true` - rejects unknown keys (off by default: the map editor
///   posts extra fields).
///
/// # Example
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = true)]
/// pub struct DeleteFeatureRequest {
///     pub layer: String,
///     pub feature_id: FeatureId,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an Axum handler in the `OpenAPI` document.
///
/// Accepts the usual `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `responses(...)`, `tag = ...`).
///
/// # Example
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = SYSTEM_TAG
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns a struct into a feature slice handle.
///
/// The annotated fields move into a generated `<Name>Inner` struct; `<Name>` becomes an
/// `Arc` wrapper with `new`, `Deref` and a `FeatureSlice` impl so it can be registered in
/// the kernel state.
///
/// # Example
///
/// ```rust,ignore
/// #[cagpile_derive::cagpile_slice]
/// pub struct Households {
///     pub default_location: (f64, f64),
/// }
///
/// let slice = Households::new(HouseholdsInner { default_location: (12.2392, 125.3185) });
/// ```
#[proc_macro_attribute]
pub fn cagpile_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand(input).into()
}
