use crate::Layers;
use crate::models::{
    AddFeatureRequest, AddFeatureResponse, DebugDataResponse, DeleteFeatureRequest,
    GetFeatureResponse, UpdateFeatureRequest, parse_layer, require_id,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use cagpile_derive::api_handler;
use cagpile_domain::constants::LAYERS_TAG;
use cagpile_geostore::{FeatureCollection, FeatureId, GeoStore, Layer, SAVED_MESSAGE};
use cagpile_kernel::server::{ApiFailure, ApiJson, ApiReply, ApiState, OutcomeResponse};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Layer data, feature editing and diagnostics routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(households_handler))
        .routes(routes!(facilities_handler))
        .routes(routes!(roads_handler))
        .routes(routes!(boundary_handler))
        .routes(routes!(update_feature_handler))
        .routes(routes!(delete_feature_handler))
        .routes(routes!(add_feature_handler))
        .routes(routes!(get_feature_handler))
        .routes(routes!(debug_data_handler))
}

#[api_handler(
    get,
    path = "/api/households",
    responses((status = OK, description = "Households layer", body = serde_json::Value)),
    tag = LAYERS_TAG,
)]
pub(crate) async fn households_handler(State(store): State<GeoStore>) -> Json<FeatureCollection> {
    Json(store.load(Layer::Households).await)
}

#[api_handler(
    get,
    path = "/api/facilities",
    responses((status = OK, description = "Facilities layer", body = serde_json::Value)),
    tag = LAYERS_TAG,
)]
pub(crate) async fn facilities_handler(State(store): State<GeoStore>) -> Json<FeatureCollection> {
    Json(store.load(Layer::Facilities).await)
}

#[api_handler(
    get,
    path = "/api/roads",
    responses((status = OK, description = "Roads layer", body = serde_json::Value)),
    tag = LAYERS_TAG,
)]
pub(crate) async fn roads_handler(State(store): State<GeoStore>) -> Json<FeatureCollection> {
    Json(store.load(Layer::Roads).await)
}

#[api_handler(
    get,
    path = "/api/boundary",
    responses((status = OK, description = "Barangay boundary layer", body = serde_json::Value)),
    tag = LAYERS_TAG,
)]
pub(crate) async fn boundary_handler(State(store): State<GeoStore>) -> Json<FeatureCollection> {
    Json(store.load(Layer::Boundary).await)
}

#[api_handler(
    post,
    path = "/api/update-feature",
    request_body = UpdateFeatureRequest,
    responses(
        (status = OK, description = "Feature updated", body = OutcomeResponse),
        (status = BAD_REQUEST, description = "Unknown layer or feature", body = OutcomeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Layer file unreadable or unwritable", body = OutcomeResponse),
    ),
    tag = LAYERS_TAG,
)]
pub(crate) async fn update_feature_handler(
    State(store): State<GeoStore>,
    ApiJson(request): ApiJson<UpdateFeatureRequest>,
) -> ApiReply<OutcomeResponse> {
    let layer = parse_layer(request.layer.as_deref())?;
    let id = require_id(request.feature_id)?;

    store.update(layer, &id, request.properties, request.geometry).await?;
    Ok(OutcomeResponse::saved())
}

#[api_handler(
    post,
    path = "/api/delete-feature",
    request_body = DeleteFeatureRequest,
    responses(
        (status = OK, description = "Feature deleted", body = OutcomeResponse),
        (status = BAD_REQUEST, description = "Unknown layer or feature", body = OutcomeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Layer file unreadable or unwritable", body = OutcomeResponse),
    ),
    tag = LAYERS_TAG,
)]
pub(crate) async fn delete_feature_handler(
    State(store): State<GeoStore>,
    ApiJson(request): ApiJson<DeleteFeatureRequest>,
) -> ApiReply<OutcomeResponse> {
    let layer = parse_layer(request.layer.as_deref())?;
    let id = require_id(request.feature_id)?;

    store.delete(layer, &id).await?;
    Ok(OutcomeResponse::saved())
}

#[api_handler(
    post,
    path = "/api/add-feature",
    request_body = AddFeatureRequest,
    responses(
        (status = OK, description = "Feature added", body = AddFeatureResponse),
        (status = BAD_REQUEST, description = "Unknown layer", body = OutcomeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Layer file unreadable or unwritable", body = OutcomeResponse),
    ),
    tag = LAYERS_TAG,
)]
pub(crate) async fn add_feature_handler(
    State(store): State<GeoStore>,
    ApiJson(request): ApiJson<AddFeatureRequest>,
) -> ApiReply<Json<AddFeatureResponse>> {
    let layer = parse_layer(request.layer.as_deref())?;

    let feature_id = store.insert(layer, request.properties, request.geometry).await?;
    Ok(Json(AddFeatureResponse {
        success: true,
        message: SAVED_MESSAGE.to_owned(),
        feature_id,
    }))
}

#[api_handler(
    get,
    path = "/api/get-feature/{layer}/{feature_id}",
    params(
        ("layer" = String, Path, description = "Layer name"),
        ("feature_id" = String, Path, description = "Value of `properties.id`"),
    ),
    responses(
        (status = OK, description = "The matching feature", body = GetFeatureResponse),
        (status = NOT_FOUND, description = "Unknown layer or feature", body = OutcomeResponse),
    ),
    tag = LAYERS_TAG,
)]
pub(crate) async fn get_feature_handler(
    State(store): State<GeoStore>,
    Path((layer, feature_id)): Path<(String, String)>,
) -> ApiReply<Json<GetFeatureResponse>> {
    let not_found = |err: cagpile_geostore::GeoStoreError| {
        ApiFailure::from(err).with_status(StatusCode::NOT_FOUND)
    };

    let layer = layer.parse::<Layer>().map_err(not_found)?;
    let feature = store.find(layer, &FeatureId::from(feature_id)).await.map_err(|err| {
        if err.is_not_found() { not_found(err) } else { ApiFailure::from(err) }
    })?;

    Ok(Json(GetFeatureResponse { success: true, feature }))
}

#[api_handler(
    get,
    path = "/api/debug-data",
    responses(
        (status = OK, description = "Loaded feature counts and data directory listing", body = DebugDataResponse),
        (status = NOT_FOUND, description = "Diagnostics are disabled", body = OutcomeResponse),
    ),
    tag = LAYERS_TAG,
)]
pub(crate) async fn debug_data_handler(
    State(state): State<ApiState>,
) -> ApiReply<Json<DebugDataResponse>> {
    let slice = state.try_get_slice::<Layers>().map_err(|err| {
        ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;
    if !slice.debug {
        return Err(ApiFailure::not_found("Diagnostics are disabled"));
    }

    let layers = state.store.load_all().await;
    let files_in_directory = state.store.list_files().await.unwrap_or_default();

    Ok(Json(DebugDataResponse {
        households_count: layers.get(Layer::Households).len(),
        facilities_count: layers.get(Layer::Facilities).len(),
        roads_count: layers.get(Layer::Roads).len(),
        boundary_count: layers.get(Layer::Boundary).len(),
        data_directory: state.store.root().display().to_string(),
        files_in_directory,
    }))
}
