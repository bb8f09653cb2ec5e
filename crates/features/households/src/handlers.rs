use crate::Households;
use crate::error::HouseholdsError;
use crate::form::HouseholdForm;
use crate::table::{HouseholdRow, StatisticsResponse, household_rows};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use cagpile_derive::{api_handler, api_model};
use cagpile_domain::constants::HOUSEHOLDS_TAG;
use cagpile_geostore::{FeatureId, GeoStore, Layer, SAVED_MESSAGE};
use cagpile_kernel::server::{ApiFailure, ApiJson, ApiReply, ApiState, OutcomeResponse};
use tracing::debug;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[api_model]
pub(crate) struct CreateHouseholdResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    pub(crate) household_id: i64,
}

/// Household records and statistics routes.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_households_handler, create_household_handler))
        .routes(routes!(update_household_handler, delete_household_handler))
        .routes(routes!(statistics_handler))
}

fn default_location(state: &ApiState) -> Result<(f64, f64), ApiFailure> {
    state
        .try_get_slice::<Households>()
        .map(|slice| slice.default_location)
        .map_err(|err| ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}

fn rejected(err: HouseholdsError) -> ApiFailure {
    debug!(error = %err, "Household form rejected");
    err.into()
}

#[api_handler(
    get,
    path = "/api/household-records",
    responses((status = OK, description = "Household table rows", body = [HouseholdRow])),
    tag = HOUSEHOLDS_TAG,
)]
pub(crate) async fn list_households_handler(State(store): State<GeoStore>) -> Json<Vec<HouseholdRow>> {
    Json(household_rows(&store.load(Layer::Households).await))
}

#[api_handler(
    post,
    path = "/api/household-records",
    request_body = HouseholdForm,
    responses(
        (status = OK, description = "Household added", body = CreateHouseholdResponse),
        (status = BAD_REQUEST, description = "Form validation failed", body = OutcomeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Layer file unreadable or unwritable", body = OutcomeResponse),
    ),
    tag = HOUSEHOLDS_TAG,
)]
pub(crate) async fn create_household_handler(
    State(state): State<ApiState>,
    ApiJson(form): ApiJson<HouseholdForm>,
) -> ApiReply<Json<CreateHouseholdResponse>> {
    let (household_id, record) = form.into_new_record(default_location(&state)?).map_err(rejected)?;

    state.store.insert(Layer::Households, record.properties, Some(record.geometry)).await?;
    Ok(Json(CreateHouseholdResponse {
        success: true,
        message: SAVED_MESSAGE.to_owned(),
        household_id,
    }))
}

#[api_handler(
    put,
    path = "/api/household-records/{household_id}",
    params(("household_id" = String, Path, description = "Value of `properties.id`")),
    request_body = HouseholdForm,
    responses(
        (status = OK, description = "Household updated", body = OutcomeResponse),
        (status = BAD_REQUEST, description = "Validation failed or household not found", body = OutcomeResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Layer file unreadable or unwritable", body = OutcomeResponse),
    ),
    tag = HOUSEHOLDS_TAG,
)]
pub(crate) async fn update_household_handler(
    State(state): State<ApiState>,
    Path(household_id): Path<String>,
    ApiJson(form): ApiJson<HouseholdForm>,
) -> ApiReply<OutcomeResponse> {
    let record = form.into_update(default_location(&state)?).map_err(rejected)?;

    state
        .store
        .update(
            Layer::Households,
            &FeatureId::from(household_id),
            record.properties,
            Some(record.geometry),
        )
        .await?;
    Ok(OutcomeResponse::saved())
}

#[api_handler(
    delete,
    path = "/api/household-records/{household_id}",
    params(("household_id" = String, Path, description = "Value of `properties.id`")),
    responses(
        (status = OK, description = "Household deleted", body = OutcomeResponse),
        (status = BAD_REQUEST, description = "Household not found", body = OutcomeResponse),
    ),
    tag = HOUSEHOLDS_TAG,
)]
pub(crate) async fn delete_household_handler(
    State(store): State<GeoStore>,
    Path(household_id): Path<String>,
) -> ApiReply<OutcomeResponse> {
    store.delete(Layer::Households, &FeatureId::from(household_id)).await?;
    Ok(OutcomeResponse::saved())
}

#[api_handler(
    get,
    path = "/api/statistics",
    responses((status = OK, description = "Dashboard statistics", body = StatisticsResponse)),
    tag = HOUSEHOLDS_TAG,
)]
pub(crate) async fn statistics_handler(State(store): State<GeoStore>) -> Json<StatisticsResponse> {
    Json(store.statistics().await.into())
}
