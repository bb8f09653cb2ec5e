use crate::error::LayersError;
use cagpile_derive::api_model;
use cagpile_geostore::{Feature, FeatureId, Layer, Properties};
use serde_json::Value;

/// Body of `POST /api/update-feature`
#[api_model]
pub(crate) struct UpdateFeatureRequest {
    /// `households`, `facilities`, `roads` or `boundary`
    pub(crate) layer: Option<String>,
    /// Value of `properties.id`, as a string or a number
    #[schema(value_type = Option<String>)]
    pub(crate) feature_id: Option<FeatureId>,
    /// Keys merged into the feature properties
    #[serde(default)]
    #[schema(value_type = Object)]
    pub(crate) properties: Properties,
    /// Replacement GeoJSON geometry; `null` keeps the current one
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub(crate) geometry: Option<Value>,
}

/// Body of `POST /api/delete-feature`
#[api_model]
pub(crate) struct DeleteFeatureRequest {
    pub(crate) layer: Option<String>,
    #[schema(value_type = Option<String>)]
    pub(crate) feature_id: Option<FeatureId>,
}

/// Body of `POST /api/add-feature`
#[api_model]
pub(crate) struct AddFeatureRequest {
    pub(crate) layer: Option<String>,
    /// Feature properties; an `id` is assigned when absent
    #[serde(default)]
    #[schema(value_type = Object)]
    pub(crate) properties: Properties,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub(crate) geometry: Option<Value>,
}

#[api_model]
pub(crate) struct AddFeatureResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
    /// The stored `properties.id`
    #[schema(value_type = Object)]
    pub(crate) feature_id: Value,
}

#[api_model]
pub(crate) struct GetFeatureResponse {
    pub(crate) success: bool,
    #[schema(value_type = Object)]
    pub(crate) feature: Feature,
}

/// Feature counts and the contents of the data directory
#[api_model]
pub(crate) struct DebugDataResponse {
    pub(crate) households_count: usize,
    pub(crate) facilities_count: usize,
    pub(crate) roads_count: usize,
    pub(crate) boundary_count: usize,
    pub(crate) data_directory: String,
    pub(crate) files_in_directory: Vec<String>,
}

pub(crate) fn parse_layer(name: Option<&str>) -> Result<Layer, LayersError> {
    let name = name.ok_or(LayersError::MissingField { message: "Layer is required".into() })?;
    Ok(name.parse()?)
}

pub(crate) fn require_id(id: Option<FeatureId>) -> Result<FeatureId, LayersError> {
    id.ok_or(LayersError::MissingField { message: "Feature id is required".into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feature_id_accepts_numbers_and_strings() {
        let numeric: DeleteFeatureRequest =
            serde_json::from_value(json!({ "layer": "roads", "feature_id": 12 })).unwrap();
        let text: DeleteFeatureRequest =
            serde_json::from_value(json!({ "layer": "roads", "feature_id": "12" })).unwrap();
        assert_eq!(numeric.feature_id, text.feature_id);
    }

    #[test]
    fn missing_properties_default_to_empty() {
        let request: UpdateFeatureRequest =
            serde_json::from_value(json!({ "layer": "roads", "feature_id": 1 })).unwrap();
        assert!(request.properties.is_empty());
        assert!(request.geometry.is_none());
    }

    #[test]
    fn layer_parsing_reports_missing_and_unknown() {
        assert!(matches!(parse_layer(None), Err(LayersError::MissingField { .. })));
        assert_eq!(parse_layer(Some("parks")).unwrap_err().to_string(), "Layer parks not found");
        assert_eq!(parse_layer(Some("Facilities")).unwrap(), Layer::Facilities);
    }
}
