use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use cagpile_domain::config::ApiConfig;
use cagpile_kernel::geostore::{GeoStore, Layer};
use cagpile_kernel::server::ApiState;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct Harness {
    temp: TempDir,
    state: ApiState,
}

impl Harness {
    async fn new(debug: bool) -> Self {
        let temp = TempDir::new().unwrap();
        let store = GeoStore::builder().root(temp.path()).connect().await.unwrap();

        let mut config = ApiConfig::default();
        config.server.debug = debug;
        let slice = cagpile_layers::init(&config).unwrap();

        let state =
            ApiState::builder().config(config).store(store).register_slice(slice).build().unwrap();
        Self { temp, state }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (router, _) = cagpile_layers::router().split_for_parts();
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = router.with_state(self.state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn layer_file(&self, layer: Layer) -> Value {
        let raw = std::fs::read(self.temp.path().join(layer.file_name())).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }
}

#[tokio::test]
async fn missing_layer_is_served_as_empty_collection() {
    let harness = Harness::new(true).await;

    let (status, body) = harness.call(Method::GET, "/api/roads", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "type": "FeatureCollection", "features": [] }));
}

#[tokio::test]
async fn add_then_edit_then_fetch_a_feature() {
    let harness = Harness::new(true).await;

    let (status, body) = harness
        .call(
            Method::POST,
            "/api/add-feature",
            Some(json!({
                "layer": "facilities",
                "properties": { "Facility": "Chapel" },
                "geometry": { "type": "Point", "coordinates": [125.31, 12.23] }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Data saved successfully", "feature_id": 1 }));

    let (status, body) = harness
        .call(
            Method::POST,
            "/api/update-feature",
            Some(json!({ "layer": "facilities", "feature_id": "1", "properties": { "Facility": "School" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = harness.call(Method::GET, "/api/get-feature/facilities/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feature"]["properties"], json!({ "Facility": "School", "id": 1 }));
    assert_eq!(body["feature"]["geometry"]["coordinates"], json!([125.31, 12.23]));
}

#[tokio::test]
async fn deleting_an_unknown_feature_is_a_bad_request() {
    let harness = Harness::new(true).await;
    harness
        .call(Method::POST, "/api/add-feature", Some(json!({ "layer": "households" })))
        .await;
    let before = harness.layer_file(Layer::Households);

    let (status, body) = harness
        .call(
            Method::POST,
            "/api/delete-feature",
            Some(json!({ "layer": "households", "feature_id": 999 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Feature 999 not found in households" }));
    assert_eq!(harness.layer_file(Layer::Households), before);
}

#[tokio::test]
async fn unknown_layer_and_missing_fields_are_rejected() {
    let harness = Harness::new(true).await;

    let (status, body) = harness
        .call(Method::POST, "/api/delete-feature", Some(json!({ "layer": "parks", "feature_id": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Layer parks not found");

    let (status, body) =
        harness.call(Method::POST, "/api/update-feature", Some(json!({ "layer": "roads" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Feature id is required");
}

#[tokio::test]
async fn get_feature_misses_are_not_found() {
    let harness = Harness::new(true).await;

    let (status, body) = harness.call(Method::GET, "/api/get-feature/roads/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = harness.call(Method::GET, "/api/get-feature/parks/5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_uses_the_failure_envelope() {
    let harness = Harness::new(true).await;
    let (router, _) = cagpile_layers::router().split_for_parts();

    let response = router
        .with_state(harness.state.clone())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/add-feature")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ nope"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn debug_data_lists_counts_and_files() {
    let harness = Harness::new(true).await;
    harness
        .call(Method::POST, "/api/add-feature", Some(json!({ "layer": "roads" })))
        .await;

    let (status, body) = harness.call(Method::GET, "/api/debug-data", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roads_count"], 1);
    assert_eq!(body["households_count"], 0);
    assert_eq!(body["files_in_directory"], json!(["Cagpile_Road.geojson"]));
}

#[tokio::test]
async fn debug_data_is_hidden_outside_debug_mode() {
    let harness = Harness::new(false).await;

    let (status, body) = harness.call(Method::GET, "/api/debug-data", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
