use cagpile_geostore::*;
use serde_json::{Value, json};
use tempfile::TempDir;

async fn store(temp: &TempDir) -> GeoStore {
    GeoStore::builder().root(temp.path()).connect().await.unwrap()
}

fn props(value: Value) -> Properties {
    value.as_object().cloned().unwrap()
}

fn write_layer(temp: &TempDir, layer: Layer, doc: &Value) {
    std::fs::write(temp.path().join(layer.file_name()), serde_json::to_vec(doc).unwrap()).unwrap();
}

fn read_layer(temp: &TempDir, layer: Layer) -> Value {
    serde_json::from_slice(&std::fs::read(temp.path().join(layer.file_name())).unwrap()).unwrap()
}

fn households_doc() -> Value {
    json!({
        "type": "FeatureCollection",
        "name": "Cagpile_Households",
        "features": [
            {
                "type": "Feature",
                "properties": { "id": 1, "Owner": "A", "Residents": 3 },
                "geometry": { "type": "Point", "coordinates": [125.3185, 12.2392] }
            },
            {
                "type": "Feature",
                "properties": { "id": "3", "Owner": "C" },
                "geometry": null
            }
        ]
    })
}

#[tokio::test]
async fn test_missing_file_loads_empty() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;

    let roads = store.load(Layer::Roads).await;
    assert!(roads.is_empty());
    assert_eq!(serde_json::to_value(&roads).unwrap(), json!({ "type": "FeatureCollection", "features": [] }));
}

#[tokio::test]
async fn test_malformed_file_loads_empty_but_is_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;
    let path = temp.path().join(Layer::Roads.file_name());
    std::fs::write(&path, b"{ not json").unwrap();

    assert!(store.load(Layer::Roads).await.is_empty());

    let err = store.insert(Layer::Roads, Properties::new(), None).await.unwrap_err();
    assert!(matches!(err, GeoStoreError::Json { .. }));
    assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;
    let collection: FeatureCollection = serde_json::from_value(households_doc()).unwrap();

    store.save(Layer::Households, &collection).await.unwrap();

    assert_eq!(store.load(Layer::Households).await, collection);
    assert_eq!(read_layer(&temp, Layer::Households)["name"], "Cagpile_Households");
}

#[tokio::test]
async fn test_update_merges_properties_and_keeps_geometry() {
    let temp = TempDir::new().unwrap();
    write_layer(&temp, Layer::Households, &households_doc());
    let store = store(&temp).await;

    store
        .update(Layer::Households, &FeatureId::from("1"), props(json!({ "Owner": "B" })), None)
        .await
        .unwrap();

    let doc = read_layer(&temp, Layer::Households);
    let feature = &doc["features"][0];
    assert_eq!(feature["properties"], json!({ "id": 1, "Owner": "B", "Residents": 3 }));
    assert_eq!(feature["geometry"]["coordinates"], json!([125.3185, 12.2392]));
}

#[tokio::test]
async fn test_update_replaces_geometry_when_given() {
    let temp = TempDir::new().unwrap();
    write_layer(&temp, Layer::Households, &households_doc());
    let store = store(&temp).await;
    let point = json!({ "type": "Point", "coordinates": [125.0, 12.0] });

    store
        .update(Layer::Households, &FeatureId::from("3"), Properties::new(), Some(point.clone()))
        .await
        .unwrap();
    store
        .update(Layer::Households, &FeatureId::from("3"), Properties::new(), Some(Value::Null))
        .await
        .unwrap();

    assert_eq!(read_layer(&temp, Layer::Households)["features"][1]["geometry"], point);
}

#[tokio::test]
async fn test_delete_unknown_feature_leaves_file_untouched() {
    let temp = TempDir::new().unwrap();
    write_layer(&temp, Layer::Households, &households_doc());
    let store = store(&temp).await;
    let before = std::fs::read(temp.path().join(Layer::Households.file_name())).unwrap();

    let result = store.delete(Layer::Households, &FeatureId::from("999")).await;
    let err = result.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Feature 999 not found in households");
    assert_eq!(std::fs::read(temp.path().join(Layer::Households.file_name())).unwrap(), before);
}

#[tokio::test]
async fn test_delete_removes_every_match() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;
    let doc = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "id": 1, "n": 1 }, "geometry": null },
            { "type": "Feature", "properties": { "id": "1", "n": 2 }, "geometry": null },
            { "type": "Feature", "properties": { "id": 2, "n": 3 }, "geometry": null }
        ]
    });
    write_layer(&temp, Layer::Facilities, &doc);

    store.delete(Layer::Facilities, &FeatureId::from("1")).await.unwrap();

    let left = store.load(Layer::Facilities).await;
    assert_eq!(left.len(), 1);
    assert_eq!(left.features[0].properties["n"], 3);
    assert!(store.find(Layer::Facilities, &FeatureId::from("1")).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_insert_assigns_next_numeric_id() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;

    let first = store.insert(Layer::Roads, Properties::new(), None).await.unwrap();
    assert_eq!(first, json!(1));

    write_layer(&temp, Layer::Households, &households_doc());
    let next = store
        .insert(Layer::Households, props(json!({ "id": null, "Owner": "D" })), None)
        .await
        .unwrap();
    assert_eq!(next, json!(4));

    let kept = store
        .insert(Layer::Households, props(json!({ "id": "CPL-9" })), None)
        .await
        .unwrap();
    assert_eq!(kept, json!("CPL-9"));
    assert_eq!(store.load(Layer::Households).await.len(), 4);
}

#[tokio::test]
async fn test_find_reports_missing_feature() {
    let temp = TempDir::new().unwrap();
    write_layer(&temp, Layer::Households, &households_doc());
    let store = store(&temp).await;

    let found = store.find(Layer::Households, &FeatureId::from("3")).await.unwrap();
    assert_eq!(found.properties["Owner"], "C");

    let err = store.find(Layer::Households, &FeatureId::from("7")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_sequential_updates_both_persist() {
    let temp = TempDir::new().unwrap();
    write_layer(&temp, Layer::Households, &households_doc());
    let store = store(&temp).await;
    let id = FeatureId::from("1");

    let (a, b) = tokio::join!(
        store.update(Layer::Households, &id, props(json!({ "Owner": "X" })), None),
        store.update(Layer::Households, &id, props(json!({ "Contact no": "0917" })), None),
    );
    a.unwrap();
    b.unwrap();

    let properties = &read_layer(&temp, Layer::Households)["features"][0]["properties"];
    assert_eq!(properties["Owner"], "X");
    assert_eq!(properties["Contact no"], "0917");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_are_all_kept() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;

    let tasks: Vec<_> = (0..20)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                store.insert(Layer::Households, props(json!({ "Owner": n })), None).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let households = store.load(Layer::Households).await;
    assert_eq!(households.len(), 20);
    let mut ids: Vec<u64> = households
        .features
        .iter()
        .filter_map(|feature| feature.properties.get("id").and_then(numeric_id))
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_all_kept() {
    let temp = TempDir::new().unwrap();
    write_layer(&temp, Layer::Households, &households_doc());
    let store = store(&temp).await;

    let tasks: Vec<_> = (0..16)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut patch = Properties::new();
                patch.insert(format!("field_{n}"), json!(n));
                store.update(Layer::Households, &FeatureId::from("3"), patch, None).await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let properties = &read_layer(&temp, Layer::Households)["features"][1]["properties"];
    for n in 0..16 {
        assert_eq!(properties[format!("field_{n}")], n);
    }
    assert_eq!(properties["Owner"], "C");
}

#[tokio::test]
async fn test_fresh_temp_files_from_a_crashed_save_do_not_block_writes() {
    let temp = TempDir::new().unwrap();
    for name in ["Cagpile_Households.geojson.cagtmp.1", "Cagpile_Households.geojson.cagtmp.2"] {
        std::fs::write(temp.path().join(name), b"{\"type\":").unwrap();
    }
    let store = store(&temp).await;

    let id = store.insert(Layer::Households, props(json!({ "Owner": "A" })), None).await.unwrap();

    assert_eq!(id, json!(1));
    assert_eq!(store.load(Layer::Households).await.len(), 1);
}

#[tokio::test]
async fn test_failed_swap_removes_its_temp_file() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join(Layer::Roads.file_name());
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"").unwrap();
    let store = store(&temp).await;

    let result = store.save(Layer::Roads, &FeatureCollection::new()).await;

    assert!(matches!(result, Err(GeoStoreError::Io { .. })));
    let leftovers: Vec<_> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".cagtmp."))
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
    assert!(blocker.join("keep").exists());
}

#[tokio::test]
async fn test_unicode_is_written_verbatim() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;

    store.insert(Layer::Households, props(json!({ "Owner": "Niño Peñaflor" })), None).await.unwrap();

    let raw = std::fs::read_to_string(temp.path().join(Layer::Households.file_name())).unwrap();
    assert!(raw.contains("Niño Peñaflor"));
    assert!(raw.contains("\n  \"features\""));
}

#[tokio::test]
async fn test_no_temp_files_left_behind() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;

    for _ in 0..3 {
        store.insert(Layer::Boundary, Properties::new(), None).await.unwrap();
    }

    assert_eq!(store.list_files().await.unwrap(), vec![Layer::Boundary.file_name().to_owned()]);
}

#[tokio::test]
async fn test_statistics_totals() {
    let temp = TempDir::new().unwrap();
    let store = store(&temp).await;
    write_layer(
        &temp,
        Layer::Households,
        &json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "Residents": 5, "senior/PWD": "YES", "purok": "1" }, "geometry": null },
                { "type": "Feature", "properties": { "Residents": "bad", "senior/PWD": "NO", "Purok": "2" }, "geometry": null }
            ]
        }),
    );
    write_layer(
        &temp,
        Layer::Facilities,
        &json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "Facility": "School" }, "geometry": null },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }),
    );

    let stats = store.statistics().await;
    assert_eq!(stats.total_households, 2);
    assert_eq!(stats.total_residents, 5);
    assert_eq!(stats.vulnerable_households, 1);
    assert_eq!(stats.households_with_seniors, 1);
    assert_eq!(stats.households_with_pwd, 1);
    assert_eq!(stats.purok_distribution.get("1"), Some(&1));
    assert_eq!(stats.purok_distribution.get("2"), Some(&1));
    assert_eq!(stats.total_facilities, 2);
    assert_eq!(stats.facility_types.get("Unknown"), Some(&1));
    assert_eq!(stats.facility_types.get("School"), Some(&1));
}

#[tokio::test]
async fn test_connect_without_create_requires_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent");

    let err = GeoStore::builder().root(&missing).create(false).connect().await.unwrap_err();
    assert!(matches!(err, GeoStoreError::Io { .. }));
}
