use cagpile_domain::config::{ApiConfig, MapConfig, ServerConfig, StorageConfig};
use serde_json::json;
use std::path::PathBuf;

#[test]
fn config_defaults_match_the_deployment() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 5000);
    assert!(server.debug);
    assert!(server.ssl.is_none());

    let storage = StorageConfig::default();
    assert_eq!(storage.data_dir, PathBuf::from("static/data/geojson"));
    assert!(storage.create);

    let map = MapConfig::default();
    assert_eq!(map.default_center, [12.2392, 125.3185]);
    assert_eq!((map.min_zoom, map.default_zoom, map.max_zoom), (12, 16, 20));
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "127.0.0.1", "port": 8080, "debug": false },
        "storage": { "data_dir": "/srv/geojson" },
        "app": { "version": "2.1.0" }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert!(!cfg.server.debug);
    assert_eq!(cfg.storage.data_dir, PathBuf::from("/srv/geojson"));
    assert_eq!(cfg.storage.static_dir, PathBuf::from("static"));
    assert_eq!(cfg.app.version, "2.1.0");
    assert_eq!(cfg.app.name, "Barangay Cagpile Information Mapping System");
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn deref_mut_clones_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.server.port = 9000;

    assert_eq!(original.server.port, 5000);
    assert_eq!(changed.server.port, 9000);
}
