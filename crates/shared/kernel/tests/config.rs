use cagpile_kernel::config::{ConfigError, load_config};
use cagpile_kernel::domain::config::ApiConfig;
use serial_test::serial;
use std::io::Write;

fn write_toml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn file_values_override_defaults() {
    let file = write_toml(
        r#"
        [server]
        port = 8080
        debug = false

        [storage]
        data_dir = "/srv/cagpile/geojson"
        "#,
    );

    let config: ApiConfig = load_config(Some(file.path())).unwrap();

    assert_eq!(config.server.port, 8080);
    assert!(!config.server.debug);
    assert_eq!(config.storage.data_dir, std::path::Path::new("/srv/cagpile/geojson"));
    assert_eq!(config.map.default_zoom, 16);
}

#[test]
#[serial]
fn missing_default_file_falls_back_to_defaults() {
    let config: ApiConfig = load_config(None::<&str>).unwrap();

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.storage.data_dir, std::path::Path::new("static/data/geojson"));
}

#[test]
#[serial]
fn explicit_missing_file_is_an_error() {
    let err = load_config::<ApiConfig>(Some("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Config { .. }));
}
