use super::*;
use tempfile::tempdir;

#[test]
fn ensure_settings_at_writes_defaults_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(SETTINGS_DIR).join(SETTINGS_FILE);

    ensure_settings_at(&path).unwrap();
    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.server_url, "http://127.0.0.1:5000");
    assert_eq!(settings.export_file_name, "generated_code.py");
    assert_eq!(settings.layout_settle_ms, 50);

    std::fs::write(&path, r#"{"server_url":"http://example.test:8080"}"#).unwrap();
    ensure_settings_at(&path).unwrap();
    let settings = load_settings_from(&path).unwrap();
    assert_eq!(settings.server_url, "http://example.test:8080");
    assert_eq!(settings.layout_settle_ms, 50);
}

#[test]
fn load_settings_from_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("setting.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_settings_from(&path).is_none());
    assert!(load_settings_from(&dir.path().join("missing.json")).is_none());
}

#[test]
fn settings_path_lives_under_app_dir() {
    if let Some(path) = get_settings_path() {
        assert!(path.ends_with(".boxcode/setting.json"));
    }
}
