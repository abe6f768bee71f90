use biodata_cli::cli::ConfigCommand;
use biodata_cli::commands::run_config;
use biodata_cli::config::{BiodataConfig, load_config_from, load_or_default, save_config_to};

fn created_at() -> jiff::Timestamp {
    "2024-03-05T14:22:10Z".parse().unwrap()
}

#[test]
fn save_then_load_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("biodata").join("config.json");

    let mut config = BiodataConfig::new(created_at());
    config.output_dir = dir.path().join("out");
    config.jpeg_quality = 80;
    config.raster.scale = 3.0;

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded, config);
    assert!(!path.with_extension("json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    save_config_to(&BiodataConfig::new(created_at()), &path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn unversioned_config_loads_as_current_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "output_dir": "/tmp/exports",
            "raster": { "scale": 1.5 },
            "created_at": "2024-03-05T14:22:10Z"
        }"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();

    assert_eq!(config.config_version, 1);
    assert_eq!(config.raster.scale, 1.5);
    assert_eq!(config.raster.max_pixels, 64_000_000);
    assert_eq!(config.jpeg_quality, 100);
    assert_eq!(config.page.page_height, 11.0);
    assert_eq!(config.page.image_y, 0.5);
}

#[test]
fn version_zero_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": 0,
            "output_dir": "/tmp",
            "created_at": "2024-03-05T14:22:10Z"
        }"#,
    )
    .unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("never a released format"));
}

#[test]
fn newer_config_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{
            "config_version": 99,
            "output_dir": "/tmp",
            "created_at": "2024-03-05T14:22:10Z"
        }"#,
    )
    .unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build"));
}

#[test]
fn missing_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_or_default(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.raster.scale, 2.0);
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut out = Vec::new();

    run_config(ConfigCommand::Init { force: false }, &path, &mut out).unwrap();
    assert!(path.exists());

    let err = run_config(ConfigCommand::Init { force: false }, &path, &mut out).unwrap_err();
    assert!(err.to_string().contains("--force"));

    run_config(ConfigCommand::Init { force: true }, &path, &mut out).unwrap();
}

#[test]
fn reset_removes_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut out = Vec::new();

    run_config(ConfigCommand::Init { force: false }, &path, &mut out).unwrap();
    run_config(ConfigCommand::Reset, &path, &mut out).unwrap();
    assert!(!path.exists());

    run_config(ConfigCommand::Reset, &path, &mut out).unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("removed"));
    assert!(printed.contains("no config at"));
}

#[test]
fn show_prints_effective_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let mut out = Vec::new();

    run_config(ConfigCommand::Show, &path, &mut out).unwrap();

    let shown: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(shown["config_version"], 1);
    assert_eq!(shown["jpeg_quality"], 100);
}
