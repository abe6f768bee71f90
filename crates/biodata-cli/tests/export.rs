use clap::Parser;

use biodata_cli::cli::{Cli, Command, ExportArgs};
use biodata_cli::commands::{export_context, run_export};
use biodata_cli::config::BiodataConfig;
use biodata_core::models::format::ExportFormat;

fn export_args(args: &[&str]) -> ExportArgs {
    let argv = ["biodata", "export"].into_iter().chain(args.iter().copied());
    match Cli::try_parse_from(argv).unwrap().command {
        Command::Export(args) => args,
        other => panic!("expected export, got {other:?}"),
    }
}

const JANE: [&str; 10] = [
    "--first-name",
    "Jane",
    "--last-name",
    "Doe",
    "--birthdate",
    "1990-01-01",
    "--gender",
    "F",
    "--email",
    "j@x.com",
];

fn config() -> BiodataConfig {
    BiodataConfig::new("2024-03-05T14:22:10Z".parse().unwrap())
}

#[tokio::test]
async fn json_export_lands_in_out_dir() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().to_str().unwrap();

    let mut argv = JANE.to_vec();
    argv.extend(["--out", out]);
    let outcome = run_export(&export_args(&argv), &config()).await.unwrap();

    assert_eq!(outcome.format, ExportFormat::Json);
    assert_eq!(outcome.pages, None);
    assert!(outcome.filename.starts_with("doe_jane_"));
    assert!(outcome.filename.ends_with(".json"));

    let saved = std::fs::read_to_string(dir.path().join(&outcome.filename)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["personalDetails"]["firstName"], "Jane");
}

#[tokio::test]
async fn config_output_dir_is_used_without_out_flag() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config();
    config.output_dir = dir.path().join("exports");

    let outcome = run_export(&export_args(&JANE), &config).await.unwrap();

    assert!(config.output_dir.join(&outcome.filename).exists());
}

#[tokio::test]
async fn invalid_form_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().to_str().unwrap();

    let args = export_args(&["--first-name", "Jane", "--out", out]);
    let err = run_export(&args, &config()).await.unwrap_err();

    assert!(err.to_string().contains("Last name"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn flags_override_config_for_one_run() {
    let mut config = config();
    config.jpeg_quality = 90;

    let context = export_context(&config, &export_args(&["--scale", "1.5"]));
    assert_eq!(context.raster.scale, 1.5);
    assert_eq!(context.jpeg_quality, 90);

    let context = export_context(&config, &export_args(&["--jpeg-quality", "70"]));
    assert_eq!(context.raster.scale, 2.0);
    assert_eq!(context.jpeg_quality, 70);
}
