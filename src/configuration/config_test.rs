use std::fs;

use anyhow::Result;
use tempdir::TempDir;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() -> Result<()> {
    let res = Config::serialize_default(cli::build());
    let doc = res.parse::<toml_edit::Document>()?;

    assert_eq!(
        doc.get("backend-url").and_then(|e| return e.as_str()),
        Some("http://localhost:7860")
    );
    assert!(doc.get("data-dir").is_some());
    assert!(doc.get("config-file").is_none());
    assert!(res.contains("# URL of the ArtSpark backend."));

    return Ok(());
}

#[tokio::test]
async fn it_loads_config_from_file_and_rejects_bad_values() -> Result<()> {
    let tmp_dir = TempDir::new("artspark-config")?;

    let good_path = tmp_dir.path().join("config.toml");
    fs::write(
        &good_path,
        "backend-url = \"https://art.example.com\"\ndata-dir = \"/tmp/artspark-data\"\n",
    )?;
    let matches = cli::build().try_get_matches_from(vec![
        "artspark",
        "status",
        "-c",
        good_path.to_str().unwrap(),
    ])?;
    Config::load(vec![&matches]).await?;
    assert_eq!(
        Config::get(ConfigKey::BackendURL),
        "https://art.example.com"
    );
    assert_eq!(Config::get(ConfigKey::DataDir), "/tmp/artspark-data");

    let matches = cli::build().try_get_matches_from(vec![
        "artspark",
        "status",
        "-c",
        good_path.to_str().unwrap(),
        "--backend-url",
        "http://localhost:9000",
    ])?;
    Config::load(vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::BackendURL), "http://localhost:9000");

    let bad_path = tmp_dir.path().join("bad-config.toml");
    fs::write(&bad_path, "backend-url = \"localhost:7860\"\n")?;
    let matches = cli::build().try_get_matches_from(vec![
        "artspark",
        "status",
        "-c",
        bad_path.to_str().unwrap(),
    ])?;
    let res = Config::load(vec![&matches]).await;
    assert!(res.is_err());

    let matches = cli::build().try_get_matches_from(vec![
        "artspark",
        "status",
        "-c",
        good_path.to_str().unwrap(),
        "--backend-url",
        "localhost:9000",
    ])?;
    let err = Config::load(vec![&matches]).await.unwrap_err().to_string();
    assert!(err.contains("backend-url"));
    assert!(err.contains("http:// or https://"));

    return Ok(());
}
