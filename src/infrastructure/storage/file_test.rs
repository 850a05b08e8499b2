use anyhow::Result;
use tempdir::TempDir;

use super::FileStorage;
use crate::domain::models::Storage;

#[tokio::test]
async fn it_returns_none_for_missing_keys() -> Result<()> {
    let tmp_dir = TempDir::new("artspark-storage")?;
    let storage = FileStorage::new(tmp_dir.path().join("data"));

    assert_eq!(storage.get("art_spark_auth_token").await?, None);
    return Ok(());
}

#[tokio::test]
async fn it_stores_and_removes_values() -> Result<()> {
    let tmp_dir = TempDir::new("artspark-storage")?;
    let data_dir = tmp_dir.path().join("nested").join("data");
    let storage = FileStorage::new(data_dir.clone());

    storage.set("art_spark_auth_token", "abc123").await?;
    assert!(data_dir.join("art_spark_auth_token").exists());
    assert_eq!(
        storage.get("art_spark_auth_token").await?,
        Some("abc123".to_string())
    );

    storage.set("art_spark_auth_token", "def").await?;
    assert_eq!(
        storage.get("art_spark_auth_token").await?,
        Some("def".to_string())
    );

    storage.remove("art_spark_auth_token").await?;
    assert_eq!(storage.get("art_spark_auth_token").await?, None);

    storage.remove("art_spark_auth_token").await?;
    return Ok(());
}

#[tokio::test]
async fn it_rejects_path_like_keys() -> Result<()> {
    let tmp_dir = TempDir::new("artspark-storage")?;
    let storage = FileStorage::new(tmp_dir.path().to_path_buf());

    assert!(storage.set("../escape", "x").await.is_err());
    assert!(storage.get("").await.is_err());
    return Ok(());
}
