use std::fs;
use std::sync::Arc;

use anyhow::Result;
use mockito::Matcher;
use tempdir::TempDir;

use super::AppContext;
use crate::domain::models::AuthState;
use crate::domain::models::Event;
use crate::domain::models::PendingCall;
use crate::domain::models::Storage;
use crate::domain::models::StorageBox;
use crate::domain::models::REAUTH_MESSAGE;
use crate::domain::services::AUTH_TOKEN_KEY;
use crate::infrastructure::storage::file::FileStorage;
use crate::infrastructure::storage::memory::MemoryStorage;

async fn storage_with_token(token: &str) -> Result<StorageBox> {
    let storage: StorageBox = Arc::new(MemoryStorage::default());
    storage.set(AUTH_TOKEN_KEY, token).await?;
    return Ok(storage);
}

#[tokio::test]
async fn it_shares_one_session_between_validation_and_tools() -> Result<()> {
    let storage = storage_with_token("abc").await?;
    let mut server = mockito::Server::new();
    let check_mock = server
        .mock("GET", Matcher::Regex("^/api/check_key".to_string()))
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create();
    let tool_mock = server
        .mock("POST", Matcher::Regex("^/api/generate-ideas".to_string()))
        .match_query(Matcher::UrlEncoded("token".to_string(), "abc".to_string()))
        .with_status(401)
        .with_body(r#"{"error":"Token has expired"}"#)
        .create();

    let mut ctx = AppContext::open_with(&server.url(), storage.clone()).await?;
    assert_eq!(ctx.validation.run().await?, AuthState::Authenticated);
    assert_eq!(ctx.drain_events(), vec![Event::Authenticated]);

    let mut pending = PendingCall::default();
    let res = ctx.tools.generate_ideas(&mut pending, "ocean").await;
    assert!(res.is_err());
    assert_eq!(pending.error(), Some(REAUTH_MESSAGE));

    assert!(!ctx.session.is_authenticated().await);
    assert_eq!(storage.get(AUTH_TOKEN_KEY).await?, None);
    assert_eq!(
        ctx.drain_events(),
        vec![Event::ReauthRequired(REAUTH_MESSAGE.to_string())]
    );
    assert!(ctx.drain_events().is_empty());

    check_mock.assert();
    tool_mock.assert();
    return Ok(());
}

#[tokio::test]
async fn it_drains_nothing_before_any_call() -> Result<()> {
    let storage: StorageBox = Arc::new(MemoryStorage::default());
    let mut ctx = AppContext::open_with("http://127.0.0.1:1", storage).await?;

    assert!(ctx.drain_events().is_empty());
    assert_eq!(ctx.validation.state(), AuthState::Unknown);
    return Ok(());
}

#[tokio::test]
async fn it_opens_with_an_unreadable_token_file() -> Result<()> {
    let tmp_dir = TempDir::new("artspark-app")?;
    fs::write(tmp_dir.path().join(AUTH_TOKEN_KEY), [0xff, 0xfe, 0x00])?;
    let storage: StorageBox = Arc::new(FileStorage::new(tmp_dir.path().to_path_buf()));

    let mut ctx = AppContext::open_with("http://127.0.0.1:1", storage).await?;

    assert!(!ctx.session.is_authenticated().await);
    assert_eq!(ctx.validation.run().await?, AuthState::Unauthenticated);
    ctx.session.logout().await?;
    return Ok(());
}
