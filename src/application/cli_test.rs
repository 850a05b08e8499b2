use std::sync::Arc;

use anyhow::Result;

use super::build;
use super::finish;
use super::format_setting;
use super::mask;
use crate::application::app::AppContext;
use crate::domain::models::AuthState;
use crate::domain::models::PendingCall;
use crate::domain::models::SettingKey;
use crate::domain::models::StorageBox;
use crate::domain::models::NOT_LOGGED_IN_MESSAGE;
use crate::infrastructure::storage::memory::MemoryStorage;

#[test]
fn it_builds_a_valid_command() {
    build().debug_assert();
}

#[test]
fn it_parses_tool_arguments() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "artspark",
        "mood",
        "--mood",
        "happy",
        "--theme",
        "sea",
    ])?;

    let (name, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "mood");
    assert_eq!(
        subcmd_matches.get_one::<String>("mood").unwrap(),
        "happy"
    );
    assert_eq!(subcmd_matches.get_one::<String>("theme").unwrap(), "sea");

    return Ok(());
}

#[test]
fn it_requires_a_style_source_for_portraits() {
    let res = build().try_get_matches_from(vec!["artspark", "portrait", "--image", "me.png"]);
    assert!(res.is_err());

    let res = build().try_get_matches_from(vec![
        "artspark", "portrait", "--image", "me.png", "--preset", "2",
    ]);
    assert!(res.is_ok());
}

#[test]
fn it_rejects_unknown_setting_keys() {
    let res = build().try_get_matches_from(vec!["artspark", "settings", "set", "colour", "red"]);
    assert!(res.is_err());

    let res = build().try_get_matches_from(vec![
        "artspark",
        "settings",
        "set",
        "age_range",
        "9-12岁",
    ]);
    assert!(res.is_ok());
}

#[test]
fn it_masks_the_bailian_key() {
    assert_eq!(mask("sk-1234567890"), "****7890");
    assert_eq!(
        format_setting(SettingKey::BailianApiKey, Some("sk-abcdef".to_string())),
        "bailian_api_key = ****cdef"
    );
    assert_eq!(
        format_setting(SettingKey::AgeRange, Some("6-8岁".to_string())),
        "age_range = 6-8岁"
    );
    assert_eq!(
        format_setting(SettingKey::DsLlmId, None),
        "ds_llm_id = (not set)"
    );
}

#[test]
fn it_parses_artwork_explanations() -> Result<()> {
    let matches = build().try_get_matches_from(vec![
        "artspark",
        "explain",
        "--title",
        "The Great Wave",
        "--artist",
        "Hokusai",
    ])?;

    let (name, subcmd_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "explain");
    assert_eq!(super::optional(subcmd_matches, "artist"), Some("Hokusai"));
    assert_eq!(super::optional(subcmd_matches, "date"), None);

    assert!(build()
        .try_get_matches_from(vec!["artspark", "explain", "--artist", "Hokusai"])
        .is_err());
    return Ok(());
}

#[tokio::test]
async fn it_reports_the_gateway_reason_for_unauthorized_calls() -> Result<()> {
    let storage: StorageBox = Arc::new(MemoryStorage::default());
    let mut ctx = AppContext::open_with("http://127.0.0.1:1", storage).await?;
    let mut pending = PendingCall::default();

    let res = ctx.tools.generate_ideas(&mut pending, "ocean").await;
    let err = finish(&mut ctx, &pending, res).await.unwrap_err();

    assert_eq!(err.to_string(), NOT_LOGGED_IN_MESSAGE);
    assert_eq!(ctx.validation.state(), AuthState::Unauthenticated);
    assert!(ctx.drain_events().is_empty());
    return Ok(());
}
