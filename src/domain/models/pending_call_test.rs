use serde_json::json;

use super::PendingCall;
use crate::domain::models::GatewayError;
use crate::domain::models::UnauthorizedReason;
use crate::domain::models::REAUTH_MESSAGE;

#[test]
fn it_tracks_a_successful_call() {
    let mut pending = PendingCall::default();
    pending.start();
    assert!(pending.is_loading());

    pending.succeed(json!({ "imageUrl": "https://example.com/a.png" }));
    assert!(!pending.is_loading());
    assert_eq!(pending.error(), None);
    assert_eq!(
        pending.result(),
        Some(&json!({ "imageUrl": "https://example.com/a.png" }))
    );
}

#[test]
fn it_tracks_a_failed_call() {
    let mut pending = PendingCall::default();
    pending.start();
    pending.fail(&GatewayError::request_failed(500, None));

    assert!(!pending.is_loading());
    assert_eq!(pending.error(), Some("Generation failed: request failed: 500"));
    assert_eq!(pending.result(), None);
}

#[test]
fn it_shows_reauth_message_as_is() {
    let mut pending = PendingCall::default();
    pending.start();
    pending.fail(&GatewayError::Unauthorized(UnauthorizedReason::Rejected {
        detail: None,
    }));

    assert_eq!(pending.error(), Some(REAUTH_MESSAGE));
}

#[test]
fn it_resets_on_start() {
    let mut pending = PendingCall::default();
    pending.start();
    pending.fail(&GatewayError::NetworkError("connection refused".to_string()));
    pending.start();

    assert!(pending.is_loading());
    assert_eq!(pending.error(), None);
    assert_eq!(pending.result(), None);
}
