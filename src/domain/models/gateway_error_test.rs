use super::GatewayError;
use super::UnauthorizedReason;
use super::NOT_LOGGED_IN_MESSAGE;
use super::REAUTH_MESSAGE;

#[test]
fn it_uses_reauth_message_for_rejected_tokens() {
    let err = GatewayError::Unauthorized(UnauthorizedReason::Rejected {
        detail: Some("invalid key".to_string()),
    });

    assert_eq!(err.to_string(), REAUTH_MESSAGE);
    assert_eq!(err.user_message(), REAUTH_MESSAGE);
    assert!(err.is_unauthorized());
}

#[test]
fn it_uses_login_message_for_missing_tokens() {
    let err = GatewayError::Unauthorized(UnauthorizedReason::MissingToken);

    assert_eq!(err.to_string(), NOT_LOGGED_IN_MESSAGE);
    assert_ne!(err.to_string(), REAUTH_MESSAGE);
}

#[test]
fn it_falls_back_to_generic_request_failed_message() {
    let err = GatewayError::request_failed(500, None);
    assert_eq!(
        err,
        GatewayError::RequestFailed {
            status: 500,
            message: "request failed: 500".to_string()
        }
    );

    let err = GatewayError::request_failed(502, Some("".to_string()));
    assert_eq!(err.to_string(), "request failed: 502");
}

#[test]
fn it_keeps_server_messages() {
    let err = GatewayError::request_failed(400, Some("prompt is required".to_string()));

    assert_eq!(err.to_string(), "prompt is required");
    assert_eq!(err.user_message(), "Generation failed: prompt is required");
    assert!(!err.is_unauthorized());
}
