//! Login callback: validate the provider's redirect, then exchange the code.
//!
//! Every check runs before any network call. Failures are logged here with their specific cause;
//! the client only ever sees the generic message chosen by the web layer.

use crate::error::{AuthorizationErrorKind, Error};
use crate::session::{self, SessionGrant};
use gateway_auth::oauth::{HandshakeCodec, HandshakeState, Provider};
use log::*;

/// Query parameters the provider appends when redirecting back.
#[derive(Debug, Default, Clone)]
pub struct CallbackRequest {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider instead of `code` when the user or provider aborted the login.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// A callback that passed every check and may be exchanged.
#[derive(Debug)]
pub struct VerifiedCallback {
    pub code: String,
    pub handshake: HandshakeState,
}

/// Authenticate a callback against the handshake cookie.
///
/// Checks, in order: `code` present, `state` present, handshake cookie present and parseable,
/// query `state` equal to the cookie's state.
pub fn validate(
    request: CallbackRequest,
    handshake_cookie: Option<&str>,
    codec: &HandshakeCodec,
) -> Result<VerifiedCallback, Error> {
    if let Some(provider_error) = &request.error {
        warn!(
            "Identity provider returned an error: {} ({})",
            provider_error,
            request.error_description.as_deref().unwrap_or("no description")
        );
    }

    let code = non_empty(request.code).ok_or_else(|| {
        warn!("Authorization code is missing from callback");
        Error::authorization(AuthorizationErrorKind::MissingParameter("code"))
    })?;

    let state = non_empty(request.state).ok_or_else(|| {
        warn!("Authorization state is missing from callback");
        Error::authorization(AuthorizationErrorKind::MissingParameter("state"))
    })?;

    let cookie = handshake_cookie
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            warn!("No handshake cookie found for callback");
            Error::authorization(AuthorizationErrorKind::MissingHandshake)
        })?;

    let handshake = codec.unpack(cookie).map_err(|e| {
        warn!("Handshake cookie could not be read: {}", e);
        Error::from(e)
    })?;

    if !handshake.state_matches(&state) {
        warn!("Authorization state does not match the handshake state");
        return Err(Error::authorization(AuthorizationErrorKind::StateMismatch));
    }

    Ok(VerifiedCallback { code, handshake })
}

/// Validate the callback, exchange the code and issue a session.
///
/// The provider is only contacted after `validate` succeeds. Nothing is retried.
pub async fn complete(
    provider: &dyn Provider,
    codec: &HandshakeCodec,
    request: CallbackRequest,
    handshake_cookie: Option<&str>,
) -> Result<SessionGrant, Error> {
    let verified = validate(request, handshake_cookie, codec)?;

    let tokens = provider
        .exchange_code(&verified.code, &verified.handshake.pkce_verifier())
        .await
        .map_err(|e| {
            error!("Error retrieving access token: {}", e);
            Error::from(e)
        })?;

    info!("Login completed, issuing session");
    Ok(session::issue(tokens, verified.handshake))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use crate::test_support::FakeProvider;
    use gateway_auth::oauth::HandshakeState;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn handshake(origin_url: Option<&str>) -> HandshakeState {
        HandshakeState {
            state: "expected-state".to_string(),
            verifier: "stored-verifier".to_string(),
            origin_url: origin_url.map(str::to_string),
        }
    }

    fn request(code: Option<&str>, state: Option<&str>) -> CallbackRequest {
        CallbackRequest {
            code: code.map(str::to_string),
            state: state.map(str::to_string),
            ..Default::default()
        }
    }

    fn authorization_kind(err: Error) -> AuthorizationErrorKind {
        match err.error_kind {
            DomainErrorKind::Authorization(kind) => kind,
            other => panic!("expected an authorization error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_success() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();

        let verified = validate(
            request(Some("the-code"), Some("expected-state")),
            Some(&cookie),
            &codec,
        )
        .unwrap();

        assert_eq!(verified.code, "the-code");
        assert_eq!(verified.handshake.verifier, "stored-verifier");
    }

    #[test]
    fn test_validate_missing_code() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();

        let err = validate(request(None, Some("expected-state")), Some(&cookie), &codec)
            .unwrap_err();
        assert_eq!(
            authorization_kind(err),
            AuthorizationErrorKind::MissingParameter("code")
        );
    }

    #[test]
    fn test_validate_empty_code_is_missing() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();

        let err = validate(request(Some(""), Some("expected-state")), Some(&cookie), &codec)
            .unwrap_err();
        assert_eq!(
            authorization_kind(err),
            AuthorizationErrorKind::MissingParameter("code")
        );
    }

    #[test]
    fn test_validate_missing_state() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();

        let err = validate(request(Some("code"), None), Some(&cookie), &codec).unwrap_err();
        assert_eq!(
            authorization_kind(err),
            AuthorizationErrorKind::MissingParameter("state")
        );
    }

    #[test]
    fn test_validate_code_checked_before_cookie() {
        let err = validate(request(None, None), None, &HandshakeCodec::unsigned()).unwrap_err();
        assert_eq!(
            authorization_kind(err),
            AuthorizationErrorKind::MissingParameter("code")
        );
    }

    #[test]
    fn test_validate_provider_error_without_code() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();
        let request = CallbackRequest {
            state: Some("expected-state".to_string()),
            error: Some("access_denied".to_string()),
            error_description: Some("User cancelled".to_string()),
            ..Default::default()
        };

        let err = validate(request, Some(&cookie), &codec).unwrap_err();
        assert_eq!(
            authorization_kind(err),
            AuthorizationErrorKind::MissingParameter("code")
        );
    }

    #[test]
    fn test_validate_missing_handshake() {
        let err = validate(
            request(Some("code"), Some("expected-state")),
            None,
            &HandshakeCodec::unsigned(),
        )
        .unwrap_err();
        assert_eq!(authorization_kind(err), AuthorizationErrorKind::MissingHandshake);
    }

    #[test]
    fn test_validate_cleared_handshake_is_missing() {
        let err = validate(
            request(Some("code"), Some("expected-state")),
            Some(""),
            &HandshakeCodec::unsigned(),
        )
        .unwrap_err();
        assert_eq!(authorization_kind(err), AuthorizationErrorKind::MissingHandshake);
    }

    #[test]
    fn test_validate_malformed_handshake() {
        let err = validate(
            request(Some("code"), Some("expected-state")),
            Some("{not-base64}"),
            &HandshakeCodec::unsigned(),
        )
        .unwrap_err();
        assert_eq!(authorization_kind(err), AuthorizationErrorKind::MalformedState);
    }

    #[test]
    fn test_validate_state_mismatch() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();

        let err = validate(request(Some("code"), Some("forged-state")), Some(&cookie), &codec)
            .unwrap_err();
        assert_eq!(authorization_kind(err), AuthorizationErrorKind::StateMismatch);
    }

    #[tokio::test]
    async fn test_complete_exchanges_code_with_stored_verifier() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(Some("/dashboard"))).unwrap();
        let provider = FakeProvider::default();

        let grant = complete(
            &provider,
            &codec,
            request(Some("the-code"), Some("expected-state")),
            Some(&cookie),
        )
        .await
        .unwrap();

        assert_eq!(
            provider.exchanges(),
            vec![("the-code".to_string(), "stored-verifier".to_string())]
        );
        assert_eq!(grant.access_token.expose_secret(), "fake-access-token");
        assert_eq!(grant.redirect_url, "/dashboard");
        assert!(grant.origin_captured);
    }

    #[tokio::test]
    async fn test_complete_without_origin_redirects_to_root() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();

        let grant = complete(
            &FakeProvider::default(),
            &codec,
            request(Some("code"), Some("expected-state")),
            Some(&cookie),
        )
        .await
        .unwrap();

        assert_eq!(grant.redirect_url, "/");
    }

    #[tokio::test]
    async fn test_complete_state_mismatch_makes_no_exchange() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();
        let provider = FakeProvider::default();

        let result = complete(
            &provider,
            &codec,
            request(Some("code"), Some("forged-state")),
            Some(&cookie),
        )
        .await;

        assert!(result.is_err());
        assert!(provider.exchanges().is_empty());
    }

    #[tokio::test]
    async fn test_complete_missing_parameters_make_no_exchange() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();
        let provider = FakeProvider::default();

        for (code, state) in [(None, Some("expected-state")), (Some("code"), None)] {
            let result = complete(&provider, &codec, request(code, state), Some(&cookie)).await;
            assert!(result.is_err());
        }
        assert!(provider.exchanges().is_empty());
    }

    #[tokio::test]
    async fn test_complete_exchange_failure() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();
        let provider = FakeProvider::failing();

        let err = complete(
            &provider,
            &codec,
            request(Some("code"), Some("expected-state")),
            Some(&cookie),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::TokenExchange)
        );
        assert_eq!(provider.exchanges().len(), 1);
    }

    #[tokio::test]
    async fn test_complete_passes_token_infos_through() {
        let codec = HandshakeCodec::unsigned();
        let cookie = codec.pack(&handshake(None)).unwrap();
        let provider = FakeProvider::with_token_body(json!({
            "access_token": "abc",
            "expires_in": 120,
            "scope": "openid"
        }));

        let grant = complete(
            &provider,
            &codec,
            request(Some("code"), Some("expected-state")),
            Some(&cookie),
        )
        .await
        .unwrap();

        assert_eq!(grant.infos.get("scope"), Some(&json!("openid")));
        assert_eq!(grant.max_age, Some(std::time::Duration::from_secs(120)));
    }
}
