//! Test doubles shared by the domain unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use gateway_auth::error::{oauth_error, Error, OAuthErrorKind};
use gateway_auth::oauth::{
    AuthorizationRequest, PkceChallenge, PkceVerifier, Provider, TokenResponse,
};
use serde_json::{json, Value};
use url::Url;

/// Provider that records every code exchange instead of calling out.
pub(crate) struct FakeProvider {
    exchanges: Mutex<Vec<(String, String)>>,
    token_body: Value,
    fail: bool,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::with_token_body(json!({ "access_token": "fake-access-token" }))
    }
}

impl FakeProvider {
    pub(crate) fn with_token_body(token_body: Value) -> Self {
        Self {
            exchanges: Mutex::new(Vec::new()),
            token_body,
            fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(code, verifier)` pairs seen by `exchange_code`.
    pub(crate) fn exchanges(&self) -> Vec<(String, String)> {
        self.exchanges.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn authorization_url(&self, state: &str, pkce_challenge: &PkceChallenge) -> AuthorizationRequest {
        let mut url = Url::parse("https://idp.example.com/authorize").unwrap();
        url.query_pairs_mut()
            .append_pair("state", state)
            .append_pair("code_challenge", pkce_challenge.as_str())
            .append_pair("code_challenge_method", pkce_challenge.method());

        AuthorizationRequest {
            url: url.into(),
            state: state.to_string(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &PkceVerifier,
    ) -> Result<TokenResponse, Error> {
        self.exchanges
            .lock()
            .unwrap()
            .push((code.to_string(), pkce_verifier.as_str().to_string()));

        if self.fail {
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                "Token endpoint returned 500 Internal Server Error",
            ));
        }
        TokenResponse::from_json(self.token_body.clone())
    }
}
