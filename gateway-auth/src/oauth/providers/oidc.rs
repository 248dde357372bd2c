//! Generic OpenID Connect provider.
//!
//! Works against any provider exposing a standard authorize endpoint and a token endpoint
//! accepting public-client PKCE exchanges (no client secret).

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{oauth_error, Error, ErrorKind, OAuthErrorKind};
use crate::oauth::{AuthorizationRequest, PkceChallenge, PkceVerifier, TokenResponse};

/// Longest slice of an error body written to the log.
const MAX_LOGGED_BODY: usize = 512;

/// Static settings identifying this client at the provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// OAuth client ID.
    pub client_id: String,
    /// Redirect URI registered with the provider; sent on both legs of the flow.
    pub redirect_uri: String,
    /// The provider's authorize endpoint.
    pub authorize_url: Url,
    /// The provider's token endpoint.
    pub token_url: Url,
    /// Space separated scopes to request.
    pub scope: String,
}

/// OIDC provider.
///
/// Handles the two provider-facing legs of the PKCE flow:
/// - Authorization URL generation
/// - Authorization code exchange
pub struct Provider {
    settings: ProviderSettings,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new OIDC provider.
    ///
    /// # Arguments
    ///
    /// * `settings` - Client ID, redirect URI, endpoints and scope
    /// * `http_client` - Client used for the token endpoint; carries the request timeout
    pub fn new(settings: ProviderSettings, http_client: reqwest::Client) -> Self {
        Self {
            settings,
            http_client,
        }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn authorization_url(
        &self,
        state: &str,
        pkce_challenge: &PkceChallenge,
    ) -> AuthorizationRequest {
        let mut url = self.settings.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("response_mode", "query")
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("scope", &self.settings.scope)
            .append_pair("redirect_uri", &self.settings.redirect_uri)
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
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.settings.client_id.as_str()),
            ("code", code),
            ("redirect_uri", self.settings.redirect_uri.as_str()),
            ("code_verifier", pkce_verifier.as_str()),
        ];

        debug!("Exchanging authorization code at {}", self.settings.token_url);

        let response = self
            .http_client
            .post(self.settings.token_url.clone())
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                warn!("Token endpoint request failed: {:?}", e);
                Error::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(
                "Token endpoint returned {}: {}",
                status,
                truncate(&error_text, MAX_LOGGED_BODY)
            );
            return Err(oauth_error(
                OAuthErrorKind::TokenExchangeFailed,
                &format!("Token endpoint returned {status}"),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!("Failed to parse token endpoint response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidResponse),
            }
        })?;

        let tokens = TokenResponse::from_json(body)?;
        info!("Successfully exchanged authorization code for an access token");
        Ok(tokens)
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
