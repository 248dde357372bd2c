//! OAuth provider trait and types.

use async_trait::async_trait;

use super::pkce::{PkceChallenge, PkceVerifier};
use super::token::TokenResponse;
use crate::error::Error;

/// Authorization request sent to the provider as a browser redirect.
///
/// Exists only as query parameters on `url`; nothing is stored server side.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Authorization URL to redirect the user to.
    pub url: String,
    /// CSRF state parameter for validation.
    pub state: String,
}

/// Trait for OAuth 2.0 authorization code providers using PKCE.
///
/// Implementations handle:
/// - Authorization URL generation with an S256 challenge
/// - Authorization code exchange for tokens
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate authorization URL with state and PKCE challenge.
    ///
    /// # Arguments
    ///
    /// * `state` - CSRF state parameter for validation
    /// * `pkce_challenge` - PKCE code challenge derived from the stored verifier
    fn authorization_url(&self, state: &str, pkce_challenge: &PkceChallenge)
        -> AuthorizationRequest;

    /// Exchange authorization code for an access token.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from OAuth callback
    /// * `pkce_verifier` - PKCE code verifier stored at login
    ///
    /// # Returns
    ///
    /// The token endpoint response. Transport errors, timeouts, non-2xx statuses and
    /// malformed bodies are all errors.
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &PkceVerifier,
    ) -> Result<TokenResponse, Error>;
}
