//! Token endpoint response.

use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::error::{oauth_error, Error, OAuthErrorKind};

/// Payload returned by the provider's token endpoint.
///
/// Only `access_token` is required. Everything else the provider sends is kept opaque in
/// `infos` so it can be surfaced to the caller unchanged.
#[derive(Debug, Clone)]
pub struct TokenResponse {
    /// Access token used as the session credential.
    pub access_token: SecretString,
    /// Token type (usually "Bearer").
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds, when the provider reports it.
    pub expires_in: Option<u64>,
    /// The full response body.
    pub infos: Map<String, Value>,
}

impl TokenResponse {
    /// Build a token response from a parsed JSON body.
    pub fn from_json(body: Value) -> Result<Self, Error> {
        let infos = match body {
            Value::Object(map) => map,
            _ => {
                return Err(oauth_error(
                    OAuthErrorKind::InvalidResponse,
                    "Token response is not a JSON object",
                ))
            }
        };

        let access_token = infos
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                oauth_error(
                    OAuthErrorKind::InvalidResponse,
                    "Token response has no access_token",
                )
            })?
            .to_string();

        let token_type = infos
            .get("token_type")
            .and_then(Value::as_str)
            .map(str::to_string);

        // Some providers send expires_in as a string
        let expires_in = infos.get("expires_in").and_then(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });

        Ok(Self {
            access_token: SecretString::new(access_token),
            token_type,
            expires_in,
            infos,
        })
    }
}
