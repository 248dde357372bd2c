//! OIDC provider client.
//!
//! Builds the configured provider and handshake codec for the auth controllers.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use gateway_auth::http::HttpClientBuilder;
use gateway_auth::oauth::providers::oidc::{Provider as OidcProvider, ProviderSettings};
use gateway_auth::oauth::HandshakeCodec;
use gateway_auth::signing::HmacSigner;
use log::*;
use secrecy::ExposeSecret;
use service::config::Config;

/// Create the OIDC provider described by `config`.
///
/// The provider's HTTP client carries the configured token request timeout.
pub fn new_provider(config: &Config) -> Result<OidcProvider, Error> {
    let http_client = HttpClientBuilder::new()
        .with_timeout(config.token_request_timeout())
        .with_user_agent(format!("pkce-gateway/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Failed to build token endpoint client".to_string(),
            )),
        })?;

    let settings = ProviderSettings {
        client_id: config.openid_client_id().to_string(),
        redirect_uri: config.openid_redirect_url().to_string(),
        authorize_url: config.openid_auth_url().clone(),
        token_url: config.openid_token_url().clone(),
        scope: config.openid_scope().to_string(),
    };

    let provider = OidcProvider::new(settings, http_client);
    let settings = provider.settings();
    info!(
        "Configured OIDC provider: authorize={} token={} client_id={}",
        settings.authorize_url, settings.token_url, settings.client_id
    );

    Ok(provider)
}

/// Create the handshake codec described by `config`.
///
/// Signs the handshake cookie when a signing key is configured.
pub fn handshake_codec(config: &Config) -> Result<HandshakeCodec, Error> {
    let codec = match config.handshake_signing_key() {
        Some(key) if key.expose_secret().is_empty() => {
            return Err(Error {
                source: Some("HANDSHAKE_SIGNING_KEY is set but empty".into()),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            })
        }
        Some(key) => HandshakeCodec::signed(HmacSigner::new(key.clone())),
        None => HandshakeCodec::unsigned(),
    };

    if !codec.is_signed() {
        warn!("No handshake signing key configured, the handshake cookie will be unsigned");
    }
    Ok(codec)
}
