//! Login initiation: the first leg of the PKCE handshake.

use crate::error::Error;
use crate::session::guard_origin;
use gateway_auth::oauth::{HandshakeCodec, HandshakeState, Provider};
use log::*;

/// Result of starting a login attempt.
#[derive(Debug)]
pub struct LoginStart {
    /// Provider authorization URL carrying state and code challenge.
    pub login_url: String,
    /// Packed handshake state for the `authstate` cookie.
    pub handshake_cookie: String,
}

/// Start a login attempt.
///
/// Generates a fresh verifier and state, derives the S256 challenge and builds the provider's
/// authorization URL. The only thing that must persist until the callback is the returned
/// handshake cookie value.
///
/// # Arguments
///
/// * `provider` - Identity provider building the authorization URL
/// * `codec` - Packs the handshake state into a cookie value
/// * `origin_url` - Where to return the user after login; dropped unless it is a relative path
pub fn begin(
    provider: &dyn Provider,
    codec: &HandshakeCodec,
    origin_url: Option<String>,
) -> Result<LoginStart, Error> {
    let origin_url = origin_url
        .filter(|origin| !origin.is_empty())
        .filter(|origin| guard_origin(origin));

    let handshake = HandshakeState::generate(origin_url);
    let challenge = handshake.pkce_verifier().challenge();
    let request = provider.authorization_url(&handshake.state, &challenge);
    let handshake_cookie = codec.pack(&handshake)?;

    debug!(
        "Starting login attempt (origin_url={:?})",
        handshake.origin_url
    );

    Ok(LoginStart {
        login_url: request.url,
        handshake_cookie,
    })
}
