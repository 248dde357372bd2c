//! Session issuance after a successful code exchange.

use std::time::Duration;

use gateway_auth::oauth::{HandshakeState, TokenResponse};
use jsonwebtoken::dangerous;
use log::*;
use secrecy::SecretString;
use serde_json::{Map, Value};

/// Where the user lands when no usable origin URL was captured at login.
pub const DEFAULT_REDIRECT: &str = "/";

/// Everything the web layer needs to hand the caller a session.
#[derive(Debug)]
pub struct SessionGrant {
    /// Value of the session cookie.
    pub access_token: SecretString,
    /// Session cookie lifetime. `None` keeps it for the browser session.
    pub max_age: Option<Duration>,
    /// The provider's token response, passed through unchanged.
    pub infos: Map<String, Value>,
    /// Post-login redirect target.
    pub redirect_url: String,
    /// Whether an origin URL was captured at login.
    pub origin_captured: bool,
}

/// Turn a token response and the consumed handshake into a session grant.
pub fn issue(tokens: TokenResponse, handshake: HandshakeState) -> SessionGrant {
    let origin = handshake
        .origin_url
        .filter(|origin| guard_origin(origin));
    let redirect_url = redirect_target(origin.as_deref());

    debug!(
        "Issuing session (expires_in={:?}, redirect_url={})",
        tokens.expires_in, redirect_url
    );

    SessionGrant {
        access_token: tokens.access_token,
        max_age: tokens.expires_in.map(Duration::from_secs),
        infos: tokens.infos,
        origin_captured: origin.is_some(),
        redirect_url,
    }
}

/// `origin` when present, the site root otherwise.
pub fn redirect_target(origin: Option<&str>) -> String {
    origin.unwrap_or(DEFAULT_REDIRECT).to_string()
}

/// Accept only same-origin relative paths as post-login redirect targets.
///
/// Rejects absolute URLs and scheme-relative forms such as `//evil.example` or `/\evil.example`
/// which browsers resolve against another host.
pub fn is_safe_redirect_target(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.starts_with("/\\")
        && !target.chars().any(char::is_control)
}

/// Log and drop an unsafe origin URL.
pub(crate) fn guard_origin(origin: &str) -> bool {
    let safe = is_safe_redirect_target(origin);
    if !safe {
        warn!("Ignoring unsafe origin URL: {:?}", origin);
    }
    safe
}

/// Decode the payload of a JWT access token for display.
///
/// The signature is NOT verified; the result must never be used for authorization decisions.
/// Returns `None` for opaque (non-JWT) tokens.
pub fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    match dangerous::insecure_decode::<Map<String, Value>>(token) {
        Ok(token_data) => Some(token_data.claims),
        Err(e) => {
            debug!("Session token is not a readable JWT: {e}");
            None
        }
    }
}
