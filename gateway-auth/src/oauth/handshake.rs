//! Handshake state carried by the browser between login and callback.
//!
//! The gateway keeps no server-side memory of pending logins. The state, verifier and origin
//! URL are packed into the `authstate` cookie and read back exactly once on callback.

use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use super::pkce::{random_token, PkceVerifier, DEFAULT_TOKEN_LENGTH};
use crate::error::{handshake_error, Error, HandshakeErrorKind};
use crate::signing::HmacSigner;

/// Name of the cookie holding packed handshake state.
pub const HANDSHAKE_COOKIE_NAME: &str = "authstate";

/// How long a login attempt may take before its handshake cookie expires.
pub const HANDSHAKE_MAX_AGE: Duration = Duration::from_secs(5 * 60);

const SIGNATURE_SEPARATOR: char = '.';

/// State data for a single login attempt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeState {
    /// Anti-CSRF token echoed back by the provider.
    pub state: String,
    /// PKCE verifier to present at code exchange.
    pub verifier: String,
    /// Where to send the user after a successful login.
    #[serde(rename = "originUrl", default)]
    pub origin_url: Option<String>,
}

impl HandshakeState {
    /// Create state for a fresh login attempt with a new random state and verifier.
    pub fn generate(origin_url: Option<String>) -> Self {
        Self {
            state: random_token(DEFAULT_TOKEN_LENGTH),
            verifier: PkceVerifier::generate(DEFAULT_TOKEN_LENGTH).into_string(),
            origin_url,
        }
    }

    /// The stored verifier as a `PkceVerifier`.
    pub fn pkce_verifier(&self) -> PkceVerifier {
        PkceVerifier::from_string(self.verifier.clone())
    }

    /// Compare `candidate` against the stored state without short-circuiting on the first
    /// differing byte.
    pub fn state_matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.state.as_bytes(), candidate.as_bytes())
    }
}

impl std::fmt::Debug for HandshakeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandshakeState")
            .field("state", &self.state)
            .field("verifier", &"..")
            .field("origin_url", &self.origin_url)
            .finish()
    }
}

/// Packs and unpacks `HandshakeState` into an opaque cookie value.
///
/// The wire format is `base64url(json)`, followed by `.` and a base64url HMAC-SHA256 signature
/// of the encoded payload when a signer is configured.
#[derive(Debug, Clone, Default)]
pub struct HandshakeCodec {
    signer: Option<HmacSigner>,
}

impl HandshakeCodec {
    /// Codec producing unsigned cookie values.
    pub fn unsigned() -> Self {
        Self { signer: None }
    }

    /// Codec signing every packed value and rejecting unsigned or tampered ones.
    pub fn signed(signer: HmacSigner) -> Self {
        Self {
            signer: Some(signer),
        }
    }

    pub fn is_signed(&self) -> bool {
        self.signer.is_some()
    }

    /// Serialize the handshake triple for transport in a cookie.
    pub fn pack(&self, handshake: &HandshakeState) -> Result<String, Error> {
        let json = serde_json::to_vec(handshake).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::ErrorKind::Handshake(HandshakeErrorKind::Malformed),
        })?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        match &self.signer {
            Some(signer) => {
                let signature = signer.sign(payload.as_bytes())?;
                Ok(format!("{payload}{SIGNATURE_SEPARATOR}{signature}"))
            }
            None => Ok(payload),
        }
    }

    /// Parse a cookie value produced by `pack`.
    pub fn unpack(&self, value: &str) -> Result<HandshakeState, Error> {
        let payload = match &self.signer {
            Some(signer) => {
                let (payload, signature) =
                    value.split_once(SIGNATURE_SEPARATOR).ok_or_else(|| {
                        handshake_error(
                            HandshakeErrorKind::InvalidSignature,
                            "Handshake value is not signed",
                        )
                    })?;
                if !signer.verify(payload.as_bytes(), signature)? {
                    return Err(handshake_error(
                        HandshakeErrorKind::InvalidSignature,
                        "Handshake signature mismatch",
                    ));
                }
                payload
            }
            None => value,
        };

        let json = URL_SAFE_NO_PAD.decode(payload).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::ErrorKind::Handshake(HandshakeErrorKind::Malformed),
        })?;

        serde_json::from_slice(&json).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::ErrorKind::Handshake(HandshakeErrorKind::Malformed),
        })
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
