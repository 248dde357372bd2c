//! OAuth 2.0 authorization code flow with PKCE.

mod handshake;
mod pkce;
mod provider;
mod token;

pub mod providers;

pub use handshake::{HandshakeCodec, HandshakeState, HANDSHAKE_COOKIE_NAME, HANDSHAKE_MAX_AGE};
pub use pkce::{random_token, PkceChallenge, PkceVerifier, CHALLENGE_METHOD, DEFAULT_TOKEN_LENGTH};
pub use provider::{AuthorizationRequest, Provider};
pub use token::TokenResponse;
