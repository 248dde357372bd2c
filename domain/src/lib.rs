//! Domain layer of the PKCE login gateway.
//!
//! Drives the authorization-code-with-PKCE handshake: `login` starts an attempt, `callback`
//! authenticates the provider's redirect and exchanges the code, `session` turns the token
//! response into what the web layer needs to set the session cookie.
//!
//! All handshake state travels in the browser's cookie; nothing here keeps per-user memory.

// Re-exports from `gateway-auth` so `web` does not depend on it directly.
pub use gateway_auth::oauth::{
    HandshakeCodec, Provider, HANDSHAKE_COOKIE_NAME, HANDSHAKE_MAX_AGE,
};

pub mod callback;
pub mod error;
pub mod login;
pub mod session;

pub mod gateway;

#[cfg(test)]
mod test_support;
